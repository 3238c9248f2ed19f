// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Unsynchronized executor: the negative control.
//!
//! [`UnsyncTeller`] runs the check-then-act sequence with no coordination
//! between concurrent requesters: read the balance, pause for the race
//! window, then store a value computed from the stale read. Two requests
//! can both pass the check before either commits, so the committed total
//! debited can exceed the starting balance. That lost update is the
//! documented behavior of this component, not a bug to fix; it exists to
//! show what the other two executors prevent.
//!
//! The balance lives in its own [`RacyLedger`] so this path can never
//! touch state belonging to a correct executor.

use crate::error::TransactionError;
use crate::ledger::BalanceSnapshot;
use crate::report::{Event, Reporter};
use crate::teller::Teller;
use crate::transaction::{Direction, Transaction};
use crate::window::RaceWindow;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Balance storage for the unsynchronized path.
///
/// An `AtomicI64` keeps the individual loads and stores well-defined, but
/// nothing makes the load-check-store sequence atomic. The race lives
/// between the operations, which is exactly the point.
#[derive(Debug)]
pub struct RacyLedger {
    balance: AtomicI64,
}

impl RacyLedger {
    pub fn new(initial: i64) -> Self {
        debug_assert!(initial >= 0, "initial balance must be non-negative");
        Self {
            balance: AtomicI64::new(initial),
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance.load(Ordering::SeqCst)
    }

    /// Only meaningful after every racing request has finished.
    pub fn snapshot(&self) -> BalanceSnapshot {
        BalanceSnapshot {
            balance: self.balance(),
        }
    }
}

/// The intentionally unsafe executor.
///
/// Must never be used where correctness matters.
pub struct UnsyncTeller {
    ledger: Arc<RacyLedger>,
    window: RaceWindow,
    reporter: Arc<dyn Reporter + Send + Sync>,
}

impl UnsyncTeller {
    pub fn new(
        ledger: Arc<RacyLedger>,
        window: RaceWindow,
        reporter: Arc<dyn Reporter + Send + Sync>,
    ) -> Self {
        Self {
            ledger,
            window,
            reporter,
        }
    }
}

impl Teller for UnsyncTeller {
    fn submit(&self, transaction: Transaction) -> Result<i64, TransactionError> {
        if transaction.amount <= 0 {
            return Err(TransactionError::InvalidAmount);
        }

        self.reporter.record(Event::Processing {
            source: transaction.source_label.clone(),
            direction: transaction.direction,
            amount: transaction.amount,
        });

        // Check-then-act with no coordination. The value stored at the end
        // is derived from the read at the start, so a concurrent commit in
        // between is silently overwritten.
        let observed = self.ledger.balance.load(Ordering::SeqCst);
        let after = match transaction.direction {
            Direction::Withdrawal => {
                if observed < transaction.amount {
                    self.reporter.record(Event::Rejected {
                        source: transaction.source_label,
                        direction: transaction.direction,
                        amount: transaction.amount,
                        reason: TransactionError::InsufficientFunds,
                    });
                    return Err(TransactionError::InsufficientFunds);
                }
                self.window.pause();
                observed - transaction.amount
            }
            Direction::Deposit => {
                self.window.pause();
                observed + transaction.amount
            }
        };
        self.ledger.balance.store(after, Ordering::SeqCst);

        self.reporter.record(Event::Committed {
            source: transaction.source_label,
            direction: transaction.direction,
            amount: transaction.amount,
            balance_after: after,
        });
        Ok(after)
    }
}
