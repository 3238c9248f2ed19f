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

//! Lock-guarded executor.
//!
//! [`LockedTeller`] wraps the ledger in a [`parking_lot::Mutex`] and runs
//! the whole read-check-pause-commit sequence inside one critical section.
//! The pause stays under the lock on purpose: it stands for the true
//! duration of processing, not an artifact to minimize. The balance is
//! re-read after acquisition, so a requester that blocked behind another
//! observes every commit that settled before its turn.
//!
//! Mutual exclusion is the only guarantee. Which of two blocked requesters
//! acquires the lock first is unspecified; callers must not assume an
//! order.

use crate::error::TransactionError;
use crate::ledger::{BalanceSnapshot, Ledger};
use crate::report::{Event, Reporter};
use crate::teller::Teller;
use crate::transaction::{Direction, Transaction};
use crate::window::RaceWindow;
use parking_lot::Mutex;
use std::sync::Arc;

pub struct LockedTeller {
    ledger: Arc<Mutex<Ledger>>,
    window: RaceWindow,
    reporter: Arc<dyn Reporter + Send + Sync>,
}

impl LockedTeller {
    pub fn new(
        ledger: Arc<Mutex<Ledger>>,
        window: RaceWindow,
        reporter: Arc<dyn Reporter + Send + Sync>,
    ) -> Self {
        Self {
            ledger,
            window,
            reporter,
        }
    }

    /// Reads the current balance.
    ///
    /// Only meaningful as a final result once the completion join for all
    /// outstanding requests has resolved; a snapshot taken earlier is a
    /// usage error, not a ledger defect.
    pub fn snapshot(&self) -> BalanceSnapshot {
        self.ledger.lock().snapshot()
    }
}

impl Teller for LockedTeller {
    fn submit(&self, transaction: Transaction) -> Result<i64, TransactionError> {
        if transaction.amount <= 0 {
            return Err(TransactionError::InvalidAmount);
        }

        self.reporter.record(Event::Processing {
            source: transaction.source_label.clone(),
            direction: transaction.direction,
            amount: transaction.amount,
        });

        // Guard drop releases the lock on every exit path below, success
        // and rejection alike.
        let mut ledger = self.ledger.lock();
        self.reporter.record(Event::LockAcquired {
            source: transaction.source_label.clone(),
        });

        let result = match transaction.direction {
            Direction::Withdrawal => {
                // Fresh read under the lock, never a value captured before
                // blocking.
                if ledger.balance() < transaction.amount {
                    Err(TransactionError::InsufficientFunds)
                } else {
                    self.window.pause();
                    ledger.withdraw(transaction.amount)
                }
            }
            Direction::Deposit => {
                self.window.pause();
                ledger.deposit(transaction.amount)
            }
        };

        match result {
            Ok(balance_after) => {
                self.reporter.record(Event::Committed {
                    source: transaction.source_label,
                    direction: transaction.direction,
                    amount: transaction.amount,
                    balance_after,
                });
                Ok(balance_after)
            }
            Err(reason) => {
                self.reporter.record(Event::Rejected {
                    source: transaction.source_label,
                    direction: transaction.direction,
                    amount: transaction.amount,
                    reason: reason.clone(),
                });
                Err(reason)
            }
        }
    }
}
