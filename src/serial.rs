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

//! Serializing executor.
//!
//! [`SerialTeller`] funnels all mutation through one serial owner: any
//! number of producers submit transactions into an unbounded FIFO queue,
//! and exactly one worker thread drains it, settling transactions strictly
//! one at a time against a [`DoubleLedger`] it owns outright. No lock is
//! needed because no other thread of control ever touches the ledger.
//!
//! Shutdown: [`SerialTeller::close`] consumes the teller, which drops the
//! producer side of the channel. The worker drains whatever is still
//! queued, then exits, and `close` returns the final snapshot. Because
//! `close` takes `self` by value, a producer still borrowing the teller
//! makes premature closure a compile error rather than a runtime fault.

use crate::ledger::{DoubleLedger, DoubleSnapshot};
use crate::report::{Event, Reporter};
use crate::submission::SubmissionQueue;
use crate::transaction::Transaction;
use crate::window::RaceWindow;
use crate::TransactionError;
use crossbeam::channel::unbounded;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub struct SerialTeller {
    queue: SubmissionQueue,
    worker: JoinHandle<DoubleLedger>,
}

impl SerialTeller {
    /// Takes ownership of the ledger and starts the worker.
    pub fn new(
        ledger: DoubleLedger,
        window: RaceWindow,
        reporter: Arc<dyn Reporter + Send + Sync>,
    ) -> Self {
        let (sender, receiver) = unbounded::<Transaction>();

        let worker = thread::spawn(move || {
            let mut ledger = ledger;
            // Runs until the channel disconnects, then falls through with
            // the queue fully drained.
            for transaction in receiver {
                reporter.record(Event::Processing {
                    source: transaction.source_label.clone(),
                    direction: transaction.direction,
                    amount: transaction.amount,
                });

                window.pause();

                match ledger.apply(&transaction) {
                    Ok(snapshot) => reporter.record(Event::DoubleCommitted {
                        source: transaction.source_label,
                        direction: transaction.direction,
                        amount: transaction.amount,
                        customer_balance: snapshot.customer_balance,
                        bank_balance: snapshot.bank_balance,
                    }),
                    Err(reason) => reporter.record(Event::Rejected {
                        source: transaction.source_label,
                        direction: transaction.direction,
                        amount: transaction.amount,
                        reason,
                    }),
                }
            }
            ledger
        });

        Self {
            queue: SubmissionQueue::new(sender),
            worker,
        }
    }

    /// Queues a transaction for settlement. Never blocks.
    ///
    /// `Ok` acknowledges queueing, not settlement; the outcome is
    /// delivered through the reporter when the worker reaches it.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::DuplicateTransaction`] for an id that
    /// was already accepted.
    pub fn submit(&self, transaction: Transaction) -> Result<(), TransactionError> {
        self.queue.push(transaction)
    }

    /// Closes the queue, waits for the worker to drain it, and returns
    /// the final ledger state.
    pub fn close(self) -> DoubleSnapshot {
        // Dropping the queue disconnects the channel; the worker loop then
        // terminates once everything already queued has settled.
        drop(self.queue);
        self.worker
            .join()
            .expect("serializing worker panicked")
            .snapshot()
    }
}
