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

//! Thread-safe submission queue with deduplication.
//!
//! Producers race to push; whichever submission completes first is queued
//! first, and the queue preserves that order for the single consumer on
//! the other end of the channel. A [`DashMap`] provides O(1) duplicate
//! detection so each transaction id is accepted at most once.

use crate::TransactionError;
use crate::base::TransactionId;
use crate::transaction::Transaction;
use crossbeam::channel::Sender;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Producer-side handle of the serializing queue.
///
/// Pushing never blocks: the channel is unbounded and absorbs bursts.
#[derive(Debug)]
pub struct SubmissionQueue {
    /// Transaction IDs already accepted, for duplicate detection.
    seen: DashMap<TransactionId, ()>,

    /// FIFO conduit to the worker.
    sender: Sender<Transaction>,
}

impl SubmissionQueue {
    pub fn new(sender: Sender<Transaction>) -> Self {
        Self {
            seen: DashMap::new(),
            sender,
        }
    }

    /// Adds a transaction to the queue.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::DuplicateTransaction`] if a transaction
    /// with the same ID was already accepted.
    ///
    /// # Panics
    ///
    /// Panics if the consumer is gone. The worker only stops once the
    /// queue itself is dropped, so a failed send means the queue was
    /// closed while a producer was still submitting, which is a
    /// programming error and must fail loudly.
    pub fn push(&self, transaction: Transaction) -> Result<(), TransactionError> {
        // Entry API for atomic check-and-insert so racing producers cannot
        // both claim the same id.
        match self.seen.entry(transaction.id) {
            Entry::Occupied(_) => Err(TransactionError::DuplicateTransaction),
            Entry::Vacant(entry) => {
                entry.insert(());
                self.sender
                    .send(transaction)
                    .expect("submission queue closed while a producer was still submitting");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::AccountId;
    use crossbeam::channel::unbounded;

    fn withdrawal(id: u32, amount: i64) -> Transaction {
        Transaction::withdrawal(
            TransactionId(id),
            amount,
            "test",
            AccountId::new("CUST1001"),
        )
    }

    #[test]
    fn push_preserves_fifo_order() {
        let (sender, receiver) = unbounded();
        let queue = SubmissionQueue::new(sender);

        queue.push(withdrawal(1, 700)).unwrap();
        queue.push(withdrawal(2, 500)).unwrap();

        assert_eq!(receiver.recv().unwrap().id, TransactionId(1));
        assert_eq!(receiver.recv().unwrap().id, TransactionId(2));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let (sender, receiver) = unbounded();
        let queue = SubmissionQueue::new(sender);

        queue.push(withdrawal(1, 700)).unwrap();
        assert_eq!(
            queue.push(withdrawal(1, 500)),
            Err(TransactionError::DuplicateTransaction)
        );
        assert_eq!(receiver.len(), 1);
    }

    #[test]
    #[should_panic(expected = "submission queue closed")]
    fn push_after_consumer_gone_panics() {
        let (sender, receiver) = unbounded();
        let queue = SubmissionQueue::new(sender);
        drop(receiver);

        let _ = queue.push(withdrawal(1, 700));
    }
}
