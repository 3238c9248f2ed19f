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

//! Step-by-step reporting.
//!
//! Executors narrate what they do through a [`Reporter`]. Recording is
//! fire-and-forget: a reporter must not block and must not fail the
//! transaction it describes. The binary narrates to stderr; tests capture
//! events with [`MemoryReporter`].

use crate::error::TransactionError;
use crate::transaction::Direction;
use parking_lot::Mutex;

/// One observable step of transaction processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A request source started working on a transaction.
    Processing {
        source: String,
        direction: Direction,
        amount: i64,
    },
    /// A lock-guarded requester entered the critical section.
    LockAcquired { source: String },
    /// A single-balance commit.
    Committed {
        source: String,
        direction: Direction,
        amount: i64,
        balance_after: i64,
    },
    /// A double-entry commit.
    DoubleCommitted {
        source: String,
        direction: Direction,
        amount: i64,
        customer_balance: i64,
        bank_balance: i64,
    },
    /// A transaction was turned away; the ledger was left untouched.
    Rejected {
        source: String,
        direction: Direction,
        amount: i64,
        reason: TransactionError,
    },
}

/// Collaborator interface the executors call into.
pub trait Reporter: Send + Sync {
    fn record(&self, event: Event);
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn record(&self, _event: Event) {}
}

/// Narrates events to stderr, one line each.
#[derive(Debug, Default)]
pub struct StderrReporter;

impl Reporter for StderrReporter {
    fn record(&self, event: Event) {
        match event {
            Event::Processing {
                source,
                direction,
                amount,
            } => eprintln!("{source}: processing {direction} of {amount}"),
            Event::LockAcquired { source } => eprintln!("{source}: acquired lock"),
            Event::Committed {
                source,
                direction,
                amount,
                balance_after,
            } => eprintln!("{source}: {direction} of {amount} committed, balance {balance_after}"),
            Event::DoubleCommitted {
                source,
                direction,
                amount,
                customer_balance,
                bank_balance,
            } => eprintln!(
                "{source}: {direction} of {amount} committed, customer {customer_balance} | bank {bank_balance}"
            ),
            Event::Rejected {
                source,
                direction,
                amount,
                reason,
            } => eprintln!("{source}: {direction} of {amount} rejected: {reason}"),
        }
    }
}

/// Forwards every event to each sink in turn.
pub struct FanoutReporter {
    sinks: Vec<std::sync::Arc<dyn Reporter + Send + Sync>>,
}

impl FanoutReporter {
    pub fn new(sinks: Vec<std::sync::Arc<dyn Reporter + Send + Sync>>) -> Self {
        Self { sinks }
    }
}

impl Reporter for FanoutReporter {
    fn record(&self, event: Event) {
        for sink in &self.sinks {
            sink.record(event.clone());
        }
    }
}

/// Captures events in memory for inspection.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<Event>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn committed_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, Event::Committed { .. } | Event::DoubleCommitted { .. }))
            .count()
    }

    pub fn rejected_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, Event::Rejected { .. }))
            .count()
    }
}

impl Reporter for MemoryReporter {
    fn record(&self, event: Event) {
        self.events.lock().push(event);
    }
}
