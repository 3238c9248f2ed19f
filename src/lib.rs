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

//! # Teller Demo
//!
//! A concurrency lab for a shared bank ledger. The same withdrawal and
//! deposit requests are driven through three executors so their contracts
//! can be compared:
//!
//! - [`UnsyncTeller`]: no coordination at all; the check-then-act race is
//!   the documented behavior (the negative control).
//! - [`SerialTeller`]: every mutation funneled through one worker draining
//!   an ordered queue; correct without any lock.
//! - [`LockedTeller`]: exclusive critical section per transaction; correct
//!   under arbitrary contention.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use teller_demo_rs::{
//!     AccountId, DoubleLedger, NullReporter, RaceWindow, SerialTeller, Transaction,
//!     TransactionId,
//! };
//!
//! let teller = SerialTeller::new(
//!     DoubleLedger::new(1000, 5000),
//!     RaceWindow::None,
//!     Arc::new(NullReporter),
//! );
//!
//! let account = AccountId::new("CUST1001");
//! teller
//!     .submit(Transaction::withdrawal(TransactionId(1), 700, "phone", account))
//!     .unwrap();
//!
//! let snapshot = teller.close();
//! assert_eq!(snapshot.customer_balance, 300);
//! assert_eq!(snapshot.total(), 6000);
//! ```
//!
//! ## Correctness oracles
//!
//! The double-entry ledger's `customer + bank` sum is invariant under
//! committed transactions, and the single-balance ledger never goes
//! negative. Both correct executors uphold these; the unsynchronized one
//! demonstrably does not.

pub mod base;
mod error;
pub mod ledger;
pub mod locked;
pub mod report;
pub mod runner;
pub mod serial;
mod submission;
mod teller;
pub mod transaction;
pub mod unsync;
pub mod window;

pub use base::{AccountId, TransactionId};
pub use error::TransactionError;
pub use ledger::{BalanceSnapshot, DoubleLedger, DoubleSnapshot, Ledger};
pub use locked::LockedTeller;
pub use report::{Event, FanoutReporter, MemoryReporter, NullReporter, Reporter, StderrReporter};
pub use serial::SerialTeller;
pub use submission::SubmissionQueue;
pub use teller::Teller;
pub use transaction::{Direction, Transaction};
pub use unsync::{RacyLedger, UnsyncTeller};
pub use window::RaceWindow;
