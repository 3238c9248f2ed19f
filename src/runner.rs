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

//! Scenario orchestration.
//!
//! [`run_concurrently`] is the completion join every direct executor run
//! goes through: one thread per transaction, one [`WaitGroup`] clone per
//! thread, dropped exactly once when the request finishes (success and
//! rejection alike). The orchestrator observes ledger state only after
//! `wait()` returns; snapshots taken earlier would race with in-flight
//! requests and are a usage error, not a ledger defect.
//!
//! The scenario functions reproduce the classic demo sequences on each of
//! the three executors, each against its own freshly constructed ledger
//! so no strategy can contaminate another's state.

use crate::base::{AccountId, TransactionId};
use crate::error::TransactionError;
use crate::ledger::{DoubleLedger, Ledger};
use crate::locked::LockedTeller;
use crate::report::{FanoutReporter, MemoryReporter, Reporter};
use crate::serial::SerialTeller;
use crate::teller::Teller;
use crate::transaction::{Direction, Transaction};
use crate::unsync::{RacyLedger, UnsyncTeller};
use crate::window::RaceWindow;
use crossbeam::channel::unbounded;
use crossbeam::sync::WaitGroup;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::thread;

/// Outcome of one request, paired with the transaction that produced it.
pub type RequestOutcome = (Transaction, Result<i64, TransactionError>);

/// Fans transactions out to one thread each and joins on completion.
///
/// Returns once every request has signaled; the outcomes carry no
/// ordering guarantee beyond "all finished".
pub fn run_concurrently<T>(teller: &T, transactions: Vec<Transaction>) -> Vec<RequestOutcome>
where
    T: Teller + Sync,
{
    let wait_group = WaitGroup::new();
    let (sender, receiver) = unbounded();

    thread::scope(|scope| {
        for transaction in transactions {
            let wait_group = wait_group.clone();
            let sender = sender.clone();
            scope.spawn(move || {
                let request = transaction.clone();
                let outcome = teller.submit(transaction);
                let _ = sender.send((request, outcome));
                // Signals completion exactly once, on every path.
                drop(wait_group);
            });
        }
        wait_group.wait();
    });

    drop(sender);
    receiver.iter().collect()
}

/// Result row of one scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary {
    pub scenario: String,
    pub initial_balance: i64,
    pub final_balance: i64,
    pub committed: usize,
    pub rejected: usize,
    /// Trials (or runs) whose final balance disagreed with the committed
    /// transactions. Zero for the correct executors; usually positive for
    /// the unsynchronized baseline under contention.
    pub invariant_violations: usize,
}

fn account() -> AccountId {
    AccountId::new("CUST1001")
}

/// Signed sum of committed amounts: deposits positive, withdrawals negative.
fn committed_delta(outcomes: &[RequestOutcome]) -> i64 {
    outcomes
        .iter()
        .filter(|(_, outcome)| outcome.is_ok())
        .map(|(transaction, _)| match transaction.direction {
            Direction::Withdrawal => -transaction.amount,
            Direction::Deposit => transaction.amount,
        })
        .sum()
}

fn committed_count(outcomes: &[RequestOutcome]) -> usize {
    outcomes.iter().filter(|(_, o)| o.is_ok()).count()
}

/// Part 1: the race-condition demonstration.
///
/// Each trial gives the unsynchronized teller a fresh balance of 1000 and
/// two concurrent withdrawals of 700 and 500. A trial is consistent only
/// if the final balance equals 1000 minus what was actually committed;
/// under contention the lost update usually breaks that.
pub fn race_scenario(
    trials: usize,
    window: RaceWindow,
    reporter: Arc<dyn Reporter + Send + Sync>,
) -> ScenarioSummary {
    const INITIAL: i64 = 1000;

    let mut committed = 0;
    let mut rejected = 0;
    let mut violations = 0;
    let mut final_balance = INITIAL;

    for trial in 0..trials {
        let ledger = Arc::new(RacyLedger::new(INITIAL));
        let teller = UnsyncTeller::new(Arc::clone(&ledger), window.clone(), Arc::clone(&reporter));

        let base = (trial * 2) as u32;
        let outcomes = run_concurrently(
            &teller,
            vec![
                Transaction::withdrawal(TransactionId(base + 1), 700, "phone transaction", account()),
                Transaction::withdrawal(TransactionId(base + 2), 500, "atm transaction", account()),
            ],
        );

        final_balance = ledger.snapshot().balance;
        let this_committed = committed_count(&outcomes);
        committed += this_committed;
        rejected += outcomes.len() - this_committed;
        if final_balance != INITIAL + committed_delta(&outcomes) {
            violations += 1;
        }
    }

    ScenarioSummary {
        scenario: "race".into(),
        initial_balance: INITIAL,
        final_balance,
        committed,
        rejected,
        invariant_violations: violations,
    }
}

/// Part 2: channel-serialized processing over the double-entry ledger.
///
/// Four producers race to submit; the worker settles them in queue order.
/// Whatever subset commits, the customer+bank total must still be 6000.
pub fn serial_scenario(
    window: RaceWindow,
    reporter: Arc<dyn Reporter + Send + Sync>,
) -> ScenarioSummary {
    const INITIAL_CUSTOMER: i64 = 1000;
    const INITIAL_BANK: i64 = 5000;

    let counts = Arc::new(MemoryReporter::new());
    let fanout: Arc<dyn Reporter + Send + Sync> = Arc::new(FanoutReporter::new(vec![
        Arc::clone(&counts) as Arc<dyn Reporter + Send + Sync>,
        reporter,
    ]));

    let teller = SerialTeller::new(
        DoubleLedger::new(INITIAL_CUSTOMER, INITIAL_BANK),
        window,
        fanout,
    );

    let requests = vec![
        Transaction::withdrawal(TransactionId(1), 700, "Phone Transfer", account()),
        Transaction::withdrawal(TransactionId(2), 500, "ATM Withdrawal", account()),
        Transaction::withdrawal(TransactionId(3), 400, "Online Purchase", account()),
        Transaction::deposit(TransactionId(4), 1500, "Salary Deposit", account()),
    ];

    thread::scope(|scope| {
        for request in requests {
            let teller = &teller;
            scope.spawn(move || {
                teller
                    .submit(request)
                    .expect("scenario submits unique transaction ids");
            });
        }
    });

    // All producers have returned; closing now is safe by construction.
    let snapshot = teller.close();
    debug_assert_eq!(snapshot.total(), INITIAL_CUSTOMER + INITIAL_BANK);

    ScenarioSummary {
        scenario: "serial".into(),
        initial_balance: INITIAL_CUSTOMER,
        final_balance: snapshot.customer_balance,
        committed: counts.committed_count(),
        rejected: counts.rejected_count(),
        invariant_violations: usize::from(snapshot.total() != INITIAL_CUSTOMER + INITIAL_BANK),
    }
}

/// Part 3: the mutex-guarded teller.
///
/// Two contended withdrawals first, then a second round mixing a
/// withdrawal with two deposits, each round joined before the next.
pub fn locked_scenario(
    window: RaceWindow,
    reporter: Arc<dyn Reporter + Send + Sync>,
) -> ScenarioSummary {
    const INITIAL: i64 = 1000;

    let ledger = Arc::new(Mutex::new(Ledger::new(INITIAL)));
    let teller = LockedTeller::new(Arc::clone(&ledger), window, reporter);

    let mut outcomes = run_concurrently(
        &teller,
        vec![
            Transaction::withdrawal(TransactionId(1), 700, "phone transaction", account()),
            Transaction::withdrawal(TransactionId(2), 500, "atm transaction", account()),
        ],
    );

    outcomes.extend(run_concurrently(
        &teller,
        vec![
            Transaction::withdrawal(TransactionId(3), 400, "online purchase", account()),
            Transaction::deposit(TransactionId(4), 1000, "salary deposit", account()),
            Transaction::deposit(TransactionId(5), 200, "refund", account()),
        ],
    ));

    let final_balance = teller.snapshot().balance;
    let committed = committed_count(&outcomes);

    ScenarioSummary {
        scenario: "locked".into(),
        initial_balance: INITIAL,
        final_balance,
        committed,
        rejected: outcomes.len() - committed,
        invariant_violations: usize::from(final_balance != INITIAL + committed_delta(&outcomes)),
    }
}
