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

//! Benchmarks comparing the serializing and lock-guarded executors.
//!
//! Run with: cargo bench
//!
//! The race window is disabled so the numbers measure coordination cost,
//! not simulated processing time.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use teller_demo_rs::{
    AccountId, DoubleLedger, Ledger, LockedTeller, NullReporter, RaceWindow, SerialTeller, Teller,
    Transaction, TransactionId,
};

fn account() -> AccountId {
    AccountId::new("CUST1001")
}

fn make_withdrawal(id: u32, amount: i64) -> Transaction {
    Transaction::withdrawal(TransactionId(id), amount, "bench", account())
}

fn make_deposit(id: u32, amount: i64) -> Transaction {
    Transaction::deposit(TransactionId(id), amount, "bench", account())
}

// =============================================================================
// Serializing Executor
// =============================================================================

fn bench_serial_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("serial_throughput");

    for count in [100u32, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let teller = SerialTeller::new(
                    DoubleLedger::new(count as i64 * 10, 0),
                    RaceWindow::None,
                    Arc::new(NullReporter),
                );
                for i in 0..count {
                    teller.submit(black_box(make_withdrawal(i, 1))).unwrap();
                }
                teller.close()
            })
        });
    }

    group.finish();
}

fn bench_serial_racing_producers(c: &mut Criterion) {
    let mut group = c.benchmark_group("serial_racing_producers");

    for producers in [2usize, 4, 8].iter() {
        group.throughput(Throughput::Elements(1_000));
        group.bench_with_input(
            BenchmarkId::from_parameter(producers),
            producers,
            |b, &producers| {
                b.iter(|| {
                    let teller = SerialTeller::new(
                        DoubleLedger::new(100_000, 0),
                        RaceWindow::None,
                        Arc::new(NullReporter),
                    );
                    let per_producer = 1_000 / producers;
                    thread::scope(|scope| {
                        for p in 0..producers {
                            let teller = &teller;
                            scope.spawn(move || {
                                for i in 0..per_producer {
                                    let id = (p * per_producer + i) as u32;
                                    teller.submit(make_withdrawal(id, 1)).unwrap();
                                }
                            });
                        }
                    });
                    teller.close()
                })
            },
        );
    }

    group.finish();
}

// =============================================================================
// Lock-Guarded Executor
// =============================================================================

fn bench_locked_single_thread(c: &mut Criterion) {
    c.bench_function("locked_single_thread", |b| {
        let ledger = Arc::new(Mutex::new(Ledger::new(i64::MAX / 2)));
        let teller = LockedTeller::new(ledger, RaceWindow::None, Arc::new(NullReporter));
        let mut id = 0u32;
        b.iter(|| {
            id = id.wrapping_add(1);
            teller.submit(black_box(make_deposit(id, 1))).unwrap()
        })
    });
}

fn bench_locked_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("locked_contention");

    for threads in [2usize, 4, 8].iter() {
        group.throughput(Throughput::Elements(1_000));
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            threads,
            |b, &threads| {
                b.iter(|| {
                    let ledger = Arc::new(Mutex::new(Ledger::new(1_000_000)));
                    let teller = LockedTeller::new(
                        Arc::clone(&ledger),
                        RaceWindow::None,
                        Arc::new(NullReporter),
                    );
                    let per_thread = 1_000 / threads;
                    thread::scope(|scope| {
                        for t in 0..threads {
                            let teller = &teller;
                            scope.spawn(move || {
                                for i in 0..per_thread {
                                    let id = (t * per_thread + i) as u32;
                                    teller.submit(make_withdrawal(id, 1)).unwrap();
                                }
                            });
                        }
                    });
                    teller.snapshot()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_serial_throughput,
    bench_serial_racing_producers,
    bench_locked_single_thread,
    bench_locked_contention
);
criterion_main!(benches);
