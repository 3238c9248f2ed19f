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

//! Ledger state.
//!
//! Two forms of the same idea:
//!
//! - [`Ledger`]: a single customer balance. Invariant: the balance never
//!   goes negative; a withdrawal commits only if `balance >= amount`
//!   evaluated atomically with the commit.
//! - [`DoubleLedger`]: customer and bank balances moved in lockstep.
//!   Invariant: `customer_balance + bank_balance` is constant across all
//!   committed transactions. The sum is the primary correctness oracle.
//!
//! Neither type synchronizes anything. Each executor decides how access
//! is coordinated; a `Ledger` is owned by whoever is currently allowed to
//! mutate it.

use crate::error::TransactionError;
use crate::transaction::{Direction, Transaction};
use serde::Serialize;

/// Point-in-time view of a single-balance ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceSnapshot {
    pub balance: i64,
}

/// Single-balance ledger used by the lock-guarded teller.
#[derive(Debug)]
pub struct Ledger {
    balance: i64,
}

impl Ledger {
    pub fn new(initial: i64) -> Self {
        debug_assert!(initial >= 0, "initial balance must be non-negative");
        Self { balance: initial }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Returns identical values for repeated calls with no intervening
    /// transaction.
    pub fn snapshot(&self) -> BalanceSnapshot {
        BalanceSnapshot {
            balance: self.balance,
        }
    }

    /// Decreases the balance. Returns the new balance.
    pub fn withdraw(&mut self, amount: i64) -> Result<i64, TransactionError> {
        if amount <= 0 {
            return Err(TransactionError::InvalidAmount);
        }
        if self.balance < amount {
            return Err(TransactionError::InsufficientFunds);
        }
        self.balance -= amount;
        self.assert_invariants();
        Ok(self.balance)
    }

    /// Increases the balance. Returns the new balance.
    pub fn deposit(&mut self, amount: i64) -> Result<i64, TransactionError> {
        if amount <= 0 {
            return Err(TransactionError::InvalidAmount);
        }
        self.balance += amount;
        self.assert_invariants();
        Ok(self.balance)
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.balance >= 0,
            "Invariant violated: balance went negative: {}",
            self.balance
        );
    }
}

/// Point-in-time view of a double-entry ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DoubleSnapshot {
    pub customer_balance: i64,
    pub bank_balance: i64,
}

impl DoubleSnapshot {
    /// The conservation oracle: invariant under committed transactions.
    pub fn total(&self) -> i64 {
        self.customer_balance + self.bank_balance
    }
}

/// Double-entry ledger used by the serializing teller.
///
/// Every committed withdrawal debits the customer and credits the bank;
/// every deposit credits the customer and debits the bank (the bank's
/// offsetting liability). A rejected withdrawal touches neither side.
#[derive(Debug)]
pub struct DoubleLedger {
    customer_balance: i64,
    bank_balance: i64,
    /// Captured at construction; the conservation check compares against it.
    initial_total: i64,
}

impl DoubleLedger {
    pub fn new(customer_balance: i64, bank_balance: i64) -> Self {
        debug_assert!(customer_balance >= 0, "customer balance must be non-negative");
        Self {
            customer_balance,
            bank_balance,
            initial_total: customer_balance + bank_balance,
        }
    }

    pub fn customer_balance(&self) -> i64 {
        self.customer_balance
    }

    pub fn bank_balance(&self) -> i64 {
        self.bank_balance
    }

    pub fn snapshot(&self) -> DoubleSnapshot {
        DoubleSnapshot {
            customer_balance: self.customer_balance,
            bank_balance: self.bank_balance,
        }
    }

    /// Applies one transaction as a single indivisible step.
    ///
    /// Both sides move or neither does: the caller must be the sole owner
    /// (`&mut self` guarantees it), so no other thread can observe a debit
    /// without its matching credit.
    ///
    /// # Errors
    ///
    /// - [`TransactionError::InvalidAmount`] - zero or negative amount.
    /// - [`TransactionError::InsufficientFunds`] - withdrawal exceeds the
    ///   customer balance; both balances left untouched.
    pub fn apply(&mut self, transaction: &Transaction) -> Result<DoubleSnapshot, TransactionError> {
        if transaction.amount <= 0 {
            return Err(TransactionError::InvalidAmount);
        }

        match transaction.direction {
            Direction::Withdrawal => {
                if self.customer_balance < transaction.amount {
                    return Err(TransactionError::InsufficientFunds);
                }
                self.customer_balance -= transaction.amount; // Debit customer
                self.bank_balance += transaction.amount; // Credit bank
            }
            Direction::Deposit => {
                self.customer_balance += transaction.amount; // Credit customer
                self.bank_balance -= transaction.amount; // Debit bank
            }
        }

        self.assert_invariants();
        Ok(self.snapshot())
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.customer_balance >= 0,
            "Invariant violated: customer balance went negative: {}",
            self.customer_balance
        );
        debug_assert_eq!(
            self.customer_balance + self.bank_balance,
            self.initial_total,
            "Invariant violated: conservation broken"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{AccountId, TransactionId};

    fn withdrawal(amount: i64) -> Transaction {
        Transaction::withdrawal(TransactionId(1), amount, "test", AccountId::new("CUST1001"))
    }

    fn deposit(amount: i64) -> Transaction {
        Transaction::deposit(TransactionId(2), amount, "test", AccountId::new("CUST1001"))
    }

    // === Single-balance form ===

    #[test]
    fn withdraw_decrements_balance() {
        let mut ledger = Ledger::new(1000);
        assert_eq!(ledger.withdraw(700), Ok(300));
        assert_eq!(ledger.balance(), 300);
    }

    #[test]
    fn withdraw_insufficient_leaves_balance_untouched() {
        let mut ledger = Ledger::new(300);
        assert_eq!(ledger.withdraw(500), Err(TransactionError::InsufficientFunds));
        assert_eq!(ledger.balance(), 300);
    }

    #[test]
    fn withdraw_exact_balance_empties_ledger() {
        let mut ledger = Ledger::new(500);
        assert_eq!(ledger.withdraw(500), Ok(0));
    }

    #[test]
    fn deposit_increments_balance() {
        let mut ledger = Ledger::new(1000);
        assert_eq!(ledger.deposit(200), Ok(1200));
    }

    #[test]
    fn zero_or_negative_amounts_rejected() {
        let mut ledger = Ledger::new(1000);
        assert_eq!(ledger.withdraw(0), Err(TransactionError::InvalidAmount));
        assert_eq!(ledger.withdraw(-5), Err(TransactionError::InvalidAmount));
        assert_eq!(ledger.deposit(0), Err(TransactionError::InvalidAmount));
        assert_eq!(ledger.balance(), 1000);
    }

    #[test]
    fn snapshot_is_idempotent() {
        let ledger = Ledger::new(1000);
        assert_eq!(ledger.snapshot(), ledger.snapshot());
    }

    // === Double-entry form ===

    #[test]
    fn withdrawal_moves_funds_to_bank() {
        let mut ledger = DoubleLedger::new(1000, 5000);
        let snap = ledger.apply(&withdrawal(700)).unwrap();
        assert_eq!(snap.customer_balance, 300);
        assert_eq!(snap.bank_balance, 5700);
        assert_eq!(snap.total(), 6000);
    }

    #[test]
    fn deposit_moves_funds_to_customer() {
        let mut ledger = DoubleLedger::new(1000, 5000);
        let snap = ledger.apply(&deposit(1500)).unwrap();
        assert_eq!(snap.customer_balance, 2500);
        assert_eq!(snap.bank_balance, 3500);
        assert_eq!(snap.total(), 6000);
    }

    #[test]
    fn rejected_withdrawal_touches_neither_balance() {
        let mut ledger = DoubleLedger::new(100, 5000);
        let result = ledger.apply(&withdrawal(700));
        assert_eq!(result, Err(TransactionError::InsufficientFunds));
        assert_eq!(ledger.customer_balance(), 100);
        assert_eq!(ledger.bank_balance(), 5000);
    }

    #[test]
    fn total_is_conserved_across_mixed_sequence() {
        let mut ledger = DoubleLedger::new(1000, 5000);
        let _ = ledger.apply(&withdrawal(700));
        let _ = ledger.apply(&withdrawal(500)); // rejected: only 300 left
        let _ = ledger.apply(&deposit(1500));
        let _ = ledger.apply(&withdrawal(400));
        assert_eq!(ledger.snapshot().total(), 6000);
    }

    #[test]
    fn double_snapshot_is_idempotent() {
        let ledger = DoubleLedger::new(1000, 5000);
        assert_eq!(ledger.snapshot(), ledger.snapshot());
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let ledger = DoubleLedger::new(1000, 5000);
        let json = serde_json::to_value(ledger.snapshot()).unwrap();
        assert_eq!(json["customer_balance"], 1000);
        assert_eq!(json["bank_balance"], 5000);
    }
}
