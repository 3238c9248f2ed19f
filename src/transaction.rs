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

//! Transaction values.
//!
//! A [`Transaction`] is an immutable description of a requested balance
//! change. It is produced by a request source, consumed exactly once by an
//! executor, and then discarded.

use crate::base::{AccountId, TransactionId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a requested balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Withdrawal,
    Deposit,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Withdrawal => write!(f, "withdrawal"),
            Direction::Deposit => write!(f, "deposit"),
        }
    }
}

/// An immutable transaction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique id, checked for duplicates by the serializing queue.
    pub id: TransactionId,
    /// Positive magnitude of the requested change, in whole units.
    pub amount: i64,
    pub direction: Direction,
    /// Who asked, for reporting only ("atm transaction", "salary deposit").
    pub source_label: String,
    /// Target account; a single customer account in this demo's scope.
    pub account_id: AccountId,
}

impl Transaction {
    pub fn withdrawal(
        id: TransactionId,
        amount: i64,
        source_label: impl Into<String>,
        account_id: AccountId,
    ) -> Self {
        Self {
            id,
            amount,
            direction: Direction::Withdrawal,
            source_label: source_label.into(),
            account_id,
        }
    }

    pub fn deposit(
        id: TransactionId,
        amount: i64,
        source_label: impl Into<String>,
        account_id: AccountId,
    ) -> Self {
        Self {
            id,
            amount,
            direction: Direction::Deposit,
            source_label: source_label.into(),
            account_id,
        }
    }
}
