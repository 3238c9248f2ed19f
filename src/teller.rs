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

//! The submission seam for executors that settle in the caller's thread.
//!
//! The serializing teller is not a [`Teller`]: its submissions are
//! acknowledged immediately and settle later on the worker thread.

use crate::error::TransactionError;
use crate::transaction::Transaction;

/// An executor that accepts a transaction and settles it before returning.
pub trait Teller {
    /// Settles one transaction.
    ///
    /// Returns the committed balance, or [`TransactionError::InsufficientFunds`]
    /// as a normal outcome with the ledger untouched. Never panics for a
    /// rejected withdrawal.
    fn submit(&self, transaction: Transaction) -> Result<i64, TransactionError>;
}
