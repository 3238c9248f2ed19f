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

//! Error types for transaction processing.
//!
//! `InsufficientFunds` is a normal, recoverable outcome: the requester is
//! told the withdrawal did not happen and the ledger is left untouched.
//! Misuse of the executors (closing the serializing queue while a producer
//! still holds it, snapshotting before the completion join) is not modeled
//! here — it is either unrepresentable by construction or panics.

use thiserror::Error;

/// Transaction processing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// Amount is zero or negative
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Withdrawal would exceed the current balance
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Duplicate transaction ID submitted to the serializing queue
    #[error("duplicate transaction ID")]
    DuplicateTransaction,
}

#[cfg(test)]
mod tests {
    use super::TransactionError;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            TransactionError::InvalidAmount.to_string(),
            "invalid amount (must be positive)"
        );
        assert_eq!(
            TransactionError::InsufficientFunds.to_string(),
            "insufficient funds"
        );
        assert_eq!(
            TransactionError::DuplicateTransaction.to_string(),
            "duplicate transaction ID"
        );
    }

    #[test]
    fn errors_are_cloneable() {
        let error = TransactionError::InsufficientFunds;
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
