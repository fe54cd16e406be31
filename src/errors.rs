// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Precondition failures surfaced by ledger operations. Each maps to a 4xx
/// in an API deployment; none is retryable. Anything else (store failure,
/// corrupt row) propagates as a plain `anyhow` error, the 5xx analogue.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Missing or out-of-range input.
    #[error("{0}")]
    Validation(String),

    /// Product or investment absent, or product inactive.
    #[error("{0}")]
    NotFound(String),

    /// Wallet balance or product unit inventory cannot cover the request.
    #[error("{0}")]
    InsufficientFunds(String),

    /// Requester does not own the resource.
    #[error("{0}")]
    Unauthorized(String),

    /// Redeeming an investment that is already closed.
    #[error("{0}")]
    InvalidState(String),
}
