// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Anonymous sign-in or sign-out failed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    #[error("failed to persist identity: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Snapshot delivery failed. Cloned into every affected subscriber, so it only
/// carries rendered messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read collection {path}: {message}")]
    Read { path: String, message: String },

    #[error("subscription closed by the remote store")]
    Closed,
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("no active session; sign in before writing")]
    SignedOut,

    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Rejected form input. The store is never contacted when one of these is
/// raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount is required")]
    MissingAmount,

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("amount must not exceed {max}, got {amount}")]
    AmountTooLarge { amount: Decimal, max: Decimal },

    #[error("label is required")]
    MissingLabel,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
