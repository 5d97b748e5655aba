// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod mirror;
pub mod models;
pub mod session;
pub mod store;
pub mod utils;

pub use aggregate::aggregate;
pub use ledger::{Ledger, SyncStatus};
pub use models::{Category, SummaryStats, Transaction};
