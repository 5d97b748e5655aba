// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod exporter;
pub mod session;
pub mod shell;
pub mod summary;
pub mod transactions;

use std::io::{BufRead, Write};

use crate::models::Transaction;

/// Ask "Delete this entry?" and read one answer line. Anything but y/yes is
/// a no, including end of input.
pub fn confirm_delete<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    tx: &Transaction,
) -> bool {
    let _ = write!(
        out,
        "Delete this entry? {} {} '{}' [y/N] ",
        tx.category, tx.amount, tx.label
    );
    let _ = out.flush();
    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
    }
}
