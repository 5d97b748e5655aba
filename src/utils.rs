// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round half away from zero to `dp` places. Display only.
pub fn round_half_up(d: Decimal, dp: u32) -> Decimal {
    d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// `£12.30`, `-£5.00`
pub fn fmt_money(d: Decimal, symbol: &str) -> String {
    let r = round_half_up(d, 2);
    if r.is_sign_negative() && !r.is_zero() {
        format!("-{}{:.2}", symbol, r.abs())
    } else {
        format!("{}{:.2}", symbol, r.abs())
    }
}

/// Like [`fmt_money`] but with an explicit `+` on values that display as zero
/// or positive.
pub fn fmt_signed(d: Decimal, symbol: &str) -> String {
    let r = round_half_up(d, 2);
    if r.is_zero() || r > Decimal::ZERO {
        format!("+{}", fmt_money(r, symbol))
    } else {
        fmt_money(r, symbol)
    }
}

/// Whole units, for the compact footer.
pub fn fmt_whole(d: Decimal, symbol: &str) -> String {
    let r = round_half_up(d, 0);
    if r.is_sign_negative() && !r.is_zero() {
        format!("-{}{}", symbol, r.abs().normalize())
    } else {
        format!("{}{}", symbol, r.abs().normalize())
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line.
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
