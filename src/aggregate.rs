// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, SummaryStats, Transaction};
use std::cmp::Ordering;

/// Fold transactions into the five running totals.
///
/// Every known category feeds exactly one total; unknown tags are skipped.
/// Amounts are added exactly, rounding is left to the display layer.
pub fn aggregate<'a, I>(transactions: I) -> SummaryStats
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .fold(SummaryStats::default(), |mut acc, tx| {
            acc.record(&tx.category, tx.amount);
            acc
        })
}

/// Newest first. Stable, so records stamped with the same instant keep the
/// order the snapshot delivered them in; unstamped records go last.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| match (&a.created_at, &b.created_at) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Number of records the aggregator skips because of an unknown tag.
pub fn ignored_count<'a, I>(transactions: I) -> usize
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|tx| matches!(tx.category, Category::Unknown(_)))
        .count()
}
