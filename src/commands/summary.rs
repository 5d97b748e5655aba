// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::ledger::{Ledger, SyncStatus};
use crate::models::SummaryStats;
use crate::session::IdentityProvider;
use crate::store::RemoteStore;
use crate::utils::{fmt_money, fmt_signed, fmt_whole, maybe_print_json, pretty_table};

pub fn handle<P, S>(
    ledger: &mut Ledger<P, S>,
    cfg: &Config,
    m: &clap::ArgMatches,
) -> Result<()>
where
    P: IdentityProvider,
    S: RemoteStore,
{
    ledger.pump();
    let view = SummaryView::new(ledger.stats(), ledger.status(), &cfg.currency_symbol);
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &view)? {
        println!("{}", view.render());
    }
    Ok(())
}

/// Summary panel, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryView {
    pub status: SyncStatus,
    pub balance: String,
    pub savings: String,
    pub net_debt: String,
    pub income: String,
    pub expense: String,
    pub owed_to_me: String,
    pub i_owe: String,
    pub footer: Footer,
}

/// Whole-unit In / Out / Debt Net strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footer {
    pub income: String,
    pub expense: String,
    pub net_debt: String,
}

impl SummaryView {
    pub fn new(stats: SummaryStats, status: SyncStatus, symbol: &str) -> Self {
        Self {
            status,
            balance: fmt_money(stats.balance(), symbol),
            savings: fmt_money(stats.savings, symbol),
            net_debt: fmt_signed(stats.net_debt(), symbol),
            income: fmt_money(stats.income, symbol),
            expense: fmt_money(stats.expense, symbol),
            owed_to_me: fmt_money(stats.owed_to_me, symbol),
            i_owe: fmt_money(stats.i_owe, symbol),
            footer: Footer {
                income: fmt_whole(stats.income, symbol),
                expense: fmt_whole(stats.expense, symbol),
                net_debt: fmt_whole(stats.net_debt(), symbol),
            },
        }
    }

    pub fn render(&self) -> String {
        let rows = vec![
            vec!["Net Available Funds".to_string(), self.balance.clone()],
            vec!["Savings".to_string(), self.savings.clone()],
            vec!["Net Debt".to_string(), self.net_debt.clone()],
            vec!["Income".to_string(), self.income.clone()],
            vec!["Expense".to_string(), self.expense.clone()],
            vec!["Owed to me".to_string(), self.owed_to_me.clone()],
            vec!["I owe".to_string(), self.i_owe.clone()],
        ];
        format!(
            "[{}]\n{}\nIn {} | Out {} | Debt Net {}",
            self.status.indicator(),
            pretty_table(&["Summary", "Amount"], rows),
            self.footer.income,
            self.footer.expense,
            self.footer.net_debt
        )
    }
}
