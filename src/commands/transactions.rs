// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use serde::Serialize;
use std::io::{BufRead, Write};

use crate::commands::confirm_delete;
use crate::config::Config;
use crate::ledger::Ledger;
use crate::mirror::DeleteOutcome;
use crate::models::{Category, DocumentId, EntryForm, Transaction};
use crate::session::IdentityProvider;
use crate::store::RemoteStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle<P, S>(
    ledger: &mut Ledger<P, S>,
    cfg: &Config,
    m: &clap::ArgMatches,
) -> Result<()>
where
    P: IdentityProvider,
    S: RemoteStore,
{
    match m.subcommand() {
        Some(("add", sub)) => {
            add(ledger, cfg, sub)?;
        }
        Some(("list", sub)) => list(ledger, cfg, sub)?,
        Some(("rm", sub)) => {
            let stdin = std::io::stdin();
            rm(ledger, sub, &mut stdin.lock(), &mut std::io::stdout())?;
        }
        _ => {}
    }
    Ok(())
}

pub fn add<P, S>(
    ledger: &mut Ledger<P, S>,
    cfg: &Config,
    sub: &clap::ArgMatches,
) -> Result<DocumentId>
where
    P: IdentityProvider,
    S: RemoteStore,
{
    let kind = sub.get_one::<String>("type").unwrap();
    let category =
        Category::known(kind).with_context(|| format!("Unknown transaction type '{}'", kind))?;
    let amount = sub.get_one::<String>("amount").unwrap();
    let label = sub.get_one::<String>("label").unwrap();

    let mut form = EntryForm::filled(category.clone(), amount, label);
    let id = ledger.submit(&mut form).ok_or_else(|| match ledger.last_error() {
        Some(e) => anyhow!("Transaction not recorded: {}", e),
        None => anyhow!("Transaction not recorded"),
    })?;
    let shown = ledger
        .transactions()
        .iter()
        .find(|t| t.id == id)
        .map(|t| fmt_money(t.amount, &cfg.currency_symbol))
        .unwrap_or_else(|| amount.trim().to_string());
    println!(
        "Recorded {} {} '{}' ({})",
        category.form_title(),
        shown,
        label.trim(),
        id
    );
    Ok(id)
}

fn list<P, S>(ledger: &mut Ledger<P, S>, cfg: &Config, sub: &clap::ArgMatches) -> Result<()>
where
    P: IdentityProvider,
    S: RemoteStore,
{
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ledger, cfg, sub.get_one::<usize>("limit").copied());
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        if data.is_empty() {
            println!("No transactions yet.");
            return Ok(());
        }
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    format!("{} {}", r.date, r.time),
                    r.category.clone(),
                    r.label.clone(),
                    r.amount.clone(),
                    r.tag.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "When", "Type", "Label", "Amount", ""], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub time: String,
    pub category: String,
    pub label: String,
    pub amount: String,
    pub tag: String,
}

impl TransactionRow {
    pub fn from_transaction(tx: &Transaction, symbol: &str) -> Self {
        let (date, time) = match tx.created_at {
            Some(at) => {
                let local = at.with_timezone(&Local);
                (
                    local.format("%-d %b").to_string(),
                    local.format("%H:%M").to_string(),
                )
            }
            None => ("pending".to_string(), String::new()),
        };
        Self {
            id: tx.id.to_string(),
            date,
            time,
            category: tx.category.to_string(),
            label: tx.label.clone(),
            amount: format!("{}{}", tx.category.list_sign(), fmt_money(tx.amount, symbol)),
            tag: tx.category.tag().unwrap_or_default().to_string(),
        }
    }
}

/// Current list, newest first, optionally truncated.
pub fn query_rows<P, S>(
    ledger: &mut Ledger<P, S>,
    cfg: &Config,
    limit: Option<usize>,
) -> Vec<TransactionRow>
where
    P: IdentityProvider,
    S: RemoteStore,
{
    ledger.pump();
    ledger
        .transactions()
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|tx| TransactionRow::from_transaction(tx, &cfg.currency_symbol))
        .collect()
}

pub fn rm<P, S, R, W>(
    ledger: &mut Ledger<P, S>,
    sub: &clap::ArgMatches,
    input: &mut R,
    out: &mut W,
) -> Result<Option<DeleteOutcome>>
where
    P: IdentityProvider,
    S: RemoteStore,
    R: BufRead,
    W: Write,
{
    let id = DocumentId::from(sub.get_one::<String>("id").unwrap().trim());
    let skip_prompt = sub.get_flag("yes");
    let outcome = ledger.delete(&id, |tx| skip_prompt || confirm_delete(input, out, tx));
    match &outcome {
        Some(DeleteOutcome::Deleted) => writeln!(out, "Deleted {}", id)?,
        Some(DeleteOutcome::Cancelled) => writeln!(out, "Kept {}", id)?,
        Some(DeleteOutcome::NotFound) => writeln!(out, "No transaction {}; nothing to delete", id)?,
        None => {
            let msg = ledger
                .last_error()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".into());
            writeln!(out, "Delete failed: {}", msg)?
        }
    }
    Ok(outcome)
}
