// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Line-oriented interactive ledger.
//!
//! One loop reads a command, applies it, then pumps the ledger so the list
//! and totals always reflect the latest snapshot.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::commands::confirm_delete;
use crate::commands::session::status_line;
use crate::commands::summary::SummaryView;
use crate::commands::transactions::TransactionRow;
use crate::config::Config;
use crate::ledger::Ledger;
use crate::mirror::DeleteOutcome;
use crate::models::{Category, DocumentId, EntryForm};
use crate::session::IdentityProvider;
use crate::store::RemoteStore;
use crate::utils::{fmt_money, fmt_signed, pretty_table};

const HELP_TAIL: &str = "\
  rm <id>                      delete a transaction (asks first)
  list [n]                     recent activity
  summary                      balances and totals
  status                       identity and sync state
  reload                       retry sign-in / subscription
  signin | signout
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(EntryForm),
    Remove(DocumentId),
    List(Option<usize>),
    Summary,
    Status,
    Reload,
    SignIn,
    SignOut,
    Help,
    Quit,
    Empty,
}

/// Primary shell verb for each category.
fn verb(category: &Category) -> &'static str {
    match category {
        Category::Income => "earn",
        Category::Expense => "spend",
        Category::Savings => "save",
        Category::Lend => "lend",
        Category::Owe => "owe",
        Category::Unknown(_) => "",
    }
}

fn help() -> String {
    let mut text = String::from("Commands:\n");
    for category in &Category::KNOWN {
        let args = format!("{} <amount> <label...>", verb(category));
        text.push_str(&format!(
            "  {:<29}{} ({})\n",
            args,
            category.action_label(),
            category.label_prompt()
        ));
    }
    text.push_str(HELP_TAIL);
    text
}

fn verb_category(verb: &str) -> Option<Category> {
    match verb {
        "earn" | "income" => Some(Category::Income),
        "spend" | "expense" => Some(Category::Expense),
        "save" | "savings" => Some(Category::Savings),
        "lend" => Some(Category::Lend),
        "owe" | "borrow" => Some(Category::Owe),
        _ => None,
    }
}

/// Parse one input line. Missing amount or label still yields an `Add`, so
/// the ledger's validation reports what is wrong.
pub fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(ShellCommand::Empty);
    };
    let verb = verb.to_lowercase();

    if let Some(category) = verb_category(&verb) {
        let amount = words.next().unwrap_or_default();
        let label = words.collect::<Vec<_>>().join(" ");
        return Ok(ShellCommand::Add(EntryForm::filled(category, amount, &label)));
    }

    match verb.as_str() {
        "rm" | "delete" => match words.next() {
            Some(id) => Ok(ShellCommand::Remove(DocumentId::from(id))),
            None => Err("usage: rm <id>".into()),
        },
        "list" | "ls" => match words.next() {
            Some(n) => n
                .parse::<usize>()
                .map(|n| ShellCommand::List(Some(n)))
                .map_err(|_| format!("invalid count '{}'", n)),
            None => Ok(ShellCommand::List(None)),
        },
        "summary" => Ok(ShellCommand::Summary),
        "status" => Ok(ShellCommand::Status),
        "reload" => Ok(ShellCommand::Reload),
        "signin" => Ok(ShellCommand::SignIn),
        "signout" => Ok(ShellCommand::SignOut),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command '{}' (try 'help')", other)),
    }
}

pub fn run<P, S, R, W>(
    ledger: &mut Ledger<P, S>,
    cfg: &Config,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    P: IdentityProvider,
    S: RemoteStore,
    R: BufRead,
    W: Write,
{
    let symbol = cfg.currency_symbol.as_str();
    ledger.pump();
    writeln!(out, "{}", status_line(ledger))?;
    writeln!(out, "{}", headline(ledger, symbol))?;

    loop {
        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let before = ledger.stats();
        let cmd = match parse_line(&line) {
            Ok(cmd) => cmd,
            Err(msg) => {
                writeln!(out, "{}", msg)?;
                continue;
            }
        };

        match cmd {
            ShellCommand::Empty => {}
            ShellCommand::Quit => break,
            ShellCommand::Help => writeln!(out, "{}", help())?,
            ShellCommand::Add(mut form) => {
                let title = form.category.form_title().to_string();
                match ledger.submit(&mut form) {
                    Some(id) => writeln!(out, "Saved {} ({})", title, id)?,
                    None => {
                        let msg = ledger.last_error().map(|e| e.to_string()).unwrap_or_default();
                        writeln!(out, "Not saved: {}", msg)?
                    }
                }
            }
            ShellCommand::Remove(id) => {
                match ledger.delete(&id, |tx| confirm_delete(input, out, tx)) {
                    Some(DeleteOutcome::Deleted) => writeln!(out, "Deleted {}", id)?,
                    Some(DeleteOutcome::Cancelled) => writeln!(out, "Kept {}", id)?,
                    Some(DeleteOutcome::NotFound) => writeln!(out, "No transaction {}", id)?,
                    None => {
                        let msg = ledger.last_error().map(|e| e.to_string()).unwrap_or_default();
                        writeln!(out, "Delete failed: {}", msg)?
                    }
                }
            }
            ShellCommand::List(limit) => {
                ledger.pump();
                let rows: Vec<Vec<String>> = ledger
                    .transactions()
                    .iter()
                    .take(limit.unwrap_or(usize::MAX))
                    .map(|tx| {
                        let r = TransactionRow::from_transaction(tx, symbol);
                        vec![r.id, r.date, r.category, r.label, r.amount, r.tag]
                    })
                    .collect();
                if rows.is_empty() {
                    writeln!(out, "No transactions yet.")?;
                } else {
                    writeln!(
                        out,
                        "{}",
                        pretty_table(&["ID", "Date", "Type", "Label", "Amount", ""], rows)
                    )?;
                }
            }
            ShellCommand::Summary => {
                ledger.pump();
                let view = SummaryView::new(ledger.stats(), ledger.status(), symbol);
                writeln!(out, "{}", view.render())?;
            }
            ShellCommand::Status => writeln!(out, "{}", status_line(ledger))?,
            ShellCommand::Reload => {
                ledger.reload();
                writeln!(out, "{}", status_line(ledger))?;
            }
            ShellCommand::SignIn => {
                match ledger.sign_in() {
                    Some(identity) => writeln!(out, "Signed in as {}", identity)?,
                    None => writeln!(out, "Offline: sign-in failed")?,
                }
            }
            ShellCommand::SignOut => {
                if ledger.sign_out() {
                    writeln!(out, "Signed out")?;
                } else {
                    writeln!(out, "Sign-out failed")?;
                }
            }
        }

        ledger.pump();
        if ledger.stats() != before {
            writeln!(out, "{}", headline(ledger, symbol))?;
        }
    }

    Ok(())
}

/// One-line hero card: balance, savings, net debt.
fn headline<P, S>(ledger: &Ledger<P, S>, symbol: &str) -> String
where
    P: IdentityProvider,
    S: RemoteStore,
{
    let stats = ledger.stats();
    format!(
        "Net Available Funds {} | Savings {} | Net Debt {}",
        fmt_money(stats.balance(), symbol),
        fmt_money(stats.savings, symbol),
        fmt_signed(stats.net_debt(), symbol)
    )
}
