// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketledger::config::Config;
use pocketledger::ledger::Ledger;
use pocketledger::mirror::DeleteOutcome;
use pocketledger::session::LocalIdentityProvider;
use pocketledger::store::SqliteStore;
use pocketledger::{cli, commands::transactions, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::Cursor;

type SqlLedger<'c> = Ledger<LocalIdentityProvider<'c>, SqliteStore<'c>>;

fn ledger(conn: &Connection) -> SqlLedger<'_> {
    Ledger::start(LocalIdentityProvider::new(conn), SqliteStore::new(conn), "test")
}

/// Matches of the innermost `tx` subcommand.
fn tx_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["pocketledger", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some((_, leaf)) = tx_m.subcommand() else {
        panic!("no tx leaf subcommand");
    };
    leaf.clone()
}

#[test]
fn add_records_transaction() {
    let conn = db::open_in_memory().unwrap();
    let mut ledger = ledger(&conn);
    let cfg = Config::default();

    let m = tx_matches(&["add", "--type", "expense", "--amount", " 12.50 ", "--label", "Lunch"]);
    let id = transactions::add(&mut ledger, &cfg, &m).unwrap();

    let tx = &ledger.transactions()[0];
    assert_eq!(tx.id, id);
    assert_eq!(tx.amount, Decimal::new(1250, 2));
    assert_eq!(tx.label, "Lunch");
    assert_eq!(ledger.stats().expense, Decimal::new(1250, 2));
}

#[test]
fn add_rejects_bad_amounts() {
    let conn = db::open_in_memory().unwrap();
    let mut ledger = ledger(&conn);
    let cfg = Config::default();

    for amount in ["abc", "-5", "0"] {
        let amount_arg = format!("--amount={amount}");
        let m = tx_matches(&["add", "--type", "income", amount_arg.as_str(), "--label", "x"]);
        let err = transactions::add(&mut ledger, &cfg, &m).unwrap_err();
        assert!(
            err.to_string().contains("Transaction not recorded"),
            "unexpected error for {amount}: {err}"
        );
    }
    assert!(ledger.transactions().is_empty());
}

#[test]
fn add_rejects_blank_label() {
    let conn = db::open_in_memory().unwrap();
    let mut ledger = ledger(&conn);
    let m = tx_matches(&["add", "--type", "lend", "--amount", "5", "--label", "   "]);
    assert!(transactions::add(&mut ledger, &Config::default(), &m).is_err());
}

#[test]
fn unknown_type_is_rejected_by_cli() {
    let res = cli::build_cli().try_get_matches_from([
        "pocketledger", "tx", "add", "--type", "refund", "--amount", "1", "--label", "x",
    ]);
    assert!(res.is_err());
}

#[test]
fn list_limit_respected() {
    let conn = db::open_in_memory().unwrap();
    let mut ledger = ledger(&conn);
    let cfg = Config::default();
    for (kind, amount) in [("income", "100"), ("expense", "40"), ("owe", "5")] {
        let m = tx_matches(&["add", "--type", kind, "--amount", amount, "--label", "x"]);
        transactions::add(&mut ledger, &cfg, &m).unwrap();
    }

    let m = tx_matches(&["list", "--limit", "2"]);
    let limit = m.get_one::<usize>("limit").copied();
    assert_eq!(transactions::query_rows(&mut ledger, &cfg, limit).len(), 2);

    let all = transactions::query_rows(&mut ledger, &cfg, None);
    assert_eq!(all.len(), 3);
    let owe = all.iter().find(|r| r.category == "owe").unwrap();
    assert_eq!(owe.amount, "£5.00");
    assert_eq!(owe.tag, "Liability");
    let expense = all.iter().find(|r| r.category == "expense").unwrap();
    assert_eq!(expense.amount, "-£40.00");
    let income = all.iter().find(|r| r.category == "income").unwrap();
    assert_eq!(income.amount, "+£100.00");
}

#[test]
fn rm_asks_before_deleting() {
    let conn = db::open_in_memory().unwrap();
    let mut ledger = ledger(&conn);
    let cfg = Config::default();
    let add = tx_matches(&["add", "--type", "savings", "--amount", "25", "--label", "Rainy day"]);
    let id = transactions::add(&mut ledger, &cfg, &add).unwrap();
    let rm = tx_matches(&["rm", id.as_str()]);

    let mut out = Vec::new();
    let outcome = transactions::rm(&mut ledger, &rm, &mut Cursor::new("n\n"), &mut out).unwrap();
    assert_eq!(outcome, Some(DeleteOutcome::Cancelled));
    assert_eq!(ledger.transactions().len(), 1);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Delete this entry?"));
    assert!(text.contains(&format!("Kept {}", id)));

    let mut out = Vec::new();
    let outcome = transactions::rm(&mut ledger, &rm, &mut Cursor::new("y\n"), &mut out).unwrap();
    assert_eq!(outcome, Some(DeleteOutcome::Deleted));
    assert!(ledger.transactions().is_empty());
    assert!(ledger.stats().savings.is_zero());

    let mut out = Vec::new();
    let outcome = transactions::rm(&mut ledger, &rm, &mut Cursor::new(""), &mut out).unwrap();
    assert_eq!(outcome, Some(DeleteOutcome::NotFound));
    assert!(String::from_utf8(out).unwrap().contains("nothing to delete"));
}

#[test]
fn rm_yes_skips_prompt() {
    let conn = db::open_in_memory().unwrap();
    let mut ledger = ledger(&conn);
    let add = tx_matches(&["add", "--type", "income", "--amount", "3", "--label", "Tip"]);
    let id = transactions::add(&mut ledger, &Config::default(), &add).unwrap();

    let rm = tx_matches(&["rm", id.as_str(), "--yes"]);
    let mut out = Vec::new();
    let outcome = transactions::rm(&mut ledger, &rm, &mut Cursor::new(""), &mut out).unwrap();
    assert_eq!(outcome, Some(DeleteOutcome::Deleted));
    assert!(!String::from_utf8(out).unwrap().contains("Delete this entry?"));
}

#[test]
fn handle_dispatches_add_and_list() {
    let conn = db::open_in_memory().unwrap();
    let mut ledger = ledger(&conn);
    let cfg = Config::default();

    for args in [
        vec!["pocketledger", "tx", "add", "--type", "owe", "--amount", "7", "--label", "Jo"],
        vec!["pocketledger", "tx", "list"],
    ] {
        let matches = cli::build_cli().get_matches_from(args);
        let Some(("tx", tx_m)) = matches.subcommand() else {
            panic!("no tx subcommand");
        };
        transactions::handle(&mut ledger, &cfg, tx_m).unwrap();
    }
    assert_eq!(ledger.stats().i_owe, Decimal::new(7, 0));
}
