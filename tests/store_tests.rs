// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketledger::db;
use pocketledger::ledger::{Ledger, SyncStatus};
use pocketledger::models::{Category, EntryForm, Identity};
use pocketledger::session::{IdentityProvider, LocalIdentityProvider};
use pocketledger::store::{CollectionPath, DocumentFields, RemoteStore, SqliteStore};
use rusqlite::params;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn path() -> CollectionPath {
    CollectionPath::transactions("test-app", &Identity("u1".into()))
}

fn fields(kind: &str, amount: &str, label: &str) -> DocumentFields {
    DocumentFields {
        amount: amount.parse().unwrap(),
        kind: kind.into(),
        label: label.into(),
    }
}

#[test]
fn subscribe_sees_current_set_then_updates() {
    let conn = db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    let first = store.append(&path(), fields("income", "100.25", "Salary")).unwrap();

    let mut sub = store.subscribe(&path()).unwrap();
    let initial = sub.try_next().unwrap().unwrap();
    assert_eq!(initial.documents.len(), 1);
    assert_eq!(initial.documents[0].id, first);
    assert_eq!(initial.documents[0].fields.amount, Decimal::new(10025, 2));
    assert!(initial.documents[0].created_at.is_some());
    assert!(sub.try_next().is_none());

    store.append(&path(), fields("expense", "4.50", "Coffee")).unwrap();
    let next = sub.try_next().unwrap().unwrap();
    let labels: Vec<&str> = next.documents.iter().map(|d| d.fields.label.as_str()).collect();
    assert_eq!(labels, vec!["Salary", "Coffee"]);
}

#[test]
fn collections_are_isolated_per_user() {
    let conn = db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    let other = CollectionPath::transactions("test-app", &Identity("u2".into()));
    store.append(&other, fields("income", "1", "Not mine")).unwrap();

    let mut sub = store.subscribe(&path()).unwrap();
    assert!(sub.try_next().unwrap().unwrap().documents.is_empty());

    // Writes to another collection do not wake this subscriber.
    store.append(&other, fields("income", "2", "Still not mine")).unwrap();
    assert!(sub.try_next().is_none());
}

#[test]
fn delete_reports_whether_anything_was_removed() {
    let conn = db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    let id = store.append(&path(), fields("owe", "5", "Alex")).unwrap();

    assert!(store.delete(&path(), &id).unwrap());
    assert!(!store.delete(&path(), &id).unwrap());
    assert!(store.load(&path()).unwrap().documents.is_empty());
}

#[test]
fn malformed_rows_are_skipped() {
    let conn = db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    store.append(&path(), fields("income", "10", "Good")).unwrap();
    conn.execute(
        "INSERT INTO documents(collection, doc_id, amount, type, label, created_at)
         VALUES (?1, 'bad-amount', 'ten', 'income', 'Bad', NULL)",
        params![path().as_str()],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO documents(collection, doc_id, amount, type, label, created_at)
         VALUES (?1, 'bad-time', '3', 'expense', 'Odd stamp', 'yesterday')",
        params![path().as_str()],
    )
    .unwrap();

    let snap = store.load(&path()).unwrap();
    let labels: Vec<&str> = snap.documents.iter().map(|d| d.fields.label.as_str()).collect();
    assert_eq!(labels, vec!["Good", "Odd stamp"]);
    assert!(snap.documents[1].created_at.is_none());
}

#[test]
fn cancelled_subscription_is_unregistered() {
    let conn = db::open_in_memory().unwrap();
    let store = SqliteStore::new(&conn);
    let mut sub = store.subscribe(&path()).unwrap();
    assert_eq!(store.subscriber_count(&path()), 1);
    sub.cancel();
    assert_eq!(store.subscriber_count(&path()), 0);
    drop(sub);
    assert_eq!(store.subscriber_count(&path()), 0);
}

#[test]
fn ledger_data_survives_reopen() {
    let dir = tempdir().unwrap();
    let db_file = dir.path().join("nested").join("ledger.sqlite");

    let identity = {
        let conn = db::open_or_init(&db_file).unwrap();
        let mut ledger = Ledger::start(
            LocalIdentityProvider::new(&conn),
            SqliteStore::new(&conn),
            "test-app",
        );
        let mut form = EntryForm::filled(Category::Lend, "20", "Sam");
        ledger.submit(&mut form).unwrap();
        let identity = ledger.identity().cloned().unwrap();
        identity
    };

    let conn = db::open_or_init(&db_file).unwrap();
    let ledger = Ledger::start(
        LocalIdentityProvider::new(&conn),
        SqliteStore::new(&conn),
        "test-app",
    );
    assert_eq!(ledger.identity(), Some(&identity));
    assert_eq!(ledger.status(), SyncStatus::Online);
    assert_eq!(ledger.transactions().len(), 1);
    assert_eq!(ledger.stats().owed_to_me, Decimal::new(20, 0));
}

#[test]
fn ledger_starts_over_persisted_huge_amounts() {
    let conn = db::open_in_memory().unwrap();
    let identity = LocalIdentityProvider::new(&conn)
        .sign_in_anonymously()
        .unwrap();
    let user_path = CollectionPath::transactions("test-app", &identity);
    for doc in ["huge-1", "huge-2"] {
        conn.execute(
            "INSERT INTO documents(collection, doc_id, amount, type, label, created_at)
             VALUES (?1, ?2, '50000000000000000000000000000', 'lend', 'Glitch', NULL)",
            params![user_path.as_str(), doc],
        )
        .unwrap();
    }

    let ledger = Ledger::start(
        LocalIdentityProvider::new(&conn),
        SqliteStore::new(&conn),
        "test-app",
    );
    assert_eq!(ledger.status(), SyncStatus::Online);
    assert_eq!(ledger.stats().owed_to_me, Decimal::MAX);
    assert_eq!(ledger.stats().net_debt(), Decimal::MAX);
}
