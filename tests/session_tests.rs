// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketledger::db;
use pocketledger::error::{AuthError, LedgerError};
use pocketledger::ledger::{Ledger, SyncStatus};
use pocketledger::mirror::DeleteOutcome;
use pocketledger::models::{Category, DocumentId, EntryForm, Identity};
use pocketledger::session::{IdentityProvider, LocalIdentityProvider, SessionBinder};
use pocketledger::store::{CollectionPath, MemoryStore};
use rust_decimal::Decimal;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

const APP: &str = "test-app";

/// Provider whose network can be switched off from the test.
struct FlakyProvider {
    down: Rc<Cell<bool>>,
    current: Option<Identity>,
}

impl IdentityProvider for FlakyProvider {
    fn sign_in_anonymously(&mut self) -> Result<Identity, AuthError> {
        if self.down.get() {
            return Err(AuthError::Unavailable("network down".into()));
        }
        Ok(self
            .current
            .get_or_insert_with(|| Identity("anon-1".into()))
            .clone())
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        self.current = None;
        Ok(())
    }

    fn current(&self) -> Option<Identity> {
        self.current.clone()
    }
}

fn flaky(down: bool) -> (FlakyProvider, Rc<Cell<bool>>) {
    let switch = Rc::new(Cell::new(down));
    (
        FlakyProvider {
            down: switch.clone(),
            current: None,
        },
        switch,
    )
}

#[test]
fn local_identity_persists_across_providers() {
    let conn = db::open_in_memory().unwrap();
    let mut first = LocalIdentityProvider::new(&conn);
    assert!(first.current().is_none());
    let id = first.sign_in_anonymously().unwrap();

    let mut second = LocalIdentityProvider::new(&conn);
    assert_eq!(second.current(), Some(id.clone()));
    assert_eq!(second.sign_in_anonymously().unwrap(), id);

    second.sign_out().unwrap();
    assert!(first.current().is_none());
    assert_ne!(first.sign_in_anonymously().unwrap(), id);
}

#[test]
fn binder_notifies_only_on_change() {
    let conn = db::open_in_memory().unwrap();
    let mut binder = SessionBinder::new(LocalIdentityProvider::new(&conn));
    let rx = binder.watch();
    assert_eq!(rx.try_recv().unwrap(), None);
    assert!(!binder.is_active());

    let id = binder.sign_in().unwrap();
    assert_eq!(rx.try_recv().unwrap(), Some(id.clone()));
    binder.sign_in().unwrap();
    assert!(rx.try_recv().is_err());

    binder.sign_out().unwrap();
    assert_eq!(rx.try_recv().unwrap(), None);
}

#[test]
fn start_signs_in_and_goes_online() {
    let conn = db::open_in_memory().unwrap();
    let store = Arc::new(MemoryStore::new());
    let ledger = Ledger::start(LocalIdentityProvider::new(&conn), store.clone(), APP);

    let identity = ledger.identity().cloned().unwrap();
    assert_eq!(ledger.status(), SyncStatus::Online);
    assert_eq!(
        store.subscriber_count(&CollectionPath::transactions(APP, &identity)),
        1
    );
    assert!(ledger.last_error().is_none());
}

#[test]
fn auth_failure_shows_offline_and_reload_recovers() {
    let store = Arc::new(MemoryStore::new());
    let (provider, network_down) = flaky(true);
    let mut ledger = Ledger::start(provider, store.clone(), APP);

    assert_eq!(ledger.status(), SyncStatus::Offline);
    assert!(ledger.identity().is_none());
    assert!(matches!(ledger.last_error(), Some(LedgerError::Auth(_))));

    // Writes are refused while signed out, without panicking.
    let mut form = EntryForm::filled(Category::Income, "5", "Tip");
    assert!(ledger.submit(&mut form).is_none());
    assert_eq!(form.amount, "5");

    network_down.set(false);
    ledger.reload();
    assert_eq!(ledger.status(), SyncStatus::Online);
    assert_eq!(ledger.identity(), Some(&Identity("anon-1".into())));
    assert!(ledger.submit(&mut form).is_some());
    assert_eq!(ledger.stats().income, Decimal::new(5, 0));
}

#[test]
fn sign_out_tears_down_and_sign_in_restores() {
    let store = Arc::new(MemoryStore::new());
    let (provider, _) = flaky(false);
    let mut ledger = Ledger::start(provider, store.clone(), APP);
    let path = CollectionPath::transactions(APP, &Identity("anon-1".into()));

    let mut form = EntryForm::filled(Category::Expense, "12.99", "Book");
    ledger.submit(&mut form).unwrap();
    assert_eq!(ledger.transactions().len(), 1);

    assert!(ledger.sign_out());
    assert_eq!(ledger.status(), SyncStatus::Offline);
    assert!(ledger.transactions().is_empty());
    assert!(ledger.stats().expense.is_zero());
    assert_eq!(store.subscriber_count(&path), 0);
    assert!(ledger.mirror().path().is_none());

    ledger.sign_in().unwrap();
    assert!(ledger.mirror().is_subscribed());
    assert_eq!(ledger.transactions().len(), 1);
    assert_eq!(ledger.stats().expense, Decimal::new(1299, 2));
}

#[test]
fn new_anonymous_user_starts_with_empty_ledger() {
    let conn = db::open_in_memory().unwrap();
    let store = Arc::new(MemoryStore::new());
    let mut ledger = Ledger::start(LocalIdentityProvider::new(&conn), store.clone(), APP);
    let first = ledger.identity().cloned().unwrap();
    ledger
        .submit(&mut EntryForm::filled(Category::Income, "10", "Pocket money"))
        .unwrap();

    ledger.sign_out();
    let second = ledger.sign_in().unwrap();
    assert_ne!(first, second);
    assert!(ledger.transactions().is_empty());
}

#[test]
fn ledger_delete_of_missing_id_does_not_fail() {
    let store = Arc::new(MemoryStore::new());
    let (provider, _) = flaky(false);
    let mut ledger = Ledger::start(provider, store, APP);

    let outcome = ledger.delete(&DocumentId::from("nope"), |_| true);
    assert_eq!(outcome, Some(DeleteOutcome::NotFound));
    assert!(ledger.last_error().is_none());
}

#[test]
fn ledger_delete_failure_is_logged_not_raised() {
    let store = Arc::new(MemoryStore::new());
    let (provider, _) = flaky(false);
    let mut ledger = Ledger::start(provider, store.clone(), APP);
    let id = ledger
        .submit(&mut EntryForm::filled(Category::Owe, "8", "Jo"))
        .unwrap();

    store.set_offline(true);
    assert_eq!(ledger.delete(&id, |_| true), None);
    assert!(matches!(ledger.last_error(), Some(LedgerError::Write(_))));
    // Not applied: the record is still shown.
    assert_eq!(ledger.transactions().len(), 1);
}

#[test]
fn scenario_totals_through_the_ledger() {
    let store = Arc::new(MemoryStore::new());
    let (provider, _) = flaky(false);
    let mut ledger = Ledger::start(provider, store, APP);

    for (category, amount) in [
        (Category::Income, "100"),
        (Category::Expense, "40"),
        (Category::Savings, "10"),
        (Category::Lend, "20"),
        (Category::Owe, "5"),
    ] {
        let mut form = EntryForm::filled(category, amount, "entry");
        assert!(ledger.submit(&mut form).is_some());
    }

    let s = ledger.stats();
    assert_eq!(s.balance(), Decimal::new(50, 0));
    assert_eq!(s.net_debt(), Decimal::new(15, 0));
    assert_eq!(ledger.transactions().len(), 5);
}

#[test]
fn dropping_ledger_releases_subscription() {
    let store = Arc::new(MemoryStore::new());
    let (provider, _) = flaky(false);
    let path = CollectionPath::transactions(APP, &Identity("anon-1".into()));
    let ledger = Ledger::start(provider, store.clone(), APP);
    assert_eq!(store.subscriber_count(&path), 1);
    drop(ledger);
    assert_eq!(store.subscriber_count(&path), 0);
}
