// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local mirror of one user's transaction collection.

use tracing::{debug, info, warn};

use crate::aggregate::{aggregate, ignored_count, sort_newest_first};
use crate::error::{LedgerError, SubscriptionError, WriteError};
use crate::models::{DocumentId, EntryForm, Identity, SummaryStats, Transaction};
use crate::store::{CollectionPath, Document, DocumentFields, RemoteStore, Snapshot, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorState {
    /// No identity attached.
    Detached,
    /// Subscribed, first snapshot not applied yet.
    Loading,
    Live,
    /// Delivery failed; the last good list is still published.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Confirmation declined.
    Cancelled,
    /// Not in the current list, or already gone from the store.
    NotFound,
}

pub struct LedgerMirror<S> {
    store: S,
    app_id: String,
    path: Option<CollectionPath>,
    subscription: Option<Subscription>,
    transactions: Vec<Transaction>,
    stats: SummaryStats,
    state: MirrorState,
}

impl<S: RemoteStore> LedgerMirror<S> {
    pub fn new(store: S, app_id: &str) -> Self {
        Self {
            store,
            app_id: app_id.to_string(),
            path: None,
            subscription: None,
            transactions: Vec::new(),
            stats: SummaryStats::default(),
            state: MirrorState::Detached,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn stats(&self) -> SummaryStats {
        self.stats
    }

    pub fn state(&self) -> MirrorState {
        self.state
    }

    pub fn path(&self) -> Option<&CollectionPath> {
        self.path.as_ref()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribe to `identity`'s collection, replacing any previous one.
    pub fn attach(&mut self, identity: &Identity) -> Result<(), SubscriptionError> {
        self.detach();
        let path = CollectionPath::transactions(&self.app_id, identity);
        self.path = Some(path.clone());
        match self.store.subscribe(&path) {
            Ok(sub) => {
                info!(%path, "subscribed");
                self.subscription = Some(sub);
                self.state = MirrorState::Loading;
                Ok(())
            }
            Err(e) => {
                warn!(%path, "subscribe failed: {}", e);
                self.state = MirrorState::Stale;
                Err(e)
            }
        }
    }

    /// Cancel the subscription and forget the published list. Safe to call
    /// repeatedly.
    pub fn detach(&mut self) {
        if let Some(mut sub) = self.subscription.take() {
            sub.cancel();
            if let Some(path) = &self.path {
                info!(%path, "unsubscribed");
            }
        }
        self.path = None;
        self.transactions.clear();
        self.stats = SummaryStats::default();
        self.state = MirrorState::Detached;
    }

    /// Re-open the subscription on the current path, keeping the list until
    /// the first fresh snapshot arrives.
    pub fn resubscribe(&mut self) -> Result<(), SubscriptionError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        if let Some(mut sub) = self.subscription.take() {
            sub.cancel();
        }
        match self.store.subscribe(&path) {
            Ok(sub) => {
                info!(%path, "resubscribed");
                self.subscription = Some(sub);
                Ok(())
            }
            Err(e) => {
                warn!(%path, "resubscribe failed: {}", e);
                self.state = MirrorState::Stale;
                Err(e)
            }
        }
    }

    /// Apply every queued snapshot event in delivery order. Returns whether
    /// the published list changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Some(event) = self.subscription.as_mut().and_then(|s| s.try_next()) {
            match event {
                Ok(snapshot) => {
                    self.publish(snapshot);
                    changed = true;
                }
                Err(e) => {
                    warn!("snapshot delivery failed, keeping last known list: {}", e);
                    self.state = MirrorState::Stale;
                    if e == SubscriptionError::Closed {
                        self.subscription = None;
                    }
                }
            }
        }
        changed
    }

    fn publish(&mut self, snapshot: Snapshot) {
        let mut transactions: Vec<Transaction> =
            snapshot.documents.into_iter().map(to_transaction).collect();
        sort_newest_first(&mut transactions);

        let ignored = ignored_count(&transactions);
        if ignored > 0 {
            debug!(ignored, "records with unknown categories left out of totals");
        }
        self.stats = aggregate(&transactions);
        self.transactions = transactions;
        self.state = MirrorState::Live;
        debug!(count = self.transactions.len(), "snapshot applied");
    }

    /// Validate and write the form. The form is cleared only after the store
    /// acknowledges the write.
    pub fn append(&mut self, form: &mut EntryForm) -> Result<DocumentId, LedgerError> {
        let tx = form.validate()?;
        let path = self.path.clone().ok_or(WriteError::SignedOut)?;
        let id = self.store.append(&path, DocumentFields::from(&tx))?;
        info!(%id, category = %tx.category, amount = %tx.amount, "transaction recorded");
        form.clear();
        Ok(id)
    }

    /// Delete `id` after `confirm` approves it.
    pub fn delete<F>(&mut self, id: &DocumentId, confirm: F) -> Result<DeleteOutcome, WriteError>
    where
        F: FnOnce(&Transaction) -> bool,
    {
        let path = self.path.clone().ok_or(WriteError::SignedOut)?;
        let Some(tx) = self.transactions.iter().find(|t| t.id == *id) else {
            debug!(%id, "delete ignored: not in current list");
            return Ok(DeleteOutcome::NotFound);
        };
        if !confirm(tx) {
            return Ok(DeleteOutcome::Cancelled);
        }
        if self.store.delete(&path, id)? {
            info!(%id, "transaction deleted");
            Ok(DeleteOutcome::Deleted)
        } else {
            debug!(%id, "delete ignored: already removed");
            Ok(DeleteOutcome::NotFound)
        }
    }
}

fn to_transaction(doc: Document) -> Transaction {
    Transaction {
        id: doc.id,
        amount: doc.fields.amount,
        category: doc.fields.kind.into(),
        label: doc.fields.label,
        created_at: doc.created_at,
    }
}
