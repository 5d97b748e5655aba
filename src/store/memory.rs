// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-process document store for tests and offline runs.
//!
//! - No IO
//! - Snapshots are pushed synchronously from inside `append` / `delete`
//! - `set_offline(true)` makes every call fail the way an unreachable
//!   backend would

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::{
    CollectionPath, Document, DocumentFields, RemoteStore, Snapshot, SnapshotHub, Subscription,
    new_document_id,
};
use crate::error::{SubscriptionError, WriteError};
use crate::models::DocumentId;

pub struct MemoryStore {
    collections: Mutex<HashMap<CollectionPath, Vec<Document>>>,
    hub: Arc<SnapshotHub>,
    offline: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            hub: SnapshotHub::new(),
            offline: AtomicBool::new(false),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    /// Insert a document with an explicit server stamp and notify listeners.
    pub fn seed(
        &self,
        path: &CollectionPath,
        fields: DocumentFields,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<DocumentId, WriteError> {
        let id = new_document_id();
        {
            let mut collections = self.lock()?;
            collections.entry(path.clone()).or_default().push(Document {
                id: id.clone(),
                fields,
                created_at,
            });
        }
        self.notify(path);
        Ok(id)
    }

    /// Push a delivery failure to every subscriber of `path`.
    pub fn fail_subscribers(&self, path: &CollectionPath, err: SubscriptionError) {
        self.hub.publish(path, Err(err));
    }

    pub fn subscriber_count(&self, path: &CollectionPath) -> usize {
        self.hub.listener_count(path)
    }

    pub fn snapshot(&self, path: &CollectionPath) -> Snapshot {
        let documents = self
            .collections
            .lock()
            .ok()
            .and_then(|c| c.get(path).cloned())
            .unwrap_or_default();
        Snapshot { documents }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<CollectionPath, Vec<Document>>>, WriteError> {
        self.collections
            .lock()
            .map_err(|_| WriteError::Unavailable("memory store lock poisoned".into()))
    }

    fn ensure_online(&self) -> Result<(), WriteError> {
        if self.is_offline() {
            return Err(WriteError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }

    fn notify(&self, path: &CollectionPath) {
        self.hub.publish(path, Ok(self.snapshot(path)));
    }
}

impl RemoteStore for MemoryStore {
    fn subscribe(&self, path: &CollectionPath) -> Result<Subscription, SubscriptionError> {
        if self.is_offline() {
            return Err(SubscriptionError::Unavailable(
                "memory store is offline".into(),
            ));
        }
        Ok(self.hub.register(path, Ok(self.snapshot(path))))
    }

    fn append(
        &self,
        path: &CollectionPath,
        fields: DocumentFields,
    ) -> Result<DocumentId, WriteError> {
        self.ensure_online()?;
        let id = self.seed(path, fields, Some(Utc::now()))?;
        debug!(%path, %id, "document appended");
        Ok(id)
    }

    fn delete(&self, path: &CollectionPath, id: &DocumentId) -> Result<bool, WriteError> {
        self.ensure_online()?;
        let removed = {
            let mut collections = self.lock()?;
            match collections.get_mut(path) {
                Some(docs) => {
                    let before = docs.len();
                    docs.retain(|d| d.id != *id);
                    docs.len() != before
                }
                None => false,
            }
        };
        if removed {
            debug!(%path, %id, "document deleted");
            self.notify(path);
        }
        Ok(removed)
    }
}
