// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Remote document store abstraction.
//!
//! A store keeps per-user collections of transaction documents and pushes the
//! full current set of a collection to every subscriber after each change.
//! Subscribers hold a [`Subscription`], which owns the receiving half of the
//! channel and unregisters itself on cancel or drop.

pub mod hub;
pub mod memory;
pub mod sqlite;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::{SubscriptionError, WriteError};
use crate::models::{DocumentId, Identity, NewTransaction};

pub use hub::{SnapshotHub, Subscription};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// `artifacts/{app_id}/users/{uid}/transactions`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn transactions(app_id: &str, identity: &Identity) -> Self {
        Self(format!(
            "artifacts/{}/users/{}/transactions",
            app_id,
            identity.uid()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client-supplied part of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFields {
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
}

impl From<&NewTransaction> for DocumentFields {
    fn from(tx: &NewTransaction) -> Self {
        Self {
            amount: tx.amount,
            kind: tx.category.as_str().to_string(),
            label: tx.label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub fields: DocumentFields,
    pub created_at: Option<DateTime<Utc>>,
}

/// Complete contents of one collection, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub documents: Vec<Document>,
}

pub type SnapshotEvent = Result<Snapshot, SubscriptionError>;

pub trait RemoteStore {
    /// Register for snapshots of `path`. The current set is delivered
    /// immediately, then again after every append or delete.
    fn subscribe(&self, path: &CollectionPath) -> Result<Subscription, SubscriptionError>;

    fn append(&self, path: &CollectionPath, fields: DocumentFields)
    -> Result<DocumentId, WriteError>;

    /// `Ok(false)` when there was nothing to delete.
    fn delete(&self, path: &CollectionPath, id: &DocumentId) -> Result<bool, WriteError>;
}

impl<S> RemoteStore for &S
where
    S: RemoteStore + ?Sized,
{
    fn subscribe(&self, path: &CollectionPath) -> Result<Subscription, SubscriptionError> {
        (**self).subscribe(path)
    }

    fn append(
        &self,
        path: &CollectionPath,
        fields: DocumentFields,
    ) -> Result<DocumentId, WriteError> {
        (**self).append(path, fields)
    }

    fn delete(&self, path: &CollectionPath, id: &DocumentId) -> Result<bool, WriteError> {
        (**self).delete(path, id)
    }
}

impl<S> RemoteStore for Rc<S>
where
    S: RemoteStore + ?Sized,
{
    fn subscribe(&self, path: &CollectionPath) -> Result<Subscription, SubscriptionError> {
        (**self).subscribe(path)
    }

    fn append(
        &self,
        path: &CollectionPath,
        fields: DocumentFields,
    ) -> Result<DocumentId, WriteError> {
        (**self).append(path, fields)
    }

    fn delete(&self, path: &CollectionPath, id: &DocumentId) -> Result<bool, WriteError> {
        (**self).delete(path, id)
    }
}

impl<S> RemoteStore for Arc<S>
where
    S: RemoteStore + ?Sized,
{
    fn subscribe(&self, path: &CollectionPath) -> Result<Subscription, SubscriptionError> {
        (**self).subscribe(path)
    }

    fn append(
        &self,
        path: &CollectionPath,
        fields: DocumentFields,
    ) -> Result<DocumentId, WriteError> {
        (**self).append(path, fields)
    }

    fn delete(&self, path: &CollectionPath, id: &DocumentId) -> Result<bool, WriteError> {
        (**self).delete(path, id)
    }
}

/// Fresh server-side document id.
pub(crate) fn new_document_id() -> DocumentId {
    DocumentId(uuid::Uuid::now_v7().simple().to_string())
}
