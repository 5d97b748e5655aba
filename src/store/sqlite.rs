// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{
    CollectionPath, Document, DocumentFields, RemoteStore, Snapshot, SnapshotEvent, SnapshotHub,
    Subscription, new_document_id,
};
use crate::error::{SubscriptionError, WriteError};
use crate::models::DocumentId;

/// Document store on top of the `documents` table.
///
/// Listeners live in memory, so only subscriptions opened through this
/// instance see its writes.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
    hub: Arc<SnapshotHub>,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            hub: SnapshotHub::new(),
        }
    }

    pub fn subscriber_count(&self, path: &CollectionPath) -> usize {
        self.hub.listener_count(path)
    }

    /// Current contents of `path` in arrival order. Rows that no longer parse
    /// are skipped.
    pub fn load(&self, path: &CollectionPath) -> rusqlite::Result<Snapshot> {
        let mut stmt = self.conn.prepare(
            "SELECT doc_id, amount, type, label, created_at FROM documents
             WHERE collection=?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![path.as_str()], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, amount_raw, kind, label, created_raw) = row?;
            let Ok(amount) = amount_raw.parse::<Decimal>() else {
                warn!(%path, doc = %id, "skipping document with invalid amount '{}'", amount_raw);
                continue;
            };
            let created_at = match created_raw {
                Some(s) => match DateTime::parse_from_rfc3339(&s) {
                    Ok(dt) => Some(dt.with_timezone(&Utc)),
                    Err(e) => {
                        warn!(%path, doc = %id, "ignoring unreadable timestamp '{}': {}", s, e);
                        None
                    }
                },
                None => None,
            };
            documents.push(Document {
                id: DocumentId(id),
                fields: DocumentFields {
                    amount,
                    kind,
                    label,
                },
                created_at,
            });
        }
        Ok(Snapshot { documents })
    }

    fn event(&self, path: &CollectionPath) -> SnapshotEvent {
        self.load(path).map_err(|e| SubscriptionError::Read {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    fn notify(&self, path: &CollectionPath) {
        self.hub.publish(path, self.event(path));
    }
}

impl RemoteStore for SqliteStore<'_> {
    fn subscribe(&self, path: &CollectionPath) -> Result<Subscription, SubscriptionError> {
        // Fail the subscribe call outright if the first read fails; the
        // caller has nothing to show yet.
        let initial = self.event(path)?;
        Ok(self.hub.register(path, Ok(initial)))
    }

    fn append(
        &self,
        path: &CollectionPath,
        fields: DocumentFields,
    ) -> Result<DocumentId, WriteError> {
        let id = new_document_id();
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        self.conn.execute(
            "INSERT INTO documents(collection, doc_id, amount, type, label, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                path.as_str(),
                id.as_str(),
                fields.amount.to_string(),
                fields.kind,
                fields.label,
                created_at
            ],
        )?;
        debug!(%path, %id, "document appended");
        self.notify(path);
        Ok(id)
    }

    fn delete(&self, path: &CollectionPath, id: &DocumentId) -> Result<bool, WriteError> {
        let n = self.conn.execute(
            "DELETE FROM documents WHERE collection=?1 AND doc_id=?2",
            params![path.as_str(), id.as_str()],
        )?;
        if n > 0 {
            debug!(%path, %id, "document deleted");
            self.notify(path);
        }
        Ok(n > 0)
    }
}
