// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, warn};

use super::{CollectionPath, SnapshotEvent};
use crate::error::SubscriptionError;

struct Listener {
    id: u64,
    path: CollectionPath,
    sender: Sender<SnapshotEvent>,
}

/// Registry of snapshot listeners shared by a store and its subscriptions.
#[derive(Default)]
pub struct SnapshotHub {
    next_id: AtomicU64,
    listeners: Mutex<Vec<Listener>>,
}

impl SnapshotHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a listener on `path` and hand it `initial` right away.
    pub fn register(
        self: &Arc<Self>,
        path: &CollectionPath,
        initial: SnapshotEvent,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel();
        // The receiver is alive until this function returns, so this can't fail.
        let _ = tx.send(initial);

        match self.listeners.lock() {
            Ok(mut listeners) => listeners.push(Listener {
                id,
                path: path.clone(),
                sender: tx,
            }),
            // The subscription still gets its initial snapshot; it just won't
            // hear about later changes.
            Err(_) => warn!(
                %path,
                "snapshot hub lock poisoned; subscription will not receive updates"
            ),
        }
        debug!(%path, id, "subscription registered");

        Subscription {
            id,
            receiver: rx,
            hub: Arc::downgrade(self),
            cancelled: false,
            closed: false,
        }
    }

    /// Fan `event` out to every listener on `path`, dropping dead ones.
    pub fn publish(&self, path: &CollectionPath, event: SnapshotEvent) {
        let Ok(mut listeners) = self.listeners.lock() else {
            warn!(%path, "snapshot hub lock poisoned; dropping update");
            return;
        };
        listeners.retain(|l| l.path != *path || l.sender.send(event.clone()).is_ok());
    }

    fn remove(&self, id: u64) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|l| l.id != id);
        }
    }

    pub fn listener_count(&self, path: &CollectionPath) -> usize {
        self.listeners
            .lock()
            .map(|l| l.iter().filter(|l| l.path == *path).count())
            .unwrap_or(0)
    }
}

/// Live feed of snapshots for one collection.
///
/// Cancelling unregisters from the hub before returning; after that no event
/// is handed out, including ones already queued. Dropping cancels.
pub struct Subscription {
    id: u64,
    receiver: Receiver<SnapshotEvent>,
    hub: Weak<SnapshotHub>,
    cancelled: bool,
    closed: bool,
}

impl Subscription {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Next queued event without blocking. A store that went away yields a
    /// single `Closed` error.
    pub fn try_next(&mut self) -> Option<SnapshotEvent> {
        if self.cancelled || self.closed {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                Some(Err(SubscriptionError::Closed))
            }
        }
    }

    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        if let Some(hub) = self.hub.upgrade() {
            hub.remove(self.id);
        }
        debug!(id = self.id, "subscription cancelled");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("cancelled", &self.cancelled)
            .finish()
    }
}
