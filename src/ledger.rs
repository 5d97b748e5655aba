// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Session plus mirror, driven from a single loop.
//!
//! Every state change goes through [`Ledger::pump`] or one of the user
//! actions, which pump before returning. Failures are logged and kept as the
//! last error; none of them escape to the caller.

use serde::Serialize;
use std::sync::mpsc::Receiver;
use tracing::warn;

use crate::error::LedgerError;
use crate::mirror::{DeleteOutcome, LedgerMirror, MirrorState};
use crate::models::{DocumentId, EntryForm, Identity, SummaryStats, Transaction};
use crate::session::{IdentityProvider, SessionBinder};
use crate::store::RemoteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Loading,
    Online,
    /// No identity, or the last sign-in attempt failed.
    Offline,
    /// Subscription failed; showing the last good snapshot.
    Stale,
}

impl SyncStatus {
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Loading => "Syncing...",
            Self::Online => "Online",
            Self::Offline => "Offline",
            Self::Stale => "Stale",
        }
    }
}

pub struct Ledger<P, S> {
    session: SessionBinder<P>,
    identity_rx: Receiver<Option<Identity>>,
    mirror: LedgerMirror<S>,
    auth_failed: bool,
    last_error: Option<LedgerError>,
}

impl<P: IdentityProvider, S: RemoteStore> Ledger<P, S> {
    /// Sign in anonymously and load the user's collection.
    pub fn start(provider: P, store: S, app_id: &str) -> Self {
        let mut session = SessionBinder::new(provider);
        let identity_rx = session.watch();
        let mut ledger = Self {
            session,
            identity_rx,
            mirror: LedgerMirror::new(store, app_id),
            auth_failed: false,
            last_error: None,
        };
        ledger.sign_in();
        ledger
    }

    /// Apply pending identity changes, then pending snapshots.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(next) = self.identity_rx.try_recv() {
            changed = true;
            match next {
                Some(identity) => {
                    if let Err(e) = self.mirror.attach(&identity) {
                        self.last_error = Some(e.into());
                    }
                }
                None => self.mirror.detach(),
            }
        }
        changed |= self.mirror.pump();
        changed
    }

    pub fn sign_in(&mut self) -> Option<Identity> {
        let identity = match self.session.sign_in() {
            Ok(identity) => {
                self.auth_failed = false;
                Some(identity)
            }
            Err(e) => {
                warn!("anonymous sign-in failed: {}", e);
                self.auth_failed = true;
                self.last_error = Some(e.into());
                None
            }
        };
        self.pump();
        identity
    }

    /// `false` when the provider refused; the session is then left as is.
    pub fn sign_out(&mut self) -> bool {
        let ok = match self.session.sign_out() {
            Ok(()) => true,
            Err(e) => {
                warn!("sign-out failed: {}", e);
                self.last_error = Some(e.into());
                false
            }
        };
        self.pump();
        ok
    }

    /// Retry whatever is broken: sign-in after an auth failure, the
    /// subscription after a delivery failure.
    pub fn reload(&mut self) {
        self.last_error = None;
        if self.auth_failed || !self.session.is_active() {
            self.sign_in();
            return;
        }
        if self.mirror.state() == MirrorState::Stale {
            let result = match self.mirror.path() {
                Some(_) => self.mirror.resubscribe(),
                None => match self.session.current().cloned() {
                    Some(identity) => self.mirror.attach(&identity),
                    None => Ok(()),
                },
            };
            if let Err(e) = result {
                self.last_error = Some(e.into());
            }
        }
        self.pump();
    }

    /// Write the form. On success the form is cleared and the new id
    /// returned; on failure the error is logged and kept, and the form is
    /// left as typed.
    pub fn submit(&mut self, form: &mut EntryForm) -> Option<DocumentId> {
        match self.mirror.append(form) {
            Ok(id) => {
                self.last_error = None;
                self.pump();
                Some(id)
            }
            Err(e) => {
                warn!("transaction not recorded: {}", e);
                self.last_error = Some(e);
                None
            }
        }
    }

    /// Delete after confirmation. `None` means the store rejected the delete.
    pub fn delete<F>(&mut self, id: &DocumentId, confirm: F) -> Option<DeleteOutcome>
    where
        F: FnOnce(&Transaction) -> bool,
    {
        match self.mirror.delete(id, confirm) {
            Ok(outcome) => {
                if outcome == DeleteOutcome::Deleted {
                    self.last_error = None;
                }
                self.pump();
                Some(outcome)
            }
            Err(e) => {
                warn!(%id, "delete failed: {}", e);
                self.last_error = Some(e.into());
                None
            }
        }
    }

    pub fn status(&self) -> SyncStatus {
        if self.auth_failed {
            return SyncStatus::Offline;
        }
        match self.mirror.state() {
            MirrorState::Detached => SyncStatus::Offline,
            MirrorState::Loading => SyncStatus::Loading,
            MirrorState::Live => SyncStatus::Online,
            MirrorState::Stale => SyncStatus::Stale,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.current()
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.mirror.transactions()
    }

    pub fn stats(&self) -> SummaryStats {
        self.mirror.stats()
    }

    pub fn last_error(&self) -> Option<&LedgerError> {
        self.last_error.as_ref()
    }

    pub fn mirror(&self) -> &LedgerMirror<S> {
        &self.mirror
    }
}
