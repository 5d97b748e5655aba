// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{info, warn};

use crate::db;
use crate::error::AuthError;
use crate::models::Identity;

const IDENTITY_KEY: &str = "anonymous_uid";

pub trait IdentityProvider {
    /// Resume the persisted anonymous identity, or mint a new one.
    fn sign_in_anonymously(&mut self) -> Result<Identity, AuthError>;

    fn sign_out(&mut self) -> Result<(), AuthError>;

    fn current(&self) -> Option<Identity>;
}

/// Anonymous identity kept in the `settings` table.
pub struct LocalIdentityProvider<'c> {
    conn: &'c Connection,
}

impl<'c> LocalIdentityProvider<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl IdentityProvider for LocalIdentityProvider<'_> {
    fn sign_in_anonymously(&mut self) -> Result<Identity, AuthError> {
        if let Some(uid) = db::get_setting(self.conn, IDENTITY_KEY)? {
            return Ok(Identity(uid));
        }
        let uid = uuid::Uuid::now_v7().simple().to_string();
        db::set_setting(self.conn, IDENTITY_KEY, &uid)?;
        info!(uid = %uid, "created anonymous identity");
        Ok(Identity(uid))
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        db::clear_setting(self.conn, IDENTITY_KEY)?;
        Ok(())
    }

    fn current(&self) -> Option<Identity> {
        match db::get_setting(self.conn, IDENTITY_KEY) {
            Ok(uid) => uid.map(Identity),
            Err(e) => {
                warn!("failed to read stored identity: {}", e);
                None
            }
        }
    }
}

/// Tracks the active identity and tells watchers whenever it changes.
pub struct SessionBinder<P> {
    provider: P,
    current: Option<Identity>,
    watchers: Vec<Sender<Option<Identity>>>,
}

impl<P: IdentityProvider> SessionBinder<P> {
    pub fn new(provider: P) -> Self {
        let current = provider.current();
        Self {
            provider,
            current,
            watchers: Vec::new(),
        }
    }

    /// Identity-changed feed. The current value is queued immediately.
    pub fn watch(&mut self) -> Receiver<Option<Identity>> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(self.current.clone());
        self.watchers.push(tx);
        rx
    }

    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn sign_in(&mut self) -> Result<Identity, AuthError> {
        let identity = self.provider.sign_in_anonymously()?;
        self.set(Some(identity.clone()));
        Ok(identity)
    }

    pub fn sign_out(&mut self) -> Result<(), AuthError> {
        self.provider.sign_out()?;
        self.set(None);
        Ok(())
    }

    fn set(&mut self, next: Option<Identity>) {
        if next == self.current {
            return;
        }
        match &next {
            Some(id) => info!(uid = %id, "session active"),
            None => info!("session ended"),
        }
        self.current = next;
        let current = &self.current;
        self.watchers.retain(|w| w.send(current.clone()).is_ok());
    }
}
