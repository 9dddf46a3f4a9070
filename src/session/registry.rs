// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Independent sessions keyed by id
//!
//! Each entry is a fully separate session with its own state and ledger;
//! the registry only hands out shared handles.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use super::machine::RecognitionSession;

/// Shared handle to one session
pub type SessionHandle = Arc<Mutex<RecognitionSession>>;

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session and return its id and handle
    pub async fn create(&self) -> (Uuid, SessionHandle) {
        let session = RecognitionSession::new();
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, handle.clone());
        info!(session = %id, "session created");
        (id, handle)
    }

    pub async fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Drop a session; returns whether it existed
    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!(session = %id, "session removed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
