//! Shared application state.
//!
//! One `CoreState` is built at startup, wrapped in `Arc`, and shared by
//! every request handler. The session store is the only mutable piece;
//! the reasoner is an immutable capability handle that analyses clone
//! out and use off the async runtime.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::Settings;
use crate::reason::Reasoner;
use crate::session_store::SessionStore;

pub struct CoreState {
    sessions: RwLock<SessionStore>,
    reasoner: Arc<dyn Reasoner>,
    pub settings: Settings,
}

/// Errors from shared-state access.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
}

impl CoreState {
    pub fn new(settings: Settings, reasoner: Arc<dyn Reasoner>) -> Self {
        let sessions = RwLock::new(SessionStore::new(settings.session_ttl_secs));
        Self {
            sessions,
            reasoner,
            settings,
        }
    }

    /// Acquire a read lock on the session store.
    pub fn read_sessions(&self) -> Result<RwLockReadGuard<'_, SessionStore>, CoreError> {
        self.sessions.read().map_err(|_| CoreError::LockPoisoned)
    }

    /// Acquire a write lock on the session store (upload path).
    pub fn write_sessions(&self) -> Result<RwLockWriteGuard<'_, SessionStore>, CoreError> {
        self.sessions.write().map_err(|_| CoreError::LockPoisoned)
    }

    /// Handle to the reasoning capability, cloneable into blocking tasks.
    pub fn reasoner(&self) -> Arc<dyn Reasoner> {
        Arc::clone(&self.reasoner)
    }
}
