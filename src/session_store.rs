//! In-memory session store for uploaded captures.
//!
//! One session per upload: an opaque ID mapped to the extracted candidate
//! list. Sessions expire after a TTL and are purged opportunistically on
//! writes, so an abandoned upload cannot pin its capture in memory until
//! process restart.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::har::types::CanonicalRequest;

/// One uploaded capture's analysis state. Created on upload, read on
/// analyze, never mutated.
pub struct Session {
    pub id: Uuid,
    pub candidates: Vec<CanonicalRequest>,
    pub created_at: DateTime<Utc>,
}

/// Keyed store of live sessions with TTL eviction.
pub struct SessionStore {
    sessions: HashMap<Uuid, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Store a candidate list under a fresh session ID.
    pub fn insert(&mut self, candidates: Vec<CanonicalRequest>) -> Uuid {
        self.purge_expired();
        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            Session {
                id,
                candidates,
                created_at: Utc::now(),
            },
        );
        id
    }

    /// Look up a session. Expired sessions are invisible even before the
    /// next purge runs.
    pub fn get(&self, id: &Uuid) -> Option<&Session> {
        self.sessions
            .get(id)
            .filter(|s| Utc::now() - s.created_at < self.ttl)
    }

    /// Drop every session older than the TTL.
    pub fn purge_expired(&mut self) {
        let now = Utc::now();
        let ttl = self.ttl;
        self.sessions.retain(|_, s| now - s.created_at < ttl);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_candidates() -> Vec<CanonicalRequest> {
        vec![]
    }

    #[test]
    fn insert_then_get_round_trips() {
        let mut store = SessionStore::new(3600);
        let id = store.insert(no_candidates());
        let session = store.get(&id).unwrap();
        assert_eq!(session.id, id);
        assert!(session.candidates.is_empty());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = SessionStore::new(3600);
        assert!(store.get(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn ids_are_unique_per_upload() {
        let mut store = SessionStore::new(3600);
        let a = store.insert(no_candidates());
        let b = store.insert(no_candidates());
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn expired_session_is_invisible() {
        let mut store = SessionStore::new(3600);
        let id = store.insert(no_candidates());
        // Backdate past the TTL.
        store.sessions.get_mut(&id).unwrap().created_at =
            Utc::now() - Duration::seconds(7200);
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn purge_drops_only_expired_sessions() {
        let mut store = SessionStore::new(3600);
        let old = store.insert(no_candidates());
        let fresh = store.insert(no_candidates());
        store.sessions.get_mut(&old).unwrap().created_at =
            Utc::now() - Duration::seconds(7200);

        store.purge_expired();
        assert_eq!(store.len(), 1);
        assert!(store.get(&fresh).is_some());
    }

    #[test]
    fn insert_purges_opportunistically() {
        let mut store = SessionStore::new(3600);
        let old = store.insert(no_candidates());
        store.sessions.get_mut(&old).unwrap().created_at =
            Utc::now() - Duration::seconds(7200);

        store.insert(no_candidates());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let mut store = SessionStore::new(0);
        let id = store.insert(no_candidates());
        assert!(store.get(&id).is_none());
    }
}
