//! In-memory session store.
//!
//! Maps a random per-request identifier to a [`SessionRecord`]. Records
//! are immutable after creation; the only mutations are `create`,
//! `delete`, and `sweep`, each a single atomic step under the lock.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use tr_domain::chat::ChatTurn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session record
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The validated request payload, tagged by input mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPayload {
    /// `{ chatRecordId, message }` — one free-text message against an
    /// existing thread.
    ThreadReference { thread_id: String, message: String },
    /// `{ messages }` — a caller-supplied conversation passed through
    /// unchanged.
    MessageList { turns: Vec<ChatTurn> },
}

/// A single in-flight request's transient state.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session_id: String,
    pub payload: SessionPayload,
    /// Resolved completion model for this request.
    pub model: String,
    pub created_at: DateTime<Utc>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Ephemeral session store. Purely in-memory; nothing survives the process.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return its freshly minted identifier.
    pub fn create(&self, payload: SessionPayload, model: impl Into<String>) -> String {
        let session_id = uuid::Uuid::new_v4().to_string();
        let record = SessionRecord {
            session_id: session_id.clone(),
            payload,
            model: model.into(),
            created_at: Utc::now(),
        };

        self.sessions.write().insert(session_id.clone(), record);
        tracing::debug!(session_id = %session_id, "session created");
        session_id
    }

    /// Look up a session by id.
    pub fn get(&self, session_id: &str) -> Option<SessionRecord> {
        self.sessions.read().get(session_id).cloned()
    }

    /// Idempotent removal. Deleting an unknown or already-deleted id is a
    /// no-op, so every orchestrator exit path can call this unconditionally.
    pub fn delete(&self, session_id: &str) {
        if self.sessions.write().remove(session_id).is_some() {
            tracing::debug!(session_id = %session_id, "session deleted");
        }
    }

    /// Evict every session strictly older than `ttl` at instant `now`.
    /// Returns the number of evicted sessions.
    ///
    /// Anything this removes was leaked by a request that never reached
    /// its cleanup step, hence the warning.
    pub fn sweep(&self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, record| now - record.created_at <= ttl);
        let removed = before - sessions.len();

        if removed > 0 {
            tracing::warn!(removed, "swept expired sessions that were never deleted");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SessionPayload {
        SessionPayload::ThreadReference {
            thread_id: "42".into(),
            message: "hello".into(),
        }
    }

    #[test]
    fn create_stores_payload_and_model() {
        let store = SessionStore::new();
        let id = store.create(payload(), "gpt-5");

        let record = store.get(&id).unwrap();
        assert_eq!(record.session_id, id);
        assert_eq!(record.model, "gpt-5");
        assert_eq!(record.payload, payload());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn identifiers_are_unique_per_request() {
        let store = SessionStore::new();
        let a = store.create(payload(), "gpt-5");
        let b = store.create(payload(), "gpt-5");
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn delete_is_idempotent() {
        let store = SessionStore::new();
        let id = store.create(payload(), "gpt-5");

        store.delete(&id);
        assert!(store.is_empty());

        // Second delete and deleting an unknown id are both no-ops.
        store.delete(&id);
        store.delete("no-such-session");
        assert!(store.is_empty());
    }

    #[test]
    fn sweep_evicts_only_sessions_strictly_older_than_ttl() {
        let store = SessionStore::new();
        let a = store.create(payload(), "gpt-5");
        let b = store.create(payload(), "gpt-5");

        // Measure from the older of the two records so the boundary
        // check is exact for it and conservative for the other.
        let created = store.get(&a).unwrap().created_at;
        let ttl = Duration::from_secs(60);

        // Exactly at the TTL boundary nothing is evicted (strict `>`).
        let removed = store.sweep(created + chrono::Duration::seconds(60), ttl);
        assert_eq!(removed, 0);
        assert_eq!(store.len(), 2);

        // One second past the boundary everything of that age expires.
        let removed = store.sweep(created + chrono::Duration::seconds(61), ttl);
        assert_eq!(removed, 2);
        assert!(store.get(&a).is_none());
        assert!(store.get(&b).is_none());
    }

    #[test]
    fn sweep_on_empty_store_is_a_no_op() {
        let store = SessionStore::new();
        assert_eq!(store.sweep(Utc::now(), Duration::from_secs(1)), 0);
    }
}
