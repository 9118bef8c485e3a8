//! Anonymous session identity with a sliding inactivity window.
//!
//! A session id is valid while fewer than 30 minutes pass between tracked
//! events; every event renews the window. Sessions are scoped per browsing
//! context: each scope (the page layer's stable anonymous id) gets its own
//! persisted slot, so distinct visitors never share an id. The clock and
//! the persistence backend are injected so the window behavior is testable
//! without real time or real storage.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Session inactivity timeout (30 minutes).
pub const SESSION_TIMEOUT_MINUTES: i64 = 30;

/// Prefix for persisted session state keys; one slot per scope.
pub const SESSION_STATE_PREFIX: &str = "np_session";

/// Wall-clock source, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Key/value backend holding the persisted session state.
///
/// `store` returns whether the write took effect; a backend that is
/// unavailable returns false and the caller degrades to a per-call id.
pub trait SessionPersistence: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn store(&self, key: &str, value: &str) -> bool;
}

/// In-memory persistence, one slot per key.
#[derive(Default)]
pub struct MemoryPersistence {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionPersistence for MemoryPersistence {
    fn load(&self, key: &str) -> Option<String> {
        self.slots.lock().get(key).cloned()
    }

    fn store(&self, key: &str, value: &str) -> bool {
        self.slots.lock().insert(key.to_string(), value.to_string());
        true
    }
}

/// Persisted form of the session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    id: Uuid,
    last_seen_at: DateTime<Utc>,
}

/// The session id for the current call, and whether it was freshly minted.
#[derive(Debug, Clone, Copy)]
pub struct SessionHandle {
    pub id: Uuid,
    pub fresh: bool,
}

/// Derives or renews the anonymous session id.
pub struct SessionStore {
    clock: Arc<dyn Clock>,
    persistence: Arc<dyn SessionPersistence>,
}

impl SessionStore {
    pub fn new(clock: Arc<dyn Clock>, persistence: Arc<dyn SessionPersistence>) -> Self {
        Self { clock, persistence }
    }

    /// Ensures a session id for the given scope at the current moment.
    ///
    /// The scope is a stable identifier for the browsing context; ids are
    /// never shared across scopes. Reuses and renews the persisted id while
    /// the inactivity window holds; mints a fresh one when the state is
    /// absent, corrupt, or expired. Never fails: a broken persistence
    /// backend degrades to a new, non-persisted id per call.
    pub fn ensure(&self, scope: &str) -> SessionHandle {
        let now = self.clock.now();
        let key = Self::state_key(scope);

        // Corrupt state reads the same as absent state.
        let persisted = self
            .persistence
            .load(&key)
            .and_then(|raw| serde_json::from_str::<PersistedSession>(&raw).ok());

        if let Some(state) = persisted {
            if now - state.last_seen_at < Duration::minutes(SESSION_TIMEOUT_MINUTES) {
                self.persist(&key, state.id, now);
                return SessionHandle {
                    id: state.id,
                    fresh: false,
                };
            }
        }

        let id = Uuid::new_v4();
        self.persist(&key, id, now);
        SessionHandle { id, fresh: true }
    }

    fn state_key(scope: &str) -> String {
        if scope.is_empty() {
            SESSION_STATE_PREFIX.to_string()
        } else {
            format!("{SESSION_STATE_PREFIX}:{scope}")
        }
    }

    fn persist(&self, key: &str, id: Uuid, last_seen_at: DateTime<Utc>) {
        let state = PersistedSession { id, last_seen_at };
        if let Ok(raw) = serde_json::to_string(&state) {
            // A failed store is fine; the next call just mints again.
            let _ = self.persistence.store(key, &raw);
        }
    }
}
