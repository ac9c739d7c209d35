//! Per-conversation state keyed by opaque ids, with idle expiry.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use docqa_core::error::{Error, Result};

const ID_HEX_CHARS: usize = 16;
pub const DEFAULT_TTL_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self { Self(s.to_string()) }
}

struct Entry<T> {
    value: Arc<T>,
    last_access: DateTime<Utc>,
}

/// Thread-safe session registry. Sessions idle longer than `ttl` are
/// treated as gone.
pub struct SessionStore<T> {
    sessions: DashMap<SessionId, Entry<T>>,
    ttl: Duration,
    counter: AtomicU64,
}

impl<T> SessionStore<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { sessions: DashMap::new(), ttl, counter: AtomicU64::new(0) }
    }

    pub fn create(&self, value: T) -> SessionId {
        let now = Utc::now();
        let id = self.next_id(now);
        self.sessions.insert(id.clone(), Entry { value: Arc::new(value), last_access: now });
        tracing::debug!(session = %id, "session created");
        id
    }

    /// Returns the session value and refreshes its last access time.
    pub fn lookup(&self, id: &SessionId) -> Result<Arc<T>> {
        let now = Utc::now();
        let Some(mut entry) = self.sessions.get_mut(id) else {
            return Err(Error::NotFound(format!("session {id}")));
        };
        if !self.is_expired(entry.last_access, now) {
            entry.last_access = now;
            return Ok(Arc::clone(&entry.value));
        }
        // the shard lock must be released before removing
        drop(entry);
        self.sessions.remove(id);
        tracing::debug!(session = %id, "session expired on lookup");
        Err(Error::NotFound(format!("session {id}")))
    }

    /// Removes a session; `false` if it did not exist.
    pub fn expire(&self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Drops every idle session and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| !self.is_expired(entry.last_access, now));
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            tracing::info!(removed, "purged expired sessions");
        }
        removed
    }

    pub fn len(&self) -> usize { self.sessions.len() }

    pub fn is_empty(&self) -> bool { self.sessions.is_empty() }

    fn is_expired(&self, last_access: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - last_access > self.ttl
    }

    fn next_id(&self, now: DateTime<Utc>) -> SessionId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut hasher = blake3::Hasher::new();
        hasher.update(&n.to_le_bytes());
        hasher.update(&now.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
        let hex = hasher.finalize().to_hex();
        SessionId(hex.as_str()[..ID_HEX_CHARS].to_string())
    }
}

impl<T> Default for SessionStore<T> {
    fn default() -> Self { Self::new(Duration::minutes(DEFAULT_TTL_MINUTES)) }
}
