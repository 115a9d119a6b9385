use crate::errors::{CalcError, CalcResult};
use crate::session::SessionState;
use crate::state::PriceBounds;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

struct SessionEntry {
    state: SessionState,
    last_seen: DateTime<Utc>,
}

/// Result of touching a session through the store.
#[derive(Debug)]
pub struct SessionAccess<R> {
    pub id: Uuid,
    /// A fresh session was inserted for this request.
    pub created: bool,
    /// Inserting it pushed out the least recently seen session.
    pub evicted: Option<Uuid>,
    pub value: R,
}

/// In-memory per-session state, keyed by the session cookie.
/// Bounded: once `capacity` sessions exist, the stalest one is dropped to make room.
pub struct SessionStore {
    inner: Mutex<HashMap<Uuid, SessionEntry>>,
    capacity: usize,
    default_bounds: PriceBounds,
}

impl SessionStore {
    pub fn new(capacity: usize, default_bounds: PriceBounds) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            default_bounds,
        }
    }

    /// State a brand-new session starts from.
    pub fn blank(&self) -> SessionState {
        SessionState::new(self.default_bounds)
    }

    /// Mutate the session `id`, creating it first when `id` is absent or unknown.
    pub fn with_session<R>(
        &self,
        id: Option<Uuid>,
        f: impl FnOnce(&mut SessionState) -> R,
    ) -> CalcResult<SessionAccess<R>> {
        let mut map = self
            .inner
            .lock()
            .map_err(|e| CalcError::Session(format!("lock poisoned: {e}")))?;
        let now = Utc::now();

        if let Some(id) = id {
            if let Some(entry) = map.get_mut(&id) {
                entry.last_seen = now;
                let value = f(&mut entry.state);
                return Ok(SessionAccess { id, created: false, evicted: None, value });
            }
        }

        let evicted = if map.len() >= self.capacity {
            let stalest = map
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            if let Some(old) = stalest {
                map.remove(&old);
            }
            stalest
        } else {
            None
        };

        let id = Uuid::new_v4();
        let mut state = self.blank();
        let value = f(&mut state);
        map.insert(id, SessionEntry { state, last_seen: now });

        Ok(SessionAccess { id, created: true, evicted, value })
    }

    /// Read an existing session without creating one.
    pub fn peek<R>(&self, id: Uuid, f: impl FnOnce(&SessionState) -> R) -> CalcResult<Option<R>> {
        let mut map = self
            .inner
            .lock()
            .map_err(|e| CalcError::Session(format!("lock poisoned: {e}")))?;
        Ok(map.get_mut(&id).map(|entry| {
            entry.last_seen = Utc::now();
            f(&entry.state)
        }))
    }

    pub fn len(&self) -> CalcResult<usize> {
        self.inner
            .lock()
            .map(|m| m.len())
            .map_err(|e| CalcError::Session(format!("lock poisoned: {e}")))
    }
}
