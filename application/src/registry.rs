//! Session registry.
//!
//! Maps a session id to its live state. The map itself is concurrent
//! (`DashMap`), so sessions can be inserted, looked up and removed from any
//! task. Each entry holds:
//!
//! - a [`CancellationGate`], readable without waiting for the session
//! - the session record behind an async mutex, which keeps events for one
//!   session strictly sequential while other sessions proceed
//!
//! Lookups return `Option`; a miss is never an error.

use crate::cancellation::CancellationGate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use relay_domain::SessionId;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One registered session.
#[derive(Debug)]
pub struct SessionEntry<S> {
    pub gate: CancellationGate,
    pub state: Mutex<S>,
}

impl<S> SessionEntry<S> {
    fn new(state: S) -> Self {
        Self {
            gate: CancellationGate::new(),
            state: Mutex::new(state),
        }
    }
}

/// Concurrent map from session id to session entry.
#[derive(Debug)]
pub struct SessionRegistry<S> {
    sessions: DashMap<SessionId, Arc<SessionEntry<S>>>,
}

impl<S> Default for SessionRegistry<S> {
    fn default() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }
}

impl<S> SessionRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session. Returns `None` if the id is already live.
    pub fn insert(&self, id: SessionId, state: S) -> Option<Arc<SessionEntry<S>>> {
        match self.sessions.entry(id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(vacant) => {
                let entry = Arc::new(SessionEntry::new(state));
                vacant.insert(Arc::clone(&entry));
                Some(entry)
            }
        }
    }

    pub fn get(&self, id: &SessionId) -> Option<Arc<SessionEntry<S>>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, id: &SessionId) -> Option<Arc<SessionEntry<S>>> {
        self.sessions.remove(id).map(|(_, entry)| entry)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
