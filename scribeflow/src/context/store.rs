//! Session storage for blackboards.

use super::{Blackboard, SessionKey};
use parking_lot::RwLock;
use std::collections::HashMap;

/// A key-value session store addressed by (app, user, session).
///
/// Pipelines never read from the store during a run; callers persist the
/// finished blackboard and may seed a later run from it.
pub trait SessionStore: Send + Sync {
    /// Gets the blackboard stored for a session.
    fn get(&self, key: &SessionKey) -> Option<Blackboard>;

    /// Stores a blackboard for a session, replacing any previous one.
    fn set(&self, key: SessionKey, board: Blackboard);

    /// Returns true if the session exists.
    fn contains(&self, key: &SessionKey) -> bool {
        self.get(key).is_some()
    }
}

/// In-memory [`SessionStore`].
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionKey, Blackboard>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Returns true if no session is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &SessionKey) -> Option<Blackboard> {
        self.sessions.read().get(key).cloned()
    }

    fn set(&self, key: SessionKey, board: Blackboard) {
        self.sessions.write().insert(key, board);
    }
}
