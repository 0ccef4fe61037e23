//! Session management for the MCP server

use std::collections::HashMap;
use std::time::Instant;

use parking_lot::RwLock;
use uuid::Uuid;

/// Session state tracking
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (32 lowercase hex characters)
    pub session_id: String,

    /// Set once the client sends `notifications/initialized`
    pub ready_for_operation: bool,

    /// When the session was created
    pub created_at: Instant,

    /// Last time the session was looked up
    pub last_activity: Instant,
}

impl Session {
    /// Create a new, not yet ready session
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            session_id: Uuid::new_v4().simple().to_string(),
            ready_for_operation: false,
            created_at: now,
            last_activity: now,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns every session created by `initialize`.
///
/// Sessions are never evicted; the map lives as long as the server.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create and store a fresh session
    pub fn create(&self) -> Session {
        let session = Session::new();
        self.sessions
            .write()
            .insert(session.session_id.clone(), session.clone());

        tracing::debug!(session_id = %session.session_id, "Session created");
        session
    }

    /// Get a snapshot of a session, refreshing its activity timestamp
    pub fn get(&self, session_id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write();
        let session = sessions.get_mut(session_id)?;
        session.last_activity = Instant::now();
        Some(session.clone())
    }

    /// Mark a session ready for `tools/*` requests.
    ///
    /// Returns false when the session does not exist. Marking an already
    /// ready session is a no-op.
    pub fn mark_ready(&self, session_id: &str) -> bool {
        match self.sessions.write().get_mut(session_id) {
            Some(session) => {
                session.ready_for_operation = true;
                true
            }
            None => false,
        }
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
