//! Manages multiple visit sessions (one per tab/stack)

use std::collections::HashMap;

use hybridnav_core::prelude::*;
use hybridnav_bridge::WebSurface;

use crate::session::{SessionId, VisitSession};

/// Maximum number of concurrent sessions
pub const MAX_SESSIONS: usize = 9;

/// Owns every live session, indexed by ID and addressable by name
#[derive(Debug)]
pub struct SessionManager {
    /// All sessions indexed by session ID
    sessions: HashMap<SessionId, VisitSession>,

    /// Name → ID lookup; one session per name
    by_name: HashMap<String, SessionId>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a session owning `surface` under a unique name.
    ///
    /// Requesting a name that is already live is a configuration error;
    /// each name maps to exactly one rendering surface.
    pub fn create_session(&mut self, name: &str, surface: WebSurface) -> Result<SessionId> {
        if self.sessions.len() >= MAX_SESSIONS {
            return Err(Error::configuration(format!(
                "maximum of {MAX_SESSIONS} concurrent sessions reached"
            )));
        }
        if self.by_name.contains_key(name) {
            return Err(Error::configuration(format!(
                "session '{name}' already exists"
            )));
        }

        let session = VisitSession::new(name, surface);
        let id = session.id;
        self.by_name.insert(name.to_string(), id);
        self.sessions.insert(id, session);
        info!(session = id, name, "session created");
        Ok(id)
    }

    pub fn get(&self, id: SessionId) -> Option<&VisitSession> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut VisitSession> {
        self.sessions.get_mut(&id)
    }

    pub fn by_name(&self, name: &str) -> Option<&VisitSession> {
        self.by_name.get(name).and_then(|id| self.sessions.get(id))
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut VisitSession> {
        let id = *self.by_name.get(name)?;
        self.sessions.get_mut(&id)
    }

    /// Remove a session, dropping its surface handle
    pub fn remove(&mut self, id: SessionId) -> Option<VisitSession> {
        let session = self.sessions.remove(&id)?;
        self.by_name.remove(&session.name);
        info!(session = id, name = %session.name, "session removed");
        Some(session)
    }

    /// Reset every session back to cold (e.g. after a path
    /// configuration swap)
    pub fn reset_all(&mut self) {
        for session in self.sessions.values_mut() {
            session.reset();
        }
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
    use hybridnav_bridge::test_utils::recording_surface;

    #[test]
    fn test_create_and_lookup_by_name() {
        let mut manager = SessionManager::new();
        let (surface, _rx) = recording_surface();
        let id = manager.create_session("main", surface).unwrap();

        assert_eq!(manager.get(id).unwrap().name, "main");
        assert_eq!(manager.by_name("main").unwrap().id, id);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut manager = SessionManager::new();
        let (s1, _r1) = recording_surface();
        let (s2, _r2) = recording_surface();
        manager.create_session("main", s1).unwrap();
        assert!(manager.create_session("main", s2).is_err());
    }

    #[test]
    fn test_remove_frees_name() {
        let mut manager = SessionManager::new();
        let (s1, _r1) = recording_surface();
        let id = manager.create_session("main", s1).unwrap();
        manager.remove(id);
        assert!(manager.by_name("main").is_none());

        let (s2, _r2) = recording_surface();
        assert!(manager.create_session("main", s2).is_ok());
    }

    #[test]
    fn test_reset_all() {
        use crate::session::{SessionState, Visit};
        use hybridnav_core::{Location, VisitOptions};

        let mut manager = SessionManager::new();
        let (surface, _rx) = recording_surface();
        let id = manager.create_session("main", surface).unwrap();

        let session = manager.get_mut(id).unwrap();
        session
            .visit(Visit::new(
                Location::parse("https://example.com/home").unwrap(),
                1,
                VisitOptions::advance(),
            ))
            .unwrap();
        assert_eq!(session.state(), SessionState::ColdBooting);

        manager.reset_all();
        assert_eq!(manager.get(id).unwrap().state(), SessionState::Cold);
    }

    #[test]
    fn test_session_cap() {
        let mut manager = SessionManager::new();
        let mut receivers = Vec::new();
        for i in 0..MAX_SESSIONS {
            let (surface, rx) = recording_surface();
            receivers.push(rx);
            manager.create_session(&format!("tab-{i}"), surface).unwrap();
        }
        let (surface, _rx) = recording_surface();
        assert!(manager.create_session("overflow", surface).is_err());
    }
}
