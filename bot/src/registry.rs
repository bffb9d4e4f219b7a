use crate::error::Error;
use crate::session::Session;
use crate::Result;

/// Sessions keyed by username, kept in login order.
pub struct SessionRegistry<S> {
    sessions: Vec<Session<S>>,
}

impl<S> Default for SessionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SessionRegistry<S> {
    pub fn new() -> Self {
        Self {
            sessions: Vec::new(),
        }
    }

    pub fn insert(&mut self, session: Session<S>) -> Result<()> {
        if self.sessions.iter().any(|s| s.username == session.username) {
            return Err(Error::DuplicateSession(session.username));
        }
        self.sessions.push(session);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Ends the acquisition phase; the result is only ever read.
    pub fn into_sessions(self) -> Vec<Session<S>> {
        self.sessions
    }
}
