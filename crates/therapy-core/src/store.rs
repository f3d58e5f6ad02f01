//! Session store: the completed sessions plus at most one open session.
//!
//! The store has two states, no open session and one open session. Recording
//! a message opens a session if none is open; closing moves the open session
//! to the end of the closed list. A persona switch does not close the open
//! session: callers that want a fresh session per persona must call
//! [`SessionStore::close_session`] first.

use crate::error::{Result, TherapyError};
use crate::types::{Message, Session};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Owned copy of the store contents, for consumers outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub closed: Vec<Session>,
    pub current: Option<Session>,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    closed: Vec<Session>,
    current: Option<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one chat exchange.
    ///
    /// Appends the therapist message and, when a non-empty reply is given,
    /// the child reply with the same timestamp. Both messages are validated
    /// before anything is appended, so a rejected call leaves the store as it
    /// was.
    pub fn record_message(
        &mut self,
        persona: &str,
        therapist_text: &str,
        child_reply: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        if therapist_text.trim().is_empty() {
            return Err(TherapyError::InvalidInput(
                "message text must not be empty".into(),
            ));
        }

        let session = self.current.get_or_insert_with(|| {
            tracing::debug!("Opening session for persona {}", persona);
            Session::new(persona, timestamp)
        });
        if session.persona != persona {
            tracing::debug!(
                "Persona {} recorded into open session for {}",
                persona,
                session.persona
            );
        }

        session
            .messages
            .push(Message::therapist(therapist_text, timestamp));
        if let Some(reply) = child_reply.filter(|r| !r.is_empty()) {
            session.messages.push(Message::child(reply, timestamp));
        }

        tracing::debug!(
            "Session {} now has {} messages",
            session.id,
            session.messages.len()
        );
        Ok(())
    }

    /// Close the open session, if any. Returns the id of the closed session.
    pub fn close_session(&mut self) -> Option<String> {
        let session = self.current.take()?;
        let id = session.id.clone();
        tracing::debug!(
            "Closing session {} ({} messages)",
            id,
            session.messages.len()
        );
        self.closed.push(session);
        Some(id)
    }

    pub fn closed_sessions(&self) -> &[Session] {
        &self.closed
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Closed sessions in recorded order, then the open session last.
    pub fn all_sessions(&self) -> impl Iterator<Item = &Session> {
        self.closed.iter().chain(self.current.iter())
    }

    /// Closed sessions plus one if a session is open.
    pub fn total_sessions(&self) -> usize {
        self.closed.len() + usize::from(self.current.is_some())
    }

    pub fn has_open_session(&self) -> bool {
        self.current.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            closed: self.closed.clone(),
            current: self.current.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sender;
    use chrono::Duration;

    fn ts(offset_secs: i64) -> DateTime<Utc> {
        "2024-03-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap() + Duration::seconds(offset_secs)
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = SessionStore::new();
        assert!(store.closed_sessions().is_empty());
        assert!(store.current_session().is_none());
        assert_eq!(store.total_sessions(), 0);
    }

    #[test]
    fn test_first_message_opens_session() {
        let mut store = SessionStore::new();
        store
            .record_message("aarav", "hello", Some("hi!"), ts(0))
            .unwrap();

        let session = store.current_session().unwrap();
        assert_eq!(session.persona, "aarav");
        assert_eq!(session.start_time, ts(0));
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].sender, Sender::Therapist);
        assert_eq!(session.messages[1].sender, Sender::Child);
        assert_eq!(session.messages[1].timestamp, ts(0));
        assert_eq!(store.total_sessions(), 1);
    }

    #[test]
    fn test_messages_append_to_open_session() {
        let mut store = SessionStore::new();
        store.record_message("dani", "one", Some("a"), ts(0)).unwrap();
        store.record_message("dani", "two", Some("b"), ts(30)).unwrap();

        let session = store.current_session().unwrap();
        assert_eq!(session.messages.len(), 4);
        assert_eq!(session.start_time, ts(0));
        assert_eq!(session.messages[2].content, "two");
        assert_eq!(session.messages[2].timestamp, ts(30));
    }

    #[test]
    fn test_missing_reply_appends_only_therapist_message() {
        let mut store = SessionStore::new();
        store.record_message("leo", "hello", None, ts(0)).unwrap();
        store.record_message("leo", "again", Some(""), ts(1)).unwrap();

        let session = store.current_session().unwrap();
        assert_eq!(session.messages.len(), 2);
        assert!(session.messages.iter().all(|m| m.sender == Sender::Therapist));
    }

    #[test]
    fn test_empty_message_rejected_without_state_change() {
        let mut store = SessionStore::new();
        let err = store.record_message("aarav", "", Some("reply"), ts(0));
        assert!(matches!(err, Err(TherapyError::InvalidInput(_))));
        assert!(store.current_session().is_none());

        store.record_message("aarav", "hi", None, ts(0)).unwrap();
        let err = store.record_message("aarav", "   \n", Some("reply"), ts(1));
        assert!(err.is_err());
        assert_eq!(store.current_session().unwrap().messages.len(), 1);
    }

    #[test]
    fn test_close_moves_session_to_closed() {
        let mut store = SessionStore::new();
        store.record_message("aarav", "hello", None, ts(0)).unwrap();
        let id = store.current_session().unwrap().id.clone();

        assert_eq!(store.close_session(), Some(id.clone()));
        assert!(store.current_session().is_none());
        assert_eq!(store.closed_sessions().len(), 1);
        assert_eq!(store.closed_sessions()[0].id, id);
        assert_eq!(store.total_sessions(), 1);
    }

    #[test]
    fn test_close_without_open_session_is_noop() {
        let mut store = SessionStore::new();
        assert_eq!(store.close_session(), None);
        assert!(store.closed_sessions().is_empty());
    }

    #[test]
    fn test_persona_switch_keeps_existing_session() {
        let mut store = SessionStore::new();
        store.record_message("aarav", "hello", None, ts(0)).unwrap();
        store.record_message("dani", "hi dani", None, ts(1)).unwrap();

        let session = store.current_session().unwrap();
        assert_eq!(session.persona, "aarav");
        assert_eq!(session.messages.len(), 2);
        assert_eq!(store.total_sessions(), 1);
    }

    #[test]
    fn test_new_session_after_close() {
        let mut store = SessionStore::new();
        store.record_message("aarav", "hello", None, ts(0)).unwrap();
        store.close_session();
        store.record_message("dani", "hi", None, ts(60)).unwrap();

        assert_eq!(store.current_session().unwrap().persona, "dani");
        assert_eq!(store.current_session().unwrap().start_time, ts(60));
        let personas: Vec<_> = store.all_sessions().map(|s| s.persona.as_str()).collect();
        assert_eq!(personas, vec!["aarav", "dani"]);
        assert_eq!(store.total_sessions(), 2);
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let mut store = SessionStore::new();
        store.record_message("leo", "hello", None, ts(0)).unwrap();
        let snap = store.snapshot();
        store.close_session();

        assert!(snap.closed.is_empty());
        assert!(snap.current.is_some());
    }
}
