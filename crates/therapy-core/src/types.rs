use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message in a therapy chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Therapist,
    Child,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::Therapist => "therapist",
            Sender::Child => "child",
        }
    }
}

/// A single message in a session. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn therapist(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender: Sender::Therapist,
            content: content.into(),
            timestamp,
        }
    }

    pub fn child(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender: Sender::Child,
            content: content.into(),
            timestamp,
        }
    }
}

/// One continuous exchange with a single persona, bounded by open/close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub persona: String,
    pub start_time: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Session {
    pub fn new(persona: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            persona: persona.into(),
            start_time,
            messages: Vec::new(),
        }
    }

    /// Messages authored by the child persona, in append order.
    pub fn child_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.sender == Sender::Child)
    }
}

/// Coarse emotion tag assigned to a message by keyword lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Anxiety,
    Fear,
    Happiness,
    Sadness,
    Neutral,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Anxiety => "anxiety",
            Emotion::Fear => "fear",
            Emotion::Happiness => "happiness",
            Emotion::Sadness => "sadness",
            Emotion::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_sender_as_type() {
        let ts = "2024-03-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let json = serde_json::to_value(Message::child("hi", ts)).unwrap();
        assert_eq!(json["type"], "child");
        assert_eq!(json["content"], "hi");
        assert_eq!(json["timestamp"], "2024-03-01T10:00:00Z");
    }

    #[test]
    fn test_session_uses_camel_case_fields() {
        let ts = Utc::now();
        let session = Session::new("aarav", ts);
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("startTime").is_some());
        assert_eq!(json["persona"], "aarav");
        assert!(json["messages"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_new_sessions_get_distinct_ids() {
        let ts = Utc::now();
        assert_ne!(Session::new("leo", ts).id, Session::new("leo", ts).id);
    }

    #[test]
    fn test_child_messages_filter() {
        let ts = Utc::now();
        let mut session = Session::new("dani", ts);
        session.messages.push(Message::therapist("hello", ts));
        session.messages.push(Message::child("hi", ts));
        let children: Vec<_> = session.child_messages().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].content, "hi");
    }
}
