//! Per-child progress derived from sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use therapy_core::emotion;
use therapy_core::types::{Sender, Session};

/// Progress record for one persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaProgress {
    pub id: String,
    /// Persona id with its first character upper-cased.
    pub name: String,
    pub sessions: u32,
    /// Child messages classified as happiness.
    pub positive_interactions: u32,
    /// Start time of the first session seen for this persona. Later sessions
    /// do not update it.
    pub last_session: DateTime<Utc>,
    /// round(positive_interactions / sessions * 100). May exceed 100.
    pub progress: u32,
}

impl PersonaProgress {
    fn seed(session: &Session) -> Self {
        Self {
            id: session.persona.clone(),
            name: display_name(&session.persona),
            sessions: 0,
            positive_interactions: 0,
            last_session: session.start_time,
            progress: 0,
        }
    }
}

/// Fold closed sessions, then the open session if any, into one record per
/// persona in first-occurrence order.
pub fn aggregate(sessions: &[Session], current: Option<&Session>) -> Vec<PersonaProgress> {
    let mut records: Vec<PersonaProgress> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for session in sessions.iter().chain(current) {
        let slot = *index.entry(session.persona.as_str()).or_insert_with(|| {
            records.push(PersonaProgress::seed(session));
            records.len() - 1
        });
        let record = &mut records[slot];

        record.sessions += 1;
        record.positive_interactions += session
            .messages
            .iter()
            .filter(|m| m.sender == Sender::Child && emotion::is_positive(&m.content))
            .count() as u32;
    }

    for record in &mut records {
        record.progress = progress_percent(record.positive_interactions, record.sessions);
    }
    records
}

/// `positive / sessions * 100` in floating point, rounded half up. The float
/// product is rounded as-is, so 23/40 (57.49999999999999) gives 57.
pub fn progress_percent(positive: u32, sessions: u32) -> u32 {
    if sessions == 0 {
        return 0;
    }
    ((positive as f64 / sessions as f64) * 100.0).round() as u32
}

/// Upper-case the first character, leave the rest unchanged.
pub fn display_name(persona: &str) -> String {
    let mut chars = persona.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
