//! Art-therapy modality mentions across session messages.

use serde::{Deserialize, Serialize};
use therapy_core::types::Session;

/// An art-therapy technique detected by keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Drawing,
    Painting,
    Sculpting,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Drawing => "drawing",
            Modality::Painting => "painting",
            Modality::Sculpting => "sculpting",
        }
    }
}

/// Keyword stems, in precedence order. A message counts toward the first hit only.
const MODALITY_KEYWORDS: &[(Modality, &str)] = &[
    (Modality::Drawing, "draw"),
    (Modality::Painting, "paint"),
    (Modality::Sculpting, "sculpt"),
];

/// Number of messages mentioning one modality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalityCount {
    #[serde(rename = "name")]
    pub modality: Modality,
    /// Message count, named `sessions` on the wire for dashboard parity.
    #[serde(rename = "sessions")]
    pub count: u32,
}

/// The modality a single message mentions, if any.
pub fn detect(text: &str) -> Option<Modality> {
    let lower = text.to_lowercase();
    MODALITY_KEYWORDS
        .iter()
        .find(|(_, stem)| lower.contains(stem))
        .map(|(modality, _)| *modality)
}

/// Count modality mentions over every message of every session, from either
/// sender. Only modalities with at least one mention appear, in order of
/// first occurrence.
pub fn tally<'a, I>(sessions: I) -> Vec<ModalityCount>
where
    I: IntoIterator<Item = &'a Session>,
{
    let mut counts: Vec<ModalityCount> = Vec::new();
    for session in sessions {
        for modality in session.messages.iter().filter_map(|m| detect(&m.content)) {
            match counts.iter_mut().find(|c| c.modality == modality) {
                Some(entry) => entry.count += 1,
                None => counts.push(ModalityCount { modality, count: 1 }),
            }
        }
    }
    counts
}
