//! Keyword-based emotion tagging for chat messages.
//!
//! Deliberately naive: a case-insensitive substring match against a fixed
//! table. Categories are tried in table order and the first hit wins.

use crate::types::Emotion;

/// Keyword table, in precedence order.
const EMOTION_KEYWORDS: &[(Emotion, &[&str])] = &[
    (Emotion::Anxiety, &["anxious", "worried"]),
    (Emotion::Fear, &["scared", "afraid"]),
    (Emotion::Happiness, &["happy", "better"]),
    (Emotion::Sadness, &["sad", "upset"]),
];

/// Classify a message into one coarse emotion, or `Neutral` if nothing matches.
pub fn classify(text: &str) -> Emotion {
    let lower = text.to_lowercase();
    EMOTION_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(emotion, _)| *emotion)
        .unwrap_or(Emotion::Neutral)
}

/// Whether a message counts as a positive interaction.
pub fn is_positive(text: &str) -> bool {
    classify(text) == Emotion::Happiness
}
