//! Dashboard statistics and the view that keeps them current.

use crate::modality::{self, ModalityCount};
use crate::progress::{self, PersonaProgress};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use therapy_core::error::Result;
use therapy_core::store::SessionStore;

/// Aggregate statistics over every session, closed and open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TherapyStats {
    pub total_sessions: usize,
    pub art_therapy_types: Vec<ModalityCount>,
    pub children_progress: Vec<PersonaProgress>,
}

impl TherapyStats {
    /// Recompute from scratch. Cost is linear in the total message count.
    pub fn compute(store: &SessionStore) -> Self {
        Self {
            total_sessions: store.total_sessions(),
            art_therapy_types: modality::tally(store.all_sessions()),
            children_progress: progress::aggregate(
                store.closed_sessions(),
                store.current_session(),
            ),
        }
    }

    pub fn progress_for(&self, persona: &str) -> Option<&PersonaProgress> {
        self.children_progress.iter().find(|p| p.id == persona)
    }
}

/// A session store plus its derived stats. Every mutation recomputes the
/// stats in full before returning them.
#[derive(Debug, Default)]
pub struct StatsView {
    store: SessionStore,
    stats: TherapyStats,
}

impl StatsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one exchange and return the refreshed stats. A rejected call
    /// changes neither the store nor the stats.
    pub fn record_message(
        &mut self,
        persona: &str,
        therapist_text: &str,
        child_reply: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Result<&TherapyStats> {
        self.store
            .record_message(persona, therapist_text, child_reply, timestamp)?;
        Ok(self.recompute())
    }

    /// Close the open session (no-op if none) and return the refreshed stats.
    pub fn close_session(&mut self) -> &TherapyStats {
        self.store.close_session();
        self.recompute()
    }

    pub fn recompute(&mut self) -> &TherapyStats {
        self.stats = TherapyStats::compute(&self.store);
        tracing::debug!(
            "Recomputed stats: {} sessions, {} children",
            self.stats.total_sessions,
            self.stats.children_progress.len()
        );
        &self.stats
    }

    pub fn stats(&self) -> &TherapyStats {
        &self.stats
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modality::Modality;
    use chrono::Duration;

    fn ts(offset_secs: i64) -> DateTime<Utc> {
        "2024-03-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap() + Duration::seconds(offset_secs)
    }

    #[test]
    fn test_fresh_view_has_empty_stats() {
        let view = StatsView::new();
        let stats = view.stats();
        assert_eq!(stats.total_sessions, 0);
        assert!(stats.art_therapy_types.is_empty());
        assert!(stats.children_progress.is_empty());
        assert_eq!(*stats, TherapyStats::compute(view.store()));
    }

    #[test]
    fn test_record_then_close() {
        let mut view = StatsView::new();
        view.record_message("aarav", "hello", Some("I feel happy now"), ts(0))
            .unwrap();
        let stats = view.close_session().clone();

        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.children_progress.len(), 1);
        let p = &stats.children_progress[0];
        assert_eq!(p.id, "aarav");
        assert_eq!(p.name, "Aarav");
        assert_eq!(p.sessions, 1);
        assert_eq!(p.positive_interactions, 1);
        assert_eq!(p.progress, 100);
    }

    #[test]
    fn test_open_session_counts_toward_stats() {
        let mut view = StatsView::new();
        let stats = view
            .record_message("dani", "Do you like to paint?", Some("I'm happy"), ts(0))
            .unwrap();
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.art_therapy_types[0].modality, Modality::Painting);
        assert_eq!(stats.art_therapy_types[0].count, 1);
    }

    #[test]
    fn test_two_messages_one_session() {
        let mut view = StatsView::new();
        view.record_message("leo", "hi", Some("happy today"), ts(0))
            .unwrap();
        let stats = view
            .record_message("leo", "and now?", Some("tired"), ts(5))
            .unwrap();
        let p = stats.progress_for("leo").unwrap();
        assert_eq!(p.sessions, 1);
        assert_eq!(p.positive_interactions, 1);
        assert_eq!(p.progress, 50);
    }

    #[test]
    fn test_rejected_message_leaves_stats_unchanged() {
        let mut view = StatsView::new();
        view.record_message("leo", "hi", Some("happy"), ts(0)).unwrap();
        let before = view.stats().clone();

        assert!(view.record_message("leo", "", Some("happy"), ts(1)).is_err());
        assert_eq!(*view.stats(), before);
        assert_eq!(view.store().current_session().unwrap().messages.len(), 2);
    }

    #[test]
    fn test_reads_are_idempotent() {
        let mut view = StatsView::new();
        view.record_message("aarav", "Let's draw", Some("ok"), ts(0))
            .unwrap();
        let first = view.stats().clone();
        assert_eq!(*view.stats(), first);
        assert_eq!(TherapyStats::compute(view.store()), first);
    }

    #[test]
    fn test_close_without_session_keeps_zero() {
        let mut view = StatsView::new();
        assert_eq!(view.close_session().total_sessions, 0);
    }

    #[test]
    fn test_wire_shape() {
        let mut view = StatsView::new();
        view.record_message("aarav", "draw with me", Some("happy"), ts(0))
            .unwrap();
        let json = serde_json::to_value(view.stats()).unwrap();
        assert_eq!(json["totalSessions"], 1);
        assert_eq!(json["artTherapyTypes"][0]["name"], "drawing");
        assert_eq!(json["childrenProgress"][0]["name"], "Aarav");
    }
}
