//! Markdown report generation from therapy stats and sessions.

use crate::modality;
use crate::stats::TherapyStats;
use therapy_core::emotion;
use therapy_core::types::{Sender, Session};

/// Report generator for creating markdown summaries.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Overview, modality table, and per-child progress table.
    pub fn summary_report(stats: &TherapyStats) -> String {
        let mut report = String::new();

        report.push_str("# Therapy Summary\n\n");
        report.push_str("## Overview\n\n");
        report.push_str(&format!("- **Sessions:** {}\n", stats.total_sessions));
        report.push_str(&format!(
            "- **Children:** {}\n",
            stats.children_progress.len()
        ));
        let mentions: u32 = stats.art_therapy_types.iter().map(|m| m.count).sum();
        report.push_str(&format!("- **Art Mentions:** {}\n\n", mentions));

        if !stats.art_therapy_types.is_empty() {
            report.push_str("## Art Modalities\n\n");
            report.push_str("| Modality | Mentions |\n");
            report.push_str("|----------|----------|\n");
            for entry in &stats.art_therapy_types {
                report.push_str(&format!(
                    "| {} | {} |\n",
                    entry.modality.as_str(),
                    entry.count
                ));
            }
            report.push('\n');
        }

        if !stats.children_progress.is_empty() {
            report.push_str("## Children Progress\n\n");
            report.push_str("| Child | Sessions | Positive | Progress | First Session |\n");
            report.push_str("|-------|----------|----------|----------|---------------|\n");
            for child in &stats.children_progress {
                report.push_str(&format!(
                    "| {} | {} | {} | {}% | {} |\n",
                    child.name,
                    child.sessions,
                    child.positive_interactions,
                    child.progress,
                    child.last_session.format("%Y-%m-%d %H:%M"),
                ));
            }
            report.push('\n');
        }

        report
    }

    /// Transcript of one session with per-message emotion and modality tags.
    pub fn session_report(session: &Session) -> String {
        let mut report = String::new();

        report.push_str(&format!(
            "# Session with {}\n\n**Started:** {}  \n**Messages:** {}\n\n",
            session.persona,
            session.start_time.format("%B %d, %Y %H:%M"),
            session.messages.len()
        ));

        if session.messages.is_empty() {
            report.push_str("_No messages._\n");
            return report;
        }

        report.push_str("## Transcript\n\n");
        for msg in &session.messages {
            let who = match msg.sender {
                Sender::Therapist => "Therapist",
                Sender::Child => "Child",
            };
            let mut tags = vec![emotion::classify(&msg.content).as_str()];
            if let Some(m) = modality::detect(&msg.content) {
                tags.push(m.as_str());
            }
            report.push_str(&format!(
                "- **{}** ({}) _[{}]_: {}\n",
                who,
                msg.timestamp.format("%H:%M:%S"),
                tags.join(", "),
                msg.content
            ));
        }
        report.push('\n');

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsView;
    use chrono::{DateTime, Utc};

    fn ts() -> DateTime<Utc> {
        "2024-03-01T10:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_summary_report_empty() {
        let report = ReportGenerator::summary_report(&TherapyStats::default());
        assert!(report.contains("# Therapy Summary"));
        assert!(report.contains("- **Sessions:** 0"));
        assert!(!report.contains("## Art Modalities"));
        assert!(!report.contains("## Children Progress"));
    }

    #[test]
    fn test_summary_report_tables() {
        let mut view = StatsView::new();
        view.record_message("aarav", "Shall we draw?", Some("Drawing makes me happy"), ts())
            .unwrap();
        let report = ReportGenerator::summary_report(view.stats());

        assert!(report.contains("- **Art Mentions:** 2"));
        assert!(report.contains("| drawing | 2 |"));
        assert!(report.contains("| Aarav | 1 | 1 | 100% | 2024-03-01 10:00 |"));
    }

    #[test]
    fn test_session_report_tags_messages() {
        let mut view = StatsView::new();
        view.record_message("dani", "Want to paint?", Some("I feel sad"), ts())
            .unwrap();
        let session = view.store().current_session().unwrap();
        let report = ReportGenerator::session_report(session);

        assert!(report.contains("# Session with dani"));
        assert!(report.contains("**Therapist** (10:00:00) _[neutral, painting]_: Want to paint?"));
        assert!(report.contains("**Child** (10:00:00) _[sadness]_: I feel sad"));
    }

    #[test]
    fn test_session_report_empty_session() {
        let session = Session::new("leo", ts());
        assert!(ReportGenerator::session_report(&session).contains("_No messages._"));
    }
}
