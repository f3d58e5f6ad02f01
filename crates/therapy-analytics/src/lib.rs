//! Analytics and reporting for therapy-shell sessions.
//!
//! Derives dashboard statistics from the session store: art-modality mention
//! counts, per-child progress, and markdown reports. Everything here is a pure
//! function of the store and is recomputed in full on each change.

pub mod modality;
pub mod progress;
pub mod reports;
pub mod stats;

pub use modality::{Modality, ModalityCount};
pub use progress::PersonaProgress;
pub use reports::ReportGenerator;
pub use stats::{StatsView, TherapyStats};
