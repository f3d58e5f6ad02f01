pub mod config;
pub mod emotion;
pub mod error;
pub mod notes;
pub mod personas;
pub mod store;
pub mod transport;
pub mod types;

pub use config::AppConfig;
pub use emotion::classify;
pub use error::{Result, TherapyError};
pub use notes::{NewNote, NotesStore, ProgressNote};
pub use store::{SessionSnapshot, SessionStore};
pub use transport::{ChatReply, ChatRequest, ChatTransport, HistoryEntry};
pub use types::{Emotion, Message, Sender, Session};
