use thiserror::Error;

#[derive(Error, Debug)]
pub enum TherapyError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Chat transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, TherapyError>;
