//! Chat transport: the collaborator that turns a therapist message into a
//! persona reply.
//!
//! The session core never calls a transport itself. Callers send the message,
//! and only record the exchange once the reply has arrived.

use crate::config::{TransportConfig, TransportMode};
use crate::error::{Result, TherapyError};
use crate::personas::{find_persona, match_therapist, MatchedTherapist};
use crate::types::{Sender, Session};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// One prior message forwarded as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sender: Sender,
    pub text: String,
}

impl HistoryEntry {
    /// The last `limit` messages of a session, oldest first.
    pub fn from_session(session: &Session, limit: usize) -> Vec<HistoryEntry> {
        let start = session.messages.len().saturating_sub(limit);
        session.messages[start..]
            .iter()
            .map(|m| HistoryEntry {
                sender: m.sender,
                text: m.content.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "persona")]
    pub persona_id: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub reply_text: String,
    pub timestamp: DateTime<Utc>,
    pub matched_therapist: Option<MatchedTherapist>,
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a therapist message and wait for the persona's reply.
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Build the transport selected by configuration.
pub fn from_config(config: &TransportConfig) -> Result<Arc<dyn ChatTransport>> {
    match config.mode {
        TransportMode::Scripted => Ok(Arc::new(ScriptedTransport)),
        TransportMode::Http => Ok(Arc::new(HttpTransport::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )?)),
    }
}

// ── Scripted ────────────────────────────────────────────────────────────

/// Replies from the built-in persona scripts. The reply index is the number
/// of child turns already in the history.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedTransport;

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
        if request.message.is_empty() || request.persona_id.is_empty() {
            return Err(TherapyError::InvalidInput(
                "Missing required parameters".into(),
            ));
        }
        let persona = find_persona(&request.persona_id)
            .ok_or_else(|| TherapyError::InvalidInput("Invalid persona ID".into()))?;
        let therapist = match_therapist(persona.id)
            .ok_or_else(|| TherapyError::Transport("No matching therapist found".into()))?;

        let child_turns = request
            .history
            .iter()
            .filter(|h| h.sender == Sender::Child)
            .count();
        let reply = persona.reply(child_turns);
        tracing::debug!("Scripted reply {} for {}", child_turns, persona.id);

        Ok(ChatReply {
            reply_text: reply.to_string(),
            timestamp: Utc::now(),
            matched_therapist: Some(therapist),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

// ── HTTP ────────────────────────────────────────────────────────────────

/// Remote chat backend speaking the dashboard's `/api/chat` JSON shape.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct WireReply {
    response: Option<String>,
    timestamp: Option<String>,
    therapist: Option<MatchedTherapist>,
    error: Option<String>,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(TherapyError::Config(format!(
                "transport.endpoint must be an http(s) URL, got '{}'",
                endpoint
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("therapy-shell/0.1")
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
        let resp = self.client.post(&self.endpoint).json(request).send().await?;
        let status = resp.status();
        let body: WireReply = resp.json().await.map_err(|e| {
            TherapyError::Transport(format!("Unreadable reply ({}): {}", status, e))
        })?;

        if !status.is_success() {
            let msg = body.error.unwrap_or_else(|| "Failed to get response".into());
            return Err(TherapyError::Transport(format!("{}: {}", status, msg)));
        }
        if let Some(err) = body.error {
            return Err(TherapyError::Transport(err));
        }
        let reply_text = body
            .response
            .ok_or_else(|| TherapyError::Transport("Reply is missing 'response'".into()))?;

        Ok(ChatReply {
            reply_text,
            timestamp: body
                .timestamp
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or_else(Utc::now),
            matched_therapist: body.therapist,
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Accepts RFC 3339 and naive ISO-8601 (assumed UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
