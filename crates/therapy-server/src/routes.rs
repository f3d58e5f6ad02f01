use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use therapy_analytics::ReportGenerator;
use therapy_core::error::TherapyError;
use therapy_core::notes::NewNote;
use therapy_core::transport::{ChatRequest, HistoryEntry};

type ApiError = (StatusCode, Json<Value>);

fn api_error(err: TherapyError) -> ApiError {
    let status = match &err {
        TherapyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        TherapyError::Transport(_) | TherapyError::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match err {
        TherapyError::InvalidInput(msg) | TherapyError::Transport(msg) => msg,
        other => other.to_string(),
    };
    (status, Json(json!({ "error": message })))
}

// ── Health ──────────────────────────────────────────────────────────────

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ── Chat ────────────────────────────────────────────────────────────────

pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/api/chat", post(chat))
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    persona: String,
}

async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.message.trim().is_empty() || body.persona.is_empty() {
        return Err(api_error(TherapyError::InvalidInput(
            "Missing required parameters".into(),
        )));
    }

    // History comes from the open session when it belongs to this persona.
    let history = {
        let view = state.view.read().await;
        view.store()
            .current_session()
            .filter(|s| s.persona == body.persona)
            .map(|s| HistoryEntry::from_session(s, state.config.transport.history_limit))
            .unwrap_or_default()
    };

    let request = ChatRequest {
        message: body.message,
        persona_id: body.persona,
        history,
    };

    // Both messages carry the time the therapist sent, not the reply time.
    let sent_at = Utc::now();

    // The transport runs outside the lock; a failed exchange records nothing.
    let reply = state.transport.send(&request).await.map_err(|e| {
        tracing::warn!("Chat transport {} failed: {}", state.transport.name(), e);
        api_error(e)
    })?;

    let stats = {
        let mut view = state.view.write().await;
        view.record_message(
            &request.persona_id,
            &request.message,
            Some(&reply.reply_text),
            sent_at,
        )
        .map_err(api_error)?
        .clone()
    };
    tracing::info!(
        "Recorded exchange with {} ({} sessions total)",
        request.persona_id,
        stats.total_sessions
    );

    Ok(Json(json!({
        "response": reply.reply_text,
        "timestamp": reply.timestamp,
        "therapist": reply.matched_therapist,
        "stats": stats,
    })))
}

// ── Sessions ────────────────────────────────────────────────────────────

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/close", post(close_session))
}

async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    let view = state.view.read().await;
    Json(view.store().snapshot())
}

async fn close_session(State(state): State<AppState>) -> impl IntoResponse {
    let mut view = state.view.write().await;
    let stats = view.close_session().clone();
    Json(stats)
}

// ── Stats ───────────────────────────────────────────────────────────────

pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/api/stats", get(stats))
        .route("/api/report", get(report))
}

async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let view = state.view.read().await;
    Json(view.stats().clone())
}

async fn report(State(state): State<AppState>) -> impl IntoResponse {
    let view = state.view.read().await;
    let body = ReportGenerator::summary_report(view.stats());
    ([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], body)
}

// ── Notes ───────────────────────────────────────────────────────────────

pub fn notes_routes() -> Router<AppState> {
    Router::new()
        .route("/api/notes", post(save_note))
        .route("/api/notes/{child_id}", get(get_notes))
}

async fn save_note(
    State(state): State<AppState>,
    Json(new): Json<NewNote>,
) -> Result<impl IntoResponse, ApiError> {
    let mut notes = state.notes.write().await;
    let note = notes.save(new, Utc::now()).map_err(api_error)?;
    Ok(Json(json!({
        "message": "Notes saved successfully",
        "noteId": note.id,
        "timestamp": note.created_at,
    })))
}

async fn get_notes(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    let notes = state.notes.read().await;
    let recent: Vec<_> = notes
        .recent(&child_id, state.config.notes.recent_limit)
        .into_iter()
        .cloned()
        .collect();
    Json(recent)
}
