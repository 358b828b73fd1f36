//! Axum route handlers for the chatbot API.
//!
//! Every handler is session-scoped through the `x-session-id` header.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::conversation::SessionId;
use crate::errors::AppError;
use crate::routes::{require, today, JsonBody, OptionalJsonBody};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SetContextRequest {
    pub cv_analysis: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AskUniversitiesRequest {
    pub university_name: Option<String>,
    pub question: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AskScholarshipsRequest {
    #[serde(rename = "type")]
    pub scholarship_type: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AskPreparationRequest {
    pub timeline: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub criteria: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/chatbot/set-context
///
/// Stores a CV analysis as the session's context and starts a fresh history.
pub async fn handle_set_context(
    State(state): State<AppState>,
    session: SessionId,
    JsonBody(request): JsonBody<SetContextRequest>,
) -> Result<Json<Value>, AppError> {
    let cv_analysis = request
        .cv_analysis
        .filter(|v| !is_empty_value(v))
        .ok_or_else(|| AppError::Validation("CV analysis context required".to_string()))?;

    Ok(Json(
        state.chatbot.set_context(session.as_str(), cv_analysis).await,
    ))
}

/// POST /api/chatbot/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    session: SessionId,
    JsonBody(request): JsonBody<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    let message = require(request.message, "Message is required")?;
    Ok(Json(state.chatbot.chat(session.as_str(), &message).await))
}

/// POST /api/chatbot/ask-universities
pub async fn handle_ask_universities(
    State(state): State<AppState>,
    session: SessionId,
    JsonBody(request): JsonBody<AskUniversitiesRequest>,
) -> Result<Json<Value>, AppError> {
    let university = require(request.university_name, "University name is required")?;
    Ok(Json(
        state
            .chatbot
            .ask_universities(session.as_str(), &university, request.question.as_deref())
            .await,
    ))
}

/// POST /api/chatbot/ask-scholarships
///
/// The body is optional; both filters fall back to "any".
pub async fn handle_ask_scholarships(
    State(state): State<AppState>,
    session: SessionId,
    OptionalJsonBody(request): OptionalJsonBody<AskScholarshipsRequest>,
) -> Json<Value> {
    let request = request.unwrap_or_default();
    Json(
        state
            .chatbot
            .ask_scholarships(
                session.as_str(),
                request.scholarship_type.as_deref(),
                request.country.as_deref(),
                today(),
            )
            .await,
    )
}

/// POST /api/chatbot/ask-preparation
pub async fn handle_ask_preparation(
    State(state): State<AppState>,
    session: SessionId,
    OptionalJsonBody(request): OptionalJsonBody<AskPreparationRequest>,
) -> Json<Value> {
    let request = request.unwrap_or_default();
    Json(
        state
            .chatbot
            .ask_preparation(session.as_str(), request.timeline.as_deref(), today())
            .await,
    )
}

/// POST /api/chatbot/compare
pub async fn handle_compare(
    State(state): State<AppState>,
    session: SessionId,
    JsonBody(request): JsonBody<CompareRequest>,
) -> Result<Json<Value>, AppError> {
    let (option1, option2) = match (non_blank(request.option1), non_blank(request.option2)) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(AppError::Validation("Both options are required".to_string())),
    };

    Ok(Json(
        state
            .chatbot
            .compare(
                session.as_str(),
                &option1,
                &option2,
                request.criteria.as_deref(),
            )
            .await,
    ))
}

/// GET /api/chatbot/summary
pub async fn handle_summary(State(state): State<AppState>, session: SessionId) -> Json<Value> {
    Json(state.chatbot.summary(session.as_str()).await)
}

/// POST /api/chatbot/clear
pub async fn handle_clear(State(state): State<AppState>, session: SessionId) -> Json<Value> {
    Json(state.chatbot.clear(session.as_str()).await)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `null`, `""`, `{}` and `[]` do not count as a CV analysis.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
