pub mod health;

use std::any::Any;

use axum::{
    async_trait,
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, Request},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tower_http::catch_panic::CatchPanicLayer;

use crate::chatbot::handlers as chatbot;
use crate::cv::handlers as cv;
use crate::errors::AppError;
use crate::scholarship::handlers as scholarship;
use crate::state::AppState;

/// Largest accepted request body (CV uploads included).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// JSON body extractor whose rejections render as `{"error": ...}` with status 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// JSON body that callers may leave out. An empty body yields `None`; a body
/// that is present but not valid JSON for `T` is rejected with status 400.
pub struct OptionalJsonBody<T>(pub Option<T>);

#[async_trait]
impl<T, S> FromRequest<S> for OptionalJsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e.body_text())))?;
        parse_optional_json(&body).map(OptionalJsonBody)
    }
}

/// Parses a raw body as JSON, treating a blank body as absent.
pub fn parse_optional_json<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))
}

/// The server's local calendar date; prompts and day counts are relative to it.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// A required string field. Missing and blank values fail with `message`.
pub fn require(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

/// Renders a handler panic as a 500 `{"error": ...}` carrying the panic message.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "Internal server error".to_string()
    };
    AppError::Internal(anyhow::anyhow!(message)).into_response()
}

pub fn build_router(state: AppState) -> Router {
    with_middleware(api_routes()).with_state(state)
}

fn with_middleware(routes: Router<AppState>) -> Router<AppState> {
    routes
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/api/health", get(health::health_handler))
        // CV API
        .route("/api/cv/analyze", post(cv::handle_analyze))
        .route("/api/cv/analyze-pdf", post(cv::handle_analyze_pdf))
        .route("/api/cv/analyze-image", post(cv::handle_analyze_image))
        .route("/api/cv/analyze-text", post(cv::handle_analyze_text))
        .route(
            "/api/cv/scholarship-timeline",
            post(cv::handle_scholarship_timeline),
        )
        // Chatbot API
        .route(
            "/api/chatbot/set-context",
            post(chatbot::handle_set_context),
        )
        .route("/api/chatbot/chat", post(chatbot::handle_chat))
        .route(
            "/api/chatbot/ask-universities",
            post(chatbot::handle_ask_universities),
        )
        .route(
            "/api/chatbot/ask-scholarships",
            post(chatbot::handle_ask_scholarships),
        )
        .route(
            "/api/chatbot/ask-preparation",
            post(chatbot::handle_ask_preparation),
        )
        .route("/api/chatbot/compare", post(chatbot::handle_compare))
        .route("/api/chatbot/summary", get(chatbot::handle_summary))
        .route("/api/chatbot/clear", post(chatbot::handle_clear))
        // Scholarship API
        .route("/api/scholarship/timeline", post(scholarship::handle_timeline))
        .route(
            "/api/scholarship/university-scholarships",
            post(scholarship::handle_university_scholarships),
        )
        .route(
            "/api/scholarship/preparation-timeline",
            post(scholarship::handle_preparation_timeline),
        )
        .route("/api/scholarship/search", post(scholarship::handle_search))
}
