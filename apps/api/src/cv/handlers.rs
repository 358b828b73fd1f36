//! Axum route handlers for the CV API.

use axum::{
    body::to_bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;

use crate::budget::{self, deserialize_amount, Budget};
use crate::cv::analyzer::CvError;
use crate::errors::AppError;
use crate::models::cv::{CvInput, FileKind};
use crate::routes::{parse_optional_json, today, JsonBody, OptionalJsonBody, MAX_UPLOAD_BYTES};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub budget_limit: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub monthly_budget: Option<f64>,
}

impl AnalyzeTextRequest {
    fn budget(&self) -> Budget {
        Budget::new(self.budget_limit, self.monthly_budget)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CvScholarshipTimelineRequest {
    #[serde(default)]
    pub countries: Vec<String>,
    pub field: Option<String>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub budget_limit: Option<f64>,
}

/// Multipart upload: the CV file plus optional budget fields.
struct CvForm {
    file: Option<(String, Bytes)>,
    budget: Budget,
}

impl From<CvError> for AppError {
    fn from(error: CvError) -> Self {
        AppError::Validation(error.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/cv/analyze
///
/// Accepts either a multipart upload (`file`, optional `budget_limit` and
/// `monthly_budget`) or a JSON body with `text`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<Value>, AppError> {
    let (input, budget) = if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &state).await?;
        let form = read_cv_form(multipart).await?;
        let (filename, data) = form
            .file
            .ok_or_else(|| AppError::Validation("No CV data provided".to_string()))?;
        let input = match FileKind::from_filename(&filename) {
            Some(FileKind::Pdf) => CvInput::Pdf(data),
            Some(FileKind::Image) => CvInput::Image(data),
            None => return Err(AppError::Validation("Unsupported file format".to_string())),
        };
        (input, form.budget)
    } else {
        let body = to_bytes(request.into_body(), MAX_UPLOAD_BYTES)
            .await
            .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?;
        let parsed: AnalyzeTextRequest = parse_optional_json(&body)?.unwrap_or_default();
        let budget = parsed.budget();
        match parsed.text {
            Some(text) if !text.trim().is_empty() => (CvInput::Text(text), budget),
            _ => return Err(AppError::Validation("No CV data provided".to_string())),
        }
    };

    let analysis = state.cv.analyze(input, budget, today()).await?;
    Ok(Json(analysis))
}

/// POST /api/cv/analyze-pdf
pub async fn handle_analyze_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let form = read_cv_form(multipart).await?;
    let (filename, data) = required_file(form.file)?;
    if FileKind::from_filename(&filename) != Some(FileKind::Pdf) {
        return Err(AppError::Validation("File must be a PDF".to_string()));
    }

    Ok(Json(state.cv.analyze_pdf(data, form.budget, today()).await))
}

/// POST /api/cv/analyze-image
pub async fn handle_analyze_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let form = read_cv_form(multipart).await?;
    let (filename, data) = required_file(form.file)?;
    if FileKind::from_filename(&filename) != Some(FileKind::Image) {
        return Err(AppError::Validation(
            "File must be a PNG or JPEG image".to_string(),
        ));
    }

    Ok(Json(
        state.cv.analyze_image(data, form.budget, today()).await?,
    ))
}

/// POST /api/cv/analyze-text
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AnalyzeTextRequest>,
) -> Result<Json<Value>, AppError> {
    let budget = request.budget();
    let text = request
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("CV text is required".to_string()))?;

    Ok(Json(state.cv.analyze_text(&text, budget, today()).await))
}

/// POST /api/cv/scholarship-timeline
pub async fn handle_scholarship_timeline(
    State(state): State<AppState>,
    OptionalJsonBody(request): OptionalJsonBody<CvScholarshipTimelineRequest>,
) -> Json<Value> {
    let request = request.unwrap_or_default();
    Json(
        state
            .cv
            .scholarship_timeline(
                &request.countries,
                request.field.as_deref(),
                request.budget_limit,
                today(),
            )
            .await,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart helpers
// ────────────────────────────────────────────────────────────────────────────

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

fn required_file(file: Option<(String, Bytes)>) -> Result<(String, Bytes), AppError> {
    file.ok_or_else(|| AppError::Validation("No file provided".to_string()))
}

async fn read_cv_form(mut multipart: Multipart) -> Result<CvForm, AppError> {
    let mut file = None;
    let mut total_limit = None;
    let mut monthly_limit = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                file = Some((filename, data));
            }
            "budget_limit" => {
                total_limit = parse_amount("budget_limit", &field.text().await?)?;
            }
            "monthly_budget" => {
                monthly_limit = parse_amount("monthly_budget", &field.text().await?)?;
            }
            _ => {}
        }
    }

    Ok(CvForm {
        file,
        budget: Budget::new(total_limit, monthly_limit),
    })
}

/// Parses a form amount such as `50000000`, `50.000.000` or `1.5e7`. Blank means absent.
fn parse_amount(field: &str, raw: &str) -> Result<Option<f64>, AppError> {
    budget::parse_amount(raw)
        .map_err(|_| AppError::Validation(format!("{field} must be a number")))
}
