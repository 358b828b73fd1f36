//! Axum route handlers for the scholarship API.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::budget::deserialize_amount;
use crate::errors::AppError;
use crate::routes::{require, today, JsonBody, OptionalJsonBody};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TimelineRequest {
    pub university_name: Option<String>,
    pub user_country: Option<String>,
    pub departure_date: Option<String>,
    pub field_of_study: Option<String>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub budget_limit: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UniversityScholarshipsRequest {
    pub university_name: Option<String>,
    pub field_of_study: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreparationTimelineRequest {
    pub departure_date: Option<String>,
    pub user_country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    pub field_of_study: Option<String>,
    pub target_countries: Option<TargetCountries>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub budget_limit: Option<f64>,
    pub user_country: Option<String>,
}

/// Either `["Japan", "Korea"]` or `"Japan, Korea"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TargetCountries {
    List(Vec<String>),
    Text(String),
}

impl TargetCountries {
    pub fn into_vec(self) -> Vec<String> {
        let names = match self {
            TargetCountries::List(names) => names,
            TargetCountries::Text(text) => text.split(',').map(str::to_string).collect(),
        };
        names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/scholarship/timeline
pub async fn handle_timeline(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<TimelineRequest>,
) -> Result<Json<Value>, AppError> {
    const MISSING: &str = "University name, user country, and departure date are required";
    let university = require(request.university_name, MISSING)?;
    let user_country = require(request.user_country, MISSING)?;
    let departure_date = require(request.departure_date, MISSING)?;

    Ok(Json(
        state
            .scholarship
            .timeline(
                &university,
                &user_country,
                &departure_date,
                request.field_of_study.as_deref(),
                request.budget_limit,
                today(),
            )
            .await,
    ))
}

/// POST /api/scholarship/university-scholarships
pub async fn handle_university_scholarships(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UniversityScholarshipsRequest>,
) -> Result<Json<Value>, AppError> {
    let university = require(request.university_name, "University name is required")?;
    Ok(Json(
        state
            .scholarship
            .university_scholarships(&university, request.field_of_study.as_deref(), today())
            .await,
    ))
}

/// POST /api/scholarship/preparation-timeline
///
/// An unparseable date is not a validation failure: it comes back as an
/// error record with status 200.
pub async fn handle_preparation_timeline(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<PreparationTimelineRequest>,
) -> Result<Json<Value>, AppError> {
    let departure_date = require(request.departure_date, "Departure date is required")?;
    let user_country = request
        .user_country
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| state.config.default_user_country.clone());

    Ok(Json(
        state
            .scholarship
            .preparation_timeline(&departure_date, &user_country, today())
            .await,
    ))
}

/// POST /api/scholarship/search
pub async fn handle_search(
    State(state): State<AppState>,
    OptionalJsonBody(request): OptionalJsonBody<SearchRequest>,
) -> Json<Value> {
    let request = request.unwrap_or_default();
    let countries = request
        .target_countries
        .map(TargetCountries::into_vec)
        .unwrap_or_default();
    let user_country = request
        .user_country
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| state.config.default_user_country.clone());

    Json(
        state
            .scholarship
            .search(
                request.field_of_study.as_deref(),
                &countries,
                request.budget_limit,
                &user_country,
                today(),
            )
            .await,
    )
}
