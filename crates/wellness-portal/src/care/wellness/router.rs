use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::WellnessSubmission;
use super::repository::WellnessEntryRepository;
use super::service::{WellnessService, WellnessServiceError};
use super::trends::TrendRange;
use crate::care::preventive::domain::PatientId;
use crate::care::repository::{PatientRepository, RepositoryError};

/// Router builder exposing daily wellness logging and dashboard views.
pub fn wellness_router<W, P>(service: Arc<WellnessService<W, P>>) -> Router
where
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    Router::new()
        .route("/api/v1/wellness", post(submit_handler::<W, P>))
        .route(
            "/api/v1/patients/:patient_id/wellness",
            get(trend_handler::<W, P>),
        )
        .route(
            "/api/v1/patients/:patient_id/dashboard",
            get(dashboard_handler::<W, P>),
        )
        .route("/api/v1/admin/patients", get(roster_handler::<W, P>))
        .route("/api/v1/admin/stats", get(stats_handler::<W, P>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TrendQuery {
    #[serde(default)]
    pub(crate) range: Option<String>,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn submit_handler<W, P>(
    State(service): State<Arc<WellnessService<W, P>>>,
    axum::Json(submission): axum::Json<WellnessSubmission>,
) -> Response
where
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    let today = Utc::now().date_naive();
    match service.submit(submission, today) {
        Ok(submitted) => (StatusCode::CREATED, axum::Json(submitted)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn trend_handler<W, P>(
    State(service): State<Arc<WellnessService<W, P>>>,
    Path(patient_id): Path<String>,
    Query(query): Query<TrendQuery>,
) -> Response
where
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    let range = TrendRange::parse_or(query.range.as_deref(), service.default_range());
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    match service.trend(&PatientId(patient_id), Some(range), today) {
        Ok(trend) => (StatusCode::OK, axum::Json(trend)).into_response(),
        Err(error) => failure(error),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardQuery {
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn dashboard_handler<W, P>(
    State(service): State<Arc<WellnessService<W, P>>>,
    Path(patient_id): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Response
where
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    match service.dashboard(&PatientId(patient_id), today) {
        Ok(dashboard) => (StatusCode::OK, axum::Json(dashboard)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn roster_handler<W, P>(
    State(service): State<Arc<WellnessService<W, P>>>,
) -> Response
where
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    match service.full_roster() {
        Ok(roster) => (StatusCode::OK, axum::Json(roster)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn stats_handler<W, P>(
    State(service): State<Arc<WellnessService<W, P>>>,
) -> Response
where
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    match service.cohort_statistics() {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(error) => failure(error),
    }
}

fn failure(error: WellnessServiceError) -> Response {
    let status = match &error {
        WellnessServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        WellnessServiceError::PatientNotFound(_)
        | WellnessServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        WellnessServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        WellnessServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
