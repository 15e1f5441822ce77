use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AdherenceStatus, ReminderDraft, ReminderId};
use super::repository::ReminderRepository;
use super::service::{ReminderError, ReminderService};
use crate::care::preventive::domain::PatientId;
use crate::care::repository::{PatientRepository, RepositoryError};

/// Router builder exposing patient reminders and adherence logging.
pub fn reminder_router<M, P>(service: Arc<ReminderService<M, P>>) -> Router
where
    M: ReminderRepository + 'static,
    P: PatientRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/patients/:patient_id/reminders",
            get(overview_handler::<M, P>).post(create_handler::<M, P>),
        )
        .route(
            "/api/v1/patients/:patient_id/reminders/:reminder_id/adherence",
            post(adherence_handler::<M, P>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AsOfQuery {
    #[serde(default)]
    pub(crate) as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AdherenceRequest {
    #[serde(default)]
    pub(crate) status: AdherenceStatus,
}

pub(crate) async fn create_handler<M, P>(
    State(service): State<Arc<ReminderService<M, P>>>,
    Path(patient_id): Path<String>,
    axum::Json(draft): axum::Json<ReminderDraft>,
) -> Response
where
    M: ReminderRepository + 'static,
    P: PatientRepository + 'static,
{
    match service.create(&PatientId(patient_id), draft, Utc::now()) {
        Ok(reminder) => (StatusCode::CREATED, axum::Json(reminder)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn overview_handler<M, P>(
    State(service): State<Arc<ReminderService<M, P>>>,
    Path(patient_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    M: ReminderRepository + 'static,
    P: PatientRepository + 'static,
{
    let now = query.as_of.unwrap_or_else(Utc::now);
    match service.overview(&PatientId(patient_id), now) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn adherence_handler<M, P>(
    State(service): State<Arc<ReminderService<M, P>>>,
    Path((patient_id, reminder_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<AdherenceRequest>,
) -> Response
where
    M: ReminderRepository + 'static,
    P: PatientRepository + 'static,
{
    match service.mark(
        &PatientId(patient_id),
        &ReminderId(reminder_id),
        request.status,
        Utc::now(),
    ) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => failure(error),
    }
}

fn failure(error: ReminderError) -> Response {
    let status = match &error {
        ReminderError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReminderError::PatientNotFound(_)
        | ReminderError::ReminderNotFound(_)
        | ReminderError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ReminderError::NotOwner { .. } => StatusCode::FORBIDDEN,
        ReminderError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ReminderError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
