use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AdvisoryDraft, AdvisoryId, AdvisoryUpdate, ProviderId, ProviderProfile};
use super::repository::{AdvisoryRepository, ProviderRepository};
use super::service::{AdvisoryService, ProviderError, ProviderService};
use crate::care::preventive::domain::PatientId;
use crate::care::repository::{PatientRepository, RepositoryError};
use crate::care::wellness::WellnessEntryRepository;

/// Router builder exposing provider panels and advisory notes.
pub fn provider_router<D, A, W, P>(
    providers: Arc<ProviderService<D, W, P>>,
    advisories: Arc<AdvisoryService<A, D, P>>,
) -> Router
where
    D: ProviderRepository + 'static,
    A: AdvisoryRepository + 'static,
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    let panels = Router::new()
        .route(
            "/api/v1/providers/:provider_id",
            put(register_provider_handler::<D, W, P>).get(provider_handler::<D, W, P>),
        )
        .route(
            "/api/v1/providers/:provider_id/patients",
            get(roster_handler::<D, W, P>).post(assign_handler::<D, W, P>),
        )
        .route(
            "/api/v1/providers/:provider_id/patients/:patient_id/compliance",
            get(compliance_handler::<D, W, P>),
        )
        .with_state(providers);

    let notes = Router::new()
        .route(
            "/api/v1/providers/:provider_id/advisories",
            post(create_advisory_handler::<A, D, P>),
        )
        .route(
            "/api/v1/providers/:provider_id/advisories/:advisory_id",
            patch(update_advisory_handler::<A, D, P>),
        )
        .route(
            "/api/v1/patients/:patient_id/advisories",
            get(patient_advisories_handler::<A, D, P>),
        )
        .route(
            "/api/v1/patients/:patient_id/advisories/:advisory_id/acknowledge",
            post(acknowledge_handler::<A, D, P>),
        )
        .with_state(advisories);

    panels.merge(notes)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProviderRegistration {
    #[serde(default)]
    pub(crate) specialization: Option<String>,
    #[serde(default)]
    pub(crate) license_number: Option<String>,
    #[serde(default)]
    pub(crate) patients: Vec<PatientId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Assignment {
    pub(crate) patient_id: PatientId,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AsOfQuery {
    #[serde(default)]
    pub(crate) as_of: Option<DateTime<Utc>>,
}

pub(crate) async fn register_provider_handler<D, W, P>(
    State(service): State<Arc<ProviderService<D, W, P>>>,
    Path(provider_id): Path<String>,
    axum::Json(registration): axum::Json<ProviderRegistration>,
) -> Response
where
    D: ProviderRepository + 'static,
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    let profile = ProviderProfile {
        provider_id: ProviderId(provider_id),
        specialization: registration.specialization,
        license_number: registration.license_number,
        patients: registration.patients,
    };
    match service.register_provider(profile) {
        Ok(stored) => (StatusCode::OK, axum::Json(stored)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn provider_handler<D, W, P>(
    State(service): State<Arc<ProviderService<D, W, P>>>,
    Path(provider_id): Path<String>,
) -> Response
where
    D: ProviderRepository + 'static,
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    match service.provider(&ProviderId(provider_id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn assign_handler<D, W, P>(
    State(service): State<Arc<ProviderService<D, W, P>>>,
    Path(provider_id): Path<String>,
    axum::Json(assignment): axum::Json<Assignment>,
) -> Response
where
    D: ProviderRepository + 'static,
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    match service.assign_patient(&ProviderId(provider_id), assignment.patient_id) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn roster_handler<D, W, P>(
    State(service): State<Arc<ProviderService<D, W, P>>>,
    Path(provider_id): Path<String>,
) -> Response
where
    D: ProviderRepository + 'static,
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    match service.assigned_roster(&ProviderId(provider_id)) {
        Ok(roster) => (StatusCode::OK, axum::Json(roster)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn compliance_handler<D, W, P>(
    State(service): State<Arc<ProviderService<D, W, P>>>,
    Path((provider_id, patient_id)): Path<(String, String)>,
) -> Response
where
    D: ProviderRepository + 'static,
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    match service.patient_compliance(&ProviderId(provider_id), &PatientId(patient_id)) {
        Ok(compliance) => (StatusCode::OK, axum::Json(compliance)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn create_advisory_handler<A, D, P>(
    State(service): State<Arc<AdvisoryService<A, D, P>>>,
    Path(provider_id): Path<String>,
    axum::Json(draft): axum::Json<AdvisoryDraft>,
) -> Response
where
    A: AdvisoryRepository + 'static,
    D: ProviderRepository + 'static,
    P: PatientRepository + 'static,
{
    match service.create(&ProviderId(provider_id), draft, Utc::now()) {
        Ok(advisory) => (StatusCode::CREATED, axum::Json(advisory)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn update_advisory_handler<A, D, P>(
    State(service): State<Arc<AdvisoryService<A, D, P>>>,
    Path((provider_id, advisory_id)): Path<(String, String)>,
    axum::Json(update): axum::Json<AdvisoryUpdate>,
) -> Response
where
    A: AdvisoryRepository + 'static,
    D: ProviderRepository + 'static,
    P: PatientRepository + 'static,
{
    match service.update(&ProviderId(provider_id), &AdvisoryId(advisory_id), update) {
        Ok(advisory) => (StatusCode::OK, axum::Json(advisory)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn patient_advisories_handler<A, D, P>(
    State(service): State<Arc<AdvisoryService<A, D, P>>>,
    Path(patient_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    A: AdvisoryRepository + 'static,
    D: ProviderRepository + 'static,
    P: PatientRepository + 'static,
{
    let now = query.as_of.unwrap_or_else(Utc::now);
    match service.for_patient(&PatientId(patient_id), now) {
        Ok(advisories) => (StatusCode::OK, axum::Json(advisories)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn acknowledge_handler<A, D, P>(
    State(service): State<Arc<AdvisoryService<A, D, P>>>,
    Path((patient_id, advisory_id)): Path<(String, String)>,
) -> Response
where
    A: AdvisoryRepository + 'static,
    D: ProviderRepository + 'static,
    P: PatientRepository + 'static,
{
    match service.acknowledge(&PatientId(patient_id), &AdvisoryId(advisory_id), Utc::now()) {
        Ok(advisory) => (StatusCode::OK, axum::Json(advisory)).into_response(),
        Err(error) => failure(error),
    }
}

fn failure(error: ProviderError) -> Response {
    let status = match &error {
        ProviderError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProviderError::ProviderNotFound(_)
        | ProviderError::PatientNotFound(_)
        | ProviderError::AdvisoryNotFound(_)
        | ProviderError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ProviderError::NotAssigned { .. } | ProviderError::NotOwner { .. } => {
            StatusCode::FORBIDDEN
        }
        ProviderError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ProviderError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
