use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{PatientId, PatientProfile, RuleDraft, RuleId, Sex, TestRecord};
use super::repository::RuleRepository;
use super::service::{PreventiveCareError, PreventiveCareService};
use crate::care::repository::{PatientRepository, RepositoryError};

/// Router builder exposing rule management and patient recommendations.
pub fn care_router<P, R>(service: Arc<PreventiveCareService<P, R>>) -> Router
where
    P: PatientRepository + 'static,
    R: RuleRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/rules",
            get(list_rules_handler::<P, R>).post(create_rule_handler::<P, R>),
        )
        .route("/api/v1/rules/:rule_id", put(update_rule_handler::<P, R>))
        .route(
            "/api/v1/patients/:patient_id",
            put(register_patient_handler::<P, R>).get(patient_handler::<P, R>),
        )
        .route(
            "/api/v1/patients/:patient_id/tests",
            post(record_test_handler::<P, R>),
        )
        .route(
            "/api/v1/patients/:patient_id/recommendations",
            get(recommendations_handler::<P, R>),
        )
        .with_state(service)
}

/// Optional evaluation instant; defaults to the current time.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AsOfQuery {
    #[serde(default)]
    pub(crate) as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PatientRegistration {
    pub(crate) date_of_birth: NaiveDate,
    pub(crate) sex: Sex,
    #[serde(default)]
    pub(crate) last_tests: Vec<TestRecord>,
}

pub(crate) async fn recommendations_handler<P, R>(
    State(service): State<Arc<PreventiveCareService<P, R>>>,
    Path(patient_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    P: PatientRepository + 'static,
    R: RuleRepository + 'static,
{
    let now = query.as_of.unwrap_or_else(Utc::now);
    match service.recommendations(&PatientId(patient_id), now) {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn register_patient_handler<P, R>(
    State(service): State<Arc<PreventiveCareService<P, R>>>,
    Path(patient_id): Path<String>,
    axum::Json(registration): axum::Json<PatientRegistration>,
) -> Response
where
    P: PatientRepository + 'static,
    R: RuleRepository + 'static,
{
    let profile = PatientProfile {
        patient_id: PatientId(patient_id),
        date_of_birth: registration.date_of_birth,
        sex: registration.sex,
        last_tests: registration.last_tests,
    };
    match service.register_patient(profile) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn patient_handler<P, R>(
    State(service): State<Arc<PreventiveCareService<P, R>>>,
    Path(patient_id): Path<String>,
) -> Response
where
    P: PatientRepository + 'static,
    R: RuleRepository + 'static,
{
    match service.patient(&PatientId(patient_id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn record_test_handler<P, R>(
    State(service): State<Arc<PreventiveCareService<P, R>>>,
    Path(patient_id): Path<String>,
    axum::Json(record): axum::Json<TestRecord>,
) -> Response
where
    P: PatientRepository + 'static,
    R: RuleRepository + 'static,
{
    match service.record_test(&PatientId(patient_id), record) {
        Ok(profile) => (StatusCode::CREATED, axum::Json(profile)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn list_rules_handler<P, R>(
    State(service): State<Arc<PreventiveCareService<P, R>>>,
) -> Response
where
    P: PatientRepository + 'static,
    R: RuleRepository + 'static,
{
    match service.enabled_rules() {
        Ok(rules) => (StatusCode::OK, axum::Json(rules)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn create_rule_handler<P, R>(
    State(service): State<Arc<PreventiveCareService<P, R>>>,
    axum::Json(draft): axum::Json<RuleDraft>,
) -> Response
where
    P: PatientRepository + 'static,
    R: RuleRepository + 'static,
{
    match service.create_rule(draft) {
        Ok(rule) => (StatusCode::CREATED, axum::Json(rule)).into_response(),
        Err(error) => failure(error),
    }
}

pub(crate) async fn update_rule_handler<P, R>(
    State(service): State<Arc<PreventiveCareService<P, R>>>,
    Path(rule_id): Path<String>,
    axum::Json(draft): axum::Json<RuleDraft>,
) -> Response
where
    P: PatientRepository + 'static,
    R: RuleRepository + 'static,
{
    match service.update_rule(&RuleId(rule_id), draft) {
        Ok(rule) => (StatusCode::OK, axum::Json(rule)).into_response(),
        Err(error) => failure(error),
    }
}

fn failure(error: PreventiveCareError) -> Response {
    let status = match &error {
        PreventiveCareError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PreventiveCareError::PatientNotFound(_) | PreventiveCareError::RuleNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        PreventiveCareError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        PreventiveCareError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PreventiveCareError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
