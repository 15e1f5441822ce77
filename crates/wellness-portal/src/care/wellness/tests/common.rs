use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::care::memory::{MemoryPatientRepository, MemoryWellnessRepository};
use crate::care::preventive::domain::{PatientId, PatientProfile, Sex};
use crate::care::repository::{PatientRepository, RepositoryError};
use crate::care::wellness::domain::{WellnessEntry, WellnessSubmission};
use crate::care::wellness::repository::{UpsertOutcome, WellnessEntryRepository};
use crate::care::wellness::{wellness_router, TrendRange, WellnessService};

pub(super) type MemoryWellnessService =
    WellnessService<MemoryWellnessRepository, MemoryPatientRepository>;

pub(super) fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).expect("valid date")
}

/// Reference "today" for the scenarios.
pub(super) fn today() -> NaiveDate {
    day(6, 30)
}

pub(super) fn patient_id(raw: &str) -> PatientId {
    PatientId(raw.to_string())
}

pub(super) fn profile(raw: &str) -> PatientProfile {
    PatientProfile {
        patient_id: patient_id(raw),
        date_of_birth: NaiveDate::from_ymd_opt(1988, 9, 14).expect("valid date"),
        sex: Sex::Other,
        last_tests: Vec::new(),
    }
}

pub(super) fn submission(
    raw: &str,
    date: NaiveDate,
    steps: i64,
    sleep_hours: f64,
    compliance: f64,
) -> WellnessSubmission {
    WellnessSubmission {
        patient_id: patient_id(raw),
        date: Some(date),
        steps: Some(steps),
        sleep_hours: Some(sleep_hours),
        water_intake_ml: Some(2_000),
        preventive_compliance_score: Some(compliance),
    }
}

pub(super) fn build_service(
    patients: &[&str],
) -> (MemoryWellnessService, Arc<MemoryWellnessRepository>) {
    let entries = Arc::new(MemoryWellnessRepository::new());
    let registry = Arc::new(MemoryPatientRepository::new());
    for raw in patients {
        registry.upsert(profile(raw)).expect("register patient");
    }
    let service = WellnessService::new(entries.clone(), registry, TrendRange::Week);
    (service, entries)
}

pub(super) fn wellness_router_with_service<W, P>(service: WellnessService<W, P>) -> axum::Router
where
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    wellness_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct UnavailableEntries;

impl WellnessEntryRepository for UnavailableEntries {
    fn upsert_for_day(&self, _entry: WellnessEntry) -> Result<UpsertOutcome, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_day(
        &self,
        _patient_id: &PatientId,
        _date: NaiveDate,
    ) -> Result<Option<WellnessEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn entries_since(
        &self,
        _patient_id: &PatientId,
        _since: NaiveDate,
    ) -> Result<Vec<WellnessEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent(
        &self,
        _patient_id: &PatientId,
        _limit: usize,
    ) -> Result<Vec<WellnessEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
