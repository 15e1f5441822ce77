use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::care::memory::{
    MemoryAdvisoryRepository, MemoryPatientRepository, MemoryProviderRepository,
    MemoryWellnessRepository,
};
use crate::care::preventive::domain::{PatientId, PatientProfile, Sex};
use crate::care::provider::domain::{AdvisoryDraft, ProviderId, ProviderProfile};
use crate::care::provider::{provider_router, AdvisoryService, ProviderService};
use crate::care::repository::PatientRepository;
use crate::care::wellness::{TrendRange, WellnessService};

pub(super) type MemoryProviderService =
    ProviderService<MemoryProviderRepository, MemoryWellnessRepository, MemoryPatientRepository>;
pub(super) type MemoryAdvisoryService =
    AdvisoryService<MemoryAdvisoryRepository, MemoryProviderRepository, MemoryPatientRepository>;

/// Provider and advisory services sharing one patient registry.
pub(super) struct CareTeam {
    pub(super) providers: Arc<MemoryProviderService>,
    pub(super) advisories: Arc<MemoryAdvisoryService>,
    pub(super) wellness: Arc<WellnessService<MemoryWellnessRepository, MemoryPatientRepository>>,
}

impl CareTeam {
    pub(super) fn router(&self) -> axum::Router {
        provider_router(self.providers.clone(), self.advisories.clone())
    }
}

pub(super) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn patient_id(raw: &str) -> PatientId {
    PatientId(raw.to_string())
}

pub(super) fn provider_id(raw: &str) -> ProviderId {
    ProviderId(raw.to_string())
}

pub(super) fn provider(raw: &str, patients: &[&str]) -> ProviderProfile {
    ProviderProfile {
        provider_id: provider_id(raw),
        specialization: Some("Family Medicine".to_string()),
        license_number: None,
        patients: patients.iter().map(|raw| patient_id(raw)).collect(),
    }
}

pub(super) fn draft(patient: &str, text: &str) -> AdvisoryDraft {
    AdvisoryDraft {
        patient_id: patient_id(patient),
        text: text.to_string(),
        tags: vec!["follow-up".to_string()],
        expires_at: None,
    }
}

pub(super) fn build_team(patients: &[&str]) -> CareTeam {
    let registry = Arc::new(MemoryPatientRepository::new());
    for raw in patients {
        registry
            .upsert(PatientProfile {
                patient_id: patient_id(raw),
                date_of_birth: NaiveDate::from_ymd_opt(1975, 3, 8).expect("valid date"),
                sex: Sex::Male,
                last_tests: Vec::new(),
            })
            .expect("register patient");
    }

    let directory = Arc::new(MemoryProviderRepository::new());
    let wellness = Arc::new(WellnessService::new(
        Arc::new(MemoryWellnessRepository::new()),
        registry.clone(),
        TrendRange::Week,
    ));
    let providers = Arc::new(ProviderService::new(
        directory.clone(),
        registry.clone(),
        wellness.clone(),
    ));
    let advisories = Arc::new(AdvisoryService::new(
        Arc::new(MemoryAdvisoryRepository::new()),
        directory,
        registry,
    ));

    CareTeam {
        providers,
        advisories,
        wellness,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
