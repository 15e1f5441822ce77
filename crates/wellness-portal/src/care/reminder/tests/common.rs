use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::care::memory::{MemoryPatientRepository, MemoryReminderRepository};
use crate::care::preventive::domain::{PatientId, PatientProfile, Sex};
use crate::care::reminder::domain::{ReminderDraft, ReminderKind};
use crate::care::reminder::{reminder_router, ReminderService};
use crate::care::repository::PatientRepository;

pub(super) type MemoryReminderService =
    ReminderService<MemoryReminderRepository, MemoryPatientRepository>;

pub(super) fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, hour, minute, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn patient_id(raw: &str) -> PatientId {
    PatientId(raw.to_string())
}

pub(super) fn medication(text: &str, times: &[&str]) -> ReminderDraft {
    ReminderDraft {
        kind: ReminderKind::Medication,
        text: text.to_string(),
        times: times.iter().map(|time| time.to_string()).collect(),
    }
}

pub(super) fn build_service(patients: &[&str]) -> MemoryReminderService {
    let registry = Arc::new(MemoryPatientRepository::new());
    for raw in patients {
        registry
            .upsert(PatientProfile {
                patient_id: patient_id(raw),
                date_of_birth: NaiveDate::from_ymd_opt(1961, 11, 2).expect("valid date"),
                sex: Sex::Female,
                last_tests: Vec::new(),
            })
            .expect("register patient");
    }
    ReminderService::new(Arc::new(MemoryReminderRepository::new()), registry)
}

pub(super) fn router_with_service(service: MemoryReminderService) -> axum::Router {
    reminder_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
