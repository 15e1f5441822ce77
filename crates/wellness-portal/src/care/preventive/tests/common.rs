use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::care::memory::{MemoryPatientRepository, MemoryRuleRepository};
use crate::care::preventive::domain::{
    PatientId, PatientProfile, PreventiveRule, RuleDraft, RuleId, Sex, TestRecord,
};
use crate::care::preventive::repository::RuleRepository;
use crate::care::preventive::{care_router, EngineConfig, PreventiveCareService};
use crate::care::repository::{PatientRepository, RepositoryError};

pub(super) type MemoryCareService =
    PreventiveCareService<MemoryPatientRepository, MemoryRuleRepository>;

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Evaluation instant shared by most scenarios.
pub(super) fn now() -> DateTime<Utc> {
    at(2024, 6, 1)
}

pub(super) fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub(super) fn test_record(test_type: &str, date: DateTime<Utc>) -> TestRecord {
    TestRecord {
        test_type: test_type.to_string(),
        date,
    }
}

/// 44 years old at [`now`].
pub(super) fn male_patient(tests: Vec<TestRecord>) -> PatientProfile {
    PatientProfile {
        patient_id: PatientId("patient-044".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(1980, 1, 1).expect("valid date"),
        sex: Sex::Male,
        last_tests: tests,
    }
}

pub(super) fn female_patient(id: &str, date_of_birth: NaiveDate) -> PatientProfile {
    PatientProfile {
        patient_id: PatientId(id.to_string()),
        date_of_birth,
        sex: Sex::Female,
        last_tests: Vec::new(),
    }
}

pub(super) fn rule(id: &str, expression: &str, interval: u32, test_type: &str) -> PreventiveRule {
    PreventiveRule {
        id: RuleId(id.to_string()),
        name: format!("{test_type} screening"),
        condition_expression: expression.to_string(),
        recommendation_text: format!("Schedule a {test_type} check"),
        recommended_interval_days: interval,
        test_type: test_type.to_string(),
        enabled: true,
    }
}

pub(super) fn cholesterol_rule() -> PreventiveRule {
    rule(
        "rule-cholesterol",
        r#"age >= 35 AND sex === "male""#,
        365,
        "cholesterol",
    )
}

pub(super) fn draft(interval: i64) -> RuleDraft {
    RuleDraft {
        name: "Bone Density Scan".to_string(),
        condition_expression: r#"age >= 65 AND sex === "female""#.to_string(),
        recommendation_text: "DEXA scan every two years".to_string(),
        recommended_interval_days: interval,
        test_type: "bone-density".to_string(),
        enabled: true,
    }
}

pub(super) fn build_service(
    config: EngineConfig,
) -> (
    MemoryCareService,
    Arc<MemoryPatientRepository>,
    Arc<MemoryRuleRepository>,
) {
    let patients = Arc::new(MemoryPatientRepository::new());
    let rules = Arc::new(MemoryRuleRepository::new());
    let service = PreventiveCareService::new(patients.clone(), rules.clone(), config);
    (service, patients, rules)
}

pub(super) fn care_router_with_service<P, R>(service: PreventiveCareService<P, R>) -> axum::Router
where
    P: PatientRepository + 'static,
    R: RuleRepository + 'static,
{
    care_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct UnavailablePatients;

impl PatientRepository for UnavailablePatients {
    fn upsert(&self, _profile: PatientProfile) -> Result<PatientProfile, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &PatientId) -> Result<Option<PatientProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn record_test(
        &self,
        _id: &PatientId,
        _record: TestRecord,
    ) -> Result<PatientProfile, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<PatientProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
