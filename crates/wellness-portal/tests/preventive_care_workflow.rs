//! End-to-end preventive-care scenarios driven through the public service
//! facade and HTTP router, backed by the in-memory repositories.

mod common {
    use std::sync::Arc;

    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use wellness_portal::care::memory::{MemoryPatientRepository, MemoryRuleRepository};
    use wellness_portal::care::preventive::{
        EngineConfig, PatientId, PatientProfile, PreventiveCareService, RuleCatalog, Sex,
        TestRecord,
    };

    pub(super) type Service = PreventiveCareService<MemoryPatientRepository, MemoryRuleRepository>;

    pub(super) fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 15, 8, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    pub(super) fn seeded_service(config: EngineConfig) -> Arc<Service> {
        let service = PreventiveCareService::new(
            Arc::new(MemoryPatientRepository::new()),
            Arc::new(MemoryRuleRepository::new()),
            config,
        );
        service
            .seed_catalog(&RuleCatalog::standard())
            .expect("catalog seeds");
        Arc::new(service)
    }

    pub(super) fn patient(
        id: &str,
        date_of_birth: (i32, u32, u32),
        sex: Sex,
        last_tests: Vec<TestRecord>,
    ) -> PatientProfile {
        let (year, month, day) = date_of_birth;
        PatientProfile {
            patient_id: PatientId(id.to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(year, month, day).expect("valid date"),
            sex,
            last_tests,
        }
    }

    pub(super) fn tested(test_type: &str, year: i32, month: u32, day: u32) -> TestRecord {
        TestRecord {
            test_type: test_type.to_string(),
            date: Utc
                .with_ymd_and_hms(year, month, day, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }
}

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use serde_json::Value;
use tower::ServiceExt;
use wellness_portal::care::preventive::{
    care_router, EngineConfig, PatientId, Priority, RuleRepository, Sex,
};

#[test]
fn screening_schedule_for_a_woman_in_her_fifties() {
    let service = seeded_service(EngineConfig::default());
    service
        .register_patient(patient(
            "patient-ada",
            (1970, 3, 2),
            Sex::Female,
            vec![
                tested("mammogram", 2021, 1, 10),
                tested("mammogram", 2023, 11, 2),
                tested("pap-smear", 2020, 6, 1),
                tested("blood-pressure", 2024, 8, 1),
                tested("colorectal", 2023, 9, 1),
            ],
        ))
        .expect("register");

    let evaluation = service
        .recommendations(&PatientId("patient-ada".to_string()), now())
        .expect("evaluation");

    assert_eq!(evaluation.age, 54);
    let due: Vec<(&str, Priority)> = evaluation
        .recommendations
        .iter()
        .map(|recommendation| (recommendation.test_type.as_str(), recommendation.priority))
        .collect();
    assert_eq!(
        due,
        vec![
            ("pap-smear", Priority::Medium),
            ("colorectal", Priority::Medium),
            ("blood-glucose", Priority::High),
            ("flu-vaccine", Priority::High),
        ]
    );
}

#[test]
fn recording_overdue_screenings_clears_them() {
    let service = seeded_service(EngineConfig::default());
    let patient_id = PatientId("patient-bo".to_string());
    service
        .register_patient(patient("patient-bo", (1984, 7, 19), Sex::Male, Vec::new()))
        .expect("register");

    let before = service
        .recommendations(&patient_id, now())
        .expect("evaluation");
    for recommendation in &before.recommendations {
        service
            .record_test(&patient_id, tested(&recommendation.test_type, 2024, 9, 1))
            .expect("record test");
    }

    let after = service
        .recommendations(&patient_id, now())
        .expect("evaluation");
    assert!(!before.recommendations.is_empty());
    assert!(after.recommendations.is_empty());
}

#[tokio::test]
async fn http_rule_changes_take_effect_on_next_evaluation() {
    let service = seeded_service(EngineConfig::strict());
    service
        .register_patient(patient("patient-cy", (2001, 1, 5), Sex::Other, Vec::new()))
        .expect("register");
    let router = care_router(service.clone());

    let create = Request::post("/api/v1/rules")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({
                "name": "Dental Cleaning",
                "condition_expression": "age >= 18 && age < 65",
                "recommendation_text": "Dental cleaning twice a year",
                "recommended_interval_days": 182,
                "test_type": "dental"
            })
            .to_string(),
        ))
        .expect("request");
    let response = router.clone().oneshot(create).await.expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .oneshot(
            Request::get("/api/v1/patients/patient-cy/recommendations?as_of=2024-09-15T08:00:00Z")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: Value = serde_json::from_slice(&body).expect("json payload");
    let test_types: Vec<&str> = payload["recommendations"]
        .as_array()
        .expect("recommendations")
        .iter()
        .filter_map(|recommendation| recommendation["test_type"].as_str())
        .collect();
    assert_eq!(test_types, vec!["blood-pressure", "flu-vaccine", "dental"]);
    assert_eq!(service.enabled_rules().expect("rules").len(), 8);
}

#[test]
fn custom_rule_repository_is_usable_through_the_trait() {
    fn enabled_count<R: RuleRepository>(repository: &R) -> usize {
        repository.enabled().map(|rules| rules.len()).unwrap_or(0)
    }

    let repository = wellness_portal::care::memory::MemoryRuleRepository::new();
    for rule in wellness_portal::care::preventive::RuleCatalog::standard().into_rules() {
        repository.insert(rule).expect("insert");
    }
    assert_eq!(enabled_count(&repository), 7);
}
