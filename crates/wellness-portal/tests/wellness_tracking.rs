//! Daily wellness logging through the HTTP router, from submission to the
//! provider and admin dashboards.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;
use wellness_portal::care::memory::{
    MemoryAdvisoryRepository, MemoryPatientRepository, MemoryProviderRepository,
    MemoryWellnessRepository,
};
use wellness_portal::care::preventive::{PatientId, PatientProfile, Sex};
use wellness_portal::care::provider::{
    provider_router, AdvisoryService, ProviderId, ProviderProfile, ProviderService,
};
use wellness_portal::care::wellness::{
    compute_score, wellness_router, ComplianceStatus, TrendRange, WellnessService,
};
use wellness_portal::care::PatientRepository;

fn router_with_patients(ids: &[&str]) -> Router {
    let patients = Arc::new(MemoryPatientRepository::new());
    for id in ids {
        patients
            .upsert(PatientProfile {
                patient_id: PatientId(id.to_string()),
                date_of_birth: NaiveDate::from_ymd_opt(1992, 2, 29).expect("valid date"),
                sex: Sex::Female,
                last_tests: Vec::new(),
            })
            .expect("register");
    }
    let wellness = Arc::new(WellnessService::new(
        Arc::new(MemoryWellnessRepository::new()),
        patients.clone(),
        TrendRange::Week,
    ));

    // One provider caring for the first registered patient.
    let directory = Arc::new(MemoryProviderRepository::new());
    let providers = ProviderService::new(directory.clone(), patients.clone(), wellness.clone());
    providers
        .register_provider(ProviderProfile {
            provider_id: ProviderId("dr-ng".to_string()),
            specialization: None,
            license_number: None,
            patients: ids
                .first()
                .map(|id| PatientId(id.to_string()))
                .into_iter()
                .collect(),
        })
        .expect("register provider");
    let advisories =
        AdvisoryService::new(Arc::new(MemoryAdvisoryRepository::new()), directory, patients);

    wellness_router(wellness).merge(provider_router(
        Arc::new(providers),
        Arc::new(advisories),
    ))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&body).expect("json payload"))
}

fn submit(body: Value) -> Request<Body> {
    Request::post("/api/v1/wellness")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

#[test]
fn score_is_bounded_and_saturates_at_goals() {
    assert_eq!(compute_score(10_000, 8.0, 30.0), Ok(100));
    assert_eq!(compute_score(25_000, 11.0, 45.0), Ok(100));
    assert_eq!(compute_score(0, 0.0, 0.0), Ok(0));
    assert_eq!(compute_score(5_000, 7.0, 0.0), Ok(46));

    for steps in (0..=20_000).step_by(1_250) {
        for sleep in [0.0, 3.5, 6.0, 8.0, 12.0] {
            for compliance in [0.0, 12.5, 30.0, 60.0] {
                let first = compute_score(steps, sleep, compliance).expect("valid metrics");
                let second = compute_score(steps, sleep, compliance).expect("valid metrics");
                assert!(first <= 100);
                assert_eq!(first, second);
            }
        }
    }
}

#[tokio::test]
async fn a_week_of_logging_feeds_trends_and_dashboards() {
    let router = router_with_patients(&["amara", "bastian"]);

    let days = [
        ("2024-07-01", 4_000, 6.0),
        ("2024-07-02", 7_500, 7.0),
        ("2024-07-03", 11_000, 8.5),
    ];
    for (date, steps, sleep) in days {
        let (status, _) = send(
            &router,
            submit(json!({
                "patient_id": "amara",
                "date": date,
                "steps": steps,
                "sleep_hours": sleep,
                "water_intake_ml": 1800,
                "preventive_compliance_score": 24
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // A later partial update only touches water intake.
    let (status, payload) = send(
        &router,
        submit(json!({ "patient_id": "amara", "date": "2024-07-03", "water_intake_ml": 2400 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payload["created"], json!(false));
    assert_eq!(payload["entry"]["steps"], json!(11000));
    assert_eq!(payload["entry"]["water_intake_ml"], json!(2400));

    let (status, trend) = send(
        &router,
        get("/api/v1/patients/amara/wellness?today=2024-07-03"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trend["range"], json!("7d"));
    assert_eq!(trend["entries"].as_array().map(Vec::len), Some(3));
    assert_eq!(trend["averages"]["steps"], json!(7500));
    assert_eq!(trend["current_score"], json!(94));

    let (_, detail) = send(
        &router,
        get("/api/v1/providers/dr-ng/patients/amara/compliance"),
    )
    .await;
    assert_eq!(detail["compliance_status"], json!("good"));
    assert_eq!(detail["goals_overview"]["water_intake_ml"], json!(2400));

    let (status, _) = send(
        &router,
        get("/api/v1/providers/dr-ng/patients/bastian/compliance"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, dashboard) = send(
        &router,
        get("/api/v1/patients/amara/dashboard?today=2024-07-03"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["logged_today"], json!(true));
    assert_eq!(dashboard["recent_entries"].as_array().map(Vec::len), Some(3));

    let (_, roster) = send(&router, get("/api/v1/admin/patients")).await;
    assert_eq!(roster[0]["patient_id"], json!("amara"));
    assert_eq!(roster[0]["compliance_status"], json!("excellent"));
    assert_eq!(roster[1]["wellness_score"], json!(0));

    let (_, stats) = send(&router, get("/api/v1/admin/stats")).await;
    assert_eq!(stats["total_patients"], json!(2));
    assert_eq!(stats["patients_with_entries"], json!(1));
}

#[tokio::test]
async fn unregistered_patient_is_not_found() {
    let router = router_with_patients(&[]);

    let (status, payload) = send(
        &router,
        submit(json!({ "patient_id": "nobody", "steps": 100 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(payload["error"], json!("patient nobody not found"));
}

#[test]
fn roster_classification_matches_dashboard_bands() {
    assert_eq!(ComplianceStatus::for_roster(Some(80)).label(), "Excellent");
    assert_eq!(ComplianceStatus::for_detail(Some(79)).label(), "Good");
    assert_eq!(ComplianceStatus::for_detail(Some(69)).label(), "Needs Attention");
}
