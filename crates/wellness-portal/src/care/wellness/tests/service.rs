use super::common::*;
use std::sync::Arc;

use crate::care::memory::MemoryPatientRepository;
use crate::care::repository::{PatientRepository, RepositoryError};
use crate::care::validation::ValidationError;
use crate::care::wellness::domain::WellnessSubmission;
use crate::care::wellness::repository::WellnessEntryRepository;
use crate::care::wellness::{
    ComplianceStatus, TrendRange, WellnessService, WellnessServiceError,
};

#[test]
fn submit_scores_and_creates_entry() {
    let (service, entries) = build_service(&["p-1"]);

    let submitted = service
        .submit(submission("p-1", day(6, 28), 5_000, 7.0, 0.0), today())
        .expect("submission succeeds");

    assert!(submitted.created);
    assert_eq!(submitted.entry.score, 46);
    assert_eq!(submitted.breakdown.steps_score, 20.0);
    assert_eq!(submitted.breakdown.sleep_score, 26.25);
    let stored = entries
        .fetch_day(&patient_id("p-1"), day(6, 28))
        .expect("fetch")
        .expect("entry stored");
    assert_eq!(stored, submitted.entry);
}

#[test]
fn resubmitting_a_day_updates_in_place() {
    let (service, entries) = build_service(&["p-1"]);
    service
        .submit(submission("p-1", day(6, 28), 5_000, 7.0, 0.0), today())
        .expect("first submission");

    let second = service
        .submit(submission("p-1", day(6, 28), 12_000, 9.0, 30.0), today())
        .expect("second submission");

    assert!(!second.created);
    assert_eq!(second.entry.score, 100);
    assert_eq!(
        entries.recent(&patient_id("p-1"), 10).expect("recent").len(),
        1
    );
}

#[test]
fn partial_submission_keeps_recorded_metrics() {
    let (service, _) = build_service(&["p-1"]);
    service
        .submit(submission("p-1", day(6, 28), 5_000, 7.0, 0.0), today())
        .expect("first submission");

    let merged = service
        .submit(
            WellnessSubmission {
                patient_id: patient_id("p-1"),
                date: Some(day(6, 28)),
                preventive_compliance_score: Some(30.0),
                ..WellnessSubmission::default()
            },
            today(),
        )
        .expect("partial submission");

    assert_eq!(merged.entry.steps, 5_000);
    assert_eq!(merged.entry.sleep_hours, 7.0);
    assert_eq!(merged.entry.water_intake_ml, 2_000);
    assert_eq!(merged.entry.score, 76);
}

#[test]
fn missing_date_defaults_to_today_and_zero_metrics() {
    let (service, _) = build_service(&["p-1"]);

    let submitted = service
        .submit(
            WellnessSubmission {
                patient_id: patient_id("p-1"),
                ..WellnessSubmission::default()
            },
            today(),
        )
        .expect("empty day is valid");

    assert_eq!(submitted.entry.date, today());
    assert_eq!(submitted.entry.score, 0);
}

#[test]
fn negative_metrics_are_rejected_before_storage() {
    let (service, entries) = build_service(&["p-1"]);

    assert!(matches!(
        service.submit(submission("p-1", day(6, 28), -1, 7.0, 0.0), today()),
        Err(WellnessServiceError::Validation(
            ValidationError::NegativeMetric { field: "steps", .. }
        ))
    ));

    let mut thirsty = submission("p-1", day(6, 28), 1_000, 7.0, 0.0);
    thirsty.water_intake_ml = Some(-250);
    assert!(matches!(
        service.submit(thirsty, today()),
        Err(WellnessServiceError::Validation(
            ValidationError::NegativeMetric {
                field: "water_intake_ml",
                ..
            }
        ))
    ));

    assert!(matches!(
        service.submit(submission("p-1", day(6, 28), 1_000, f64::NAN, 0.0), today()),
        Err(WellnessServiceError::Validation(
            ValidationError::NonFiniteMetric { .. }
        ))
    ));
    assert!(entries
        .latest(&patient_id("p-1"))
        .expect("latest")
        .is_none());
}

#[test]
fn unknown_patient_cannot_submit() {
    let (service, _) = build_service(&[]);
    assert!(matches!(
        service.submit(submission("ghost", today(), 1_000, 7.0, 0.0), today()),
        Err(WellnessServiceError::PatientNotFound(_))
    ));
}

#[test]
fn trend_uses_requested_or_default_window() {
    let (service, _) = build_service(&["p-1"]);
    for (date, steps) in [(day(6, 1), 1_000), (day(6, 20), 3_000), (day(6, 24), 6_000), (day(6, 30), 9_000)] {
        service
            .submit(submission("p-1", date, steps, 7.0, 10.0), today())
            .expect("submission");
    }

    let week = service
        .trend(&patient_id("p-1"), None, today())
        .expect("trend");
    assert_eq!(week.range, TrendRange::Week);
    assert_eq!(week.entries.len(), 2);
    assert_eq!(week.averages.steps, 7_500);

    let month = service
        .trend(&patient_id("p-1"), Some(TrendRange::Month), today())
        .expect("trend");
    assert_eq!(month.entries.len(), 4);
    assert_eq!(month.entries[0].date, day(6, 1));
    assert_eq!(month.current_score, month.entries[3].score);
}

#[test]
fn roster_and_cohort_statistics() {
    let (service, _) = build_service(&["p-1", "p-2", "p-3"]);
    service
        .submit(submission("p-1", day(6, 29), 8_000, 7.5, 20.0), today())
        .expect("p-1");
    service
        .submit(submission("p-3", day(6, 29), 5_000, 7.0, 10.0), today())
        .expect("p-3");

    let roster = service.full_roster().expect("roster");
    let statuses: Vec<(String, ComplianceStatus, u8)> = roster
        .into_iter()
        .map(|row| (row.patient_id.0, row.compliance_status, row.wellness_score))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("p-1".to_string(), ComplianceStatus::Excellent, 80),
            ("p-2".to_string(), ComplianceStatus::NeedsAttention, 0),
            ("p-3".to_string(), ComplianceStatus::Good, 56),
        ]
    );

    let stats = service.cohort_statistics().expect("stats");
    assert_eq!(stats.total_patients, 3);
    assert_eq!(stats.patients_with_entries, 2);
    assert_eq!(stats.average_wellness_score, 68);
}

#[test]
fn compliance_detail_reflects_latest_day() {
    let (service, _) = build_service(&["p-1"]);
    service
        .submit(submission("p-1", day(6, 27), 10_000, 8.0, 30.0), today())
        .expect("good day");
    service
        .submit(submission("p-1", day(6, 28), 2_500, 6.0, 5.0), today())
        .expect("poor day");

    let detail = service.compliance(&patient_id("p-1")).expect("detail");

    assert_eq!(detail.compliance_status, ComplianceStatus::NeedsAttention);
    assert_eq!(detail.goals_overview.steps, 2_500);
    assert_eq!(detail.goals_overview.average_score, 69);
    assert_eq!(detail.recent_entries[0].date, day(6, 28));
}

#[test]
fn dashboard_without_todays_entry_lists_latest_week() {
    let (service, _) = build_service(&["p-1"]);
    for offset in 1..=9 {
        let date = today() - chrono::Duration::days(offset);
        service
            .submit(submission("p-1", date, 8_000, 7.5, 20.0), today())
            .expect("submission");
    }

    let dashboard = service
        .dashboard(&patient_id("p-1"), today())
        .expect("dashboard");

    assert!(!dashboard.logged_today);
    assert_eq!(dashboard.today_entry.steps, 0);
    assert_eq!(dashboard.today_entry.date, today());
    assert_eq!(dashboard.recent_entries.len(), 7);
    assert_eq!(dashboard.recent_entries[0].date, day(6, 29));
    assert_eq!(dashboard.recent_entries[6].date, day(6, 23));
    assert!(!dashboard.health_tip.is_empty());
}

#[test]
fn repository_outages_propagate() {
    let patients = Arc::new(MemoryPatientRepository::new());
    patients.upsert(profile("p-1")).expect("register");
    let service = WellnessService::new(Arc::new(UnavailableEntries), patients, TrendRange::Week);

    assert!(matches!(
        service.submit(submission("p-1", today(), 1_000, 7.0, 0.0), today()),
        Err(WellnessServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
    assert!(matches!(
        service.cohort_statistics(),
        Err(WellnessServiceError::Repository(_))
    ));
}
