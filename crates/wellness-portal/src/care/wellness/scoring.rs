//! Composite 0-100 wellness score.
//!
//! Steps contribute up to 40 points (10,000 steps), sleep up to 30 points
//! (8 hours) and the externally computed preventive-compliance sub-score up to
//! 30 points. Scoring is a pure function of the metrics so resubmitting a day
//! always reproduces the same score.

use serde::Serialize;

use super::domain::DailyMetrics;
use crate::care::validation::{non_negative, ValidationError};

pub const STEP_GOAL: f64 = 10_000.0;
pub const SLEEP_GOAL_HOURS: f64 = 8.0;
pub const STEPS_WEIGHT: f64 = 40.0;
pub const SLEEP_WEIGHT: f64 = 30.0;
pub const COMPLIANCE_WEIGHT: f64 = 30.0;
pub const MAX_SCORE: u8 = 100;

/// Per-metric contributions, kept for audit views.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub steps_score: f64,
    pub sleep_score: f64,
    pub compliance_score: f64,
    pub total: u8,
}

pub fn score_metrics(metrics: &DailyMetrics) -> Result<ScoreBreakdown, ValidationError> {
    if metrics.steps < 0 {
        return Err(ValidationError::NegativeMetric {
            field: "steps",
            value: metrics.steps as f64,
        });
    }
    let steps = metrics.steps as f64;
    let sleep_hours = non_negative("sleep_hours", metrics.sleep_hours)?;
    let compliance = non_negative(
        "preventive_compliance_score",
        metrics.preventive_compliance_score,
    )?;

    let steps_score = (steps / STEP_GOAL * STEPS_WEIGHT).min(STEPS_WEIGHT);
    let sleep_score = (sleep_hours / SLEEP_GOAL_HOURS * SLEEP_WEIGHT).min(SLEEP_WEIGHT);
    let compliance_score = compliance.clamp(0.0, COMPLIANCE_WEIGHT);

    let total = (steps_score + sleep_score + compliance_score)
        .round()
        .clamp(0.0, f64::from(MAX_SCORE)) as u8;

    Ok(ScoreBreakdown {
        steps_score,
        sleep_score,
        compliance_score,
        total,
    })
}

/// Score a day's metrics; see the module docs for the weighting.
pub fn compute_score(
    steps: i64,
    sleep_hours: f64,
    preventive_compliance_score: f64,
) -> Result<u8, ValidationError> {
    score_metrics(&DailyMetrics {
        steps,
        sleep_hours,
        preventive_compliance_score,
    })
    .map(|breakdown| breakdown.total)
}
