use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::care::preventive::domain::PatientId;

/// Raw metrics for one day, as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub steps: i64,
    pub sleep_hours: f64,
    /// Externally computed 0-30 contribution; clamped when scored.
    pub preventive_compliance_score: f64,
}

/// Stored wellness record; one per patient per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessEntry {
    pub patient_id: PatientId,
    pub date: NaiveDate,
    pub steps: u64,
    pub sleep_hours: f64,
    pub water_intake_ml: u64,
    pub preventive_compliance_score: f64,
    pub score: u8,
}

impl WellnessEntry {
    pub fn metrics(&self) -> DailyMetrics {
        DailyMetrics {
            steps: i64::try_from(self.steps).unwrap_or(i64::MAX),
            sleep_hours: self.sleep_hours,
            preventive_compliance_score: self.preventive_compliance_score,
        }
    }
}

/// Partial daily update. Omitted fields keep the value already recorded for
/// the day, or zero for a new day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WellnessSubmission {
    pub patient_id: PatientId,
    /// Defaults to the caller's current date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub steps: Option<i64>,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    #[serde(default)]
    pub water_intake_ml: Option<i64>,
    #[serde(default)]
    pub preventive_compliance_score: Option<f64>,
}
