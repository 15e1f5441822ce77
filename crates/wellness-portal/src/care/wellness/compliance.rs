use serde::Serialize;

use super::domain::WellnessEntry;
use super::trends::WellnessAverages;
use crate::care::preventive::domain::PatientId;

const ROSTER_ATTENTION_BELOW: u8 = 50;
const ROSTER_EXCELLENT_FROM: u8 = 80;
const DETAIL_GOOD_FROM: u8 = 70;
/// Entries feeding the detail view's average score.
pub const DETAIL_HISTORY_LIMIT: usize = 30;
/// Entries listed in the detail view.
pub const DETAIL_RECENT_LIMIT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Excellent,
    Good,
    NeedsAttention,
}

impl ComplianceStatus {
    /// Roster classification from the patient's most recent score.
    pub fn for_roster(latest_score: Option<u8>) -> Self {
        match latest_score {
            None => ComplianceStatus::NeedsAttention,
            Some(score) if score < ROSTER_ATTENTION_BELOW => ComplianceStatus::NeedsAttention,
            Some(score) if score >= ROSTER_EXCELLENT_FROM => ComplianceStatus::Excellent,
            Some(_) => ComplianceStatus::Good,
        }
    }

    /// Stricter two-level classification used on the patient detail view.
    pub fn for_detail(latest_score: Option<u8>) -> Self {
        match latest_score {
            Some(score) if score >= DETAIL_GOOD_FROM => ComplianceStatus::Good,
            _ => ComplianceStatus::NeedsAttention,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ComplianceStatus::Excellent => "Excellent",
            ComplianceStatus::Good => "Good",
            ComplianceStatus::NeedsAttention => "Needs Attention",
        }
    }
}

/// One row of a provider or admin roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub patient_id: PatientId,
    pub compliance_status: ComplianceStatus,
    /// Latest score, 0 when the patient has never logged a day.
    pub wellness_score: u8,
}

impl RosterEntry {
    pub fn new(patient_id: PatientId, latest: Option<&WellnessEntry>) -> Self {
        let latest_score = latest.map(|entry| entry.score);
        Self {
            patient_id,
            compliance_status: ComplianceStatus::for_roster(latest_score),
            wellness_score: latest_score.unwrap_or(0),
        }
    }
}

/// Snapshot of the most recent day against the patient's goals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GoalsOverview {
    pub steps: u64,
    pub sleep_hours: f64,
    pub water_intake_ml: u64,
    pub average_score: u8,
}

/// Provider-facing compliance detail for a single patient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientCompliance {
    pub patient_id: PatientId,
    pub goals_overview: GoalsOverview,
    /// Newest first.
    pub recent_entries: Vec<WellnessEntry>,
    pub compliance_status: ComplianceStatus,
}

impl PatientCompliance {
    /// `history` must be newest first; only the first
    /// [`DETAIL_HISTORY_LIMIT`] entries are considered.
    pub fn from_history(patient_id: PatientId, history: &[WellnessEntry]) -> Self {
        let history = &history[..history.len().min(DETAIL_HISTORY_LIMIT)];
        let latest = history.first();

        let goals_overview = GoalsOverview {
            steps: latest.map(|entry| entry.steps).unwrap_or(0),
            sleep_hours: latest.map(|entry| entry.sleep_hours).unwrap_or(0.0),
            water_intake_ml: latest.map(|entry| entry.water_intake_ml).unwrap_or(0),
            average_score: WellnessAverages::from_entries(history).score,
        };

        Self {
            patient_id,
            goals_overview,
            recent_entries: history.iter().take(DETAIL_RECENT_LIMIT).cloned().collect(),
            compliance_status: ComplianceStatus::for_detail(latest.map(|entry| entry.score)),
        }
    }
}

/// Cross-patient aggregate for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CohortStatistics {
    pub total_patients: usize,
    pub patients_with_entries: usize,
    /// Mean of each patient's latest score, rounded; 0 when nobody logged.
    pub average_wellness_score: u8,
}

impl CohortStatistics {
    pub fn from_latest_scores<I>(latest_scores: I) -> Self
    where
        I: IntoIterator<Item = Option<u8>>,
    {
        let mut total_patients = 0;
        let mut patients_with_entries = 0;
        let mut score_sum: u64 = 0;

        for latest in latest_scores {
            total_patients += 1;
            if let Some(score) = latest {
                patients_with_entries += 1;
                score_sum += u64::from(score);
            }
        }

        let average_wellness_score = if patients_with_entries == 0 {
            0
        } else {
            (score_sum as f64 / patients_with_entries as f64).round() as u8
        };

        Self {
            total_patients,
            patients_with_entries,
            average_wellness_score,
        }
    }
}
