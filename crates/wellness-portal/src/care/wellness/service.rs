use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::compliance::{CohortStatistics, PatientCompliance, RosterEntry, DETAIL_HISTORY_LIMIT};
use super::dashboard::{PatientDashboard, DASHBOARD_RECENT_LIMIT};
use super::domain::{DailyMetrics, WellnessEntry, WellnessSubmission};
use super::repository::{UpsertOutcome, WellnessEntryRepository};
use super::scoring::{score_metrics, ScoreBreakdown};
use super::trends::{TrendRange, WellnessTrend};
use crate::care::preventive::domain::PatientId;
use crate::care::repository::{PatientRepository, RepositoryError};
use crate::care::validation::ValidationError;

/// Service composing wellness storage with scoring and dashboard aggregation.
pub struct WellnessService<W, P> {
    entries: Arc<W>,
    patients: Arc<P>,
    default_range: TrendRange,
}

/// Stored entry returned from a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmittedEntry {
    pub entry: WellnessEntry,
    pub created: bool,
    pub breakdown: ScoreBreakdown,
}

impl<W, P> WellnessService<W, P>
where
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    pub fn new(entries: Arc<W>, patients: Arc<P>, default_range: TrendRange) -> Self {
        Self {
            entries,
            patients,
            default_range,
        }
    }

    pub fn default_range(&self) -> TrendRange {
        self.default_range
    }

    /// Record or update a day's metrics. `today` is used when the submission
    /// carries no date.
    pub fn submit(
        &self,
        submission: WellnessSubmission,
        today: NaiveDate,
    ) -> Result<SubmittedEntry, WellnessServiceError> {
        let patient_id = submission.patient_id.clone();
        self.ensure_patient(&patient_id)?;

        let date = submission.date.unwrap_or(today);
        let existing = self.entries.fetch_day(&patient_id, date)?;
        let merged = merge_submission(&submission, existing.as_ref());

        if merged.water_intake_ml < 0 {
            return Err(ValidationError::NegativeMetric {
                field: "water_intake_ml",
                value: merged.water_intake_ml as f64,
            }
            .into());
        }
        let breakdown = score_metrics(&merged.metrics)?;

        let entry = WellnessEntry {
            patient_id,
            date,
            steps: merged.metrics.steps as u64,
            sleep_hours: merged.metrics.sleep_hours,
            water_intake_ml: merged.water_intake_ml as u64,
            preventive_compliance_score: merged.metrics.preventive_compliance_score,
            score: breakdown.total,
        };

        let outcome = self.entries.upsert_for_day(entry.clone())?;
        debug!(
            patient_id = %entry.patient_id,
            date = %entry.date,
            score = entry.score,
            ?outcome,
            "stored wellness entry"
        );

        Ok(SubmittedEntry {
            entry,
            created: outcome == UpsertOutcome::Created,
            breakdown,
        })
    }

    /// Entries and averages for the window ending on `today`.
    pub fn trend(
        &self,
        patient_id: &PatientId,
        range: Option<TrendRange>,
        today: NaiveDate,
    ) -> Result<WellnessTrend, WellnessServiceError> {
        self.ensure_patient(patient_id)?;
        let range = range.unwrap_or(self.default_range);
        let entries = self
            .entries
            .entries_since(patient_id, range.start_date(today))?;
        Ok(WellnessTrend::build(range, today, entries))
    }

    /// Today's entry (zeroed when missing) and the latest week of logging.
    pub fn dashboard(
        &self,
        patient_id: &PatientId,
        today: NaiveDate,
    ) -> Result<PatientDashboard, WellnessServiceError> {
        self.ensure_patient(patient_id)?;
        let today_entry = self.entries.fetch_day(patient_id, today)?;
        let recent = self.entries.recent(patient_id, DASHBOARD_RECENT_LIMIT)?;
        Ok(PatientDashboard::build(
            patient_id.clone(),
            today,
            today_entry,
            recent,
        ))
    }

    pub fn compliance(
        &self,
        patient_id: &PatientId,
    ) -> Result<PatientCompliance, WellnessServiceError> {
        self.ensure_patient(patient_id)?;
        let history = self.entries.recent(patient_id, DETAIL_HISTORY_LIMIT)?;
        Ok(PatientCompliance::from_history(patient_id.clone(), &history))
    }

    /// Compliance roster for the given patients, in the order supplied.
    pub fn roster(
        &self,
        patient_ids: &[PatientId],
    ) -> Result<Vec<RosterEntry>, WellnessServiceError> {
        patient_ids
            .iter()
            .map(|patient_id| {
                let latest = self.entries.latest(patient_id)?;
                Ok(RosterEntry::new(patient_id.clone(), latest.as_ref()))
            })
            .collect()
    }

    /// Roster across every registered patient.
    pub fn full_roster(&self) -> Result<Vec<RosterEntry>, WellnessServiceError> {
        let patient_ids: Vec<PatientId> = self
            .patients
            .all()?
            .into_iter()
            .map(|profile| profile.patient_id)
            .collect();
        self.roster(&patient_ids)
    }

    pub fn cohort_statistics(&self) -> Result<CohortStatistics, WellnessServiceError> {
        let patients = self.patients.all()?;
        let latest_scores = patients
            .iter()
            .map(|profile| {
                self.entries
                    .latest(&profile.patient_id)
                    .map(|latest| latest.map(|entry| entry.score))
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;
        Ok(CohortStatistics::from_latest_scores(latest_scores))
    }

    fn ensure_patient(&self, patient_id: &PatientId) -> Result<(), WellnessServiceError> {
        match self.patients.fetch(patient_id)? {
            Some(_) => Ok(()),
            None => Err(WellnessServiceError::PatientNotFound(patient_id.clone())),
        }
    }
}

struct MergedSubmission {
    metrics: DailyMetrics,
    water_intake_ml: i64,
}

fn merge_submission(
    submission: &WellnessSubmission,
    existing: Option<&WellnessEntry>,
) -> MergedSubmission {
    let previous = existing.map(WellnessEntry::metrics);
    let previous_water = existing
        .map(|entry| i64::try_from(entry.water_intake_ml).unwrap_or(i64::MAX))
        .unwrap_or(0);

    MergedSubmission {
        metrics: DailyMetrics {
            steps: submission
                .steps
                .or(previous.map(|metrics| metrics.steps))
                .unwrap_or(0),
            sleep_hours: submission
                .sleep_hours
                .or(previous.map(|metrics| metrics.sleep_hours))
                .unwrap_or(0.0),
            preventive_compliance_score: submission
                .preventive_compliance_score
                .or(previous.map(|metrics| metrics.preventive_compliance_score))
                .unwrap_or(0.0),
        },
        water_intake_ml: submission.water_intake_ml.unwrap_or(previous_water),
    }
}

/// Error raised by the wellness service.
#[derive(Debug, thiserror::Error)]
pub enum WellnessServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("patient {0} not found")]
    PatientNotFound(PatientId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
