use chrono::NaiveDate;

use super::domain::WellnessEntry;
use crate::care::preventive::domain::PatientId;
use crate::care::repository::RepositoryError;

/// Whether an upsert created the day's entry or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Storage abstraction for daily wellness entries keyed by patient and date.
pub trait WellnessEntryRepository: Send + Sync {
    /// Replace the entry for `(entry.patient_id, entry.date)` or create it.
    fn upsert_for_day(&self, entry: WellnessEntry) -> Result<UpsertOutcome, RepositoryError>;
    fn fetch_day(
        &self,
        patient_id: &PatientId,
        date: NaiveDate,
    ) -> Result<Option<WellnessEntry>, RepositoryError>;
    /// Entries dated on or after `since`, oldest first.
    fn entries_since(
        &self,
        patient_id: &PatientId,
        since: NaiveDate,
    ) -> Result<Vec<WellnessEntry>, RepositoryError>;
    /// Up to `limit` entries, newest first.
    fn recent(
        &self,
        patient_id: &PatientId,
        limit: usize,
    ) -> Result<Vec<WellnessEntry>, RepositoryError>;

    fn latest(&self, patient_id: &PatientId) -> Result<Option<WellnessEntry>, RepositoryError> {
        Ok(self.recent(patient_id, 1)?.into_iter().next())
    }
}
