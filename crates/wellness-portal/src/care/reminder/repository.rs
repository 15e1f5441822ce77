use chrono::{DateTime, Utc};

use super::domain::{AdherenceRecord, Reminder, ReminderId};
use crate::care::preventive::domain::PatientId;
use crate::care::repository::RepositoryError;

/// Storage abstraction for reminders and their adherence log.
pub trait ReminderRepository: Send + Sync {
    fn insert(&self, reminder: Reminder) -> Result<Reminder, RepositoryError>;
    fn fetch(&self, id: &ReminderId) -> Result<Option<Reminder>, RepositoryError>;
    /// Oldest first.
    fn for_patient(&self, patient_id: &PatientId) -> Result<Vec<Reminder>, RepositoryError>;
    fn record_adherence(&self, record: AdherenceRecord)
        -> Result<AdherenceRecord, RepositoryError>;
    /// Records with `timestamp >= since`, oldest first.
    fn adherence_since(
        &self,
        patient_id: &PatientId,
        since: DateTime<Utc>,
    ) -> Result<Vec<AdherenceRecord>, RepositoryError>;
}
