use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use tracing::{debug, info};

use super::domain::{
    AdherenceRecord, AdherenceStatus, Reminder, ReminderDraft, ReminderId, ReminderOverview,
};
use super::repository::ReminderRepository;
use crate::care::preventive::domain::PatientId;
use crate::care::repository::{PatientRepository, RepositoryError};
use crate::care::validation::ValidationError;

/// Medication and hydration reminders with adherence tracking.
pub struct ReminderService<M, P> {
    reminders: Arc<M>,
    patients: Arc<P>,
}

static REMINDER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_reminder_id() -> ReminderId {
    let id = REMINDER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReminderId(format!("reminder-{id:06}"))
}

impl<M, P> ReminderService<M, P>
where
    M: ReminderRepository + 'static,
    P: PatientRepository + 'static,
{
    pub fn new(reminders: Arc<M>, patients: Arc<P>) -> Self {
        Self {
            reminders,
            patients,
        }
    }

    pub fn create(
        &self,
        patient_id: &PatientId,
        draft: ReminderDraft,
        now: DateTime<Utc>,
    ) -> Result<Reminder, ReminderError> {
        self.ensure_patient(patient_id)?;
        let times = draft.normalized_times()?;

        let reminder = Reminder {
            id: next_reminder_id(),
            patient_id: patient_id.clone(),
            kind: draft.kind,
            text: draft.text,
            times,
            enabled: true,
            created_at: now,
        };
        let stored = self.reminders.insert(reminder)?;
        info!(reminder_id = %stored.id, %patient_id, kind = ?stored.kind, "created reminder");
        Ok(stored)
    }

    /// Enabled reminders plus the adherence logged since midnight UTC of `now`.
    pub fn overview(
        &self,
        patient_id: &PatientId,
        now: DateTime<Utc>,
    ) -> Result<ReminderOverview, ReminderError> {
        self.ensure_patient(patient_id)?;
        let reminders: Vec<Reminder> = self
            .reminders
            .for_patient(patient_id)?
            .into_iter()
            .rev()
            .filter(|reminder| reminder.enabled)
            .collect();
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let today = self.reminders.adherence_since(patient_id, midnight)?;
        Ok(ReminderOverview::new(reminders, today))
    }

    /// Log a response; only the reminder's own patient may record one.
    pub fn mark(
        &self,
        patient_id: &PatientId,
        reminder_id: &ReminderId,
        status: AdherenceStatus,
        now: DateTime<Utc>,
    ) -> Result<AdherenceRecord, ReminderError> {
        let reminder = self
            .reminders
            .fetch(reminder_id)?
            .ok_or_else(|| ReminderError::ReminderNotFound(reminder_id.clone()))?;
        if &reminder.patient_id != patient_id {
            return Err(ReminderError::NotOwner {
                reminder_id: reminder_id.clone(),
                patient_id: patient_id.clone(),
            });
        }

        let record = self.reminders.record_adherence(AdherenceRecord {
            reminder_id: reminder.id,
            patient_id: reminder.patient_id,
            timestamp: now,
            status,
        })?;
        debug!(%reminder_id, ?status, "recorded reminder adherence");
        Ok(record)
    }

    fn ensure_patient(&self, patient_id: &PatientId) -> Result<(), ReminderError> {
        match self.patients.fetch(patient_id)? {
            Some(_) => Ok(()),
            None => Err(ReminderError::PatientNotFound(patient_id.clone())),
        }
    }
}

/// Error raised by the reminder service.
#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("patient {0} not found")]
    PatientNotFound(PatientId),
    #[error("reminder {0} not found")]
    ReminderNotFound(ReminderId),
    #[error("reminder {reminder_id} does not belong to patient {patient_id}")]
    NotOwner {
        reminder_id: ReminderId,
        patient_id: PatientId,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
