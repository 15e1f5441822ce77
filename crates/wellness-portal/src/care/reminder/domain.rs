use std::fmt;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::care::preventive::domain::PatientId;
use crate::care::validation::{non_empty, ValidationError};

/// Identifier wrapper for reminders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReminderId(pub String);

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Medication,
    Water,
}

/// A recurring daily prompt for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub patient_id: PatientId,
    pub kind: ReminderKind,
    pub text: String,
    /// Times of day as `HH:MM`, in the order given.
    pub times: Vec<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Inbound payload for a new reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderDraft {
    pub kind: ReminderKind,
    pub text: String,
    #[serde(default)]
    pub times: Vec<String>,
}

impl ReminderDraft {
    /// Validates the draft and returns its times normalized to `HH:MM`.
    pub fn normalized_times(&self) -> Result<Vec<String>, ValidationError> {
        non_empty("text", &self.text)?;
        self.times
            .iter()
            .map(|raw| {
                NaiveTime::parse_from_str(raw.trim(), "%H:%M")
                    .map(|time| time.format("%H:%M").to_string())
                    .map_err(|_| ValidationError::InvalidTimeOfDay(raw.clone()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdherenceStatus {
    #[default]
    Taken,
    Missed,
}

/// One response to a reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdherenceRecord {
    pub reminder_id: ReminderId,
    pub patient_id: PatientId,
    pub timestamp: DateTime<Utc>,
    pub status: AdherenceStatus,
}

/// Active reminders with the responses logged since midnight UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderOverview {
    /// Newest first.
    pub reminders: Vec<Reminder>,
    pub today_adherence: Vec<AdherenceRecord>,
    pub taken_today: usize,
    pub missed_today: usize,
}

impl ReminderOverview {
    pub fn new(reminders: Vec<Reminder>, today_adherence: Vec<AdherenceRecord>) -> Self {
        let taken_today = today_adherence
            .iter()
            .filter(|record| record.status == AdherenceStatus::Taken)
            .count();
        let missed_today = today_adherence.len() - taken_today;
        Self {
            reminders,
            today_adherence,
            taken_today,
            missed_today,
        }
    }
}
