use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::care::preventive::domain::PatientId;
use crate::care::validation::{non_empty, ValidationError};

/// Identifier wrapper for care-team providers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProviderId(pub String);

/// Identifier wrapper for advisory notes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdvisoryId(pub String);

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AdvisoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A provider and the patients on their panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub provider_id: ProviderId,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    /// Assignment order, without duplicates.
    #[serde(default)]
    pub patients: Vec<PatientId>,
}

impl ProviderProfile {
    pub fn is_assigned(&self, patient_id: &PatientId) -> bool {
        self.patients.contains(patient_id)
    }

    /// Adds `patient_id` unless it is already on the panel.
    pub fn assign(&mut self, patient_id: PatientId) {
        if !self.is_assigned(&patient_id) {
            self.patients.push(patient_id);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryStatus {
    #[default]
    Active,
    Resolved,
}

/// Note a provider leaves for one of their patients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub id: AdvisoryId,
    pub provider_id: ProviderId,
    pub patient_id: PatientId,
    pub text: String,
    pub tags: Vec<String>,
    pub status: AdvisoryStatus,
    pub visible_to_patient: bool,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Advisory {
    /// Visible notes show until their expiry instant; notes without one never expire.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.visible_to_patient && self.expires_at.map_or(true, |expires_at| expires_at > now)
    }
}

/// Inbound payload for a new advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryDraft {
    pub patient_id: PatientId,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AdvisoryDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_empty("patient_id", &self.patient_id.0)?;
        non_empty("text", &self.text)
    }
}

/// Partial edit of an advisory; omitted fields stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryUpdate {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<AdvisoryStatus>,
    #[serde(default)]
    pub visible_to_patient: Option<bool>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AdvisoryUpdate {
    pub fn apply(self, advisory: &mut Advisory) -> Result<(), ValidationError> {
        if let Some(text) = self.text {
            non_empty("text", &text)?;
            advisory.text = text;
        }
        if let Some(tags) = self.tags {
            advisory.tags = tags;
        }
        if let Some(status) = self.status {
            advisory.status = status;
        }
        if let Some(visible) = self.visible_to_patient {
            advisory.visible_to_patient = visible;
        }
        if let Some(expires_at) = self.expires_at {
            advisory.expires_at = Some(expires_at);
        }
        Ok(())
    }
}
