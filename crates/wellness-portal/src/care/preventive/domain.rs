use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::care::validation::{non_empty, ValidationError};

/// Identifier wrapper for preventive-care rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(pub String);

/// Identifier wrapper for patients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientId(pub String);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sex as recorded on the patient profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub const fn label(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            "other" => Ok(Sex::Other),
            other => Err(format!("unknown sex '{other}'")),
        }
    }
}

/// A completed screening or test on the patient's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub test_type: String,
    pub date: DateTime<Utc>,
}

/// Subset of the patient record the recommendation engine consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub patient_id: PatientId,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
    /// Unordered; may hold several entries for the same test type.
    #[serde(default)]
    pub last_tests: Vec<TestRecord>,
}

impl PatientProfile {
    /// Most recent record for `test_type`, if the patient ever had one.
    pub fn latest_test(&self, test_type: &str) -> Option<&TestRecord> {
        self.last_tests
            .iter()
            .filter(|record| record.test_type == test_type)
            .max_by_key(|record| record.date)
    }
}

/// Declarative eligibility + cadence pairing for a screening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreventiveRule {
    pub id: RuleId,
    pub name: String,
    /// e.g. `age >= 50 AND sex === "male"`
    pub condition_expression: String,
    pub recommendation_text: String,
    pub recommended_interval_days: u32,
    pub test_type: String,
    pub enabled: bool,
}

impl PreventiveRule {
    /// Checks a stored or deserialized rule against the same constraints a
    /// draft must satisfy.
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_empty("name", &self.name)?;
        non_empty("recommendation_text", &self.recommendation_text)?;
        non_empty("test_type", &self.test_type)?;
        if self.recommended_interval_days == 0 {
            return Err(ValidationError::NonPositiveInterval(0));
        }
        Ok(())
    }

    pub fn from_draft(id: RuleId, draft: RuleDraft) -> Result<Self, ValidationError> {
        draft.validate()?;
        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            condition_expression: draft.condition_expression,
            recommendation_text: draft.recommendation_text,
            recommended_interval_days: draft.recommended_interval_days as u32,
            test_type: draft.test_type.trim().to_string(),
            enabled: draft.enabled,
        })
    }
}

/// Inbound payload for creating or replacing a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDraft {
    pub name: String,
    pub condition_expression: String,
    pub recommendation_text: String,
    pub recommended_interval_days: i64,
    pub test_type: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl RuleDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_empty("name", &self.name)?;
        non_empty("recommendation_text", &self.recommendation_text)?;
        non_empty("test_type", &self.test_type)?;
        if self.recommended_interval_days <= 0
            || self.recommended_interval_days > i64::from(u32::MAX)
        {
            return Err(ValidationError::NonPositiveInterval(
                self.recommended_interval_days,
            ));
        }
        Ok(())
    }
}

impl From<&PreventiveRule> for RuleDraft {
    fn from(rule: &PreventiveRule) -> Self {
        Self {
            name: rule.name.clone(),
            condition_expression: rule.condition_expression.clone(),
            recommendation_text: rule.recommendation_text.clone(),
            recommended_interval_days: i64::from(rule.recommended_interval_days),
            test_type: rule.test_type.clone(),
            enabled: rule.enabled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Medium,
    High,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// A screening that is currently due for the patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub rule_id: RuleId,
    pub test_type: String,
    pub recommendation_text: String,
    pub due_date: DateTime<Utc>,
    pub days_overdue: u64,
    pub priority: Priority,
    /// `None` when the patient has never had this test.
    pub last_tested_at: Option<DateTime<Utc>>,
}
