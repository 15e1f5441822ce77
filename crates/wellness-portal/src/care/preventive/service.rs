use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::catalog::RuleCatalog;
use super::domain::{PatientId, PatientProfile, PreventiveRule, RuleDraft, RuleId, TestRecord};
use super::evaluation::{EngineConfig, PreventiveEvaluation, RuleEngine};
use super::repository::RuleRepository;
use crate::care::repository::{PatientRepository, RepositoryError};
use crate::care::validation::{non_empty, ValidationError};

/// Service composing the patient/rule repositories with the rule engine.
pub struct PreventiveCareService<P, R> {
    patients: Arc<P>,
    rules: Arc<R>,
    engine: RuleEngine,
}

static RULE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_rule_id() -> RuleId {
    let id = RULE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RuleId(format!("rule-{id:06}"))
}

impl<P, R> PreventiveCareService<P, R>
where
    P: PatientRepository + 'static,
    R: RuleRepository + 'static,
{
    pub fn new(patients: Arc<P>, rules: Arc<R>, config: EngineConfig) -> Self {
        Self {
            patients,
            rules,
            engine: RuleEngine::new(config),
        }
    }

    /// Insert every catalog rule that is not stored yet; returns how many were added.
    pub fn seed_catalog(&self, catalog: &RuleCatalog) -> Result<usize, PreventiveCareError> {
        let mut inserted = 0;
        for rule in catalog.rules() {
            match self.rules.insert(rule.clone()) {
                Ok(_) => inserted += 1,
                Err(RepositoryError::Conflict) => {}
                Err(other) => return Err(other.into()),
            }
        }
        info!(inserted, "seeded preventive rule catalog");
        Ok(inserted)
    }

    /// Evaluate the enabled rules against a stored patient as of `now`.
    pub fn recommendations(
        &self,
        patient_id: &PatientId,
        now: DateTime<Utc>,
    ) -> Result<PreventiveEvaluation, PreventiveCareError> {
        let patient = self
            .patients
            .fetch(patient_id)?
            .ok_or_else(|| PreventiveCareError::PatientNotFound(patient_id.clone()))?;
        let rules = self.rules.enabled()?;

        let evaluation = self.engine.assess(&patient, &rules, now)?;
        Ok(evaluation)
    }

    pub fn register_patient(
        &self,
        profile: PatientProfile,
    ) -> Result<PatientProfile, PreventiveCareError> {
        non_empty("patient_id", &profile.patient_id.0)?;
        for record in &profile.last_tests {
            non_empty("test_type", &record.test_type)?;
        }
        Ok(self.patients.upsert(profile)?)
    }

    pub fn patient(&self, patient_id: &PatientId) -> Result<PatientProfile, PreventiveCareError> {
        self.patients
            .fetch(patient_id)?
            .ok_or_else(|| PreventiveCareError::PatientNotFound(patient_id.clone()))
    }

    /// Record a completed screening so later evaluations see it.
    pub fn record_test(
        &self,
        patient_id: &PatientId,
        record: TestRecord,
    ) -> Result<PatientProfile, PreventiveCareError> {
        non_empty("test_type", &record.test_type)?;
        match self.patients.record_test(patient_id, record) {
            Ok(profile) => Ok(profile),
            Err(RepositoryError::NotFound) => {
                Err(PreventiveCareError::PatientNotFound(patient_id.clone()))
            }
            Err(other) => Err(other.into()),
        }
    }

    pub fn create_rule(&self, draft: RuleDraft) -> Result<PreventiveRule, PreventiveCareError> {
        let rule = PreventiveRule::from_draft(next_rule_id(), draft)?;
        let stored = self.rules.insert(rule)?;
        info!(rule_id = %stored.id, test_type = %stored.test_type, "created preventive rule");
        Ok(stored)
    }

    pub fn update_rule(
        &self,
        rule_id: &RuleId,
        draft: RuleDraft,
    ) -> Result<PreventiveRule, PreventiveCareError> {
        let rule = PreventiveRule::from_draft(rule_id.clone(), draft)?;
        match self.rules.update(rule) {
            Ok(stored) => Ok(stored),
            Err(RepositoryError::NotFound) => {
                Err(PreventiveCareError::RuleNotFound(rule_id.clone()))
            }
            Err(other) => Err(other.into()),
        }
    }

    pub fn enabled_rules(&self) -> Result<Vec<PreventiveRule>, PreventiveCareError> {
        Ok(self.rules.enabled()?)
    }
}

/// Error raised by the preventive-care service.
#[derive(Debug, thiserror::Error)]
pub enum PreventiveCareError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("patient {0} not found")]
    PatientNotFound(PatientId),
    #[error("rule {0} not found")]
    RuleNotFound(RuleId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
