mod condition;
mod config;
mod schedule;

pub use condition::{
    parse_condition, Comparison, Condition, ConditionParseError, ParsedCondition,
};
pub use config::{ConditionFallback, EngineConfig};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{PatientId, PatientProfile, PreventiveRule, Recommendation, RuleId};
use crate::care::validation::ValidationError;
use schedule::{age_in_years, due_recommendation};

/// Stateless evaluator that applies preventive rules to a patient snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine {
    config: EngineConfig,
}

impl RuleEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Screenings currently due for `patient`, in rule order.
    pub fn evaluate(
        &self,
        patient: &PatientProfile,
        rules: &[PreventiveRule],
        now: DateTime<Utc>,
    ) -> Result<Vec<Recommendation>, ValidationError> {
        self.assess(patient, rules, now)
            .map(|evaluation| evaluation.recommendations)
    }

    /// Like [`RuleEngine::evaluate`], but also reports the rules whose
    /// conditions could not be fully understood.
    pub fn assess(
        &self,
        patient: &PatientProfile,
        rules: &[PreventiveRule],
        now: DateTime<Utc>,
    ) -> Result<PreventiveEvaluation, ValidationError> {
        let age = age_in_years(patient.date_of_birth, now)?;
        let mut recommendations = Vec::new();
        let mut ambiguous_rules = Vec::new();
        let mut invalid_rules = Vec::new();

        for rule in rules.iter().filter(|rule| rule.enabled) {
            if let Err(reason) = rule.validate() {
                warn!(rule_id = %rule.id, %reason, "skipping invalid preventive rule");
                invalid_rules.push(InvalidRuleError {
                    rule_id: rule.id.clone(),
                    reason: reason.to_string(),
                });
                continue;
            }

            let parsed = parse_condition(&rule.condition_expression);

            if parsed.is_ambiguous() {
                let resolution = match self.config.condition_fallback {
                    ConditionFallback::MatchRecognized => {
                        FallbackResolution::AppliedRecognizedClauses
                    }
                    ConditionFallback::SkipRule => FallbackResolution::Skipped,
                };
                // Permissive fallback: unreadable clauses impose no constraint, so a
                // fully unreadable expression recommends the screening to every
                // patient. This is a correctness risk and is always reported.
                warn!(
                    rule_id = %rule.id,
                    expression = %rule.condition_expression,
                    ?resolution,
                    "preventive rule condition could not be fully parsed"
                );
                ambiguous_rules.push(AmbiguousRuleError {
                    rule_id: rule.id.clone(),
                    expression: rule.condition_expression.clone(),
                    reasons: parsed.rejected.iter().map(ToString::to_string).collect(),
                    resolution,
                });

                if resolution == FallbackResolution::Skipped {
                    continue;
                }
            }

            if !parsed.condition.matches(age, patient.sex) {
                continue;
            }

            if let Some(recommendation) = due_recommendation(rule, patient, now) {
                recommendations.push(recommendation);
            }
        }

        debug!(
            patient_id = %patient.patient_id,
            age,
            due = recommendations.len(),
            "evaluated preventive rules"
        );

        Ok(PreventiveEvaluation {
            patient_id: patient.patient_id.clone(),
            age,
            evaluated_at: now,
            recommendations,
            ambiguous_rules,
            invalid_rules,
        })
    }
}

/// Evaluate `rules` with the default (legacy-compatible) engine settings.
pub fn evaluate(
    patient: &PatientProfile,
    rules: &[PreventiveRule],
    now: DateTime<Utc>,
) -> Result<Vec<Recommendation>, ValidationError> {
    RuleEngine::default().evaluate(patient, rules, now)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackResolution {
    AppliedRecognizedClauses,
    Skipped,
}

/// A rule whose condition expression contained clauses the parser rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("rule {rule_id} has an ambiguous condition '{expression}'")]
pub struct AmbiguousRuleError {
    pub rule_id: RuleId,
    pub expression: String,
    pub reasons: Vec<String>,
    pub resolution: FallbackResolution,
}

/// A rule left out of evaluation because it breaks a rule invariant, such as
/// a zero-day interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("rule {rule_id} is invalid: {reason}")]
pub struct InvalidRuleError {
    pub rule_id: RuleId,
    pub reason: String,
}

/// Evaluation output for one patient at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreventiveEvaluation {
    pub patient_id: PatientId,
    pub age: u32,
    pub evaluated_at: DateTime<Utc>,
    pub recommendations: Vec<Recommendation>,
    pub ambiguous_rules: Vec<AmbiguousRuleError>,
    pub invalid_rules: Vec<InvalidRuleError>,
}
