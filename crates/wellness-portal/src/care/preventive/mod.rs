//! Preventive-care screening recommendations.
//!
//! Rules pair an eligibility condition over age and sex with a testing
//! cadence. The [`RuleEngine`] evaluates enabled rules against a patient's
//! profile and test history at an injected point in time, so evaluation is a
//! pure function of its inputs.

pub mod catalog;
pub mod domain;
pub mod evaluation;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::RuleCatalog;
pub use domain::{
    PatientId, PatientProfile, PreventiveRule, Priority, Recommendation, RuleDraft, RuleId, Sex,
    TestRecord,
};
pub use evaluation::{
    evaluate, AmbiguousRuleError, ConditionFallback, EngineConfig, FallbackResolution,
    InvalidRuleError, PreventiveEvaluation, RuleEngine,
};
pub use repository::RuleRepository;
pub use router::care_router;
pub use service::{PreventiveCareError, PreventiveCareService};
