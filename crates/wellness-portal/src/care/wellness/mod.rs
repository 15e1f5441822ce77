//! Daily wellness logging, scoring, the patient dashboard, and compliance
//! views.

pub mod compliance;
pub mod dashboard;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod trends;

#[cfg(test)]
mod tests;

pub use compliance::{
    CohortStatistics, ComplianceStatus, GoalsOverview, PatientCompliance, RosterEntry,
};
pub use dashboard::{health_tip, PatientDashboard};
pub use domain::{DailyMetrics, WellnessEntry, WellnessSubmission};
pub use repository::{UpsertOutcome, WellnessEntryRepository};
pub use router::wellness_router;
pub use scoring::{compute_score, score_metrics, ScoreBreakdown};
pub use service::{SubmittedEntry, WellnessService, WellnessServiceError};
pub use trends::{TrendRange, WellnessAverages, WellnessTrend};
