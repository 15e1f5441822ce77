use super::preventive::domain::{PatientId, PatientProfile, TestRecord};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for patient profiles shared by the care workflows.
pub trait PatientRepository: Send + Sync {
    fn upsert(&self, profile: PatientProfile) -> Result<PatientProfile, RepositoryError>;
    fn fetch(&self, id: &PatientId) -> Result<Option<PatientProfile>, RepositoryError>;
    /// Append a completed test to the patient's history.
    fn record_test(
        &self,
        id: &PatientId,
        record: TestRecord,
    ) -> Result<PatientProfile, RepositoryError>;
    fn all(&self) -> Result<Vec<PatientProfile>, RepositoryError>;
}
