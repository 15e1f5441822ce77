use super::domain::{Advisory, AdvisoryId, ProviderId, ProviderProfile};
use crate::care::preventive::domain::PatientId;
use crate::care::repository::RepositoryError;

/// Storage abstraction for providers and their patient panels.
pub trait ProviderRepository: Send + Sync {
    fn upsert(&self, profile: ProviderProfile) -> Result<ProviderProfile, RepositoryError>;
    fn fetch(&self, id: &ProviderId) -> Result<Option<ProviderProfile>, RepositoryError>;
    /// Fails with [`RepositoryError::NotFound`] for unknown providers.
    fn assign(
        &self,
        id: &ProviderId,
        patient_id: PatientId,
    ) -> Result<ProviderProfile, RepositoryError>;
}

/// Storage abstraction for advisory notes.
pub trait AdvisoryRepository: Send + Sync {
    fn insert(&self, advisory: Advisory) -> Result<Advisory, RepositoryError>;
    /// Fails with [`RepositoryError::NotFound`] for unknown ids.
    fn update(&self, advisory: Advisory) -> Result<Advisory, RepositoryError>;
    fn fetch(&self, id: &AdvisoryId) -> Result<Option<Advisory>, RepositoryError>;
    /// Every note written for the patient, oldest first.
    fn for_patient(&self, patient_id: &PatientId) -> Result<Vec<Advisory>, RepositoryError>;
}
