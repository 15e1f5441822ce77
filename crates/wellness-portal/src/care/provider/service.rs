use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{
    Advisory, AdvisoryDraft, AdvisoryId, AdvisoryStatus, AdvisoryUpdate, ProviderId,
    ProviderProfile,
};
use super::repository::{AdvisoryRepository, ProviderRepository};
use crate::care::preventive::domain::PatientId;
use crate::care::repository::{PatientRepository, RepositoryError};
use crate::care::validation::{non_empty, ValidationError};
use crate::care::wellness::{
    PatientCompliance, RosterEntry, WellnessEntryRepository, WellnessService,
    WellnessServiceError,
};

/// Provider panels and the compliance views scoped to them.
pub struct ProviderService<D, W, P> {
    providers: Arc<D>,
    patients: Arc<P>,
    wellness: Arc<WellnessService<W, P>>,
}

impl<D, W, P> ProviderService<D, W, P>
where
    D: ProviderRepository + 'static,
    W: WellnessEntryRepository + 'static,
    P: PatientRepository + 'static,
{
    pub fn new(providers: Arc<D>, patients: Arc<P>, wellness: Arc<WellnessService<W, P>>) -> Self {
        Self {
            providers,
            patients,
            wellness,
        }
    }

    /// Create or replace a provider; every listed patient must be registered.
    pub fn register_provider(
        &self,
        mut profile: ProviderProfile,
    ) -> Result<ProviderProfile, ProviderError> {
        non_empty("provider_id", &profile.provider_id.0)?;
        let listed = std::mem::take(&mut profile.patients);
        for patient_id in listed {
            ensure_patient(self.patients.as_ref(), &patient_id)?;
            profile.assign(patient_id);
        }

        let stored = self.providers.upsert(profile)?;
        info!(
            provider_id = %stored.provider_id,
            patients = stored.patients.len(),
            "registered provider"
        );
        Ok(stored)
    }

    pub fn provider(&self, provider_id: &ProviderId) -> Result<ProviderProfile, ProviderError> {
        fetch_provider(self.providers.as_ref(), provider_id)
    }

    pub fn assign_patient(
        &self,
        provider_id: &ProviderId,
        patient_id: PatientId,
    ) -> Result<ProviderProfile, ProviderError> {
        ensure_patient(self.patients.as_ref(), &patient_id)?;
        match self.providers.assign(provider_id, patient_id.clone()) {
            Ok(profile) => {
                info!(%provider_id, %patient_id, "assigned patient to provider");
                Ok(profile)
            }
            Err(RepositoryError::NotFound) => {
                Err(ProviderError::ProviderNotFound(provider_id.clone()))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Compliance roster for the provider's panel, in assignment order.
    pub fn assigned_roster(
        &self,
        provider_id: &ProviderId,
    ) -> Result<Vec<RosterEntry>, ProviderError> {
        let provider = self.provider(provider_id)?;
        Ok(self.wellness.roster(&provider.patients)?)
    }

    /// Compliance detail, only for patients on the provider's panel.
    pub fn patient_compliance(
        &self,
        provider_id: &ProviderId,
        patient_id: &PatientId,
    ) -> Result<PatientCompliance, ProviderError> {
        let provider = self.provider(provider_id)?;
        ensure_patient(self.patients.as_ref(), patient_id)?;
        if !provider.is_assigned(patient_id) {
            return Err(ProviderError::NotAssigned {
                provider_id: provider_id.clone(),
                patient_id: patient_id.clone(),
            });
        }
        Ok(self.wellness.compliance(patient_id)?)
    }
}

/// Advisory notes exchanged between providers and their patients.
pub struct AdvisoryService<A, D, P> {
    advisories: Arc<A>,
    providers: Arc<D>,
    patients: Arc<P>,
}

static ADVISORY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_advisory_id() -> AdvisoryId {
    let id = ADVISORY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AdvisoryId(format!("advisory-{id:06}"))
}

impl<A, D, P> AdvisoryService<A, D, P>
where
    A: AdvisoryRepository + 'static,
    D: ProviderRepository + 'static,
    P: PatientRepository + 'static,
{
    pub fn new(advisories: Arc<A>, providers: Arc<D>, patients: Arc<P>) -> Self {
        Self {
            advisories,
            providers,
            patients,
        }
    }

    /// Leave a note for a patient on the provider's panel.
    pub fn create(
        &self,
        provider_id: &ProviderId,
        draft: AdvisoryDraft,
        now: DateTime<Utc>,
    ) -> Result<Advisory, ProviderError> {
        draft.validate()?;
        let provider = fetch_provider(self.providers.as_ref(), provider_id)?;
        ensure_patient(self.patients.as_ref(), &draft.patient_id)?;
        if !provider.is_assigned(&draft.patient_id) {
            return Err(ProviderError::NotAssigned {
                provider_id: provider_id.clone(),
                patient_id: draft.patient_id,
            });
        }

        let advisory = Advisory {
            id: next_advisory_id(),
            provider_id: provider_id.clone(),
            patient_id: draft.patient_id,
            text: draft.text,
            tags: draft.tags,
            status: AdvisoryStatus::Active,
            visible_to_patient: true,
            acknowledged_at: None,
            expires_at: draft.expires_at,
            created_at: now,
        };
        let stored = self.advisories.insert(advisory)?;
        info!(
            advisory_id = %stored.id,
            %provider_id,
            patient_id = %stored.patient_id,
            "created advisory"
        );
        Ok(stored)
    }

    /// Notes the patient can currently see, newest first.
    pub fn for_patient(
        &self,
        patient_id: &PatientId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Advisory>, ProviderError> {
        ensure_patient(self.patients.as_ref(), patient_id)?;
        let mut visible: Vec<Advisory> = self
            .advisories
            .for_patient(patient_id)?
            .into_iter()
            .filter(|advisory| advisory.is_visible_at(now))
            .collect();
        visible.reverse();
        visible.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(visible)
    }

    /// Edit a note; only its author may change it.
    pub fn update(
        &self,
        provider_id: &ProviderId,
        advisory_id: &AdvisoryId,
        update: AdvisoryUpdate,
    ) -> Result<Advisory, ProviderError> {
        let mut advisory = self.fetch(advisory_id)?;
        if &advisory.provider_id != provider_id {
            return Err(ProviderError::NotOwner {
                advisory_id: advisory_id.clone(),
                caller: provider_id.0.clone(),
            });
        }
        update.apply(&mut advisory)?;
        self.store(advisory)
    }

    /// Mark a note as read by the patient it was written for.
    pub fn acknowledge(
        &self,
        patient_id: &PatientId,
        advisory_id: &AdvisoryId,
        now: DateTime<Utc>,
    ) -> Result<Advisory, ProviderError> {
        let mut advisory = self.fetch(advisory_id)?;
        if &advisory.patient_id != patient_id {
            return Err(ProviderError::NotOwner {
                advisory_id: advisory_id.clone(),
                caller: patient_id.0.clone(),
            });
        }
        advisory.acknowledged_at = Some(now);
        self.store(advisory)
    }

    fn fetch(&self, advisory_id: &AdvisoryId) -> Result<Advisory, ProviderError> {
        self.advisories
            .fetch(advisory_id)?
            .ok_or_else(|| ProviderError::AdvisoryNotFound(advisory_id.clone()))
    }

    fn store(&self, advisory: Advisory) -> Result<Advisory, ProviderError> {
        let advisory_id = advisory.id.clone();
        match self.advisories.update(advisory) {
            Ok(stored) => Ok(stored),
            Err(RepositoryError::NotFound) => Err(ProviderError::AdvisoryNotFound(advisory_id)),
            Err(other) => Err(other.into()),
        }
    }
}

fn fetch_provider<D: ProviderRepository>(
    providers: &D,
    provider_id: &ProviderId,
) -> Result<ProviderProfile, ProviderError> {
    providers
        .fetch(provider_id)?
        .ok_or_else(|| ProviderError::ProviderNotFound(provider_id.clone()))
}

fn ensure_patient<P: PatientRepository>(
    patients: &P,
    patient_id: &PatientId,
) -> Result<(), ProviderError> {
    match patients.fetch(patient_id)? {
        Some(_) => Ok(()),
        None => Err(ProviderError::PatientNotFound(patient_id.clone())),
    }
}

/// Error raised by the provider and advisory services.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("provider {0} not found")]
    ProviderNotFound(ProviderId),
    #[error("patient {0} not found")]
    PatientNotFound(PatientId),
    #[error("advisory {0} not found")]
    AdvisoryNotFound(AdvisoryId),
    #[error("patient {patient_id} is not assigned to provider {provider_id}")]
    NotAssigned {
        provider_id: ProviderId,
        patient_id: PatientId,
    },
    #[error("advisory {advisory_id} does not belong to {caller}")]
    NotOwner {
        advisory_id: AdvisoryId,
        caller: String,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<WellnessServiceError> for ProviderError {
    fn from(value: WellnessServiceError) -> Self {
        match value {
            WellnessServiceError::Validation(err) => Self::Validation(err),
            WellnessServiceError::PatientNotFound(patient_id) => Self::PatientNotFound(patient_id),
            WellnessServiceError::Repository(err) => Self::Repository(err),
        }
    }
}
