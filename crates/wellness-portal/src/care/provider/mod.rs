//! Care-team workflows: provider patient panels, the compliance views scoped
//! to them, and advisory notes left for assigned patients.
//!
//! A provider only sees compliance detail for patients on their panel and
//! only writes advisories for them. Advisories are edited by their author and
//! acknowledged by the patient they address.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Advisory, AdvisoryDraft, AdvisoryId, AdvisoryStatus, AdvisoryUpdate, ProviderId,
    ProviderProfile,
};
pub use repository::{AdvisoryRepository, ProviderRepository};
pub use router::provider_router;
pub use service::{AdvisoryService, ProviderError, ProviderService};
