//! Patient-facing care workflows: preventive screening recommendations,
//! daily wellness tracking, reminders, and the provider care team.

pub mod memory;
pub mod preventive;
pub mod provider;
pub mod reminder;
pub mod repository;
pub mod validation;
pub mod wellness;

pub use repository::{PatientRepository, RepositoryError};
pub use validation::ValidationError;
