use super::domain::{PreventiveRule, RuleId};
use crate::care::repository::RepositoryError;

/// Storage abstraction for preventive rules.
pub trait RuleRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the id is taken.
    fn insert(&self, rule: PreventiveRule) -> Result<PreventiveRule, RepositoryError>;
    /// Fails with [`RepositoryError::NotFound`] for unknown ids.
    fn update(&self, rule: PreventiveRule) -> Result<PreventiveRule, RepositoryError>;
    fn fetch(&self, id: &RuleId) -> Result<Option<PreventiveRule>, RepositoryError>;
    /// Enabled rules in insertion order.
    fn enabled(&self) -> Result<Vec<PreventiveRule>, RepositoryError>;
    /// Every stored rule, disabled ones included.
    fn all(&self) -> Result<Vec<PreventiveRule>, RepositoryError>;
}
