use chrono::{DateTime, NaiveDate, Utc};

/// Input rejected before any scoring or rule evaluation takes place.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be negative (found {value})")]
    NegativeMetric { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NonFiniteMetric { field: &'static str },
    #[error("date of birth {date_of_birth} is after the evaluation time {now}")]
    DateOfBirthInFuture {
        date_of_birth: NaiveDate,
        now: DateTime<Utc>,
    },
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("recommended interval must be at least one day (found {0})")]
    NonPositiveInterval(i64),
    #[error("reminder time '{0}' is not of the form HH:MM")]
    InvalidTimeOfDay(String),
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteMetric { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeMetric { field, value });
    }
    Ok(value)
}

pub(crate) fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField { field })
    } else {
        Ok(())
    }
}
