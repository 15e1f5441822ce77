use crate::care::preventive::PreventiveCareError;
use crate::care::provider::ProviderError;
use crate::care::reminder::ReminderError;
use crate::care::validation::ValidationError;
use crate::care::wellness::WellnessServiceError;
use crate::care::RepositoryError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Json(serde_json::Error),
    Validation(ValidationError),
    Preventive(PreventiveCareError),
    Wellness(WellnessServiceError),
    Provider(ProviderError),
    Reminder(ReminderError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Json(err) => write!(f, "invalid json: {}", err),
            AppError::Validation(err) => write!(f, "validation error: {}", err),
            AppError::Preventive(err) => write!(f, "preventive care error: {}", err),
            AppError::Wellness(err) => write!(f, "wellness error: {}", err),
            AppError::Provider(err) => write!(f, "care team error: {}", err),
            AppError::Reminder(err) => write!(f, "reminder error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Validation(err) => Some(err),
            AppError::Preventive(err) => Some(err),
            AppError::Wellness(err) => Some(err),
            AppError::Provider(err) => Some(err),
            AppError::Reminder(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_)
            | AppError::Preventive(PreventiveCareError::Validation(_))
            | AppError::Wellness(WellnessServiceError::Validation(_))
            | AppError::Provider(ProviderError::Validation(_))
            | AppError::Reminder(ReminderError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Preventive(
                PreventiveCareError::PatientNotFound(_)
                | PreventiveCareError::RuleNotFound(_)
                | PreventiveCareError::Repository(RepositoryError::NotFound),
            )
            | AppError::Wellness(
                WellnessServiceError::PatientNotFound(_)
                | WellnessServiceError::Repository(RepositoryError::NotFound),
            )
            | AppError::Provider(
                ProviderError::ProviderNotFound(_)
                | ProviderError::PatientNotFound(_)
                | ProviderError::AdvisoryNotFound(_)
                | ProviderError::Repository(RepositoryError::NotFound),
            )
            | AppError::Reminder(
                ReminderError::PatientNotFound(_)
                | ReminderError::ReminderNotFound(_)
                | ReminderError::Repository(RepositoryError::NotFound),
            ) => StatusCode::NOT_FOUND,
            AppError::Provider(ProviderError::NotAssigned { .. } | ProviderError::NotOwner { .. })
            | AppError::Reminder(ReminderError::NotOwner { .. }) => StatusCode::FORBIDDEN,
            AppError::Preventive(PreventiveCareError::Repository(RepositoryError::Conflict))
            | AppError::Wellness(WellnessServiceError::Repository(RepositoryError::Conflict))
            | AppError::Provider(ProviderError::Repository(RepositoryError::Conflict))
            | AppError::Reminder(ReminderError::Repository(RepositoryError::Conflict)) => {
                StatusCode::CONFLICT
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Preventive(PreventiveCareError::Repository(_))
            | AppError::Wellness(WellnessServiceError::Repository(_))
            | AppError::Provider(ProviderError::Repository(_))
            | AppError::Reminder(ReminderError::Repository(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PreventiveCareError> for AppError {
    fn from(value: PreventiveCareError) -> Self {
        Self::Preventive(value)
    }
}

impl From<WellnessServiceError> for AppError {
    fn from(value: WellnessServiceError) -> Self {
        Self::Wellness(value)
    }
}

impl From<ProviderError> for AppError {
    fn from(value: ProviderError) -> Self {
        Self::Provider(value)
    }
}

impl From<ReminderError> for AppError {
    fn from(value: ReminderError) -> Self {
        Self::Reminder(value)
    }
}
