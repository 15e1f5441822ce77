use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use wellness_portal::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Accepts an RFC 3339 timestamp or a bare date, read as midnight UTC.
pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(instant.with_timezone(&Utc));
    }
    parse_date(raw)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| format!("failed to parse '{raw}' as an RFC 3339 timestamp or YYYY-MM-DD"))
}

pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_instant_accepts_dates_and_timestamps() {
        assert_eq!(
            parse_instant("2024-06-01T09:30:00+02:00")
                .expect("timestamp")
                .to_rfc3339(),
            "2024-06-01T07:30:00+00:00"
        );
        assert_eq!(
            parse_instant(" 2024-06-01 ").expect("date").to_rfc3339(),
            "2024-06-01T00:00:00+00:00"
        );
        assert!(parse_instant("June 1st").is_err());
    }

    #[test]
    fn read_json_file_reports_missing_files() {
        let result: Result<serde_json::Value, AppError> =
            read_json_file(Path::new("/nonexistent/wellness/patient.json"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
