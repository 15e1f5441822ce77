use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::domain::WellnessEntry;
use crate::care::preventive::domain::PatientId;

/// Entries listed on the patient dashboard.
pub const DASHBOARD_RECENT_LIMIT: usize = 7;

const HEALTH_TIPS: [&str; 7] = [
    "Stay hydrated! Aim for 8 glasses of water per day.",
    "Get at least 7-8 hours of sleep for optimal health.",
    "Take a 10-minute walk every hour if you sit for long periods.",
    "Remember to take your medications as prescribed.",
    "Practice deep breathing exercises to reduce stress.",
    "Eat a balanced diet with plenty of fruits and vegetables.",
    "Schedule regular preventive checkups with your healthcare provider.",
];

/// Tip of the day, rotating by day of the year.
pub fn health_tip(today: NaiveDate) -> &'static str {
    HEALTH_TIPS[today.ordinal() as usize % HEALTH_TIPS.len()]
}

/// Patient landing view: today's metrics and the most recent week of entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientDashboard {
    pub patient_id: PatientId,
    /// All zero when nothing was logged today.
    pub today_entry: WellnessEntry,
    pub logged_today: bool,
    /// Newest first.
    pub recent_entries: Vec<WellnessEntry>,
    pub health_tip: &'static str,
}

impl PatientDashboard {
    pub fn build(
        patient_id: PatientId,
        today: NaiveDate,
        today_entry: Option<WellnessEntry>,
        mut recent_entries: Vec<WellnessEntry>,
    ) -> Self {
        recent_entries.truncate(DASHBOARD_RECENT_LIMIT);
        let logged_today = today_entry.is_some();
        let today_entry = today_entry.unwrap_or_else(|| WellnessEntry {
            patient_id: patient_id.clone(),
            date: today,
            steps: 0,
            sleep_hours: 0.0,
            water_intake_ml: 0,
            preventive_compliance_score: 0.0,
            score: 0,
        });

        Self {
            patient_id,
            today_entry,
            logged_today,
            recent_entries,
            health_tip: health_tip(today),
        }
    }
}
