use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::WellnessEntry;

/// Look-back window for wellness trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrendRange {
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl TrendRange {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "7d" => Some(TrendRange::Week),
            "30d" => Some(TrendRange::Month),
            "90d" => Some(TrendRange::Quarter),
            _ => None,
        }
    }

    /// Unknown labels fall back to `default`.
    pub fn parse_or(raw: Option<&str>, default: TrendRange) -> Self {
        raw.and_then(Self::parse).unwrap_or(default)
    }

    pub const fn days(self) -> i64 {
        match self {
            TrendRange::Week => 7,
            TrendRange::Month => 30,
            TrendRange::Quarter => 90,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TrendRange::Week => "7d",
            TrendRange::Month => "30d",
            TrendRange::Quarter => "90d",
        }
    }

    /// First day included in the window ending on `today`. Both ends are
    /// inclusive, so `7d` spans today plus the seven calendar days before it:
    /// an entry logged on any part of day `today - 7` falls inside a
    /// `now - 7 days` cutoff taken at the end of `today`.
    pub fn start_date(self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(self.days())
    }
}

/// Rounded means over a set of entries; all zero for an empty set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WellnessAverages {
    pub steps: u64,
    /// One decimal place.
    pub sleep_hours: f64,
    pub score: u8,
}

impl WellnessAverages {
    pub fn from_entries(entries: &[WellnessEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let count = entries.len() as f64;
        let steps: f64 = entries.iter().map(|entry| entry.steps as f64).sum();
        let sleep: f64 = entries.iter().map(|entry| entry.sleep_hours).sum();
        let score: f64 = entries.iter().map(|entry| f64::from(entry.score)).sum();

        Self {
            steps: (steps / count).round() as u64,
            sleep_hours: ((sleep / count) * 10.0).round() / 10.0,
            score: (score / count).round() as u8,
        }
    }
}

/// Entries in a window plus their averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellnessTrend {
    pub range: TrendRange,
    pub start_date: NaiveDate,
    /// Oldest first.
    pub entries: Vec<WellnessEntry>,
    pub averages: WellnessAverages,
    /// Score of the most recent entry in the window, 0 when empty.
    pub current_score: u8,
}

impl WellnessTrend {
    pub fn build(range: TrendRange, today: NaiveDate, mut entries: Vec<WellnessEntry>) -> Self {
        let start_date = range.start_date(today);
        entries.retain(|entry| entry.date >= start_date);
        entries.sort_by_key(|entry| entry.date);

        let averages = WellnessAverages::from_entries(&entries);
        let current_score = entries.last().map(|entry| entry.score).unwrap_or(0);

        Self {
            range,
            start_date,
            entries,
            averages,
            current_score,
        }
    }
}
