use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use super::super::domain::{PatientProfile, PreventiveRule, Priority, Recommendation};
use crate::care::validation::ValidationError;

const MILLIS_PER_DAY: i64 = 86_400_000;
/// Four years of 365.25 days.
const DAYS_PER_FOUR_YEARS: i64 = 1461;

/// Whole years elapsed since birth, using the 365.25-day year approximation.
pub(crate) fn age_in_years(
    date_of_birth: NaiveDate,
    now: DateTime<Utc>,
) -> Result<u32, ValidationError> {
    let born = Utc.from_utc_datetime(&date_of_birth.and_time(NaiveTime::default()));
    let elapsed = (now - born).num_milliseconds();
    if elapsed < 0 {
        return Err(ValidationError::DateOfBirthInFuture { date_of_birth, now });
    }

    let years = elapsed.saturating_mul(4) / (DAYS_PER_FOUR_YEARS * MILLIS_PER_DAY);
    Ok(u32::try_from(years).unwrap_or(u32::MAX))
}

/// Whole days from `earlier` to `later`, floored.
pub(crate) fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later - earlier).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Builds the recommendation for a rule that already matched the patient, or
/// `None` while the last qualifying test is still within the interval.
pub(crate) fn due_recommendation(
    rule: &PreventiveRule,
    patient: &PatientProfile,
    now: DateTime<Utc>,
) -> Option<Recommendation> {
    let interval = i64::from(rule.recommended_interval_days);

    let Some(last_test) = patient.latest_test(&rule.test_type) else {
        // Never tested counts as infinitely overdue: due today, top priority.
        return Some(Recommendation {
            rule_id: rule.id.clone(),
            test_type: rule.test_type.clone(),
            recommendation_text: rule.recommendation_text.clone(),
            due_date: now,
            days_overdue: 0,
            priority: Priority::High,
            last_tested_at: None,
        });
    };

    let days_since = days_between(last_test.date, now);
    if days_since < interval {
        return None;
    }

    let priority = if days_since > interval.saturating_mul(2) {
        Priority::High
    } else {
        Priority::Medium
    };

    Some(Recommendation {
        rule_id: rule.id.clone(),
        test_type: rule.test_type.clone(),
        recommendation_text: rule.recommendation_text.clone(),
        due_date: last_test.date + Duration::days(interval),
        days_overdue: (days_since - interval).max(0) as u64,
        priority,
        last_tested_at: Some(last_test.date),
    })
}
