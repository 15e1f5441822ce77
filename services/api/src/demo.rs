use crate::infra::{parse_date, parse_instant, read_json_file};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use wellness_portal::care::memory::{
    MemoryPatientRepository, MemoryRuleRepository, MemoryWellnessRepository,
};
use wellness_portal::care::preventive::{
    EngineConfig, PatientId, PatientProfile, PreventiveCareService, PreventiveEvaluation,
    PreventiveRule, RuleCatalog, RuleEngine, Sex, TestRecord,
};
use wellness_portal::care::wellness::{
    score_metrics, DailyMetrics, TrendRange, WellnessService, WellnessSubmission,
};
use wellness_portal::config::AppConfig;
use wellness_portal::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Patient profile JSON (patient_id, date_of_birth, sex, last_tests)
    #[arg(long)]
    pub(crate) patient: PathBuf,
    /// JSON array of rules; the standard screening catalog is used when omitted
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Evaluation time as RFC 3339 or YYYY-MM-DD (defaults to now)
    #[arg(long, alias = "as-of", value_parser = parse_instant)]
    pub(crate) today: Option<DateTime<Utc>>,
    /// Skip rules whose condition cannot be fully parsed
    #[arg(long)]
    pub(crate) strict: bool,
    /// Print the evaluation as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Steps walked
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) steps: i64,
    /// Hours slept
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) sleep_hours: f64,
    /// Preventive compliance sub-score (0-30)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub(crate) compliance: f64,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reporting date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip rules whose condition cannot be fully parsed
    #[arg(long)]
    pub(crate) strict: bool,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        patient,
        rules,
        today,
        strict,
        json,
    } = args;

    let config = AppConfig::load()?;
    let engine_config = if strict {
        EngineConfig::strict()
    } else {
        EngineConfig::from(&config.care)
    };

    let patient: PatientProfile = read_json_file(&patient)?;
    let rules: Vec<PreventiveRule> = match rules {
        Some(path) => read_json_file(&path)?,
        None => RuleCatalog::standard().into_rules(),
    };
    let now = today.unwrap_or_else(Utc::now);

    let evaluation = RuleEngine::new(engine_config).assess(&patient, &rules, now)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        render_evaluation(&evaluation);
    }
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let breakdown = score_metrics(&DailyMetrics {
        steps: args.steps,
        sleep_hours: args.sleep_hours,
        preventive_compliance_score: args.compliance,
    })?;

    println!("Wellness score: {}/100", breakdown.total);
    println!("- steps      {:>6.2} / 40", breakdown.steps_score);
    println!("- sleep      {:>6.2} / 30", breakdown.sleep_score);
    println!("- compliance {:>6.2} / 30", breakdown.compliance_score);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, strict } = args;
    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    let now = today.and_time(NaiveTime::MIN).and_utc() + Duration::hours(12);
    let engine_config = if strict {
        EngineConfig::strict()
    } else {
        EngineConfig::default()
    };

    let patients = Arc::new(MemoryPatientRepository::new());
    let preventive = PreventiveCareService::new(
        patients.clone(),
        Arc::new(MemoryRuleRepository::new()),
        engine_config,
    );
    let seeded = preventive.seed_catalog(&RuleCatalog::standard())?;
    let wellness = WellnessService::new(
        Arc::new(MemoryWellnessRepository::new()),
        patients,
        TrendRange::Week,
    );

    println!("Wellness portal demo ({today})");
    println!("Loaded {seeded} preventive screening rules");

    for (index, profile) in sample_patients(now).into_iter().enumerate() {
        let patient_id = profile.patient_id.clone();
        preventive.register_patient(profile)?;

        let evaluation = preventive.recommendations(&patient_id, now)?;
        println!();
        render_evaluation(&evaluation);

        let compliance = compliance_sub_score(&evaluation);
        for offset in (0..7).rev() {
            let day = today - Duration::days(offset);
            wellness.submit(
                sample_day(&patient_id, day, index as i64, offset, compliance),
                today,
            )?;
        }

        let trend = wellness.trend(&patient_id, None, today)?;
        println!(
            "Wellness ({}): current {} | avg score {} | avg steps {} | avg sleep {:.1}h",
            trend.range.label(),
            trend.current_score,
            trend.averages.score,
            trend.averages.steps,
            trend.averages.sleep_hours
        );
    }

    println!("\nProvider roster");
    for row in wellness.full_roster()? {
        println!(
            "- {} | score {} | {}",
            row.patient_id,
            row.wellness_score,
            row.compliance_status.label()
        );
    }

    let stats = wellness.cohort_statistics()?;
    println!(
        "\nCohort: {} patients | {} logging | average score {}",
        stats.total_patients, stats.patients_with_entries, stats.average_wellness_score
    );
    Ok(())
}

fn render_evaluation(evaluation: &PreventiveEvaluation) {
    println!(
        "Patient {} (age {}) evaluated {}",
        evaluation.patient_id,
        evaluation.age,
        evaluation.evaluated_at.format("%Y-%m-%d %H:%M UTC")
    );

    if evaluation.recommendations.is_empty() {
        println!("- no screenings due");
    }
    for recommendation in &evaluation.recommendations {
        let history = match recommendation.last_tested_at {
            Some(date) => format!("last {}", date.format("%Y-%m-%d")),
            None => "never tested".to_string(),
        };
        println!(
            "- [{}] {} | due {} | {} days overdue | {}",
            recommendation.priority.label(),
            recommendation.recommendation_text,
            recommendation.due_date.format("%Y-%m-%d"),
            recommendation.days_overdue,
            history
        );
    }

    for invalid in &evaluation.invalid_rules {
        println!("! rule {} was not evaluated: {}", invalid.rule_id, invalid.reason);
    }

    for flagged in &evaluation.ambiguous_rules {
        println!(
            "! rule {} has an unreadable condition '{}' ({:?}): {}",
            flagged.rule_id,
            flagged.expression,
            flagged.resolution,
            flagged.reasons.join("; ")
        );
    }
}

/// Five points off the 30-point compliance sub-score per overdue screening.
fn compliance_sub_score(evaluation: &PreventiveEvaluation) -> f64 {
    (30.0 - 5.0 * evaluation.recommendations.len() as f64).max(0.0)
}

fn sample_patients(now: DateTime<Utc>) -> Vec<PatientProfile> {
    let tested = |test_type: &str, days_ago: i64| TestRecord {
        test_type: test_type.to_string(),
        date: now - Duration::days(days_ago),
    };
    let born = |year: i32, month: u32, day: u32| {
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
    };

    vec![
        PatientProfile {
            patient_id: PatientId("demo-ava".to_string()),
            date_of_birth: born(1968, 5, 14),
            sex: Sex::Female,
            last_tests: vec![
                tested("mammogram", 820),
                tested("blood-pressure", 40),
                tested("colorectal", 300),
                tested("flu-vaccine", 200),
            ],
        },
        PatientProfile {
            patient_id: PatientId("demo-ben".to_string()),
            date_of_birth: born(1979, 11, 2),
            sex: Sex::Male,
            last_tests: vec![tested("cholesterol", 410), tested("blood-pressure", 500)],
        },
        PatientProfile {
            patient_id: PatientId("demo-cleo".to_string()),
            date_of_birth: born(2003, 8, 21),
            sex: Sex::Other,
            last_tests: Vec::new(),
        },
    ]
}

fn sample_day(
    patient_id: &PatientId,
    date: NaiveDate,
    profile_index: i64,
    offset: i64,
    compliance: f64,
) -> WellnessSubmission {
    let steps = 3_500 + profile_index * 2_750 + (6 - offset) * 650;
    let sleep_hours = 5.5 + (profile_index as f64) * 0.75 + ((offset % 3) as f64) * 0.5;

    WellnessSubmission {
        patient_id: patient_id.clone(),
        date: Some(date),
        steps: Some(steps),
        sleep_hours: Some(sleep_hours),
        water_intake_ml: Some(1_500 + profile_index * 250),
        preventive_compliance_score: Some(compliance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_for_a_fixed_date() {
        let args = DemoArgs {
            today: NaiveDate::from_ymd_opt(2024, 6, 1),
            strict: false,
        };
        assert!(run_demo(args).is_ok());
    }

    #[test]
    fn score_rejects_negative_steps() {
        let result = run_score(ScoreArgs {
            steps: -5,
            sleep_hours: 7.0,
            compliance: 0.0,
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn compliance_sub_score_floors_at_zero() {
        let evaluation = PreventiveEvaluation {
            patient_id: PatientId("p".to_string()),
            age: 50,
            evaluated_at: Utc::now(),
            recommendations: Vec::new(),
            ambiguous_rules: Vec::new(),
            invalid_rules: Vec::new(),
        };
        assert_eq!(compliance_sub_score(&evaluation), 30.0);
    }
}
