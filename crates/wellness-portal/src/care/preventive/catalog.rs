use super::domain::{PreventiveRule, RuleId};

/// Built-in preventive screening schedule loaded into fresh deployments.
#[derive(Debug)]
pub struct RuleCatalog {
    rules: Vec<PreventiveRule>,
}

impl RuleCatalog {
    pub fn standard() -> Self {
        Self {
            rules: standard_rules(),
        }
    }

    pub fn rules(&self) -> &[PreventiveRule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<PreventiveRule> {
        self.rules
    }
}

fn rule(
    id: &str,
    name: &str,
    condition_expression: &str,
    recommendation_text: &str,
    recommended_interval_days: u32,
    test_type: &str,
) -> PreventiveRule {
    PreventiveRule {
        id: RuleId(id.to_string()),
        name: name.to_string(),
        condition_expression: condition_expression.to_string(),
        recommendation_text: recommendation_text.to_string(),
        recommended_interval_days,
        test_type: test_type.to_string(),
        enabled: true,
    }
}

fn standard_rules() -> Vec<PreventiveRule> {
    vec![
        rule(
            "rule-cholesterol-men-35",
            "Cholesterol Check - Men 35+",
            r#"age >= 35 AND sex === "male""#,
            "Annual cholesterol screening",
            365,
            "cholesterol",
        ),
        rule(
            "rule-blood-pressure-adults",
            "Blood Pressure Check",
            "age >= 18",
            "Regular blood pressure monitoring",
            180,
            "blood-pressure",
        ),
        rule(
            "rule-mammogram-women-40",
            "Mammogram - Women 40+",
            r#"age >= 40 AND sex === "female""#,
            "Screening mammogram every two years",
            730,
            "mammogram",
        ),
        rule(
            "rule-cervical-screening",
            "Cervical Cancer Screening",
            r#"age >= 21 AND age <= 65 AND sex === "female""#,
            "Pap smear every three years",
            1095,
            "pap-smear",
        ),
        rule(
            "rule-colorectal-45-75",
            "Colorectal Cancer Screening",
            "age >= 45 AND age <= 75",
            "Colorectal cancer screening (FIT test) every year",
            365,
            "colorectal",
        ),
        rule(
            "rule-diabetes-35-70",
            "Diabetes Screening",
            "age >= 35 AND age <= 70",
            "Blood glucose (HbA1c) screening every three years",
            1095,
            "blood-glucose",
        ),
        rule(
            "rule-flu-vaccine",
            "Seasonal Flu Vaccine",
            "age >= 1",
            "Annual influenza vaccination",
            365,
            "flu-vaccine",
        ),
    ]
}
