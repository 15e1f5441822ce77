use serde::{Deserialize, Serialize};

use crate::config::CareConfig;

/// What to do with a rule whose condition could not be fully parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionFallback {
    /// Apply only the clauses that parsed; an unreadable expression matches
    /// every patient. Mirrors the legacy portal behavior.
    #[default]
    MatchRecognized,
    /// Leave the rule out of the evaluation entirely.
    SkipRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub condition_fallback: ConditionFallback,
}

impl EngineConfig {
    pub fn strict() -> Self {
        Self {
            condition_fallback: ConditionFallback::SkipRule,
        }
    }
}

impl From<&CareConfig> for EngineConfig {
    fn from(config: &CareConfig) -> Self {
        if config.strict_rules {
            Self::strict()
        } else {
            Self::default()
        }
    }
}
