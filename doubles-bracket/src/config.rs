use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Weights for the candidate scoring function. Only their order matters:
/// teammate repeats > opponent repeats > games imbalance > skill gap > gender bonus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub teammate_repeat: f64,
    pub opponent_repeat: f64,
    pub games_imbalance: f64,
    pub skill_gap: f64,
    pub gender_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            teammate_repeat: 100.0,
            opponent_repeat: 10.0,
            games_imbalance: 4.0,
            skill_gap: 1.0,
            gender_bonus: 0.5,
        }
    }
}

/// Bounds on the candidate search for a single slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Least-played players considered on the first attempt
    pub sub_pool_size: usize,
    /// Extra players added to the sub-pool on every retry
    pub pool_growth: usize,
    pub max_candidates: usize,
    pub attempt_budget: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            sub_pool_size: 10,
            pool_growth: 2,
            max_candidates: 50,
            attempt_budget: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringWeights,
    pub search: SearchLimits,
}

/// Loads an engine configuration from a JSON file. Missing fields keep their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, LoadError> {
    let raw = fs::read_to_string(path)?;
    let config = serde_json::from_str(&raw)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_follow_priority_order() {
        let w = ScoringWeights::default();
        assert!(w.teammate_repeat > w.opponent_repeat);
        assert!(w.opponent_repeat > w.games_imbalance);
        assert!(w.games_imbalance > w.skill_gap);
        assert!(w.skill_gap > w.gender_bonus);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"search": {"max_candidates": 20}}"#).unwrap();
        assert_eq!(config.search.max_candidates, 20);
        assert_eq!(config.search.sub_pool_size, 10);
        assert_eq!(config.scoring, ScoringWeights::default());
    }

    #[test]
    fn load_config_reads_file() {
        let path = std::env::temp_dir().join(format!("bracket-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"scoring": {"skill_gap": 2.5}}"#).unwrap();
        let config = load_config(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config.scoring.skill_gap, 2.5);
        assert_eq!(config.scoring.teammate_repeat, 100.0);
    }

    #[test]
    fn load_config_reports_bad_json() {
        let path = std::env::temp_dir().join(format!("bracket-bad-{}.json", std::process::id()));
        fs::write(&path, "{not json").unwrap();
        let result = load_config(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(LoadError::Json(_))));
    }
}
