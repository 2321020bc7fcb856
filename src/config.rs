//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! gives the stock bot. A file only needs the keys it overrides:
//!
//! ```json
//! { "max_phase_time_ms": 250, "search": { "deploy_strategy": "heuristic" } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::SearchConfig;

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    /// Hard cap on the time spent planning one phase.
    pub max_phase_time_ms: u64,
    /// Share of the remaining timebank one phase may use.
    pub timebank_fraction: f64,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            search: SearchConfig::default(),
            max_phase_time_ms: 400,
            timebank_fraction: 0.5,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Time allowed for one phase given the timebank the server reported.
    pub fn phase_budget(&self, timebank_ms: u64) -> Duration {
        let share = (timebank_ms as f64 * self.timebank_fraction.clamp(0.0, 1.0)) as u64;
        Duration::from_millis(share.min(self.max_phase_time_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::DeployStrategy;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_override() {
        let cfg = EngineConfig::from_json(
            r#"{ "seed": 7, "search": { "deploy_strategy": "heuristic", "low_take_threshold": 0.4 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.search.deploy_strategy, DeployStrategy::Heuristic);
        assert_eq!(cfg.search.low_take_threshold, 0.4);
        assert_eq!(cfg.search.high_take_threshold, 0.6125);
        assert!(cfg.search.utility.at_risk_penalty);
        assert_eq!(cfg.max_phase_time_ms, 400);
    }

    #[test]
    fn utility_flag_can_be_turned_off() {
        let cfg = EngineConfig::from_json(r#"{ "search": { "utility": { "at_risk_penalty": false } } }"#)
            .unwrap();
        assert!(!cfg.search.utility.at_risk_penalty);
        assert_eq!(cfg.search.utility.risk_weight, 1.0);
    }

    #[test]
    fn bad_json_is_parse_error() {
        assert!(matches!(
            EngineConfig::from_json("{ seed: }"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "search": { "deploy_strategy": "psychic" } }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EngineConfig::load("/nonexistent/hegemon.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/hegemon.json"));
    }

    #[test]
    fn phase_budget_takes_the_smaller_limit() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.phase_budget(10_000), Duration::from_millis(400));
        assert_eq!(cfg.phase_budget(300), Duration::from_millis(150));
        assert_eq!(cfg.phase_budget(0), Duration::ZERO);
    }
}
