//! Configuration types for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Simulator configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Width of the grid (columns)
    pub width: usize,
    /// Height of the grid (rows)
    pub height: usize,
    /// Generations advanced per tick
    pub step_size: usize,
    /// Period of the generation tick timer (0 = as often as the host loop allows)
    pub tick_interval_ms: u64,
    /// Period of the FPS report timer
    pub fps_report_interval_ms: u64,
    /// Whether the render sink is invoked on each tick
    pub render_enabled: bool,
    /// Initial grid contents
    pub seed: SeedConfig,
    /// Transition rule
    pub rule: RuleConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 90,
            step_size: 1,
            tick_interval_ms: 0,
            fps_report_interval_ms: 500,
            render_enabled: true,
            seed: SeedConfig::default(),
            rule: RuleConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.step_size == 0 {
            return Err(Error::InvalidStepSize(0));
        }
        if self.fps_report_interval_ms == 0 {
            return Err(Error::Config(
                "fps_report_interval_ms must be greater than zero".to_string(),
            ));
        }
        self.rule.validate()
    }
}

/// How the grid is populated before the first generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeedConfig {
    /// All cells dead
    Empty,
    /// Every cell alive with probability 1/2; entropy-seeded when `seed` is absent
    Random { seed: Option<u64> },
    /// A named pattern pasted at (`row`, `col`), defaulting to the grid centre
    Pattern {
        name: String,
        row: Option<i64>,
        col: Option<i64>,
    },
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig::Pattern {
            name: "r-pentomino".to_string(),
            row: None,
            col: None,
        }
    }
}

/// Birth/survival neighbour counts, e.g. B3/S23
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub birth: Vec<u8>,
    pub survive: Vec<u8>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            birth: vec![3],
            survive: vec![2, 3],
        }
    }
}

impl RuleConfig {
    pub fn validate(&self) -> Result<()> {
        match self.birth.iter().chain(&self.survive).find(|&&n| n > 8) {
            Some(n) => Err(Error::Config(format!(
                "neighbour count {} is out of range 0..=8",
                n
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.step_size, 1);
        assert_eq!(config.fps_report_interval_ms, 500);
        assert!(config.render_enabled);
        assert!(config.validate().is_ok());
        assert_eq!(config.rule.birth, vec![3]);
        assert_eq!(config.rule.survive, vec![2, 3]);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json_str(r#"{ "width": 10, "height": 12 }"#).unwrap();
        assert_eq!(config.width, 10);
        assert_eq!(config.height, 12);
        assert_eq!(config.step_size, 1);
        assert_eq!(config.seed, SeedConfig::default());
    }

    #[test]
    fn test_seed_config_serialization() {
        let json = r#"{ "seed": { "kind": "random", "seed": 42 } }"#;
        let config = SimulationConfig::from_json_str(json).unwrap();
        assert_eq!(config.seed, SeedConfig::Random { seed: Some(42) });

        let json = r#"{ "seed": { "kind": "pattern", "name": "glider", "row": 1, "col": 1 } }"#;
        let config = SimulationConfig::from_json_str(json).unwrap();
        assert_eq!(
            config.seed,
            SeedConfig::Pattern {
                name: "glider".to_string(),
                row: Some(1),
                col: Some(1)
            }
        );
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = SimulationConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidDimension { .. })));

        let config = SimulationConfig {
            step_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidStepSize(0))));

        let config = SimulationConfig {
            fps_report_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = SimulationConfig {
            rule: RuleConfig {
                birth: vec![9],
                survive: vec![],
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SimulationConfig::from_json_file("/nonexistent/gol-config.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
