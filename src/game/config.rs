use std::path::Path;

use serde::{Deserialize, Serialize};

use super::controller::FallbackPolicy;
use super::runner::StopCondition;
use crate::error::{GameError, Result};

/// Configuration for a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Growth pending on every snake when it is placed
    pub initial_growth: u32,
    /// A food item spawns every `food_period` turns
    pub food_period: u64,
    /// Seed for food and snake placement; random when unset
    pub seed: Option<u64>,
    /// Move used when a controller fails to decide
    pub fallback: FallbackPolicy,
    /// When the runner stops
    pub stop_condition: StopCondition,
    /// Hard cap on the number of turns the runner plays
    pub max_turns: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_growth: 3,
            food_period: 10,
            seed: None,
            fallback: FallbackPolicy::default(),
            stop_condition: StopCondition::default(),
            max_turns: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(30)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(GameError::InvalidGridSize(self.grid_size));
        }
        if self.food_period == 0 {
            return Err(GameError::InvalidFoodPeriod);
        }
        if self.max_turns == Some(0) {
            return Err(GameError::Config("max_turns must be at least 1".into()));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}
