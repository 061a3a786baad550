//! Simulation tuning knobs.
//!
//! A `SimConfig` is built once (defaults, or a TOML file that overrides any
//! subset of them) and handed to `World::new`. Nothing reads configuration from
//! global state.
//!
//! ```toml
//! width = 80
//! height = 24
//! plant_spread_cost = 12
//! mob_age_max = 250
//! ```

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Outer world grid size
    pub width: usize,
    pub height: usize,

    /// Cap applied to every resource addition
    pub resource_max: u32,

    pub plant_spread_cost: u32,
    pub plant_age_max: u32,
    /// Resources a plant gains each tick
    pub photosynth_yield: u32,
    /// A cell holding this many plants no longer receives spread
    pub plant_density_max: usize,
    pub plant_initial_resources: u32,

    pub mob_reproduce_cost: u32,
    pub mob_initial_resources: u32,
    pub mob_reproduce_age: u32,
    pub mob_age_max: u32,
    pub mob_base_health: u32,
    pub mob_base_mana: u32,
    /// Resources spent per move
    pub move_cost: u32,
    pub mana_regen: u32,
    pub heal_mana_cost: u32,
    pub initial_genome_length: usize,

    /// Private rune grid size
    pub rune_grid_width: usize,
    pub rune_grid_height: usize,

    /// Rune total to stat multipliers
    pub health_per_black: u32,
    pub mana_per_blue: u32,
    pub attack_per_red: u32,
    pub heal_per_green: u32,

    /// Starting population used by drivers
    pub initial_mobs: usize,
    pub initial_plants: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 60,
            height: 20,
            resource_max: 100,
            plant_spread_cost: 10,
            plant_age_max: 300,
            photosynth_yield: 1,
            plant_density_max: 1,
            plant_initial_resources: 5,
            mob_reproduce_cost: 10,
            mob_initial_resources: 10,
            mob_reproduce_age: 50,
            mob_age_max: 200,
            mob_base_health: 10,
            mob_base_mana: 0,
            move_cost: 1,
            mana_regen: 1,
            heal_mana_cost: 2,
            initial_genome_length: 5,
            rune_grid_width: 30,
            rune_grid_height: 10,
            health_per_black: 10,
            mana_per_blue: 1,
            attack_per_red: 1,
            heal_per_green: 3,
            initial_mobs: 20,
            initial_plants: 200,
        }
    }
}

impl SimConfig {
    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::invalid(
                "width/height",
                format!("world grid must be non-empty, got {}x{}", self.width, self.height),
            ));
        }
        if self.rune_grid_width == 0 || self.rune_grid_height == 0 {
            return Err(ConfigError::invalid(
                "rune_grid_width/rune_grid_height",
                format!(
                    "rune grid must be non-empty, got {}x{}",
                    self.rune_grid_width, self.rune_grid_height
                ),
            ));
        }
        if self.width > i32::MAX as usize || self.height > i32::MAX as usize {
            return Err(ConfigError::invalid("width/height", "grid too large"));
        }
        if self.resource_max == 0 {
            return Err(ConfigError::invalid("resource_max", "must be positive"));
        }
        if self.plant_density_max == 0 {
            return Err(ConfigError::invalid(
                "plant_density_max",
                "must be positive or plants can never spread",
            ));
        }
        if self.initial_genome_length == 0 {
            return Err(ConfigError::invalid("initial_genome_length", "must be positive"));
        }
        if self.heal_mana_cost == 0 {
            return Err(ConfigError::invalid("heal_mana_cost", "must be positive"));
        }
        Ok(())
    }

    /// Parse and validate TOML. Missing keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_tuning_table() {
        let config = SimConfig::default();
        assert_eq!(config.plant_spread_cost, 10);
        assert_eq!(config.plant_age_max, 300);
        assert_eq!(config.photosynth_yield, 1);
        assert_eq!(config.mob_reproduce_cost, 10);
        assert_eq!(config.mob_initial_resources, 10);
        assert_eq!(config.mob_reproduce_age, 50);
        assert_eq!(config.mob_age_max, 200);
        assert_eq!(config.resource_max, 100);
        assert_eq!(config.plant_density_max, 1);
        assert_eq!((config.rune_grid_width, config.rune_grid_height), (30, 10));
    }

    #[test]
    fn test_zero_width_rejected() {
        let config = SimConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_zero_rune_grid_rejected() {
        let config = SimConfig {
            rune_grid_height: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_density_rejected() {
        let config = SimConfig {
            plant_density_max: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("plant_density_max"));
    }

    #[test]
    fn test_zero_genome_length_rejected() {
        let config = SimConfig {
            initial_genome_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial_override() {
        let config = SimConfig::from_toml("width = 80\nmob_age_max = 250\n").unwrap();
        assert_eq!(config.width, 80);
        assert_eq!(config.mob_age_max, 250);
        assert_eq!(config.height, 20);
    }

    #[test]
    fn test_from_toml_empty_is_default() {
        assert_eq!(SimConfig::from_toml("").unwrap(), SimConfig::default());
    }

    #[test]
    fn test_from_toml_bad_syntax() {
        assert!(matches!(
            SimConfig::from_toml("width = = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_toml_invalid_value() {
        assert!(matches!(
            SimConfig::from_toml("resource_max = 0"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            SimConfig::load("/nonexistent/runegrid.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_toml_roundtrip_through_serialize() {
        let config = SimConfig {
            plant_spread_cost: 12,
            ..Default::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(SimConfig::from_toml(&text).unwrap(), config);
    }
}
