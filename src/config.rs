//! # Engine Configuration
//!
//! Runtime settings for the world and the player, loaded from a JSON file.
//! Every field is optional in the file; missing fields take their defaults.
//!
//! ```json
//! {
//!     "render_distance": 3,
//!     "reach": 5.0,
//!     "generation_method": "flat"
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::engine_state::streaming::RENDER_DISTANCE;
use crate::engine_state::voxels::terrain::GenerationMethod;

/// Largest accepted render distance, in chunks.
pub const MAX_RENDER_DISTANCE: i32 = 16;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON for `EngineConfig`
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// The values parsed but make no sense
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for an `EngineState`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chebyshev radius, in chunks, kept loaded around the player
    pub render_distance: i32,
    /// Maximum distance at which blocks can be targeted
    pub reach: f32,
    /// Horizontal walking speed, in blocks per second
    pub walk_speed: f32,
    /// Upward speed given by a jump, in blocks per second
    pub jump_velocity: f32,
    /// Downward acceleration, in blocks per second squared
    pub gravity: f32,
    /// Where the player's feet start
    pub spawn: [f32; 3],
    /// How new chunks are filled
    pub generation_method: GenerationMethod,
    /// Number of ticks the headless demo runs
    pub demo_ticks: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            render_distance: RENDER_DISTANCE,
            reach: 6.0,
            walk_speed: 4.3,
            jump_velocity: 8.0,
            gravity: 20.0,
            spawn: [8.0, 2.0, 8.0],
            generation_method: GenerationMethod::Layered,
            demo_ticks: 240,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from a JSON string and validates it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=MAX_RENDER_DISTANCE).contains(&self.render_distance) {
            return Err(ConfigError::Invalid(format!(
                "render_distance must be within 0..={}, got {}",
                MAX_RENDER_DISTANCE, self.render_distance
            )));
        }
        let physical = [
            ("reach", self.reach),
            ("walk_speed", self.walk_speed),
            ("jump_velocity", self.jump_velocity),
            ("gravity", self.gravity),
        ];
        for (name, value) in physical {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.spawn.iter().any(|value| !value.is_finite()) {
            return Err(ConfigError::Invalid("spawn must be finite".to_string()));
        }
        Ok(())
    }
}

/// Loads and validates a configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: EngineConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = EngineConfig::from_json(r#"{ "render_distance": 3 }"#).unwrap();
        assert_eq!(config.render_distance, 3);
        assert_eq!(config.reach, 6.0);
        assert_eq!(config.generation_method, GenerationMethod::Layered);
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn generation_method_names() {
        let config = EngineConfig::from_json(r#"{ "generation_method": "empty" }"#).unwrap();
        assert_eq!(config.generation_method, GenerationMethod::Empty);
        assert!(matches!(
            EngineConfig::from_json(r#"{ "generation_method": "perlin" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "render_distance": 40 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "gravity": -1.0 }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_config("definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
