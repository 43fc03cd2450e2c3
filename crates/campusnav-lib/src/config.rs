//! Tunable constants of the cost and heuristic model.
//!
//! The defaults reproduce the production routing behaviour. A JSON file may
//! override any subset of fields; omitted fields keep their default value:
//!
//! ```json
//! { "floor_change_penalty": 80.0, "elevator_wait_seconds": 45.0 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Heuristic distance used when either node's position is unknown.
pub const UNKNOWN_POSITION_DISTANCE: f64 = 1000.0;
/// Heuristic penalty added when the two nodes sit on different floors.
pub const FLOOR_CHANGE_PENALTY: f64 = 50.0;
/// Heuristic penalty added when the two nodes sit in different buildings.
pub const BUILDING_CHANGE_PENALTY: f64 = 100.0;
/// Walking speed in distance units per second.
pub const WALKING_SPEED: f64 = 1.4;

/// Parameters consumed by [`crate::cost`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub unknown_position_distance: f64,
    pub floor_change_penalty: f64,
    pub building_change_penalty: f64,
    pub walking_speed: f64,
    pub stairs_multiplier: f64,
    /// Stairs multiplier when an accessible route is requested.
    pub accessible_stairs_multiplier: f64,
    pub elevator_multiplier: f64,
    pub door_multiplier: f64,
    pub outdoor_multiplier: f64,
    /// Factor applied to walking time on stairs.
    pub stairs_duration_factor: f64,
    pub elevator_wait_seconds: f64,
    pub door_seconds: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            unknown_position_distance: UNKNOWN_POSITION_DISTANCE,
            floor_change_penalty: FLOOR_CHANGE_PENALTY,
            building_change_penalty: BUILDING_CHANGE_PENALTY,
            walking_speed: WALKING_SPEED,
            stairs_multiplier: 1.5,
            accessible_stairs_multiplier: 1000.0,
            elevator_multiplier: 2.0,
            door_multiplier: 1.1,
            outdoor_multiplier: 1.2,
            stairs_duration_factor: 2.0,
            elevator_wait_seconds: 30.0,
            door_seconds: 2.0,
        }
    }
}

impl SearchConfig {
    /// Parse a configuration from a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        debug!(path = %path.display(), "loaded search configuration");
        Ok(config)
    }

    /// Reject constants that would make costs negative or durations unbounded.
    ///
    /// Speed and multipliers must be finite and positive; penalties and
    /// per-category seconds must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("walking_speed", self.walking_speed),
            ("stairs_multiplier", self.stairs_multiplier),
            ("accessible_stairs_multiplier", self.accessible_stairs_multiplier),
            ("elevator_multiplier", self.elevator_multiplier),
            ("door_multiplier", self.door_multiplier),
            ("outdoor_multiplier", self.outdoor_multiplier),
            ("stairs_duration_factor", self.stairs_duration_factor),
        ];
        let non_negative = [
            ("unknown_position_distance", self.unknown_position_distance),
            ("floor_change_penalty", self.floor_change_penalty),
            ("building_change_penalty", self.building_change_penalty),
            ("elevator_wait_seconds", self.elevator_wait_seconds),
            ("door_seconds", self.door_seconds),
        ];

        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig { field, value });
            }
        }
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig { field, value });
            }
        }
        Ok(())
    }
}
