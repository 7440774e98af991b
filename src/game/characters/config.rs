// Locomotion tuning - loaded externally, never derived at runtime

use serde::{Deserialize, Serialize};

use super::LocomotionError;
use crate::engine::physics::CollisionLayer;
use crate::engine::ports::LayerMask;

/// Tunable movement constants for one character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    // Movement
    /// Horizontal speed at full stick deflection (units/second)
    pub walk_speed: f32,
    /// Heading slerp rate (fraction per second)
    pub rotation_speed: f32,

    // Jumping
    /// Apex height of a fully held jump (units)
    pub max_jump_height: f32,
    /// Duration of a fully held jump, take-off to landing (seconds)
    pub max_jump_time: f32,
    /// Gravity multiplier once past the apex or after jump release
    pub fall_multiplier: f32,
    /// Lowest applied vertical velocity (units/second, negative)
    pub fall_speed_floor: f32,

    // Body
    /// Collision volume height (units)
    pub character_height: f32,
    /// Steepest walkable slope (degrees)
    pub slope_limit_deg: f32,

    // Sensors
    /// Extra reach of the slope probe below the feet (units)
    pub ground_probe_distance: f32,
    /// Reach of the side-wall probes (units)
    pub wall_check_distance: f32,
    /// Wall detection suppression after a wall-run push-off (seconds)
    pub wall_run_exit_cooldown: f32,

    // Layers
    pub wall_layers: LayerMask,
    pub ground_layers: LayerMask,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 20.0,
            rotation_speed: 10.0,

            max_jump_height: 4.0,
            max_jump_time: 0.75,
            fall_multiplier: 2.0,
            fall_speed_floor: -30.0,

            character_height: 2.0,
            slope_limit_deg: 45.0,

            ground_probe_distance: 3.0,
            wall_check_distance: 1.0,
            wall_run_exit_cooldown: 0.3,

            wall_layers: CollisionLayer::Wall.mask(),
            ground_layers: LayerMask::ALL,
        }
    }
}

fn invalid(field: &'static str, reason: &'static str) -> LocomotionError {
    LocomotionError::InvalidConfig { field, reason }
}

impl LocomotionConfig {
    /// Parse a (possibly partial) JSON document; missing fields keep defaults
    pub fn from_json_str(json: &str) -> Result<Self, LocomotionError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tuning the integrator cannot run with
    pub fn validate(&self) -> Result<(), LocomotionError> {
        if !(self.max_jump_time > 0.0) {
            return Err(LocomotionError::InvalidJumpTime(self.max_jump_time));
        }
        if !(self.max_jump_height > 0.0) {
            return Err(LocomotionError::InvalidJumpHeight(self.max_jump_height));
        }
        if !(self.character_height > 0.0) {
            return Err(invalid("character_height", "must be positive"));
        }
        if self.walk_speed < 0.0 {
            return Err(invalid("walk_speed", "must not be negative"));
        }
        if self.rotation_speed < 0.0 {
            return Err(invalid("rotation_speed", "must not be negative"));
        }
        if self.fall_multiplier < 1.0 {
            return Err(invalid("fall_multiplier", "must be at least 1"));
        }
        if self.fall_speed_floor > 0.0 {
            return Err(invalid("fall_speed_floor", "must not be positive"));
        }
        if self.ground_probe_distance < 0.0 || self.wall_check_distance < 0.0 {
            return Err(invalid("probe distance", "must not be negative"));
        }
        if self.wall_run_exit_cooldown < 0.0 {
            return Err(invalid("wall_run_exit_cooldown", "must not be negative"));
        }
        if !(0.0..=90.0).contains(&self.slope_limit_deg) {
            return Err(invalid("slope_limit_deg", "must be within 0..=90"));
        }
        Ok(())
    }
}
