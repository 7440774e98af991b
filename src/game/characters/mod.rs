// Character system
//
// This module contains everything related to the player character:
// - Locomotion tuning and its validation
// - Sensor layer (ground, steep slope, side walls)
// - Motion integrator (gravity, jump arcs, reprojection)
// - State machine for locomotion modes
// - The character itself, which runs one state's behaviour per frame

use thiserror::Error;

pub mod character;
pub mod config;
pub mod cooldown;
pub mod motion;
pub mod sensors;
pub mod state;

// Re-export commonly used types
pub use character::{Character, CharacterBuilder, FrameReport, MovementFrame};
pub use config::LocomotionConfig;
pub use cooldown::WallCheckCooldown;
pub use motion::{GravityModel, GravityPhase, JumpProfile, MotionSample};
pub use sensors::{SensorLayer, SteepSlopeContact, WallContact, WallSide};
pub use state::{LocomotionState, LocomotionStateMachine, TransitionGuards};

/// Errors raised while configuring or assembling a character
#[derive(Debug, Error)]
pub enum LocomotionError {
    #[error("max jump time must be positive, got {0}")]
    InvalidJumpTime(f32),

    #[error("max jump height must be positive, got {0}")]
    InvalidJumpHeight(f32),

    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("character has no mover")]
    MissingMover,

    #[error("character has no ray caster")]
    MissingRayCast,

    #[error("failed to parse locomotion config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
