// Motion integration: gravity, jump arcs, basis reprojection, slope and wall vectors
//
// Everything here is a pure function of its arguments. The character owns
// the persistent pieces (`MotionSample`, jumping flag) and feeds them in.

use glam::{Quat, Vec3};

use super::config::LocomotionConfig;
use super::sensors::SteepSlopeContact;
use super::LocomotionError;
use crate::core::math::flatten;
use crate::engine::ports::CameraView;

/// Vertical velocity that keeps a wall-runner pressed against the wall
pub const WALL_RUN_HUG_VELOCITY: f32 = -0.5;

/// Gravity and take-off speed derived from jump tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpProfile {
    /// Vertical acceleration (negative)
    pub gravity: f32,
    /// Take-off speed that peaks at the configured height
    pub initial_jump_velocity: f32,
}

impl JumpProfile {
    /// Solve the projectile equations for a jump that peaks at `max_height`
    /// halfway through `max_time`
    pub fn new(max_height: f32, max_time: f32) -> Result<Self, LocomotionError> {
        if !(max_time > 0.0) {
            return Err(LocomotionError::InvalidJumpTime(max_time));
        }
        if !(max_height > 0.0) {
            return Err(LocomotionError::InvalidJumpHeight(max_height));
        }

        let time_to_apex = max_time / 2.0;
        Ok(Self {
            gravity: (-2.0 * max_height) / (time_to_apex * time_to_apex),
            initial_jump_velocity: (2.0 * max_height) / time_to_apex,
        })
    }

    pub fn from_config(config: &LocomotionConfig) -> Result<Self, LocomotionError> {
        Self::new(config.max_jump_height, config.max_jump_time)
    }

    /// Seconds from take-off to apex with the jump held
    pub fn time_to_apex(&self) -> f32 {
        -self.initial_jump_velocity / self.gravity
    }

    /// Closed-form peak height with the jump held
    pub fn apex_height(&self) -> f32 {
        self.initial_jump_velocity * self.initial_jump_velocity / (-2.0 * self.gravity)
    }
}

/// Gravity policy parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityModel {
    pub gravity: f32,
    pub fall_multiplier: f32,
    pub fall_speed_floor: f32,
}

impl GravityModel {
    pub fn new(profile: &JumpProfile, config: &LocomotionConfig) -> Self {
        Self {
            gravity: profile.gravity,
            fall_multiplier: config.fall_multiplier,
            fall_speed_floor: config.fall_speed_floor,
        }
    }
}

/// Per-frame working velocities.
///
/// `current_velocity` is the integrated velocity; `applied_velocity` is the
/// smoothed one fed to the mover. The world-space final velocity is derived
/// from `applied_velocity` every frame and deliberately not stored here.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionSample {
    pub current_velocity: Vec3,
    pub applied_velocity: Vec3,
}

impl MotionSample {
    /// At rest on the ground: vertical velocities pinned to `gravity`, so the
    /// very first move already presses down
    pub fn resting(gravity: f32) -> Self {
        Self {
            current_velocity: Vec3::new(0.0, gravity, 0.0),
            applied_velocity: Vec3::new(0.0, gravity, 0.0),
        }
    }
}

/// Which branch of the gravity policy ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravityPhase {
    Grounded,
    /// Past the apex or jump released: scaled gravity
    Falling,
    /// Rising with jump held: plain gravity
    Rising,
}

/// Integrate vertical velocity for one frame.
///
/// Grounded characters are pinned to the flat gravity value so nothing
/// accumulates while standing. Airborne characters integrate and the applied
/// velocity is the midpoint of the previous and new values, floored at the
/// terminal fall speed. Releasing jump while rising switches to the scaled
/// branch, which is what makes jump height follow hold duration.
pub fn apply_gravity(
    motion: &mut MotionSample,
    grounded: bool,
    jump_held: bool,
    dt: f32,
    model: &GravityModel,
) -> GravityPhase {
    if grounded {
        motion.current_velocity.y = model.gravity;
        motion.applied_velocity.y = model.gravity;
        return GravityPhase::Grounded;
    }

    let falling = motion.current_velocity.y <= 0.0 || !jump_held;
    let (phase, scale) = if falling {
        (GravityPhase::Falling, model.fall_multiplier)
    } else {
        (GravityPhase::Rising, 1.0)
    };

    let previous = motion.current_velocity.y;
    motion.current_velocity.y += model.gravity * scale * dt;
    motion.applied_velocity.y =
        ((previous + motion.current_velocity.y) * 0.5).max(model.fall_speed_floor);
    phase
}

/// Start or finish a ground jump. Returns the new jumping flag.
///
/// Take-off needs ground contact, a held button and no jump already in
/// progress; the flag clears once grounded with the button released.
/// Airborne calls change nothing.
pub fn apply_jump_trigger(
    is_jumping: bool,
    grounded: bool,
    jump_held: bool,
    motion: &mut MotionSample,
    initial_jump_velocity: f32,
) -> bool {
    if !is_jumping && grounded && jump_held {
        motion.current_velocity.y = initial_jump_velocity;
        motion.applied_velocity.y = initial_jump_velocity;
        true
    } else if is_jumping && grounded && !jump_held {
        false
    } else {
        is_jumping
    }
}

fn reproject(v: Vec3, forward: Vec3, right: Vec3) -> Vec3 {
    let forward = flatten(forward);
    let right = flatten(right);
    let mut out = forward * v.z + right * v.x;
    out.y = v.y;
    out
}

/// Local movement (x = strafe, z = forward) into the camera's flattened basis
pub fn to_camera_space(v: Vec3, camera: &dyn CameraView) -> Vec3 {
    reproject(v, camera.forward(), camera.right())
}

/// Local movement into the body's flattened basis
pub fn to_body_space(v: Vec3, rotation: Quat) -> Vec3 {
    reproject(v, rotation * Vec3::Z, rotation * Vec3::X)
}

/// Velocity that slides the character down a steep slope.
///
/// World-up projected onto the slope plane points uphill; negating it and
/// scaling by walk speed (plus a small dt ramp) heads downhill. The vertical
/// component is then biased by the contact height to keep the body on the
/// surface.
pub fn slope_slide_vector(contact: &SteepSlopeContact, walk_speed: f32, dt: f32) -> Vec3 {
    let normal = contact.slope_normal;
    let uphill = Vec3::Y - normal * Vec3::Y.dot(normal);
    let slide_speed = walk_speed + dt;

    let mut slide = uphill * -slide_speed;
    slide.y -= contact.slope_point.y;
    slide
}

/// Direction along a wall, picking whichever tangent is closer to where the
/// body already faces
pub fn wall_forward(wall_normal: Vec3, body_up: Vec3, body_forward: Vec3) -> Vec3 {
    let tangent = wall_normal.cross(body_up);
    if (body_forward - tangent).length_squared() > (body_forward + tangent).length_squared() {
        -tangent
    } else {
        tangent
    }
}

/// Turn toward `target` by a fraction of the way proportional to `rate * dt`
pub fn rotate_towards(current: Quat, target: Quat, rate: f32, dt: f32) -> Quat {
    current.slerp(target, (rate * dt).clamp(0.0, 1.0))
}
