// Player character: per-state locomotion behaviour driven once per frame

use glam::{Quat, Vec3};
use std::sync::Arc;

use super::config::LocomotionConfig;
use super::cooldown::WallCheckCooldown;
use super::motion::{
    apply_gravity, apply_jump_trigger, rotate_towards, slope_slide_vector, to_body_space,
    to_camera_space, wall_forward, GravityModel, JumpProfile, MotionSample, WALL_RUN_HUG_VELOCITY,
};
use super::sensors::{SensorLayer, SteepSlopeContact, WallContact, WallSide};
use super::state::{LocomotionState, LocomotionStateMachine, TransitionGuards};
use super::LocomotionError;
use crate::core::math::look_rotation;
use crate::engine::camera::Camera;
use crate::engine::input::{InputLatch, InputSource, InputState, SubscriptionId};
use crate::engine::ports::{CameraView, Clock, Mover, RayCast};

/// Basis horizontal input is reprojected into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementFrame {
    /// Flattened camera forward/right
    #[default]
    CameraRelative,
    /// Flattened body forward/right
    BodyRelative,
}

/// What one `update` did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// State after transition evaluation (takes effect next frame)
    pub state: LocomotionState,
    /// State whose behaviour ran this frame
    pub previous_state: LocomotionState,
    /// World-space velocity handed to the mover this frame
    pub final_velocity: Vec3,
    pub grounded: bool,
    pub transitioned: bool,
}

/// Assembles a [`Character`] from its collaborators
#[derive(Default)]
pub struct CharacterBuilder {
    config: LocomotionConfig,
    mover: Option<Box<dyn Mover>>,
    rays: Option<Box<dyn RayCast>>,
    camera: Option<Box<dyn CameraView>>,
    rotation: Quat,
    initial_state: LocomotionState,
}

impl CharacterBuilder {
    /// Start from default tuning, no ports and the Ground state
    pub fn new() -> Self {
        Self::default()
    }

    /// Locomotion tuning; validated in `build`
    pub fn config(mut self, config: LocomotionConfig) -> Self {
        self.config = config;
        self
    }

    /// Collision-aware mover for the character body (required)
    pub fn mover(mut self, mover: Box<dyn Mover>) -> Self {
        self.mover = Some(mover);
        self
    }

    /// Ray caster the sensors probe the world with (required)
    pub fn ray_cast(mut self, rays: Box<dyn RayCast>) -> Self {
        self.rays = Some(rays);
        self
    }

    /// View to steer relative to; a level default camera when omitted
    pub fn camera(mut self, camera: Box<dyn CameraView>) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Initial body orientation
    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// State the first frame runs in
    pub fn initial_state(mut self, state: LocomotionState) -> Self {
        self.initial_state = state;
        self
    }

    /// Validate the config, derive the jump arc and assemble the character
    pub fn build(self) -> Result<Character, LocomotionError> {
        self.config.validate()?;
        let mover = self.mover.ok_or(LocomotionError::MissingMover)?;
        let rays = self.rays.ok_or(LocomotionError::MissingRayCast)?;
        let camera = self
            .camera
            .unwrap_or_else(|| Box::new(Camera::default()) as Box<dyn CameraView>);

        let jump_profile = JumpProfile::from_config(&self.config)?;
        let gravity_model = GravityModel::new(&jump_profile, &self.config);

        Ok(Character {
            config: self.config,
            jump_profile,
            gravity_model,
            mover,
            sensors: SensorLayer::new(rays),
            camera,
            latch: Arc::new(InputLatch::new()),
            subscription: None,
            state_machine: LocomotionStateMachine::starting_in(self.initial_state),
            motion: MotionSample::resting(jump_profile.gravity),
            input: InputState::default(),
            rotation: self.rotation,
            movement_frame: MovementFrame::default(),
            is_jumping: false,
            wall_checks_enabled: true,
            cooldown: WallCheckCooldown::new(),
        })
    }
}

/// A single locomotion-controlled character
pub struct Character {
    config: LocomotionConfig,
    jump_profile: JumpProfile,
    gravity_model: GravityModel,

    // Collaborators
    mover: Box<dyn Mover>,
    sensors: SensorLayer,
    camera: Box<dyn CameraView>,
    latch: Arc<InputLatch>,
    subscription: Option<SubscriptionId>,

    // Persistent locomotion state
    state_machine: LocomotionStateMachine,
    motion: MotionSample,
    /// Latched input for the frame in progress
    input: InputState,
    rotation: Quat,
    movement_frame: MovementFrame,
    is_jumping: bool,
    wall_checks_enabled: bool,
    cooldown: WallCheckCooldown,
}

impl Character {
    /// Subscribe to `source` and start accepting input
    pub fn enable(&mut self, source: &mut dyn InputSource) {
        if self.subscription.is_some() {
            return;
        }
        self.latch.open();
        self.subscription = Some(source.subscribe(Arc::clone(&self.latch)));
        log::info!("Character enabled");
    }

    /// Stop accepting input, drop held input and cancel a pending cool-down
    pub fn disable(&mut self, source: &mut dyn InputSource) {
        if let Some(id) = self.subscription.take() {
            if !source.unsubscribe(id) {
                log::warn!("Input subscription {:?} was already gone", id);
            }
        }
        self.latch.close();
        self.cooldown.cancel();
        log::info!("Character disabled");
    }

    /// Whether an input source is subscribed
    pub fn is_enabled(&self) -> bool {
        self.subscription.is_some()
    }

    /// Run one frame with the clock's elapsed time
    pub fn tick(&mut self, clock: &dyn Clock) -> FrameReport {
        self.update(clock.delta_time())
    }

    /// Run the current state's behaviour, then evaluate its exit guards
    pub fn update(&mut self, dt: f32) -> FrameReport {
        if self.cooldown.tick(dt) {
            self.wall_checks_enabled = true;
            log::debug!("Wall-run exit cool-down elapsed, wall checks re-enabled");
        }

        self.input = self.latch.sample();
        let state = self.state_machine.state();
        self.state_machine.tick(dt);

        if state.probes_walls() {
            self.probe_side_walls();
        }

        let final_velocity = match state {
            LocomotionState::Ground => self.handle_ground(dt),
            LocomotionState::Air => self.handle_air(dt),
            LocomotionState::WallRun => self.handle_wall_run(dt),
            LocomotionState::WallClimb => self.handle_wall_climb(dt),
            LocomotionState::Swim => self.handle_swim(dt),
        };

        let grounded = self.sensors.probe_ground(self.mover.as_ref());
        let guards = TransitionGuards {
            grounded,
            wall_present: self.sensors.wall_contact().any(),
            forward_input: self.input.move_axis.y,
        };
        let transitioned = self.state_machine.apply_guards(&guards).is_some();

        // Runs on every airborne tick, whatever the guards decided
        if state == LocomotionState::Air {
            self.start_wall_run();
        }

        FrameReport {
            state: self.state_machine.state(),
            previous_state: state,
            final_velocity,
            grounded,
            transitioned,
        }
    }

    fn handle_ground(&mut self, dt: f32) -> Vec3 {
        self.movement_frame = MovementFrame::CameraRelative;
        if self.cooldown.cancel() {
            log::debug!("Landed during wall-run exit cool-down, cancelled");
        }
        self.wall_checks_enabled = true;

        let mut final_velocity = self.drive_from_input();
        self.rotate_towards_heading(final_velocity, dt);

        if let Some(slope) = self
            .sensors
            .probe_steep_slope(self.mover.as_ref(), &self.config)
        {
            if slope.on_steep_slope {
                final_velocity = slope_slide_vector(&slope, self.config.walk_speed, dt);
            }
        }
        self.mover.move_with_collision(final_velocity * dt);

        let grounded = self.mover.is_grounded();
        let jump_held = self.input.jump_held;
        apply_gravity(&mut self.motion, grounded, jump_held, dt, &self.gravity_model);

        let was_jumping = self.is_jumping;
        self.is_jumping = apply_jump_trigger(
            was_jumping,
            grounded,
            jump_held,
            &mut self.motion,
            self.jump_profile.initial_jump_velocity,
        );
        if self.is_jumping && !was_jumping {
            log::debug!("Jump take-off at {:.2}", self.jump_profile.initial_jump_velocity);
        }

        final_velocity
    }

    fn handle_air(&mut self, dt: f32) -> Vec3 {
        self.movement_frame = MovementFrame::CameraRelative;

        let final_velocity = self.drive_from_input();
        self.rotate_towards_heading(final_velocity, dt);
        self.mover.move_with_collision(final_velocity * dt);

        let grounded = self.mover.is_grounded();
        apply_gravity(
            &mut self.motion,
            grounded,
            self.input.jump_held,
            dt,
            &self.gravity_model,
        );

        final_velocity
    }

    fn handle_wall_run(&mut self, dt: f32) -> Vec3 {
        self.movement_frame = MovementFrame::BodyRelative;
        // Forward speed carries over from the frame the run started
        self.motion.applied_velocity.x = self.input.move_axis.x * self.config.walk_speed;

        let wall = self.sensors.wall_contact().active();
        if let Some((_, hit)) = wall {
            let along = wall_forward(hit.normal, self.rotation * Vec3::Y, self.rotation * Vec3::Z);
            if let Some(facing) = look_rotation(along) {
                self.rotation = facing;
            }
        }

        let final_velocity = self.reproject(self.motion.applied_velocity);
        self.mover.move_with_collision(final_velocity * dt);
        self.motion.applied_velocity.y = WALL_RUN_HUG_VELOCITY;

        if let Some((side, hit)) = wall {
            if !self.is_jumping && self.input.jump_held {
                self.push_off_wall(side, hit.normal);
            }
        }

        final_velocity
    }

    fn handle_wall_climb(&mut self, _dt: f32) -> Vec3 {
        Vec3::ZERO
    }

    fn handle_swim(&mut self, _dt: f32) -> Vec3 {
        Vec3::ZERO
    }

    /// Horizontal applied velocity from the move axis, reprojected to world
    fn drive_from_input(&mut self) -> Vec3 {
        let axis = self.input.move_axis;
        self.motion.applied_velocity.x = axis.x * self.config.walk_speed;
        self.motion.applied_velocity.z = axis.y * self.config.walk_speed;
        self.reproject(self.motion.applied_velocity)
    }

    fn reproject(&self, velocity: Vec3) -> Vec3 {
        match self.movement_frame {
            MovementFrame::CameraRelative => to_camera_space(velocity, self.camera.as_ref()),
            MovementFrame::BodyRelative => to_body_space(velocity, self.rotation),
        }
    }

    fn rotate_towards_heading(&mut self, heading: Vec3, dt: f32) {
        if !self.input.is_movement_active() {
            return;
        }
        match look_rotation(heading) {
            Some(target) => {
                self.rotation =
                    rotate_towards(self.rotation, target, self.config.rotation_speed, dt);
            }
            None => log::warn!("Movement input with no horizontal heading: {:?}", heading),
        }
    }

    fn probe_side_walls(&mut self) {
        let origin = self.mover.position();
        let right = self.rotation * Vec3::X;
        self.sensors
            .probe_side_walls(self.wall_checks_enabled, origin, right, &self.config);
    }

    /// Undamped displacement off the wall, then suppress wall detection
    fn push_off_wall(&mut self, side: WallSide, normal: Vec3) {
        self.is_jumping = true;
        self.mover
            .move_with_collision(normal * self.jump_profile.initial_jump_velocity);
        log::debug!("Wall-run push-off from {:?} wall", side);
        self.begin_wall_exit();
    }

    fn begin_wall_exit(&mut self) {
        self.wall_checks_enabled = false;
        self.sensors.clear_walls();
        self.cooldown.start(self.config.wall_run_exit_cooldown);
    }

    fn start_wall_run(&mut self) {
        self.is_jumping = false;
        self.movement_frame = MovementFrame::BodyRelative;
    }

    /// Place the character into a state directly, bypassing the guards
    pub fn force_state(&mut self, state: LocomotionState) {
        self.state_machine.force_transition(state);
    }

    /// Swap tuning; the jump profile is recomputed. Rejected tuning leaves
    /// the current config in place.
    pub fn set_config(&mut self, config: LocomotionConfig) -> Result<(), LocomotionError> {
        config.validate()?;
        let jump_profile = JumpProfile::from_config(&config)?;
        self.gravity_model = GravityModel::new(&jump_profile, &config);
        self.jump_profile = jump_profile;
        self.config = config;
        Ok(())
    }

    /// Swap the view camera-relative input is reprojected against
    pub fn set_camera(&mut self, camera: Box<dyn CameraView>) {
        self.camera = camera;
    }

    /// Latch the input source writes into
    pub fn latch(&self) -> &Arc<InputLatch> {
        &self.latch
    }

    /// Get the current state
    pub fn state(&self) -> LocomotionState {
        self.state_machine.state()
    }

    /// Get the state machine (previous state, time in state)
    pub fn state_machine(&self) -> &LocomotionStateMachine {
        &self.state_machine
    }

    /// Current body orientation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Current body position, as tracked by the mover
    pub fn position(&self) -> Vec3 {
        self.mover.position()
    }

    /// Integrated and applied velocities from the last frame
    pub fn motion(&self) -> &MotionSample {
        &self.motion
    }

    /// Side walls found by the last probe
    pub fn wall_contact(&self) -> WallContact {
        self.sensors.wall_contact()
    }

    /// Result of the last steep-slope probe, if one ran
    pub fn slope_contact(&self) -> Option<SteepSlopeContact> {
        self.sensors.slope_contact()
    }

    /// Whether a ground jump is in progress
    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    /// False while wall probes are frozen after a push-off
    pub fn wall_checks_enabled(&self) -> bool {
        self.wall_checks_enabled
    }

    /// Whether the wall-run exit cool-down is counting down
    pub fn wall_exit_pending(&self) -> bool {
        self.cooldown.is_pending()
    }

    /// Gravity and take-off speed derived from the config
    pub fn jump_profile(&self) -> &JumpProfile {
        &self.jump_profile
    }

    /// Basis input was reprojected into on the last frame
    pub fn movement_frame(&self) -> MovementFrame {
        self.movement_frame
    }

    /// Get the active tuning
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fakes::{FakeMover, FakeRayCast};
    use crate::engine::game_loop::{GameLoop, FIXED_TIMESTEP};
    use crate::engine::input::InputHub;
    use crate::engine::ports::{LayerMask, RayHit};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use glam::Vec2;
    use std::f32::consts::FRAC_PI_2;

    const DT: f32 = 1.0 / 60.0;

    fn rig(mover: &FakeMover, rays: &FakeRayCast) -> Character {
        let character = CharacterBuilder::new()
            .mover(Box::new(mover.clone()))
            .ray_cast(Box::new(rays.clone()))
            .build()
            .expect("all ports supplied");
        character.latch().open();
        character
    }

    fn wall_hit(normal: Vec3) -> RayHit {
        RayHit {
            distance: 0.5,
            point: Vec3::ZERO,
            normal,
        }
    }

    fn add_right_wall(rays: &FakeRayCast) {
        let layers = LocomotionConfig::default().wall_layers;
        rays.add(Vec3::X, layers, wall_hit(Vec3::NEG_X));
    }

    fn add_left_wall(rays: &FakeRayCast) {
        let layers = LocomotionConfig::default().wall_layers;
        rays.add(Vec3::NEG_X, layers, wall_hit(Vec3::X));
    }

    fn slope_ray(rays: &FakeRayCast, angle_deg: f32) {
        let angle = angle_deg.to_radians();
        rays.add(
            Vec3::NEG_Y,
            LayerMask::ALL,
            RayHit {
                distance: 1.0,
                point: Vec3::ZERO,
                normal: Vec3::new(angle.sin(), angle.cos(), 0.0),
            },
        );
    }

    /// Airborne character already running on a wall
    fn wall_runner(mover: &FakeMover, rays: &FakeRayCast, dt: f32) -> Character {
        let mut character = rig(mover, rays);
        character.latch().write_move(Vec2::new(0.0, 1.0));
        character.force_state(LocomotionState::Air);
        let report = character.update(dt);
        assert_eq!(report.state, LocomotionState::WallRun);
        character
    }

    #[test]
    fn test_builder_requires_ports() {
        let result = CharacterBuilder::new().build();
        assert!(matches!(result, Err(LocomotionError::MissingMover)));

        let result = CharacterBuilder::new()
            .mover(Box::new(FakeMover::floating(Vec3::ZERO)))
            .build();
        assert!(matches!(result, Err(LocomotionError::MissingRayCast)));
    }

    #[test]
    fn test_builder_rejects_bad_config() {
        let result = CharacterBuilder::new()
            .config(LocomotionConfig {
                max_jump_time: 0.0,
                ..Default::default()
            })
            .mover(Box::new(FakeMover::floating(Vec3::ZERO)))
            .ray_cast(Box::new(FakeRayCast::new()))
            .build();
        assert!(matches!(result, Err(LocomotionError::InvalidJumpTime(_))));
    }

    #[test]
    fn test_ground_walk_is_camera_relative() {
        let mover = FakeMover::on_floor(Vec3::ZERO, 0.0);
        let rays = FakeRayCast::new();
        let mut character = rig(&mover, &rays);
        character.set_camera(Box::new(Camera::new(FRAC_PI_2, -0.4)));
        character.latch().write_move(Vec2::new(0.0, 1.0));

        let report = character.update(DT);
        assert_eq!(report.state, LocomotionState::Ground);
        assert!(!report.transitioned);
        assert!(report.grounded);
        // Camera faces +X, so pushing forward walks along +X at walk speed
        assert_relative_eq!(report.final_velocity.x, 20.0, max_relative = 1e-5);
        assert_abs_diff_eq!(report.final_velocity.z, 0.0, epsilon = 1e-4);
        assert_eq!(character.movement_frame(), MovementFrame::CameraRelative);
    }

    #[test]
    fn test_ground_rotation_follows_input() {
        let mover = FakeMover::on_floor(Vec3::ZERO, 0.0);
        let rays = FakeRayCast::new();
        let mut character = rig(&mover, &rays);
        character.latch().write_move(Vec2::new(1.0, 0.0));

        character.update(DT);
        let first = character.rotation() * Vec3::Z;
        assert!(first.x > 0.0 && first.x < 1.0);

        for _ in 0..120 {
            character.update(DT);
        }
        let facing = character.rotation() * Vec3::Z;
        assert_abs_diff_eq!(facing.x, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(facing.z, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_idle_keeps_rotation() {
        let mover = FakeMover::on_floor(Vec3::ZERO, 0.0);
        let rays = FakeRayCast::new();
        let mut character = rig(&mover, &rays);
        character.update(DT);
        assert_eq!(character.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn test_first_ground_move_presses_down() {
        let mover = FakeMover::on_floor(Vec3::ZERO, 0.0);
        let rays = FakeRayCast::new();
        let mut character = rig(&mover, &rays);
        let gravity = character.jump_profile().gravity;
        assert_eq!(character.motion().applied_velocity.y, gravity);

        let report = character.update(DT);
        assert_eq!(report.final_velocity.y, gravity);
        let first = mover.moves()[0];
        assert_relative_eq!(first.y, gravity * DT, max_relative = 1e-5);
        assert!(report.grounded);
        assert!(!report.transitioned);
    }

    #[test]
    fn test_standing_does_not_accumulate_gravity() {
        let mover = FakeMover::on_floor(Vec3::ZERO, 0.0);
        let rays = FakeRayCast::new();
        let mut character = rig(&mover, &rays);
        for _ in 0..30 {
            character.update(DT);
        }
        let gravity = character.jump_profile().gravity;
        assert_eq!(character.motion().current_velocity.y, gravity);
        assert_eq!(character.state(), LocomotionState::Ground);
    }

    #[test]
    fn test_jump_leaves_ground() {
        let mover = FakeMover::on_floor(Vec3::ZERO, 0.0);
        let rays = FakeRayCast::new();
        let mut character = rig(&mover, &rays);
        character.latch().write_jump(true);

        let report = character.update(DT);
        assert_eq!(report.state, LocomotionState::Ground);
        assert!(character.is_jumping());
        assert_eq!(
            character.motion().current_velocity.y,
            character.jump_profile().initial_jump_velocity
        );

        let report = character.update(DT);
        assert!(report.transitioned);
        assert_eq!(report.previous_state, LocomotionState::Ground);
        assert_eq!(report.state, LocomotionState::Air);
        assert!(character.position().y > 0.0);
    }

    #[test]
    fn test_airborne_tick_rearms_jump_and_switches_frame() {
        let mover = FakeMover::on_floor(Vec3::ZERO, 0.0);
        let rays = FakeRayCast::new();
        let mut character = rig(&mover, &rays);
        character.latch().write_jump(true);
        character.update(DT);
        character.update(DT);
        assert_eq!(character.state(), LocomotionState::Air);
        // Ground -> Air alone does not reset anything
        assert!(character.is_jumping());
        assert_eq!(character.movement_frame(), MovementFrame::CameraRelative);

        character.update(DT);
        assert!(!character.is_jumping());
        assert_eq!(character.movement_frame(), MovementFrame::BodyRelative);
    }

    #[test]
    fn test_falling_lands_on_ground() {
        let mover = FakeMover::on_floor(Vec3::new(0.0, 0.2, 0.0), 0.0);
        let rays = FakeRayCast::new();
        let mut character = rig(&mover, &rays);
        character.force_state(LocomotionState::Air);

        let mut landed = false;
        for _ in 0..60 {
            if character.update(DT).state == LocomotionState::Ground {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(character.position().y, 0.0);
    }

    #[test]
    fn test_air_enters_wall_run_with_forward_input() {
        let mover = FakeMover::floating(Vec3::new(0.0, 5.0, 0.0));
        let rays = FakeRayCast::new();
        add_right_wall(&rays);
        let mut character = rig(&mover, &rays);
        character.force_state(LocomotionState::Air);

        // No forward input: stays airborne beside the wall
        character.latch().write_move(Vec2::ZERO);
        assert_eq!(character.update(DT).state, LocomotionState::Air);
        assert!(character.wall_contact().has_right_wall());

        character.latch().write_move(Vec2::new(0.0, 1.0));
        let report = character.update(DT);
        assert_eq!(report.state, LocomotionState::WallRun);
        assert!(!character.wall_contact().has_left_wall());
    }

    #[test]
    fn test_wall_run_hugs_wall_and_faces_along_it() {
        let mover = FakeMover::floating(Vec3::new(0.0, 5.0, 0.0));
        let rays = FakeRayCast::new();
        add_right_wall(&rays);
        let mut character = wall_runner(&mover, &rays, DT);

        character.latch().write_move(Vec2::new(0.5, 1.0));
        let report = character.update(DT);
        assert_eq!(report.state, LocomotionState::WallRun);
        assert_eq!(character.movement_frame(), MovementFrame::BodyRelative);
        assert_eq!(character.motion().applied_velocity.y, WALL_RUN_HUG_VELOCITY);

        let facing = character.rotation() * Vec3::Z;
        assert_abs_diff_eq!(facing.z, 1.0, epsilon = 1e-5);
        // Strafe follows input; forward speed carried from the air
        assert_relative_eq!(report.final_velocity.x, 10.0, max_relative = 1e-5);
        assert_relative_eq!(report.final_velocity.z, 20.0, max_relative = 1e-5);
    }

    #[test]
    fn test_wall_run_drops_to_air_without_forward_input() {
        let mover = FakeMover::floating(Vec3::new(0.0, 5.0, 0.0));
        let rays = FakeRayCast::new();
        add_right_wall(&rays);
        let mut character = wall_runner(&mover, &rays, DT);

        character.latch().write_move(Vec2::ZERO);
        assert_eq!(character.update(DT).state, LocomotionState::Air);
    }

    #[test]
    fn test_push_off_prefers_right_wall() {
        let mover = FakeMover::floating(Vec3::new(0.0, 5.0, 0.0));
        let rays = FakeRayCast::new();
        add_right_wall(&rays);
        add_left_wall(&rays);
        let mut character = wall_runner(&mover, &rays, DT);
        assert!(character.wall_contact().has_left_wall());

        character.latch().write_jump(true);
        let report = character.update(DT);

        let push = mover.last_move().expect("push-off move");
        let v0 = character.jump_profile().initial_jump_velocity;
        assert_abs_diff_eq!(push.x, -v0, epsilon = 1e-4);
        assert_abs_diff_eq!(push.y, 0.0);
        assert!(character.is_jumping());
        assert!(!character.wall_checks_enabled());
        assert!(!character.wall_contact().any());
        assert_eq!(report.state, LocomotionState::Air);
    }

    #[test]
    fn test_wall_checks_return_after_exact_cooldown() {
        let dt = 0.1;
        let mover = FakeMover::floating(Vec3::new(0.0, 5.0, 0.0));
        let rays = FakeRayCast::new();
        add_right_wall(&rays);
        let mut character = wall_runner(&mover, &rays, dt);

        character.latch().write_jump(true);
        character.update(dt);
        character.latch().write_jump(false);
        assert!(character.wall_exit_pending());

        // Wall still within reach, but detection stays off for 0.3s
        for _ in 0..2 {
            let report = character.update(dt);
            assert_eq!(report.state, LocomotionState::Air);
            assert!(!character.wall_checks_enabled());
        }

        let report = character.update(dt);
        assert!(character.wall_checks_enabled());
        assert!(!character.wall_exit_pending());
        assert_eq!(report.state, LocomotionState::WallRun);
    }

    #[test]
    fn test_landing_cancels_cooldown() {
        let mover = FakeMover::floating(Vec3::new(0.0, 5.0, 0.0));
        let rays = FakeRayCast::new();
        add_right_wall(&rays);
        let mut character = wall_runner(&mover, &rays, DT);
        character.latch().write_jump(true);
        character.update(DT);
        character.latch().write_jump(false);
        assert!(character.wall_exit_pending());

        mover.force_grounded(Some(true));
        assert_eq!(character.update(DT).state, LocomotionState::Ground);
        character.update(DT);
        assert!(!character.wall_exit_pending());
        assert!(character.wall_checks_enabled());
    }

    #[test]
    fn test_steep_slope_slides_downhill() {
        let mover = FakeMover::on_floor(Vec3::ZERO, 0.0);
        let rays = FakeRayCast::new();
        slope_ray(&rays, 60.0);
        let mut character = rig(&mover, &rays);
        character.latch().write_move(Vec2::new(0.0, 1.0));

        let report = character.update(DT);
        let slope = character.slope_contact().expect("slope under feet");
        assert!(slope.on_steep_slope);
        // Input pointed +Z; the slide overrides it toward +X
        assert!(report.final_velocity.x > 0.0);
        assert!(report.final_velocity.y < 0.0);
        assert_abs_diff_eq!(report.final_velocity.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_gentle_slope_keeps_input_direction() {
        let mover = FakeMover::on_floor(Vec3::ZERO, 0.0);
        let rays = FakeRayCast::new();
        slope_ray(&rays, 30.0);
        let mut character = rig(&mover, &rays);
        character.latch().write_move(Vec2::new(0.0, 1.0));

        let report = character.update(DT);
        assert!(!character.slope_contact().unwrap().on_steep_slope);
        assert_relative_eq!(report.final_velocity.z, 20.0, max_relative = 1e-5);
    }

    #[test]
    fn test_reserved_states() {
        let mover = FakeMover::on_floor(Vec3::ZERO, 0.0);
        let rays = FakeRayCast::new();
        let mut character = rig(&mover, &rays);
        character.latch().write_move(Vec2::new(0.0, 1.0));

        // Swim has no behaviour and no exit, even on the ground
        character.force_state(LocomotionState::Swim);
        let report = character.update(DT);
        assert_eq!(report.state, LocomotionState::Swim);
        assert_eq!(report.final_velocity, Vec3::ZERO);
        assert!(mover.moves().is_empty());

        character.force_state(LocomotionState::WallClimb);
        let report = character.update(DT);
        assert!(report.transitioned);
        assert_eq!(report.state, LocomotionState::Ground);
    }

    #[test]
    fn test_enable_disable_through_hub() {
        let mover = FakeMover::on_floor(Vec3::ZERO, 0.0);
        let rays = FakeRayCast::new();
        let mut character = CharacterBuilder::new()
            .mover(Box::new(mover.clone()))
            .ray_cast(Box::new(rays.clone()))
            .build()
            .unwrap();
        let mut hub = InputHub::new();

        // Not yet enabled: events are dropped
        hub.push_move(Vec2::new(0.0, 1.0));
        assert_eq!(character.update(DT).final_velocity.z, 0.0);

        character.enable(&mut hub);
        assert!(character.is_enabled());
        hub.push_move(Vec2::new(0.0, 1.0));
        assert_relative_eq!(character.update(DT).final_velocity.z, 20.0, max_relative = 1e-5);

        character.disable(&mut hub);
        assert!(!character.is_enabled());
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(character.update(DT).final_velocity.z, 0.0);
    }

    #[test]
    fn test_disable_cancels_cooldown() {
        let mover = FakeMover::floating(Vec3::new(0.0, 5.0, 0.0));
        let rays = FakeRayCast::new();
        add_right_wall(&rays);
        let mut character = wall_runner(&mover, &rays, DT);
        character.latch().write_jump(true);
        character.update(DT);
        assert!(character.wall_exit_pending());

        character.disable(&mut InputHub::new());
        assert!(!character.wall_exit_pending());
        assert!(!character.latch().sample().jump_held);
    }

    #[test]
    fn test_set_config_recomputes_jump() {
        let mover = FakeMover::on_floor(Vec3::ZERO, 0.0);
        let rays = FakeRayCast::new();
        let mut character = rig(&mover, &rays);
        let before = *character.jump_profile();

        character
            .set_config(LocomotionConfig {
                max_jump_height: 1.0,
                ..Default::default()
            })
            .unwrap();
        assert!(character.jump_profile().initial_jump_velocity < before.initial_jump_velocity);

        let rejected = character.set_config(LocomotionConfig {
            max_jump_height: -1.0,
            ..Default::default()
        });
        assert!(rejected.is_err());
        assert_eq!(character.config().max_jump_height, 1.0);
    }

    #[test]
    fn test_tick_uses_clock() {
        let mover = FakeMover::on_floor(Vec3::ZERO, 0.0);
        let rays = FakeRayCast::new();
        let mut character = rig(&mover, &rays);
        character.latch().write_move(Vec2::new(0.0, 1.0));

        character.tick(&GameLoop::new());
        let step = mover.last_move().unwrap();
        assert_relative_eq!(step.z, 20.0 * FIXED_TIMESTEP, max_relative = 1e-5);
        assert_relative_eq!(character.state_machine().state_time(), FIXED_TIMESTEP);
    }
}
