use glam::Vec3;
use rapier3d::control::{CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;

use super::body::presets;
use super::collision::{query_groups, CollisionLayer};
use super::world::{to_vec3, SharedWorld};
use crate::engine::ports::{CollisionFlags, Mover, MoveResult};

/// Distance below which a blocked axis counts as a contact
const CONTACT_EPSILON: f32 = 1.0e-4;

/// `Mover` port backed by rapier's kinematic character controller.
///
/// Tracks the character origin itself; rapier only answers "how far can
/// this capsule actually go".
pub struct KinematicMover {
    world: SharedWorld,
    controller: KinematicCharacterController,
    shape: SharedShape,
    position: Vec3,
    grounded: bool,
}

impl KinematicMover {
    /// Create a mover for a capsule of the given height and radius at `position`
    pub fn new(world: SharedWorld, position: Vec3, height: f32, radius: f32, slope_limit_deg: f32) -> Self {
        let controller = KinematicCharacterController {
            offset: CharacterLength::Absolute(0.01),
            max_slope_climb_angle: slope_limit_deg.to_radians(),
            min_slope_slide_angle: slope_limit_deg.to_radians(),
            snap_to_ground: Some(CharacterLength::Absolute(0.1)),
            ..Default::default()
        };

        Self {
            world,
            controller,
            shape: presets::character_shape(height, radius),
            position,
            grounded: false,
        }
    }
}

impl Mover for KinematicMover {
    fn move_with_collision(&mut self, displacement: Vec3) -> MoveResult {
        let filter = QueryFilter::default()
            .groups(query_groups(CollisionLayer::Ground.mask().union(CollisionLayer::Wall.mask())));

        let movement = {
            let world = self.world.borrow();
            let dt = world.timestep();
            world.move_character(
                &self.controller,
                &self.shape,
                self.position,
                displacement,
                dt,
                filter,
            )
        };

        let applied = to_vec3(&movement.translation);
        self.position += applied;
        // Rapier drops `grounded` on some flat-floor frames; a blocked
        // downward move is a floor contact too
        let blocked_below =
            displacement.y < 0.0 && applied.y > displacement.y + CONTACT_EPSILON;
        self.grounded = movement.grounded || blocked_below;

        let desired_flat = Vec3::new(displacement.x, 0.0, displacement.z).length();
        let applied_flat = Vec3::new(applied.x, 0.0, applied.z).length();
        let collision_flags = CollisionFlags {
            below: self.grounded,
            sides: desired_flat - applied_flat > CONTACT_EPSILON,
            above: displacement.y > CONTACT_EPSILON && displacement.y - applied.y > CONTACT_EPSILON,
        };

        MoveResult {
            is_grounded: self.grounded,
            collision_flags,
        }
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }
}
