use glam::Vec3;
use rapier3d::control::{EffectiveCharacterMovement, KinematicCharacterController};
use rapier3d::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use super::collision::query_groups;
use crate::engine::game_loop::FIXED_TIMESTEP;
use crate::engine::ports::{LayerMask, RayCast, RayHit};

/// World shared between the ray caster and the character mover.
///
/// The frame loop is single-threaded and the two never borrow at the same
/// time, so `Rc<RefCell<_>>` is enough.
pub type SharedWorld = Rc<RefCell<PhysicsWorld>>;

pub(crate) fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub(crate) fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Static collision world the character moves through
pub struct PhysicsWorld {
    /// Only dynamic props feel this; characters integrate their own gravity
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    /// Answers ray casts and character sweeps; refreshed by `step`
    query_pipeline: QueryPipeline,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        let integration_parameters = IntegrationParameters {
            dt: FIXED_TIMESTEP,
            ..Default::default()
        };

        Self {
            gravity: vector![0.0, -9.81, 0.0],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
        }
    }

    /// Wrap in the shared handle used by the locomotion adapters
    pub fn into_shared(self) -> SharedWorld {
        Rc::new(RefCell::new(self))
    }

    /// Step the simulation; also brings the query pipeline up to date
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Add a static collider (no parent body)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Remove a collider from the physics world
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.rigid_body_set,
            true, // wake up attached body
        );
    }

    /// Get the number of colliders in the world
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Cast a ray and return the first hit with its surface normal
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_toi: Real,
        filter: QueryFilter,
    ) -> Option<RayHit> {
        let ray = Ray::new(point![origin.x, origin.y, origin.z], to_vector(direction));
        let (_, intersection) = self.query_pipeline.cast_ray_and_get_normal(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_toi,
            true,
            filter,
        )?;
        let toi = intersection.time_of_impact;

        Some(RayHit {
            distance: toi,
            point: origin + direction * toi,
            normal: to_vec3(&intersection.normal),
        })
    }

    /// Sweep a kinematic character shape, returning the movement rapier allows
    pub fn move_character(
        &self,
        controller: &KinematicCharacterController,
        shape: &SharedShape,
        position: Vec3,
        desired: Vec3,
        dt: Real,
        filter: QueryFilter,
    ) -> EffectiveCharacterMovement {
        let character_pos = Isometry::translation(position.x, position.y, position.z);
        controller.move_shape(
            dt,
            &self.rigid_body_set,
            &self.collider_set,
            &self.query_pipeline,
            &**shape,
            &character_pos,
            to_vector(desired),
            filter,
            |_| {},
        )
    }

    /// Get the current timestep
    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// `RayCast` port backed by the shared physics world
#[derive(Clone)]
pub struct WorldRayCast {
    world: SharedWorld,
}

impl WorldRayCast {
    pub fn new(world: SharedWorld) -> Self {
        Self { world }
    }
}

impl RayCast for WorldRayCast {
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer_mask: Option<LayerMask>,
    ) -> Option<RayHit> {
        let filter = match layer_mask {
            Some(mask) => QueryFilter::default().groups(query_groups(mask)),
            None => QueryFilter::default(),
        };
        self.world
            .borrow()
            .raycast(origin, direction, max_distance, filter)
    }
}
