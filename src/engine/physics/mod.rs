// Collision world and character sweeps using rapier3d
//
// Implements the `Mover` and `RayCast` ports on top of a static rapier
// scene. Nothing in the locomotion core depends on rapier directly.

pub mod body;
mod collision;
mod mover;
mod world;

pub use body::{presets, StaticColliderBuilder};
pub use collision::{query_groups, CollisionLayer};
pub use mover::KinematicMover;
pub use world::{PhysicsWorld, SharedWorld, WorldRayCast};
