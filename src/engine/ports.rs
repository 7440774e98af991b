// Capabilities the locomotion core consumes from the host engine
//
// Everything here is implemented by the engine layer (rapier-backed world,
// frame loop, camera rig) or by test fakes. The character never reaches
// past these traits.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Bit mask selecting which collision layers a query may hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Check whether any bit is shared with `other`
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn union(self, other: LayerMask) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Which sides of the collision volume touched something during a move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub below: bool,
    pub sides: bool,
    pub above: bool,
}

impl CollisionFlags {
    pub fn none(&self) -> bool {
        !(self.below || self.sides || self.above)
    }
}

/// Result of a swept move
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveResult {
    /// Authoritative grounded signal after the move
    pub is_grounded: bool,
    pub collision_flags: CollisionFlags,
}

/// First surface hit by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
    /// World-space surface normal, pointing away from the surface
    pub normal: Vec3,
}

/// Swept move with collision response.
///
/// The mover owns the character's position; the controller only ever asks
/// it to displace the collision volume and reads back the outcome.
pub trait Mover {
    fn move_with_collision(&mut self, displacement: Vec3) -> MoveResult;

    /// Current world position of the character origin
    fn position(&self) -> Vec3;

    /// Grounded flag from the most recent move
    fn is_grounded(&self) -> bool;
}

/// Ray queries against the static world
pub trait RayCast {
    /// `direction` must be normalized. `None` mask means every layer.
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer_mask: Option<LayerMask>,
    ) -> Option<RayHit>;
}

/// Per-frame elapsed time source
pub trait Clock {
    fn delta_time(&self) -> f32;
}

/// Orientation of the view the player steers relative to
pub trait CameraView {
    /// World-space forward vector; may carry pitch
    fn forward(&self) -> Vec3;

    /// World-space right vector; may carry roll
    fn right(&self) -> Vec3;
}
