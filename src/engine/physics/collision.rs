use rapier3d::prelude::*;

use crate::engine::ports::LayerMask;

/// Collision layers for static geometry and the character volume
///
/// Locomotion sensors filter on these: side-wall probes only see `Wall`,
/// the character sweep sees everything solid except other characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionLayer {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// Character collision volumes
    Character = 0b0000_0010,

    /// Walkable ground, ramps and slopes
    Ground = 0b0000_0100,

    /// Surfaces that can be wall-run
    Wall = 0b0000_1000,

    /// Trigger volumes (water, kill planes) - no physical response
    Sensor = 0b0001_0000,
}

impl CollisionLayer {
    /// Mask selecting only this layer
    pub fn mask(self) -> LayerMask {
        LayerMask(self as u32)
    }

    /// Convert to rapier's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            // Characters collide with level geometry, not with each other
            CollisionLayer::Character => Group::from_bits_truncate(
                CollisionLayer::Default as u32
                    | CollisionLayer::Ground as u32
                    | CollisionLayer::Wall as u32,
            ),

            // Level geometry blocks characters and anything default
            CollisionLayer::Ground | CollisionLayer::Wall => Group::from_bits_truncate(
                CollisionLayer::Default as u32 | CollisionLayer::Character as u32,
            ),

            CollisionLayer::Sensor => Group::ALL,
            CollisionLayer::Default => Group::ALL,
        };

        InteractionGroups::new(memberships, filter)
    }
}

/// Groups for a query that should only hit colliders on `mask`
pub fn query_groups(mask: LayerMask) -> InteractionGroups {
    InteractionGroups::new(Group::ALL, Group::from_bits_truncate(mask.0))
}
