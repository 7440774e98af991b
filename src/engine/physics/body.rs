use super::collision::CollisionLayer;
use rapier3d::prelude::*;

/// Builder for static level colliders
pub struct StaticColliderBuilder {
    shape: SharedShape,
    translation: Vector<Real>,
    tilt_z: Real,
    layer: CollisionLayer,
    friction: Real,
    is_sensor: bool,
}

impl StaticColliderBuilder {
    /// Axis-aligned box, given half extents
    pub fn cuboid(half_x: Real, half_y: Real, half_z: Real) -> Self {
        Self {
            shape: SharedShape::cuboid(half_x, half_y, half_z),
            translation: Vector::zeros(),
            tilt_z: 0.0,
            layer: CollisionLayer::Default,
            friction: 0.5,
            is_sensor: false,
        }
    }

    /// Set the world position of the collider's center
    pub fn translation(mut self, x: Real, y: Real, z: Real) -> Self {
        self.translation = vector![x, y, z];
        self
    }

    /// Rotate about the world Z axis (tilts a slab into a ramp along X)
    pub fn tilt_z(mut self, angle: Real) -> Self {
        self.tilt_z = angle;
        self
    }

    /// Set the collision layer
    pub fn layer(mut self, layer: CollisionLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Make this a sensor (detects overlap but doesn't block)
    pub fn sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        let position = Isometry::new(self.translation, vector![0.0, 0.0, self.tilt_z]);
        ColliderBuilder::new(self.shape)
            .position(position)
            .collision_groups(self.layer.to_interaction_groups())
            .friction(self.friction)
            .sensor(self.is_sensor)
            .build()
    }
}

/// Common collider configurations for locomotion test levels
pub mod presets {
    use super::*;

    /// Flat floor whose top surface sits at `top_y`
    pub fn ground_slab(center_x: Real, top_y: Real, center_z: Real, half_extent: Real) -> Collider {
        StaticColliderBuilder::cuboid(half_extent, 0.5, half_extent)
            .translation(center_x, top_y - 0.5, center_z)
            .layer(CollisionLayer::Ground)
            .build()
    }

    /// Thin vertical wall in the YZ plane at `x`, running along Z
    pub fn wall_along_z(x: Real, center_z: Real, length: Real, height: Real) -> Collider {
        StaticColliderBuilder::cuboid(0.25, height / 2.0, length / 2.0)
            .translation(x, height / 2.0, center_z)
            .layer(CollisionLayer::Wall)
            .friction(0.0)
            .build()
    }

    /// Ramp rising along +X, tilted by `angle` radians
    pub fn ramp(center_x: Real, center_y: Real, center_z: Real, half_extent: Real, angle: Real) -> Collider {
        StaticColliderBuilder::cuboid(half_extent, 0.25, half_extent)
            .translation(center_x, center_y, center_z)
            .tilt_z(angle)
            .layer(CollisionLayer::Ground)
            .build()
    }

    /// Upright capsule for a character of the given total height
    pub fn character_shape(height: Real, radius: Real) -> SharedShape {
        let half_segment = (height / 2.0 - radius).max(0.0);
        SharedShape::capsule_y(half_segment, radius)
    }
}
