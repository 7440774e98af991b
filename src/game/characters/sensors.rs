// Environment sensing: ground contact, steep slopes, side walls

use glam::Vec3;

use super::config::LocomotionConfig;
use crate::core::math::angle_between_deg;
use crate::engine::ports::{Mover, RayCast, RayHit};

/// Which side of the body a wall was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

/// Result of the lateral wall probes. Both sides may hit at once.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WallContact {
    pub left: Option<RayHit>,
    pub right: Option<RayHit>,
}

impl WallContact {
    pub fn has_left_wall(&self) -> bool {
        self.left.is_some()
    }

    pub fn has_right_wall(&self) -> bool {
        self.right.is_some()
    }

    /// Any wall within reach
    pub fn any(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }

    /// Wall to run on; the right side wins when both are present
    pub fn active(&self) -> Option<(WallSide, RayHit)> {
        match (self.right, self.left) {
            (Some(hit), _) => Some((WallSide::Right, hit)),
            (None, Some(hit)) => Some((WallSide::Left, hit)),
            (None, None) => None,
        }
    }
}

/// Ground surface under a grounded character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteepSlopeContact {
    /// Surface angle exceeds the slope limit
    pub on_steep_slope: bool,
    pub slope_normal: Vec3,
    pub slope_point: Vec3,
}

/// Ray-based sensors plus the contacts they last produced
pub struct SensorLayer {
    rays: Box<dyn RayCast>,
    walls: WallContact,
    slope: Option<SteepSlopeContact>,
}

impl SensorLayer {
    pub fn new(rays: Box<dyn RayCast>) -> Self {
        Self {
            rays,
            walls: WallContact::default(),
            slope: None,
        }
    }

    /// Ground contact straight from the mover's last result
    pub fn probe_ground(&self, mover: &dyn Mover) -> bool {
        mover.is_grounded()
    }

    /// Cast down from the origin through the feet and classify the surface.
    /// `None` when airborne or nothing is below.
    pub fn probe_steep_slope(
        &mut self,
        mover: &dyn Mover,
        config: &LocomotionConfig,
    ) -> Option<SteepSlopeContact> {
        self.slope = if self.probe_ground(mover) {
            let reach = config.character_height / 2.0 + config.ground_probe_distance;
            self.rays
                .cast(mover.position(), Vec3::NEG_Y, reach, Some(config.ground_layers))
                .map(|hit| SteepSlopeContact {
                    on_steep_slope: angle_between_deg(hit.normal, Vec3::Y) > config.slope_limit_deg,
                    slope_normal: hit.normal,
                    slope_point: hit.point,
                })
        } else {
            None
        };
        self.slope
    }

    /// Probe both sides along the body's right axis against wall layers.
    /// While disabled the previous contact is returned untouched.
    pub fn probe_side_walls(
        &mut self,
        enabled: bool,
        origin: Vec3,
        body_right: Vec3,
        config: &LocomotionConfig,
    ) -> WallContact {
        if enabled {
            let reach = config.wall_check_distance;
            let mask = Some(config.wall_layers);
            self.walls = WallContact {
                right: self.rays.cast(origin, body_right, reach, mask),
                left: self.rays.cast(origin, -body_right, reach, mask),
            };
        }
        self.walls
    }

    /// Forget both walls (used when a wall-run is abandoned)
    pub fn clear_walls(&mut self) {
        self.walls = WallContact::default();
    }

    pub fn wall_contact(&self) -> WallContact {
        self.walls
    }

    pub fn slope_contact(&self) -> Option<SteepSlopeContact> {
        self.slope
    }
}
