// Direction helpers for yaw-only characters on a Y-up world

use glam::{Quat, Vec3};

/// Drop the vertical component of a direction and re-normalize it.
/// Returns zero when the direction is (nearly) vertical.
pub fn flatten(direction: Vec3) -> Vec3 {
    Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero()
}

/// Unsigned angle between two vectors in degrees
pub fn angle_between_deg(a: Vec3, b: Vec3) -> f32 {
    let denom = (a.length_squared() * b.length_squared()).sqrt();
    if denom <= f32::EPSILON {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Yaw-only rotation whose forward (+Z) axis points along the horizontal
/// part of `direction`. `None` when there is no horizontal part.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() <= f32::EPSILON {
        return None;
    }
    Some(Quat::from_rotation_y(flat.x.atan2(flat.z)))
}
