// Third-person view orientation
//
// Only the orientation matters to locomotion: the character steers relative
// to where the camera looks. Positioning and projection belong to the
// renderer, which is not part of this crate.

use glam::{Quat, Vec3};

use super::ports::CameraView;

/// Yaw/pitch camera rig
#[derive(Debug, Clone)]
pub struct Camera {
    /// Rotation about world up, radians (0 looks down +Z)
    yaw: f32,
    /// Rotation about the camera's right axis, radians (negative looks down)
    pitch: f32,
    /// Cached orientation
    rotation: Quat,
}

impl Camera {
    /// Create a new camera
    pub fn new(yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            yaw,
            pitch,
            rotation: Quat::IDENTITY,
        };
        camera.update_rotation();
        camera
    }

    fn update_rotation(&mut self) {
        // Pitch about local X after yaw about world Y; a positive X rotation
        // tips +Z downward, so negate to keep "negative pitch looks down".
        self.rotation = Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(-self.pitch);
    }

    /// Set camera pitch
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch;
        self.update_rotation();
    }

    /// Rotate by a yaw/pitch delta (e.g. from mouse look)
    pub fn look(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch += delta_pitch;
        self.update_rotation();
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl CameraView for Camera {
    fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }
}
