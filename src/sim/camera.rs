//! Chase camera that trails the marble

use glam::{Mat4, Vec3};

use crate::consts::{CAMERA_OFFSET, CAMERA_SMOOTHING, CAMERA_START, CAMERA_TARGET_OFFSET};
use crate::smooth_toward;

/// Smoothed camera position and look-at point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraFrame {
    fn default() -> Self {
        Self {
            position: CAMERA_START,
            target: Vec3::ZERO,
        }
    }
}

impl CameraFrame {
    /// Ease toward the framing for a marble at `body`
    pub fn follow(&mut self, body: Vec3, dt: f32) {
        self.position = smooth_toward(self.position, body + CAMERA_OFFSET, CAMERA_SMOOTHING, dt);
        self.target = smooth_toward(self.target, body + CAMERA_TARGET_OFFSET, CAMERA_SMOOTHING, dt);
    }

    /// Right-handed view matrix for renderers
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }
}
