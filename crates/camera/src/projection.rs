use glam::DMat4;
use serde::{Deserialize, Serialize};

/// Perspective parameters handed to renderer adapters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub fov_y_degrees: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self) -> DMat4 {
        DMat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}
