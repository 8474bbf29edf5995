use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Point light that follows the camera and sways sideways over time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitLight {
    /// Sideways swing amplitude.
    pub radius: f64,
    pub height: f64,
    /// Distance behind the camera, along world `-Z`.
    pub depth: f64,
    /// Radians per second.
    pub angular_speed: f64,
}

impl Default for OrbitLight {
    fn default() -> Self {
        Self {
            radius: 5.0,
            height: 5.0,
            depth: 5.0,
            angular_speed: 1.0,
        }
    }
}

impl OrbitLight {
    pub fn position(&self, camera: DVec3, elapsed: f64) -> DVec3 {
        let swing = self.radius * (self.angular_speed * elapsed).sin();
        camera + DVec3::new(swing, self.height, -self.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_sits_above_and_behind_at_rest() {
        let light = OrbitLight::default();
        let p = light.position(DVec3::new(0.0, 5.0, -20.0), 0.0);
        assert_eq!(p, DVec3::new(0.0, 10.0, -25.0));
    }

    #[test]
    fn light_swings_with_time() {
        let light = OrbitLight::default();
        let quarter = std::f64::consts::FRAC_PI_2;
        let p = light.position(DVec3::ZERO, quarter);
        assert!((p.x - 5.0).abs() < 1e-12);
    }
}
