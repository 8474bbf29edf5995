use framecore_common::{EntityId, Orientation, Transform};
use framecore_input::{InputState, symbols};
use framecore_kernel::EntityRegistry;
use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

use crate::{OrbitLight, Projection};

/// Frame in which a tracking offset is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetSpace {
    /// Rotates with the target, like a camera mounted on it.
    #[default]
    Local,
    /// World-aligned, trailing the target without turning.
    World,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    pub target: EntityId,
    pub offset: DVec3,
    #[serde(default)]
    pub offset_space: OffsetSpace,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreeFlyConfig {
    /// Units per second along the camera axes.
    pub move_speed: f64,
    /// Degrees per unit of pointer delta.
    pub sensitivity: f64,
}

impl Default for FreeFlyConfig {
    fn default() -> Self {
        Self {
            move_speed: 10.0,
            sensitivity: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CameraMode {
    Tracking(TrackingConfig),
    FreeFly(FreeFlyConfig),
}

/// Camera pose and light position produced for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraFrame {
    pub transform: Transform,
    pub light: Option<DVec3>,
}

/// Viewpoint controller, updated once per frame after entities have moved.
#[derive(Debug, Clone)]
pub struct CameraRig {
    mode: CameraMode,
    transform: Transform,
    light: Option<OrbitLight>,
    projection: Projection,
}

impl CameraRig {
    pub fn new(mode: CameraMode, transform: Transform) -> Self {
        Self {
            mode,
            transform,
            light: None,
            projection: Projection::default(),
        }
    }

    pub fn with_light(mut self, light: OrbitLight) -> Self {
        self.light = Some(light);
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn mode(&self) -> &CameraMode {
        &self.mode
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        self.mode = mode;
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Turn the camera toward `point`, keeping the current orientation when
    /// the point coincides with the camera. Returns whether it turned.
    pub fn look_at(&mut self, point: DVec3) -> bool {
        match Orientation::looking_along(point - self.transform.position) {
            Some(orientation) => {
                self.transform.orientation = orientation;
                true
            }
            None => false,
        }
    }

    /// Advance the camera by one frame.
    ///
    /// The pointer delta is consumed in every mode so the previous sample
    /// never goes stale while a tracking camera is active.
    pub fn update(
        &mut self,
        registry: &EntityRegistry,
        input: &mut InputState,
        dt: f64,
        elapsed: f64,
    ) -> CameraFrame {
        let pointer = input.take_pointer_delta();
        match self.mode {
            CameraMode::Tracking(config) => self.track(&config, registry),
            CameraMode::FreeFly(config) => {
                self.rotate(&config, pointer.x, pointer.y);
                self.fly(&config, input, dt);
            }
        }
        self.frame(elapsed)
    }

    /// Current pose plus the light position at `elapsed`.
    pub fn frame(&self, elapsed: f64) -> CameraFrame {
        CameraFrame {
            transform: self.transform,
            light: self
                .light
                .map(|light| light.position(self.transform.position, elapsed)),
        }
    }

    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_to_rh(
            self.transform.position,
            self.transform.forward(),
            self.transform.up(),
        )
    }

    pub fn view_projection(&self) -> DMat4 {
        self.projection.matrix() * self.view_matrix()
    }

    fn track(&mut self, config: &TrackingConfig, registry: &EntityRegistry) {
        let world = match registry.world_matrix(config.target) {
            Ok(world) => world,
            Err(err) => {
                tracing::warn!(target_entity = %config.target, %err, "camera target missing, holding pose");
                return;
            }
        };
        let (_, rotation, target) = world.to_scale_rotation_translation();
        let eye = match config.offset_space {
            OffsetSpace::Local if rotation.is_finite() => target + rotation * config.offset,
            _ => target + config.offset,
        };
        if !eye.is_finite() {
            return;
        }
        self.transform.position = eye;
        self.look_at(target);
    }

    fn rotate(&mut self, config: &FreeFlyConfig, dx: f64, dy: f64) {
        let o = self.transform.orientation;
        let yaw = o.yaw - dx * config.sensitivity;
        let pitch = (o.pitch - dy * config.sensitivity).clamp(-90.0, 90.0);
        self.transform.orientation.set(yaw, pitch, 0.0);
    }

    fn fly(&mut self, config: &FreeFlyConfig, input: &InputState, dt: f64) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }
        let mut axis = DVec3::ZERO;
        if input.is_held(symbols::FLY_FORWARD) {
            axis.z += 1.0;
        }
        if input.is_held(symbols::FLY_BACKWARD) {
            axis.z -= 1.0;
        }
        if input.is_held(symbols::FLY_RIGHT) {
            axis.x += 1.0;
        }
        if input.is_held(symbols::FLY_LEFT) {
            axis.x -= 1.0;
        }
        if axis == DVec3::ZERO {
            return;
        }
        let step = (self.transform.forward() * axis.z + self.transform.right() * axis.x)
            * (config.move_speed * dt);
        if step.is_finite() {
            self.transform.position += step;
        }
    }
}
