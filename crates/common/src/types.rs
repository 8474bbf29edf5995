use glam::{DMat4, DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

/// Stable identifier for an entity, assigned sequentially by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What role an entity plays in the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Driven by input through the movement controller.
    Player,
    /// Advanced by a fixed rule each frame.
    ScriptedActor,
    /// Never moves after spawn.
    StaticObstacle,
    /// Non-blocking volume that toggles a modifier on overlap.
    TriggerVolume,
}

impl EntityKind {
    /// Whether the registry allows transform mutation after spawn.
    pub fn is_dynamic(self) -> bool {
        matches!(self, Self::Player | Self::ScriptedActor)
    }
}

/// Linear speed (units/s) and turn speed (degrees/s) for moving entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityParams {
    pub linear_speed: f64,
    pub turn_speed: f64,
}

impl Default for VelocityParams {
    fn default() -> Self {
        Self {
            linear_speed: 5.0,
            turn_speed: 60.0,
        }
    }
}

/// Wrap an angle in degrees into `[-180, 180)`. Angles already in range are
/// returned untouched so repeated small increments do not accumulate rounding.
pub fn wrap_degrees(angle: f64) -> f64 {
    if (-180.0..180.0).contains(&angle) {
        return angle;
    }
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Euler orientation in degrees.
///
/// Y is up. At zero yaw and pitch the forward axis is `+Z`; positive yaw turns
/// forward toward `+X`, positive pitch raises the nose. Every component is kept
/// wrapped to `[-180, 180)` and finite.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Orientation {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Orientation {
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        let mut o = Self::default();
        o.set(yaw, pitch, roll);
        o
    }

    /// Assign all three angles. Non-finite inputs leave that component unchanged.
    pub fn set(&mut self, yaw: f64, pitch: f64, roll: f64) {
        assign_wrapped(&mut self.yaw, yaw);
        assign_wrapped(&mut self.pitch, pitch);
        assign_wrapped(&mut self.roll, roll);
    }

    /// Add a yaw increment in degrees.
    pub fn add_yaw(&mut self, delta: f64) {
        let yaw = self.yaw + delta;
        assign_wrapped(&mut self.yaw, yaw);
    }

    /// Orientation whose forward axis points along `dir`. Returns `None` for a
    /// zero-length or non-finite direction.
    pub fn looking_along(dir: DVec3) -> Option<Self> {
        let len = dir.length();
        if !len.is_finite() || len <= f64::EPSILON {
            return None;
        }
        let yaw = dir.x.atan2(dir.z).to_degrees();
        let pitch = (dir.y / len).clamp(-1.0, 1.0).asin().to_degrees();
        Some(Self::new(yaw, pitch, 0.0))
    }

    /// Unit forward axis.
    pub fn forward(&self) -> DVec3 {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        DVec3::new(sy * cp, sp, cy * cp)
    }

    pub fn rotation(&self) -> DQuat {
        DQuat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            -self.pitch.to_radians(),
            self.roll.to_radians(),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite() && self.roll.is_finite()
    }
}

fn assign_wrapped(slot: &mut f64, value: f64) {
    if value.is_finite() {
        *slot = wrap_degrees(value);
    }
}

/// Spatial transform: position, orientation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    pub orientation: Orientation,
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            orientation: Orientation::default(),
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn rotation(&self) -> DQuat {
        self.orientation.rotation()
    }

    pub fn forward(&self) -> DVec3 {
        self.orientation.forward()
    }

    /// Unit right axis (`-X` at zero orientation).
    pub fn right(&self) -> DVec3 {
        self.rotation() * DVec3::NEG_X
    }

    pub fn up(&self) -> DVec3 {
        self.rotation() * DVec3::Y
    }

    /// Local-to-parent matrix.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation(), self.position)
    }

    /// Scale finite and non-negative, position and orientation finite.
    pub fn is_valid(&self) -> bool {
        self.position.is_finite()
            && self.orientation.is_finite()
            && self.scale.is_finite()
            && self.scale.min_element() >= 0.0
    }
}
