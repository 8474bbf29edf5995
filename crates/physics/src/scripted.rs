use framecore_common::{Transform, VelocityParams};
use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A world axis, used to pick one coordinate of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn get(self, v: DVec3) -> f64 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }

    pub fn set(self, v: &mut DVec3, value: f64) {
        match self {
            Self::X => v.x = value,
            Self::Y => v.y = value,
            Self::Z => v.z = value,
        }
    }
}

/// Endless forward patrol that wraps back to its start with lateral jitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolPath {
    /// Coordinate checked against the wrap threshold.
    pub axis: Axis,
    pub wrap_above: f64,
    pub reset_to: f64,
    /// Coordinate redrawn on every wrap.
    pub jitter_axis: Axis,
    pub jitter_range: [f64; 2],
    /// Fraction of the actor's linear speed.
    pub speed_factor: f64,
}

impl Default for PatrolPath {
    fn default() -> Self {
        Self {
            axis: Axis::Z,
            wrap_above: 60.0,
            reset_to: -50.0,
            jitter_axis: Axis::X,
            jitter_range: [-3.0, 3.0],
            speed_factor: 0.8,
        }
    }
}

/// Spin at fixed rates while the uniform scale breathes around a base value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseSpin {
    pub base_scale: f64,
    pub amplitude: f64,
    /// Radians per second of the scale oscillation.
    pub frequency: f64,
    /// Degrees per second for yaw, pitch, roll.
    pub spin_rates: DVec3,
}

impl Default for PulseSpin {
    fn default() -> Self {
        Self {
            base_scale: 2.0,
            amplitude: 0.5,
            frequency: 1.0,
            spin_rates: DVec3::new(30.0, 20.0, 10.0),
        }
    }
}

/// Fixed per-frame rule driving a scripted actor. Input never reaches these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Script {
    Patrol(PatrolPath),
    Pulse(PulseSpin),
}

impl Script {
    /// Advance `transform` by one frame.
    ///
    /// `elapsed` is total scene time, used by time-based animations. A patrol
    /// that crosses its threshold wraps within this same call.
    pub fn step<R: Rng + ?Sized>(
        &self,
        transform: &mut Transform,
        velocity: &VelocityParams,
        dt: f64,
        elapsed: f64,
        rng: &mut R,
    ) {
        match self {
            Self::Patrol(path) => patrol(path, transform, velocity, dt, rng),
            Self::Pulse(pulse) => pulse_spin(pulse, transform, elapsed),
        }
    }
}

fn patrol<R: Rng + ?Sized>(
    path: &PatrolPath,
    transform: &mut Transform,
    velocity: &VelocityParams,
    dt: f64,
    rng: &mut R,
) {
    if dt <= 0.0 || !dt.is_finite() {
        return;
    }
    let displacement = transform.forward() * (dt * velocity.linear_speed * path.speed_factor);
    if displacement.is_finite() {
        transform.position += displacement;
    }

    if path.axis.get(transform.position) > path.wrap_above {
        path.axis.set(&mut transform.position, path.reset_to);
        let [a, b] = path.jitter_range;
        if a.is_finite() && b.is_finite() {
            let jitter = rng.gen_range(a.min(b)..=a.max(b));
            path.jitter_axis.set(&mut transform.position, jitter);
        }
        tracing::trace!(position = ?transform.position, "patrol wrapped");
    }
}

fn pulse_spin(pulse: &PulseSpin, transform: &mut Transform, elapsed: f64) {
    let r = pulse.spin_rates * elapsed;
    transform.orientation.set(r.x, r.y, r.z);
    let s = pulse.base_scale + pulse.amplitude * (pulse.frequency * elapsed).sin();
    if s.is_finite() {
        transform.scale = DVec3::splat(s.max(0.0));
    }
}
