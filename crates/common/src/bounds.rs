use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// Local-space box attached to an entity: half-extents around an offset.
///
/// Values are in the entity's local units, so the entity's scale and rotation
/// apply when the box is placed in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub half_extents: DVec3,
    #[serde(default)]
    pub offset: DVec3,
}

impl Default for Bounds {
    /// Unit cube centered on the origin.
    fn default() -> Self {
        Self {
            half_extents: DVec3::splat(0.5),
            offset: DVec3::ZERO,
        }
    }
}

impl Bounds {
    pub fn new(half_extents: DVec3) -> Self {
        Self {
            half_extents,
            offset: DVec3::ZERO,
        }
    }

    /// The eight local-space corners.
    pub fn corners(&self) -> [DVec3; 8] {
        let h = self.half_extents;
        let c = self.offset;
        std::array::from_fn(|i| {
            let sx = if i & 1 == 0 { -1.0 } else { 1.0 };
            let sy = if i & 2 == 0 { -1.0 } else { 1.0 };
            let sz = if i & 4 == 0 { -1.0 } else { 1.0 };
            c + h * DVec3::new(sx, sy, sz)
        })
    }
}

/// World-space axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Tightest axis-aligned box around `bounds` placed by `world`.
    pub fn enclosing(bounds: &Bounds, world: &DMat4) -> Self {
        let mut min = DVec3::splat(f64::INFINITY);
        let mut max = DVec3::splat(f64::NEG_INFINITY);
        for corner in bounds.corners() {
            let p = world.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> DVec3 {
        (self.max - self.min) * 0.5
    }

    /// True when every axis has positive extent.
    pub fn is_non_degenerate(&self) -> bool {
        (self.max - self.min).min_element() > 0.0
    }
}
