use framecore_common::{EntityId, EntityKind};
use framecore_mesh::MeshHandle;
use glam::{DMat4, DVec3};
use serde::Serialize;

/// Camera data a backend needs to set up its view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraView {
    /// Camera position in world space.
    pub eye: DVec3,
    /// Unit view direction.
    pub forward: DVec3,
    pub fov_y_degrees: f64,
    pub view: DMat4,
    pub projection: DMat4,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            eye: DVec3::ZERO,
            forward: DVec3::Z,
            fov_y_degrees: 60.0,
            view: DMat4::IDENTITY,
            projection: DMat4::IDENTITY,
        }
    }
}

/// One mesh instance to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderItem {
    pub entity: EntityId,
    pub name: Option<String>,
    pub kind: EntityKind,
    pub mesh: MeshHandle,
    /// Local-to-world matrix, parents already composed.
    pub world: DMat4,
}

impl RenderItem {
    pub fn position(&self) -> DVec3 {
        self.world.transform_point3(DVec3::ZERO)
    }
}

/// Everything drawn for one frame, in entity id order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RenderFrame {
    pub frame: u64,
    pub elapsed: f64,
    pub camera: CameraView,
    pub light: Option<DVec3>,
    pub items: Vec<RenderItem>,
}
