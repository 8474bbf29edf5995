use std::path::Path;

use framecore_camera::{FreeFlyConfig, OffsetSpace, OrbitLight, Projection};
use framecore_common::{Bounds, EntityKind, Orientation, Transform, VelocityParams};
use framecore_input::InputBindings;
use framecore_mesh::{MeshDescriptor, NormalMode, primitives};
use framecore_physics::{MovementConfig, Script};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::SceneError;

/// Declarative description of a scene, loaded from YAML or built by a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub name: String,
    /// Seeds the RNG used by scripted actors.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub movement: MovementConfig,
    /// Key bindings for hosts that forward raw key events. Defaults follow
    /// the camera mode.
    #[serde(default)]
    pub bindings: Option<InputBindings>,
    #[serde(default)]
    pub meshes: Vec<MeshConfig>,
    pub entities: Vec<EntityConfig>,
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: Option<OrbitLight>,
}

/// A named mesh, built once when the scene is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    pub name: String,
    pub source: MeshSource,
    /// Overrides the source's own normal mode.
    #[serde(default)]
    pub normal_mode: Option<NormalMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MeshSource {
    Cube,
    Plane,
    Box { half_extents: DVec3 },
    Sphere { stacks: u32, slices: u32 },
    Custom { descriptor: MeshDescriptor },
}

impl MeshConfig {
    pub fn new(name: impl Into<String>, source: MeshSource) -> Self {
        Self {
            name: name.into(),
            source,
            normal_mode: None,
        }
    }

    pub fn descriptor(&self) -> MeshDescriptor {
        let mut desc = match &self.source {
            MeshSource::Cube => primitives::cube(),
            MeshSource::Plane => primitives::unit_plane(),
            MeshSource::Box { half_extents } => primitives::box_from_half_extents(*half_extents),
            MeshSource::Sphere { stacks, slices } => primitives::sphere(*stacks, *slices),
            MeshSource::Custom { descriptor } => descriptor.clone(),
        };
        desc.name.clone_from(&self.name);
        if let Some(mode) = self.normal_mode {
            desc.normal_mode = mode;
        }
        desc
    }
}

/// One entity to spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub kind: EntityKind,
    #[serde(default)]
    pub position: DVec3,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "unit_scale")]
    pub scale: DVec3,
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub velocity: Option<VelocityParams>,
    #[serde(default)]
    pub script: Option<Script>,
    /// Name of an entry in [`SceneConfig::meshes`]. Entities without a mesh
    /// still take part in simulation but are not drawn.
    #[serde(default)]
    pub mesh: Option<String>,
    /// Name of another entity; the transform is then relative to it.
    #[serde(default)]
    pub parent: Option<String>,
}

fn unit_scale() -> DVec3 {
    DVec3::ONE
}

impl EntityConfig {
    pub fn new(kind: EntityKind, position: DVec3) -> Self {
        Self {
            name: None,
            kind,
            position,
            orientation: Orientation::default(),
            scale: DVec3::ONE,
            bounds: Bounds::default(),
            velocity: None,
            script: None,
            mesh: None,
            parent: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn scaled(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_velocity(mut self, velocity: VelocityParams) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn with_script(mut self, script: Script) -> Self {
        self.script = Some(script);
        self
    }

    pub fn with_mesh(mut self, mesh: impl Into<String>) -> Self {
        self.mesh = Some(mesh.into());
        self
    }

    pub fn child_of(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Local transform with angles normalized.
    pub fn transform(&self) -> Transform {
        let o = self.orientation;
        Transform {
            position: self.position,
            orientation: Orientation::new(o.yaw, o.pitch, o.roll),
            scale: self.scale,
        }
    }
}

/// Camera rig setup. The tracking target is named, resolved at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub mode: CameraModeConfig,
    #[serde(default)]
    pub position: DVec3,
    /// Initial orientation for free-fly cameras.
    #[serde(default)]
    pub look_at: Option<DVec3>,
    #[serde(default)]
    pub projection: Projection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CameraModeConfig {
    Tracking {
        target: String,
        offset: DVec3,
        #[serde(default)]
        offset_space: OffsetSpace,
    },
    FreeFly(FreeFlyConfig),
}

impl SceneConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SceneError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading scene");
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml(&self) -> Result<String, SceneError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Bindings to use: the configured table, or a default for the camera mode.
    pub fn effective_bindings(&self) -> InputBindings {
        match (&self.bindings, &self.camera.mode) {
            (Some(bindings), _) => bindings.clone(),
            (None, CameraModeConfig::FreeFly(_)) => InputBindings::free_fly(),
            (None, CameraModeConfig::Tracking { .. }) => InputBindings::driving(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
name: minimal
seed: 7
meshes:
  - name: block
    source:
      shape: cube
entities:
  - name: player
    kind: player
    position: [0.0, 0.5, 0.0]
    velocity:
      linear_speed: 5.0
      turn_speed: 80.0
    mesh: block
  - kind: trigger_volume
    position: [0.0, 0.05, 20.0]
    scale: [3.0, 0.1, 3.0]
camera:
  mode:
    type: tracking
    target: player
    offset: [0.0, 5.0, -15.0]
"#;

    #[test]
    fn minimal_scene_parses_with_defaults() {
        let scene = SceneConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(scene.seed, 7);
        assert_eq!(scene.movement, MovementConfig::default());
        assert_eq!(scene.entities.len(), 2);
        let pad = &scene.entities[1];
        assert_eq!(pad.bounds, Bounds::default());
        assert_eq!(pad.orientation, Orientation::default());
        assert!(pad.velocity.is_none());
        assert_eq!(scene.entities[0].scale, DVec3::ONE);
        assert!(matches!(
            scene.camera.mode,
            CameraModeConfig::Tracking { offset_space: OffsetSpace::Local, .. }
        ));
        assert_eq!(scene.effective_bindings(), InputBindings::driving());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let scene = SceneConfig::load(file.path()).unwrap();
        assert_eq!(scene.name, "minimal");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SceneConfig::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let err = SceneConfig::from_yaml_str("name: [unclosed").unwrap_err();
        assert!(matches!(err, SceneError::Yaml(_)));
    }

    #[test]
    fn yaml_round_trip_keeps_scene() {
        let scene = SceneConfig::from_yaml_str(MINIMAL).unwrap();
        let again = SceneConfig::from_yaml_str(&scene.to_yaml().unwrap()).unwrap();
        assert_eq!(scene, again);
    }

    #[test]
    fn mesh_config_renames_and_overrides_normals() {
        let mut config = MeshConfig::new("ball", MeshSource::Sphere { stacks: 4, slices: 6 });
        config.normal_mode = Some(NormalMode::None);
        let desc = config.descriptor();
        assert_eq!(desc.name, "ball");
        assert_eq!(desc.normal_mode, NormalMode::None);
    }

    #[test]
    fn entity_transform_wraps_angles() {
        let mut e = EntityConfig::new(EntityKind::StaticObstacle, DVec3::ZERO);
        e.orientation = Orientation {
            yaw: 270.0,
            pitch: 0.0,
            roll: 0.0,
        };
        assert_eq!(e.transform().orientation.yaw, -90.0);
    }
}
