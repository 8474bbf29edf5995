use std::path::PathBuf;

use framecore_common::EntityKind;
use framecore_kernel::KernelError;
use framecore_mesh::GeometryError;

/// Errors from loading a scene and building a simulation from it.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("scene YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error("mesh {name:?}: {source}")]
    Geometry {
        name: String,
        #[source]
        source: GeometryError,
    },
    #[error("unknown mesh {0:?}")]
    UnknownMesh(String),
    #[error("unknown entity name {0:?}")]
    UnknownEntityName(String),
    #[error("entity name {0:?} is used more than once")]
    DuplicateName(String),
    #[error("mesh name {0:?} is used more than once")]
    DuplicateMeshName(String),
    #[error("entity {name:?} is a {kind:?}, only scripted actors run scripts")]
    ScriptNotAllowed { name: String, kind: EntityKind },
    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
}
