use crate::builder::MeshBuffer;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Content-addressed handle to a built mesh. Renderers only ever see handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u64);

impl MeshHandle {
    /// Hash of the buffer contents; identical buffers share a handle.
    pub fn of(mesh: &MeshBuffer) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(mesh.position_bytes());
        if let Some(normals) = mesh.normal_bytes() {
            hasher.update(normals);
        }
        hasher.update(mesh.index_bytes());
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        Self(u64::from_le_bytes(bytes))
    }
}

#[derive(Debug, Clone)]
struct Entry {
    mesh: MeshBuffer,
    refs: u32,
}

/// Mesh buffers acquired at scene construction and released at teardown.
///
/// Inserting an identical buffer twice returns the same handle and bumps its
/// reference count; the buffer is dropped when the last reference is released.
#[derive(Debug, Clone, Default)]
pub struct MeshStore {
    meshes: BTreeMap<MeshHandle, Entry>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mesh: MeshBuffer) -> MeshHandle {
        let handle = MeshHandle::of(&mesh);
        self.meshes
            .entry(handle)
            .and_modify(|e| e.refs += 1)
            .or_insert_with(|| {
                tracing::debug!(name = %mesh.name, ?handle, "registered mesh");
                Entry { mesh, refs: 1 }
            });
        handle
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&MeshBuffer> {
        self.meshes.get(&handle).map(|e| &e.mesh)
    }

    /// Drop one reference. Returns false for an unknown handle.
    pub fn release(&mut self, handle: MeshHandle) -> bool {
        let Some(entry) = self.meshes.get_mut(&handle) else {
            return false;
        };
        entry.refs -= 1;
        if entry.refs == 0 {
            self.meshes.remove(&handle);
            tracing::debug!(?handle, "released mesh");
        }
        true
    }

    /// Number of distinct meshes held.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = MeshHandle> + '_ {
        self.meshes.keys().copied()
    }
}
