use crate::error::KernelError;
use framecore_common::{Aabb, Bounds, EntityId, EntityKind, Transform, VelocityParams};
use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything needed to spawn an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpec {
    pub name: Option<String>,
    pub kind: EntityKind,
    pub transform: Transform,
    pub bounds: Bounds,
    pub velocity: Option<VelocityParams>,
}

impl EntitySpec {
    pub fn new(kind: EntityKind, transform: Transform) -> Self {
        Self {
            name: None,
            kind,
            transform,
            bounds: Bounds::default(),
            velocity: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
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
}

/// Per-entity data stored in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub name: Option<String>,
    pub kind: EntityKind,
    pub transform: Transform,
    pub bounds: Bounds,
    pub velocity: Option<VelocityParams>,
    parent: Option<EntityId>,
}

impl EntityRecord {
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }
}

/// Owner of every entity in a running scene.
///
/// Uses BTreeMap so iteration follows spawn order on every platform. Entities
/// are never removed. Static kinds are frozen once spawned; only players and
/// scripted actors hand out mutable transforms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRegistry {
    entities: BTreeMap<EntityId, EntityRecord>,
    next_id: u64,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Validate and insert an entity. Returns its id.
    pub fn spawn(&mut self, spec: EntitySpec) -> Result<EntityId, KernelError> {
        if !spec.transform.is_valid() {
            return Err(KernelError::InvalidTransform);
        }
        let h = spec.bounds.half_extents;
        if !h.is_finite() || h.min_element() < 0.0 || !spec.bounds.offset.is_finite() {
            return Err(KernelError::InvalidBounds);
        }
        match (spec.kind.is_dynamic(), spec.velocity.is_some()) {
            (true, false) => return Err(KernelError::MissingVelocity(spec.kind)),
            (false, true) => return Err(KernelError::UnexpectedVelocity(spec.kind)),
            _ => {}
        }

        let id = EntityId(self.next_id);
        self.next_id += 1;
        tracing::debug!(%id, kind = ?spec.kind, name = spec.name.as_deref(), "spawned entity");
        self.entities.insert(
            id,
            EntityRecord {
                id,
                name: spec.name,
                kind: spec.kind,
                transform: spec.transform,
                bounds: spec.bounds,
                velocity: spec.velocity,
                parent: None,
            },
        );
        Ok(id)
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Read-only access to all entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityRecord> {
        self.entities.values()
    }

    /// Ids of every entity of the given kind, in id order.
    pub fn ids_of_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.kind == kind)
            .map(|e| e.id)
            .collect()
    }

    /// First entity carrying this name.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities
            .values()
            .find(|e| e.name.as_deref() == Some(name))
            .map(|e| e.id)
    }

    pub fn transform(&self, id: EntityId) -> Result<&Transform, KernelError> {
        self.record(id).map(|e| &e.transform)
    }

    /// Mutable transform of a player or scripted actor.
    pub fn transform_mut(&mut self, id: EntityId) -> Result<&mut Transform, KernelError> {
        let record = self
            .entities
            .get_mut(&id)
            .ok_or(KernelError::UnknownEntity(id))?;
        if !record.kind.is_dynamic() {
            return Err(KernelError::ImmutableEntity {
                id,
                kind: record.kind,
            });
        }
        Ok(&mut record.transform)
    }

    /// Replace the transform of a dynamic entity.
    pub fn set_transform(&mut self, id: EntityId, new: Transform) -> Result<(), KernelError> {
        if !new.is_valid() {
            return Err(KernelError::InvalidTransform);
        }
        *self.transform_mut(id)? = new;
        Ok(())
    }

    pub fn parent_of(&self, id: EntityId) -> Option<EntityId> {
        self.entities.get(&id).and_then(|e| e.parent)
    }

    /// Attach `child` under `parent`, or detach it with `None`.
    ///
    /// Rejects self-parenting and any link that would close a cycle; on error
    /// the existing parent is left untouched.
    pub fn set_parent(
        &mut self,
        child: EntityId,
        parent: Option<EntityId>,
    ) -> Result<(), KernelError> {
        self.record(child)?;
        if let Some(p) = parent {
            self.record(p)?;
            let mut cursor = Some(p);
            while let Some(ancestor) = cursor {
                if ancestor == child {
                    tracing::warn!(%child, parent = %p, "rejected cyclic parent assignment");
                    return Err(KernelError::DegenerateTransformParent { child, parent: p });
                }
                cursor = self.parent_of(ancestor);
            }
        }
        if let Some(record) = self.entities.get_mut(&child) {
            record.parent = parent;
        }
        Ok(())
    }

    /// Local-to-world matrix: `parent.world * local`, walked up the chain.
    pub fn world_matrix(&self, id: EntityId) -> Result<DMat4, KernelError> {
        let mut record = self.record(id)?;
        let mut matrix = record.transform.matrix();
        while let Some(parent) = record.parent {
            record = self.record(parent)?;
            matrix = record.transform.matrix() * matrix;
        }
        Ok(matrix)
    }

    pub fn world_position(&self, id: EntityId) -> Result<DVec3, KernelError> {
        Ok(self.world_matrix(id)?.transform_point3(DVec3::ZERO))
    }

    /// World-space axis-aligned box around the entity's bounds.
    pub fn world_aabb(&self, id: EntityId) -> Result<Aabb, KernelError> {
        let bounds = self.record(id)?.bounds;
        Ok(Aabb::enclosing(&bounds, &self.world_matrix(id)?))
    }

    /// Deterministic hash of every transform, in id order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for (id, record) in &self.entities {
            let t = &record.transform;
            mix(&mut h, &id.0.to_le_bytes());
            for v in [
                t.position.x,
                t.position.y,
                t.position.z,
                t.orientation.yaw,
                t.orientation.pitch,
                t.orientation.roll,
                t.scale.x,
                t.scale.y,
                t.scale.z,
            ] {
                mix(&mut h, &v.to_le_bytes());
            }
        }
        h
    }

    fn record(&self, id: EntityId) -> Result<&EntityRecord, KernelError> {
        self.entities.get(&id).ok_or(KernelError::UnknownEntity(id))
    }
}
