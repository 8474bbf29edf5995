use framecore_common::{EntityId, EntityKind};

/// Errors from registry configuration.
///
/// All of these are raised while a scene is being set up; the per-frame path
/// never produces them for ordinary gameplay.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum KernelError {
    #[error("entity {0} not found")]
    UnknownEntity(EntityId),
    #[error("assigning {parent} as parent of {child} would create a cycle")]
    DegenerateTransformParent { child: EntityId, parent: EntityId },
    #[error("entity {id} is a {kind:?} and cannot be moved after spawn")]
    ImmutableEntity { id: EntityId, kind: EntityKind },
    #[error("transform has non-finite components or negative scale")]
    InvalidTransform,
    #[error("bounds must have finite, non-negative half-extents")]
    InvalidBounds,
    #[error("{0:?} entities require velocity parameters")]
    MissingVelocity(EntityKind),
    #[error("{0:?} entities cannot carry velocity parameters")]
    UnexpectedVelocity(EntityKind),
}
