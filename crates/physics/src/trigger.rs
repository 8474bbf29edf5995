use std::collections::BTreeSet;

use framecore_common::{Aabb, EntityId};
use framecore_kernel::EntityRegistry;
use serde::Serialize;

/// Closed-interval overlap on all three axes. Touching faces count.
pub fn overlap(a: &Aabb, b: &Aabb) -> bool {
    a.min.x <= b.max.x
        && b.min.x <= a.max.x
        && a.min.y <= b.max.y
        && b.min.y <= a.max.y
        && a.min.z <= b.max.z
        && b.min.z <= a.max.z
}

/// Which trigger volumes the controlled entity currently touches.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerDetector;

impl TriggerDetector {
    /// Test `controlled` against every id in `triggers` using world-space boxes.
    ///
    /// Unknown ids are skipped. An unknown `controlled` entity overlaps nothing.
    pub fn evaluate(
        registry: &EntityRegistry,
        controlled: EntityId,
        triggers: &[EntityId],
    ) -> BTreeSet<EntityId> {
        let Ok(subject) = registry.world_aabb(controlled) else {
            tracing::warn!(%controlled, "controlled entity missing, no triggers evaluated");
            return BTreeSet::new();
        };

        let mut active = BTreeSet::new();
        for &id in triggers {
            match registry.world_aabb(id) {
                Ok(volume) if overlap(&subject, &volume) => {
                    active.insert(id);
                }
                Ok(_) => {}
                Err(err) => tracing::warn!(%id, %err, "skipping trigger"),
            }
        }
        active
    }
}

/// A trigger starting or stopping to overlap the controlled entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TriggerEdge {
    pub trigger_id: EntityId,
    pub entered: bool,
}

/// Remembers last frame's active set to derive enter and exit edges.
#[derive(Debug, Clone, Default)]
pub struct TriggerTracker {
    previous: BTreeSet<EntityId>,
}

impl TriggerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `active` against the previous frame. Exits come first, then
    /// entries, each in id order.
    pub fn update(&mut self, active: &BTreeSet<EntityId>) -> Vec<TriggerEdge> {
        let mut edges: Vec<TriggerEdge> = self
            .previous
            .difference(active)
            .map(|&trigger_id| TriggerEdge {
                trigger_id,
                entered: false,
            })
            .collect();
        edges.extend(active.difference(&self.previous).map(|&trigger_id| TriggerEdge {
            trigger_id,
            entered: true,
        }));

        for edge in &edges {
            tracing::debug!(trigger = %edge.trigger_id, entered = edge.entered, "trigger edge");
        }
        self.previous.clone_from(active);
        edges
    }

    pub fn active(&self) -> &BTreeSet<EntityId> {
        &self.previous
    }

    pub fn any_active(&self) -> bool {
        !self.previous.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MovementController;
    use framecore_common::{Bounds, EntityKind, Transform, VelocityParams};
    use framecore_input::{InputState, symbols};
    use framecore_kernel::EntitySpec;
    use glam::DVec3;

    fn boxed(center: DVec3, half: DVec3) -> Aabb {
        Aabb::from_center_half_extents(center, half)
    }

    #[test]
    fn overlap_is_symmetric() {
        let cases = [
            (boxed(DVec3::ZERO, DVec3::ONE), boxed(DVec3::new(1.5, 0.0, 0.0), DVec3::ONE)),
            (boxed(DVec3::ZERO, DVec3::ONE), boxed(DVec3::new(3.0, 0.0, 0.0), DVec3::ONE)),
            (boxed(DVec3::ZERO, DVec3::splat(5.0)), boxed(DVec3::ONE, DVec3::splat(0.1))),
            (boxed(DVec3::ZERO, DVec3::ONE), boxed(DVec3::new(2.0, 0.0, 0.0), DVec3::ONE)),
        ];
        for (a, b) in &cases {
            assert_eq!(overlap(a, b), overlap(b, a));
            assert!(overlap(a, a));
        }
    }

    #[test]
    fn touching_faces_overlap() {
        let a = boxed(DVec3::ZERO, DVec3::ONE);
        let b = boxed(DVec3::new(2.0, 0.0, 0.0), DVec3::ONE);
        assert!(overlap(&a, &b));
    }

    fn world_with_pad(player_at: DVec3, pad_at: DVec3) -> (EntityRegistry, EntityId, EntityId) {
        let mut registry = EntityRegistry::new();
        let player = registry
            .spawn(
                EntitySpec::new(EntityKind::Player, Transform::from_position(player_at))
                    .with_bounds(Bounds::new(DVec3::new(1.5, 0.05, 1.5)))
                    .with_velocity(VelocityParams {
                        linear_speed: 5.0,
                        turn_speed: 80.0,
                    }),
            )
            .unwrap();
        let pad = registry
            .spawn(
                EntitySpec::new(EntityKind::TriggerVolume, Transform::from_position(pad_at))
                    .with_bounds(Bounds::new(DVec3::new(1.5, 0.05, 1.5))),
            )
            .unwrap();
        (registry, player, pad)
    }

    #[test]
    fn contained_box_is_active_and_separated_box_is_not() {
        let mut registry = EntityRegistry::new();
        let small = registry
            .spawn(
                EntitySpec::new(EntityKind::Player, Transform::from_position(DVec3::new(0.0, 0.0, 1.0)))
                    .with_bounds(Bounds::new(DVec3::splat(0.5)))
                    .with_velocity(VelocityParams::default()),
            )
            .unwrap();
        let big = registry
            .spawn(
                EntitySpec::new(EntityKind::TriggerVolume, Transform::default())
                    .with_bounds(Bounds::new(DVec3::splat(4.0))),
            )
            .unwrap();
        let far = registry
            .spawn(
                EntitySpec::new(EntityKind::TriggerVolume, Transform::from_position(DVec3::new(0.0, 0.0, 10.0)))
                    .with_bounds(Bounds::new(DVec3::splat(1.0))),
            )
            .unwrap();

        let active = TriggerDetector::evaluate(&registry, small, &[big, far]);
        assert!(active.contains(&big));
        assert!(!active.contains(&far));
    }

    #[test]
    fn pad_under_player_boosts_next_step() {
        let (mut registry, player, pad) =
            world_with_pad(DVec3::new(0.0, 0.0, 20.0), DVec3::new(0.0, 0.05, 20.0));
        let active = TriggerDetector::evaluate(&registry, player, &[pad]);
        assert_eq!(active.iter().copied().collect::<Vec<_>>(), vec![pad]);

        let mut input = InputState::new();
        input.press(symbols::FORWARD);
        MovementController::default()
            .step_entity(&mut registry, player, &input, 1.0, !active.is_empty())
            .unwrap();
        assert_eq!(registry.transform(player).unwrap().position.z, 30.0);
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let (registry, player, pad) = world_with_pad(DVec3::ZERO, DVec3::ZERO);
        let active = TriggerDetector::evaluate(&registry, player, &[EntityId(999), pad]);
        assert_eq!(active.len(), 1);
        assert!(TriggerDetector::evaluate(&registry, EntityId(999), &[pad]).is_empty());
    }

    #[test]
    fn tracker_reports_enter_and_exit_once() {
        let mut tracker = TriggerTracker::new();
        let a = EntityId(1);
        let b = EntityId(2);

        let edges = tracker.update(&BTreeSet::from([a]));
        assert_eq!(edges, vec![TriggerEdge { trigger_id: a, entered: true }]);
        assert!(tracker.any_active());

        assert!(tracker.update(&BTreeSet::from([a])).is_empty());

        let edges = tracker.update(&BTreeSet::from([b]));
        assert_eq!(
            edges,
            vec![
                TriggerEdge { trigger_id: a, entered: false },
                TriggerEdge { trigger_id: b, entered: true },
            ]
        );

        let edges = tracker.update(&BTreeSet::new());
        assert_eq!(edges, vec![TriggerEdge { trigger_id: b, entered: false }]);
        assert!(!tracker.any_active());
    }
}
