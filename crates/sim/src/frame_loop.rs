use std::collections::{BTreeMap, BTreeSet};

use framecore_camera::{CameraFrame, CameraMode, CameraRig, TrackingConfig};
use framecore_common::{EntityId, EntityKind, Transform};
use framecore_input::{InputBindings, InputState};
use framecore_kernel::{Clock, EntityRegistry, EntitySpec};
use framecore_mesh::{MeshBuilder, MeshHandle, MeshStore};
use framecore_physics::{MovementController, Script, TriggerDetector, TriggerEdge, TriggerTracker};
use framecore_render::{CameraView, RenderFrame, RenderItem};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::SceneError;
use crate::scene::{CameraModeConfig, SceneConfig};

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    /// Sanitized delta actually used.
    pub dt: f64,
    pub elapsed: f64,
    pub active_triggers: Vec<EntityId>,
    pub edges: Vec<TriggerEdge>,
    /// Whether the next player step is boosted.
    pub boosting: bool,
    pub camera: CameraFrame,
}

/// Owns a scene and advances it one frame at a time.
///
/// Per tick: clock, player movement (boosted by the previous frame's
/// triggers), scripted actors, trigger evaluation, camera. The host writes
/// input through [`SimulationLoop::input_mut`] before each tick.
pub struct SimulationLoop {
    name: String,
    clock: Clock,
    registry: EntityRegistry,
    input: InputState,
    bindings: InputBindings,
    movement: MovementController,
    controlled: Option<EntityId>,
    scripts: BTreeMap<EntityId, Script>,
    rng: StdRng,
    triggers: Vec<EntityId>,
    tracker: TriggerTracker,
    boosting: bool,
    camera: CameraRig,
    meshes: MeshStore,
    mesh_of: BTreeMap<EntityId, MeshHandle>,
    report: FrameReport,
}

impl SimulationLoop {
    /// Build meshes, spawn entities, link parents and set up the camera.
    pub fn from_config(config: &SceneConfig) -> Result<Self, SceneError> {
        let _span = tracing::info_span!("scene_build", scene = %config.name).entered();

        let mut meshes = MeshStore::new();
        let mut built = BTreeMap::new();
        for mesh in &config.meshes {
            let buffer = MeshBuilder::build(&mesh.descriptor()).map_err(|source| {
                SceneError::Geometry {
                    name: mesh.name.clone(),
                    source,
                }
            })?;
            if built.insert(mesh.name.as_str(), buffer).is_some() {
                return Err(SceneError::DuplicateMeshName(mesh.name.clone()));
            }
        }

        let mut registry = EntityRegistry::new();
        let mut by_name = BTreeMap::new();
        let mut scripts = BTreeMap::new();
        let mut mesh_of = BTreeMap::new();
        let mut links = Vec::new();
        for entity in &config.entities {
            if entity.script.is_some() && entity.kind != EntityKind::ScriptedActor {
                return Err(SceneError::ScriptNotAllowed {
                    name: entity.name.clone().unwrap_or_default(),
                    kind: entity.kind,
                });
            }

            let mut spec = EntitySpec::new(entity.kind, entity.transform()).with_bounds(entity.bounds);
            if let Some(velocity) = entity.velocity {
                spec = spec.with_velocity(velocity);
            }
            if let Some(name) = &entity.name {
                spec = spec.named(name.clone());
            }
            let id = registry.spawn(spec)?;

            if let Some(name) = &entity.name {
                if by_name.insert(name.as_str(), id).is_some() {
                    return Err(SceneError::DuplicateName(name.clone()));
                }
            }
            if let Some(script) = entity.script {
                scripts.insert(id, script);
            }
            if let Some(mesh) = &entity.mesh {
                let buffer = built
                    .get(mesh.as_str())
                    .ok_or_else(|| SceneError::UnknownMesh(mesh.clone()))?;
                mesh_of.insert(id, meshes.insert(buffer.clone()));
            }
            if let Some(parent) = &entity.parent {
                links.push((id, parent.as_str()));
            }
        }

        for (child, parent) in links {
            let parent = *by_name
                .get(parent)
                .ok_or_else(|| SceneError::UnknownEntityName(parent.to_string()))?;
            registry.set_parent(child, Some(parent))?;
        }

        let controlled = registry.ids_of_kind(EntityKind::Player).first().copied();
        let triggers = registry.ids_of_kind(EntityKind::TriggerVolume);

        let mode = match &config.camera.mode {
            CameraModeConfig::Tracking {
                target,
                offset,
                offset_space,
            } => CameraMode::Tracking(TrackingConfig {
                target: *by_name
                    .get(target.as_str())
                    .ok_or_else(|| SceneError::UnknownEntityName(target.clone()))?,
                offset: *offset,
                offset_space: *offset_space,
            }),
            CameraModeConfig::FreeFly(fly) => CameraMode::FreeFly(*fly),
        };
        let mut camera = CameraRig::new(mode, Transform::from_position(config.camera.position))
            .with_projection(config.camera.projection);
        if let Some(point) = config.camera.look_at {
            camera.look_at(point);
        }
        if let Some(light) = config.light {
            camera = camera.with_light(light);
        }
        let report = FrameReport {
            frame: 0,
            dt: 0.0,
            elapsed: 0.0,
            active_triggers: Vec::new(),
            edges: Vec::new(),
            boosting: false,
            camera: camera.frame(0.0),
        };

        tracing::info!(
            entities = registry.len(),
            meshes = meshes.len(),
            triggers = triggers.len(),
            scripted = scripts.len(),
            "scene built"
        );

        Ok(Self {
            name: config.name.clone(),
            clock: Clock::new(),
            registry,
            input: InputState::new(),
            bindings: config.effective_bindings(),
            movement: MovementController::new(config.movement),
            controlled,
            scripts,
            rng: StdRng::seed_from_u64(config.seed),
            triggers,
            tracker: TriggerTracker::new(),
            boosting: false,
            camera,
            meshes,
            mesh_of,
            report,
        })
    }

    /// Advance the scene by one frame.
    pub fn tick(&mut self, raw_dt: f64) -> &FrameReport {
        let _span = tracing::info_span!("sim_tick", frame = self.clock.frame() + 1).entered();

        let dt = self.clock.advance(raw_dt);
        let elapsed = self.clock.elapsed();

        if let Some(player) = self.controlled {
            let stepped =
                self.movement
                    .step_entity(&mut self.registry, player, &self.input, dt, self.boosting);
            if let Err(err) = stepped {
                tracing::warn!(%player, %err, "player step skipped");
            }
        }

        for (&id, script) in &self.scripts {
            let Some(velocity) = self.registry.get(id).and_then(|r| r.velocity) else {
                continue;
            };
            match self.registry.transform_mut(id) {
                Ok(transform) => script.step(transform, &velocity, dt, elapsed, &mut self.rng),
                Err(err) => tracing::warn!(%id, %err, "scripted step skipped"),
            }
        }

        let active = match self.controlled {
            Some(player) => TriggerDetector::evaluate(&self.registry, player, &self.triggers),
            None => BTreeSet::new(),
        };
        let edges = self.tracker.update(&active);
        self.boosting = !active.is_empty();

        let camera = self.camera.update(&self.registry, &mut self.input, dt, elapsed);

        self.report = FrameReport {
            frame: self.clock.frame(),
            dt,
            elapsed,
            active_triggers: active.into_iter().collect(),
            edges,
            boosting: self.boosting,
            camera,
        };
        tracing::trace!(boosting = self.boosting, "tick done");
        &self.report
    }

    /// Snapshot of everything a renderer needs for the current state.
    pub fn render_frame(&self) -> RenderFrame {
        let mut items = Vec::with_capacity(self.mesh_of.len());
        for (&entity, &mesh) in &self.mesh_of {
            let (Some(record), Ok(world)) = (self.registry.get(entity), self.registry.world_matrix(entity))
            else {
                continue;
            };
            items.push(RenderItem {
                entity,
                name: record.name.clone(),
                kind: record.kind,
                mesh,
                world,
            });
        }

        let pose = self.camera.transform();
        let projection = self.camera.projection();
        RenderFrame {
            frame: self.clock.frame(),
            elapsed: self.clock.elapsed(),
            camera: CameraView {
                eye: pose.position,
                forward: pose.forward(),
                fov_y_degrees: projection.fov_y_degrees,
                view: self.camera.view_matrix(),
                projection: projection.matrix(),
            },
            light: self.report.camera.light,
            items,
        }
    }

    /// Release every mesh reference. Entities stay, but nothing is drawn
    /// afterwards. Calling it again is a no-op.
    pub fn teardown(&mut self) {
        let released = self.mesh_of.len();
        for (_, handle) in std::mem::take(&mut self.mesh_of) {
            self.meshes.release(handle);
        }
        if released > 0 {
            tracing::info!(scene = %self.name, released, "scene torn down");
        }
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Forward a host key event through the scene's bindings.
    pub fn key_event(&mut self, key: &str, pressed: bool) -> bool {
        self.bindings.apply_key(&mut self.input, key, pressed)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn meshes(&self) -> &MeshStore {
        &self.meshes
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn controlled(&self) -> Option<EntityId> {
        self.controlled
    }

    pub fn is_boosting(&self) -> bool {
        self.boosting
    }

    pub fn last_report(&self) -> &FrameReport {
        &self.report
    }

    /// Registry hash combined with the camera pose.
    pub fn state_hash(&self) -> u64 {
        let mut h = self.registry.state_hash();
        let pose = self.camera.transform();
        let o = pose.orientation;
        for v in pose.position.to_array().into_iter().chain([o.yaw, o.pitch, o.roll]) {
            h = (h ^ v.to_bits()).wrapping_mul(0x0100_0000_01b3);
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use crate::scene::{CameraConfig, EntityConfig, MeshConfig, MeshSource};
    use framecore_camera::{FreeFlyConfig, Projection};
    use framecore_common::{Bounds, VelocityParams};
    use framecore_input::symbols;
    use framecore_physics::{MovementConfig, PatrolPath};
    use framecore_render::{DebugTextRenderer, Renderer};
    use glam::DVec3;

    fn scene(entities: Vec<EntityConfig>) -> SceneConfig {
        SceneConfig {
            name: "test".into(),
            seed: 11,
            movement: MovementConfig::default(),
            bindings: None,
            meshes: vec![MeshConfig::new("block", MeshSource::Cube)],
            entities,
            camera: CameraConfig {
                mode: CameraModeConfig::FreeFly(FreeFlyConfig::default()),
                position: DVec3::new(0.0, 5.0, -20.0),
                look_at: Some(DVec3::ZERO),
                projection: Projection::default(),
            },
            light: None,
        }
    }

    fn player_at(position: DVec3) -> EntityConfig {
        EntityConfig::new(EntityKind::Player, position)
            .named("player")
            .with_bounds(Bounds::new(DVec3::new(1.5, 0.05, 1.5)))
            .with_velocity(VelocityParams {
                linear_speed: 5.0,
                turn_speed: 80.0,
            })
            .with_mesh("block")
    }

    fn pad_at(position: DVec3) -> EntityConfig {
        EntityConfig::new(EntityKind::TriggerVolume, position)
            .scaled(DVec3::new(3.0, 0.1, 3.0))
            .with_mesh("block")
    }

    fn player_z(sim: &SimulationLoop) -> f64 {
        let id = sim.controlled().unwrap();
        sim.registry().transform(id).unwrap().position.z
    }

    #[test]
    fn forward_without_boost_moves_base_speed() {
        let mut sim = SimulationLoop::from_config(&scene(vec![player_at(DVec3::new(0.0, 0.5, 0.0))])).unwrap();
        sim.input_mut().press(symbols::FORWARD);
        let report = sim.tick(1.0);
        assert!(!report.boosting);
        let id = sim.controlled().unwrap();
        assert_eq!(sim.registry().transform(id).unwrap().position, DVec3::new(0.0, 0.5, 5.0));
    }

    #[test]
    fn boost_applies_on_the_frame_after_overlap() {
        let mut sim = SimulationLoop::from_config(&scene(vec![
            player_at(DVec3::new(0.0, 0.0, 20.0)),
            pad_at(DVec3::new(0.0, 0.05, 20.0)),
        ]))
        .unwrap();

        let report = sim.tick(0.0);
        assert_eq!(report.active_triggers.len(), 1);
        assert!(report.boosting);
        assert!(report.edges[0].entered);

        sim.input_mut().press(symbols::FORWARD);
        let report = sim.tick(1.0);
        assert!(!report.boosting);
        assert!(!report.edges[0].entered);
        assert_eq!(player_z(&sim), 30.0);
    }

    #[test]
    fn patrol_wraps_inside_the_tick() {
        let mut config = scene(vec![
            EntityConfig::new(EntityKind::ScriptedActor, DVec3::new(0.0, 0.5, 55.0))
                .named("ai")
                .with_velocity(VelocityParams {
                    linear_speed: 10.0,
                    turn_speed: 0.0,
                })
                .with_script(Script::Patrol(PatrolPath {
                    speed_factor: 1.0,
                    ..PatrolPath::default()
                })),
        ]);
        config.seed = 4;
        let mut sim = SimulationLoop::from_config(&config).unwrap();
        sim.tick(1.0);
        let id = sim.registry().find_by_name("ai").unwrap();
        assert_eq!(sim.registry().transform(id).unwrap().position.z, -50.0);
    }

    #[test]
    fn negative_dt_freezes_the_frame() {
        let mut sim = SimulationLoop::from_config(&scene(vec![player_at(DVec3::ZERO)])).unwrap();
        sim.input_mut().press(symbols::FORWARD);
        let report = sim.tick(-0.5);
        assert_eq!(report.dt, 0.0);
        assert_eq!(report.frame, 1);
        assert_eq!(player_z(&sim), 0.0);
        sim.tick(f64::NAN);
        assert_eq!(player_z(&sim), 0.0);
        assert_eq!(sim.clock().frame(), 2);
    }

    #[test]
    fn identical_runs_hash_identically() {
        let run = || {
            let mut sim = SimulationLoop::from_config(&presets::racetrack(42)).unwrap();
            let mut hashes = Vec::new();
            for i in 0..300 {
                sim.input_mut().set(symbols::FORWARD, true);
                sim.input_mut().set(symbols::TURN_LEFT, i % 40 < 5);
                sim.tick(1.0 / 60.0);
                hashes.push(sim.state_hash());
            }
            hashes
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn racetrack_player_reaches_a_boost_pad() {
        let mut sim = SimulationLoop::from_config(&presets::racetrack(1)).unwrap();
        sim.input_mut().press(symbols::FORWARD);
        let mut boosted = false;
        for _ in 0..300 {
            boosted |= sim.tick(1.0 / 30.0).boosting;
        }
        assert!(boosted);
    }

    #[test]
    fn racetrack_camera_sits_close_behind_the_car() {
        let mut sim = SimulationLoop::from_config(&presets::racetrack(1)).unwrap();
        sim.tick(1.0 / 60.0);
        let eye = sim.camera().transform().position;
        assert!((eye - DVec3::new(0.0, 3.0, -47.5)).length() < 1e-9);
    }

    #[test]
    fn render_frame_lists_meshed_entities() {
        let mut sim = SimulationLoop::from_config(&presets::racetrack(2)).unwrap();
        sim.tick(1.0 / 60.0);
        let frame = sim.render_frame();
        let meshed = frame.items.len();
        assert!(meshed > 0);
        assert!(frame.items.windows(2).all(|w| w[0].entity < w[1].entity));
        assert!(sim.meshes().len() <= 3);

        let text = DebugTextRenderer::new().render(&frame);
        assert!(text.contains(&format!("Items: {meshed}")));

        sim.teardown();
        assert!(sim.meshes().is_empty());
        assert!(sim.render_frame().items.is_empty());
        sim.teardown();
    }

    #[test]
    fn parented_crowns_sit_above_their_tree() {
        let sim = SimulationLoop::from_config(&presets::follow(3)).unwrap();
        let registry = sim.registry();
        let root = registry.find_by_name("tree_0").unwrap();
        let crown = registry.find_by_name("tree_0_crown").unwrap();
        assert_eq!(registry.parent_of(crown), Some(root));
        let base = registry.world_position(root).unwrap();
        let top = registry.world_position(crown).unwrap();
        assert_eq!(top - base, DVec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn illusion_camera_flies_and_light_follows() {
        let mut sim = SimulationLoop::from_config(&presets::illusion(0)).unwrap();
        assert!(sim.controlled().is_none());
        assert!(sim.key_event("w", true));
        assert!(!sim.key_event("q", true));
        let before = sim.camera().transform().position;
        let report = sim.tick(0.5).clone();
        assert!((report.camera.transform.position - before).length() > 4.9);
        let light = report.camera.light.unwrap();
        assert_eq!(light.y, report.camera.transform.position.y + 5.0);
    }

    #[test]
    fn unknown_references_are_rejected() {
        let mut bad_mesh = scene(vec![player_at(DVec3::ZERO)]);
        bad_mesh.entities[0].mesh = Some("nope".into());
        assert!(matches!(
            SimulationLoop::from_config(&bad_mesh),
            Err(SceneError::UnknownMesh(_))
        ));

        let bad_parent = scene(vec![player_at(DVec3::ZERO).child_of("ghost")]);
        assert!(matches!(
            SimulationLoop::from_config(&bad_parent),
            Err(SceneError::UnknownEntityName(_))
        ));

        let scripted_wall = scene(vec![
            EntityConfig::new(EntityKind::StaticObstacle, DVec3::ZERO)
                .with_script(Script::Patrol(PatrolPath::default())),
        ]);
        assert!(matches!(
            SimulationLoop::from_config(&scripted_wall),
            Err(SceneError::ScriptNotAllowed { .. })
        ));

        let twins = scene(vec![player_at(DVec3::ZERO), player_at(DVec3::ONE)]);
        assert!(matches!(
            SimulationLoop::from_config(&twins),
            Err(SceneError::DuplicateName(_))
        ));

        let mut twin_meshes = scene(vec![player_at(DVec3::ZERO)]);
        twin_meshes.meshes = vec![
            MeshConfig::new("shape", MeshSource::Cube),
            MeshConfig::new("shape", MeshSource::Plane),
        ];
        assert!(matches!(
            SimulationLoop::from_config(&twin_meshes),
            Err(SceneError::DuplicateMeshName(name)) if name == "shape"
        ));
    }

    #[test]
    fn static_entities_without_velocity_spawn_and_moving_ones_need_it() {
        let mut walker = player_at(DVec3::ZERO);
        walker.velocity = None;
        assert!(matches!(
            SimulationLoop::from_config(&scene(vec![walker])),
            Err(SceneError::Kernel(_))
        ));
    }
}
