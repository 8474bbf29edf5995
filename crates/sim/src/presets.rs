//! Built-in scenes.
//!
//! Random placement (trees, patrol starts) is drawn from the scene seed while
//! the preset is built, so a preset and seed always give the same layout.

use framecore_camera::{FreeFlyConfig, OffsetSpace, OrbitLight, Projection};
use framecore_common::{Bounds, EntityKind, VelocityParams};
use framecore_mesh::NormalMode;
use framecore_physics::{MovementConfig, PatrolPath, PulseSpin, Script};
use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::SceneError;
use crate::scene::{CameraConfig, CameraModeConfig, EntityConfig, MeshConfig, MeshSource, SceneConfig};

pub const PRESET_NAMES: [&str; 3] = ["racetrack", "follow", "illusion"];

pub fn by_name(name: &str, seed: u64) -> Result<SceneConfig, SceneError> {
    match name {
        "racetrack" => Ok(racetrack(seed)),
        "follow" => Ok(follow(seed)),
        "illusion" => Ok(illusion(seed)),
        other => Err(SceneError::UnknownPreset(other.to_string())),
    }
}

fn block() -> MeshConfig {
    MeshConfig::new("block", MeshSource::Cube)
}

fn leaves() -> MeshConfig {
    MeshConfig::new(
        "leaves",
        MeshSource::Sphere {
            stacks: 8,
            slices: 12,
        },
    )
}

/// Tree as an unmeshed root with trunk and crown parented to it.
fn tree(index: usize, base: DVec3, trunk_height: f64, crown_at: f64, crown_scale: f64) -> [EntityConfig; 3] {
    let root = format!("tree_{index}");
    [
        EntityConfig::new(EntityKind::StaticObstacle, base).named(&root),
        EntityConfig::new(EntityKind::StaticObstacle, DVec3::new(0.0, trunk_height * 0.5, 0.0))
            .named(format!("{root}_trunk"))
            .scaled(DVec3::new(0.5, trunk_height, 0.5))
            .with_mesh("block")
            .child_of(&root),
        EntityConfig::new(EntityKind::StaticObstacle, DVec3::new(0.0, crown_at, 0.0))
            .named(format!("{root}_crown"))
            .scaled(DVec3::splat(crown_scale))
            .with_mesh("leaves")
            .child_of(&root),
    ]
}

/// Walled track with boost pads, roadside trees and patrolling AI cars.
pub fn racetrack(seed: u64) -> SceneConfig {
    let mut rng = StdRng::seed_from_u64(seed);
    let car_bounds = Bounds::new(DVec3::new(1.0, 1.0, 2.0));
    let mut entities = vec![
        EntityConfig::new(EntityKind::Player, DVec3::new(0.0, 0.5, -40.0))
            .named("player")
            .scaled(DVec3::splat(0.5))
            .with_bounds(car_bounds)
            .with_velocity(VelocityParams {
                linear_speed: 5.0,
                turn_speed: 80.0,
            })
            .with_mesh("car"),
    ];

    for i in 0..10_i32 {
        entities.push(
            EntityConfig::new(
                EntityKind::StaticObstacle,
                DVec3::new(0.0, 0.05, f64::from(i) * 10.0 - 50.0),
            )
            .named(format!("track_{i}"))
            .scaled(DVec3::new(10.0, 0.1, 10.0))
            .with_mesh("block"),
        );
    }

    for i in -5..=5_i32 {
        for (side, x) in [("left", -5.0), ("right", 5.0)] {
            entities.push(
                EntityConfig::new(
                    EntityKind::StaticObstacle,
                    DVec3::new(x, 2.5, f64::from(i) * 10.0),
                )
                .named(format!("wall_{side}_{}", i + 5))
                .scaled(DVec3::new(1.0, 5.0, 10.0))
                .with_mesh("block"),
            );
        }
    }

    for (i, z) in [-20.0, 0.0, 20.0, 40.0].into_iter().enumerate() {
        entities.push(
            EntityConfig::new(EntityKind::TriggerVolume, DVec3::new(0.0, 0.05, z))
                .named(format!("boost_{i}"))
                .scaled(DVec3::new(3.0, 0.1, 3.0))
                .with_mesh("block"),
        );
    }

    for i in 0..20 {
        let x = if i % 2 == 0 { -8.0 } else { 8.0 };
        let z = rng.gen_range(-50.0..50.0);
        entities.extend(tree(i, DVec3::new(x, 0.0, z), 5.0, 5.5, 2.0));
    }

    for i in 0..3 {
        let x = rng.gen_range(-3.0..=3.0);
        let z = f64::from(rng.gen_range(-30..=30_i32));
        entities.push(
            EntityConfig::new(EntityKind::ScriptedActor, DVec3::new(x, 0.5, z))
                .named(format!("ai_{i}"))
                .scaled(DVec3::splat(0.5))
                .with_bounds(car_bounds)
                .with_velocity(VelocityParams {
                    linear_speed: 5.0,
                    turn_speed: 0.0,
                })
                .with_script(Script::Patrol(PatrolPath::default()))
                .with_mesh("car"),
        );
    }

    SceneConfig {
        name: "racetrack".into(),
        seed,
        movement: MovementConfig::default(),
        bindings: None,
        meshes: vec![
            MeshConfig::new(
                "car",
                MeshSource::Box {
                    half_extents: DVec3::new(1.0, 1.0, 2.0),
                },
            ),
            block(),
            leaves(),
        ],
        entities,
        camera: CameraConfig {
            mode: CameraModeConfig::Tracking {
                target: "player".into(),
                offset: DVec3::new(0.0, 2.5, -7.5),
                offset_space: OffsetSpace::Local,
            },
            position: DVec3::ZERO,
            look_at: None,
            projection: Projection::default(),
        },
        light: None,
    }
}

/// Cube on a field of trees, chased by a world-aligned camera.
pub fn follow(seed: u64) -> SceneConfig {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut entities = vec![
        EntityConfig::new(EntityKind::Player, DVec3::new(0.0, 1.0, 10.0))
            .named("player")
            .with_bounds(Bounds::new(DVec3::ONE))
            .with_velocity(VelocityParams {
                linear_speed: 10.0,
                turn_speed: 300.0,
            })
            .with_mesh("player_cube"),
        EntityConfig::new(EntityKind::StaticObstacle, DVec3::ZERO)
            .named("ground")
            .scaled(DVec3::new(100.0, 1.0, 100.0))
            .with_bounds(Bounds::new(DVec3::new(0.5, 0.0, 0.5)))
            .with_mesh("ground"),
    ];
    for i in 0..15 {
        let x = f64::from(rng.gen_range(-40..=40_i32));
        let z = f64::from(rng.gen_range(-40..=40_i32));
        entities.extend(tree(i, DVec3::new(x, 0.0, z), 2.0, 4.0, 2.0));
    }

    SceneConfig {
        name: "follow".into(),
        seed,
        movement: MovementConfig::default(),
        bindings: None,
        meshes: vec![
            MeshConfig::new(
                "player_cube",
                MeshSource::Box {
                    half_extents: DVec3::ONE,
                },
            ),
            MeshConfig::new("ground", MeshSource::Plane),
            block(),
            leaves(),
        ],
        entities,
        camera: CameraConfig {
            mode: CameraModeConfig::Tracking {
                target: "player".into(),
                offset: DVec3::new(0.0, 10.0, -20.0),
                offset_space: OffsetSpace::World,
            },
            position: DVec3::ZERO,
            look_at: None,
            projection: Projection::default(),
        },
        light: None,
    }
}

/// Spinning, breathing cube over a floor, explored with a free-fly camera.
pub fn illusion(seed: u64) -> SceneConfig {
    let mut cube = MeshConfig::new(
        "cube",
        MeshSource::Box {
            half_extents: DVec3::ONE,
        },
    );
    cube.normal_mode = Some(NormalMode::FaceAveraged);

    SceneConfig {
        name: "illusion".into(),
        seed,
        movement: MovementConfig::default(),
        bindings: None,
        meshes: vec![cube, MeshConfig::new("floor", MeshSource::Plane)],
        entities: vec![
            EntityConfig::new(EntityKind::ScriptedActor, DVec3::new(0.0, 1.0, 0.0))
                .named("cube")
                .scaled(DVec3::splat(2.0))
                .with_bounds(Bounds::new(DVec3::ONE))
                .with_velocity(VelocityParams::default())
                .with_script(Script::Pulse(PulseSpin::default()))
                .with_mesh("cube"),
            EntityConfig::new(EntityKind::StaticObstacle, DVec3::ZERO)
                .named("floor")
                .scaled(DVec3::new(40.0, 1.0, 40.0))
                .with_bounds(Bounds::new(DVec3::new(0.5, 0.0, 0.5)))
                .with_mesh("floor"),
        ],
        camera: CameraConfig {
            mode: CameraModeConfig::FreeFly(FreeFlyConfig {
                move_speed: 10.0,
                sensitivity: 20.0,
            }),
            position: DVec3::new(0.0, 5.0, -20.0),
            look_at: Some(DVec3::ZERO),
            projection: Projection::default(),
        },
        light: Some(OrbitLight::default()),
    }
}
