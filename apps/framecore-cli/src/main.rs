use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use framecore_input::symbols;
use framecore_mesh::{MeshBuilder, NormalMode, primitives};
use framecore_render::{DebugTextRenderer, Renderer};
use framecore_sim::{SceneConfig, SimulationLoop, presets};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "framecore-cli", about = "Headless host for framecore scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run a scene headless with held input symbols
    Run {
        /// Preset name (racetrack, follow, illusion) or path to a scene YAML
        #[arg(short, long, default_value = "racetrack")]
        scene: String,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Frame delta in seconds
        #[arg(long, default_value = "0.016666666666666666")]
        dt: f64,
        /// Seed for presets
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Symbols held for the whole run, comma separated
        #[arg(long, value_delimiter = ',')]
        hold: Vec<String>,
        /// Print one JSON frame report per line instead of text
        #[arg(long)]
        json: bool,
        /// Print a debug render every N frames (text mode only)
        #[arg(long, default_value = "60")]
        render_every: u64,
    },
    /// Build a primitive mesh and dump its buffers as JSON
    Mesh {
        #[arg(short, long, value_enum, default_value = "cube")]
        preset: MeshPreset,
        #[arg(short, long, value_enum, default_value = "face")]
        normals: NormalsArg,
    },
    /// Run a scene twice and compare state hashes frame by frame
    Determinism {
        #[arg(short, long, default_value = "racetrack")]
        scene: String,
        #[arg(short, long, default_value = "600")]
        frames: u64,
        #[arg(long, default_value = "42")]
        seed: u64,
    },
    /// Print a preset scene as YAML
    Scene {
        #[arg(short, long, default_value = "racetrack")]
        preset: String,
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MeshPreset {
    Cube,
    Plane,
    Sphere,
}

#[derive(Clone, Copy, ValueEnum)]
enum NormalsArg {
    None,
    Face,
    Smooth,
}

impl From<NormalsArg> for NormalMode {
    fn from(arg: NormalsArg) -> Self {
        match arg {
            NormalsArg::None => NormalMode::None,
            NormalsArg::Face => NormalMode::FaceAveraged,
            NormalsArg::Smooth => NormalMode::SmoothAveraged,
        }
    }
}

fn load_scene(scene: &str, seed: u64) -> anyhow::Result<SceneConfig> {
    if presets::PRESET_NAMES.contains(&scene) {
        return Ok(presets::by_name(scene, seed)?);
    }
    SceneConfig::load(scene).with_context(|| format!("loading scene {scene}"))
}

/// Input pattern for determinism runs: drive forward, weave left and right.
fn scripted_input(sim: &mut SimulationLoop, frame: u64) {
    let input = sim.input_mut();
    input.set(symbols::FORWARD, true);
    input.set(symbols::TURN_LEFT, frame % 90 < 10);
    input.set(symbols::TURN_RIGHT, (45..55).contains(&(frame % 90)));
    input.set(symbols::FLY_FORWARD, frame % 120 < 60);
    input.add_pointer_motion(0.01, if frame % 200 < 100 { 0.005 } else { -0.005 });
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("framecore-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", framecore_kernel::crate_info());
            println!("input: {}", framecore_input::crate_info());
            println!("mesh: {}", framecore_mesh::crate_info());
            println!("physics: {}", framecore_physics::crate_info());
            println!("camera: {}", framecore_camera::crate_info());
            println!("render: {}", framecore_render::crate_info());
            println!("sim: {}", framecore_sim::crate_info());
            println!("presets: {}", presets::PRESET_NAMES.join(", "));
        }
        Commands::Run {
            scene,
            frames,
            dt,
            seed,
            hold,
            json,
            render_every,
        } => {
            let config = load_scene(&scene, seed)?;
            let mut sim = SimulationLoop::from_config(&config)?;
            for symbol in &hold {
                sim.input_mut().press(symbol);
            }
            let mut renderer = DebugTextRenderer::new();
            let mut boosted_frames = 0u64;

            for _ in 0..frames {
                let report = sim.tick(dt);
                if report.boosting {
                    boosted_frames += 1;
                }
                if json {
                    println!("{}", serde_json::to_string(report)?);
                } else if render_every > 0 && report.frame % render_every == 0 {
                    print!("{}", renderer.render(&sim.render_frame()));
                }
            }

            if !json {
                println!(
                    "Scene {}: frames={}, elapsed={:.3}s, boosted frames={}, hash={:#018x}",
                    sim.name(),
                    sim.clock().frame(),
                    sim.clock().elapsed(),
                    boosted_frames,
                    sim.state_hash()
                );
                if let Some(player) = sim.controlled() {
                    let t = sim.registry().transform(player)?;
                    println!(
                        "Player {player}: pos=({:.3}, {:.3}, {:.3}) yaw={:.2}",
                        t.position.x, t.position.y, t.position.z, t.orientation.yaw
                    );
                }
            }
            sim.teardown();
        }
        Commands::Mesh { preset, normals } => {
            let desc = match preset {
                MeshPreset::Cube => primitives::cube(),
                MeshPreset::Plane => primitives::unit_plane(),
                MeshPreset::Sphere => primitives::sphere(8, 12),
            }
            .with_normal_mode(normals.into());
            let mesh = MeshBuilder::build(&desc)?;
            tracing::info!(
                vertices = mesh.vertex_count(),
                triangles = mesh.triangle_count(),
                "mesh built"
            );
            println!("{}", serde_json::to_string_pretty(&mesh)?);
        }
        Commands::Determinism {
            scene,
            frames,
            seed,
        } => {
            let config = load_scene(&scene, seed)?;
            let mut a = SimulationLoop::from_config(&config)?;
            let mut b = SimulationLoop::from_config(&config)?;
            for frame in 0..frames {
                scripted_input(&mut a, frame);
                scripted_input(&mut b, frame);
                let dt = 1.0 / 60.0 + (frame % 7) as f64 * 1e-4;
                a.tick(dt);
                b.tick(dt);
                let (ha, hb) = (a.state_hash(), b.state_hash());
                if ha != hb {
                    bail!("runs diverged at frame {}: {ha:#018x} != {hb:#018x}", frame + 1);
                }
            }
            println!(
                "Determinism {}: {} frames, final hash={:#018x}, OK",
                config.name,
                frames,
                a.state_hash()
            );
        }
        Commands::Scene { preset, seed } => {
            let config = presets::by_name(&preset, seed)?;
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
