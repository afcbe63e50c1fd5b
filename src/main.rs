mod app;
mod camera;
mod components;
mod engine;
mod fsm;
mod math;
mod scene;
mod systems;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hecs::World;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::GameApp;
use scene::{load_scene, spawn_scene};

#[derive(Parser)]
#[command(name = "inside-walls", about = "Headless platformer simulation")]
struct Args {
    /// Scene file to load
    #[arg(long, default_value = "levels/demo.ron")]
    scene: PathBuf,

    /// Number of fixed ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let scene = load_scene(&args.scene)
        .with_context(|| format!("loading scene {}", args.scene.display()))?;
    let mut world = World::new();
    let spawned = spawn_scene(&mut world, &scene).context("spawning scene")?;

    info!(scene = %args.scene.display(), ticks = args.ticks, dt = args.dt, "starting simulation");
    let mut app = GameApp::new(world, spawned);
    let summary = app.run(args.ticks, args.dt);

    info!(
        ticks = summary.ticks,
        sim_time = summary.sim_time,
        position = ?summary.player_position,
        camera = ?summary.camera_eye,
        grounded = summary.grounded,
        "simulation finished"
    );
    Ok(())
}

fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
