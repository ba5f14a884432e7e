//! Headless driver: loads blocks and sim settings, builds a demo chunk, and
//! walks an agent through it.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod logging;
mod player;
mod scene;
mod sim;


use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tessera_blocks::BlockRegistry;

use crate::config::SimConfig;
use crate::player::Walker;
use crate::scene::Scene;
use crate::sim::Session;

#[derive(Parser, Debug)]
#[command(name = "tessera", version, about = "Voxel chunk store, instancing and collision driver")]
struct Cli {
    /// Directory containing `assets/` (falls back to TESSERA_ASSETS, then a search).
    #[arg(long, global = true)]
    assets_root: Option<PathBuf>,
    /// Simulation config; defaults to `assets/sim.toml` under the assets root.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Also write logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drop a walker into a scene and simulate it.
    Run(RunArgs),
    /// Place and remove blocks, then report instance and edit statistics.
    EditDemo,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[arg(long, value_enum, default_value_t = Scene::Platform)]
    scene: Scene,
    /// Simulated seconds.
    #[arg(long, default_value_t = 3.0)]
    seconds: f32,
    /// Frames per second fed to the engine; need not match the step.
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
    /// Override the scene's facing, in degrees.
    #[arg(long)]
    yaw: Option<f32>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("failed to initialise logging: {}", e);
    }
    if let Err(e) = run(cli) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let root = assets::resolve_assets_root(cli.assets_root);
    log::info!("assets root: {:?}", root);
    let config_path = cli.config.unwrap_or_else(|| assets::sim_config_path(&root));
    let cfg = SimConfig::load_from_path(&config_path)
        .map_err(|e| format!("loading {}: {}", config_path.display(), e))?;
    let blocks = assets::blocks_path(&root);
    let reg = BlockRegistry::load_from_path(&blocks).map_err(|e| format!("loading {}: {}", blocks.display(), e))?;
    log::info!("loaded {} from {}", cfg_summary(&cfg), config_path.display());

    match cli.command {
        Command::Run(args) => run_scene(reg, &cfg, &args),
        Command::EditDemo => edit_demo(reg, &cfg),
    }
}

fn cfg_summary(cfg: &SimConfig) -> String {
    format!(
        "step {:.4}s, gravity {}, chunk {}x{}",
        cfg.physics.step, cfg.physics.gravity, cfg.chunk.width, cfg.chunk.height
    )
}

fn run_scene(reg: BlockRegistry, cfg: &SimConfig, args: &RunArgs) -> Result<(), Box<dyn Error>> {
    if !(args.fps > 0.0 && args.fps.is_finite()) {
        return Err(format!("--fps must be positive, got {}", args.fps).into());
    }
    if !(args.seconds >= 0.0 && args.seconds.is_finite()) {
        return Err(format!("--seconds must be non-negative, got {}", args.seconds).into());
    }
    let setup = args.scene.build(&reg, &cfg.chunk)?;
    let mut walker = Walker::new(setup.spawn, &cfg.walker);
    walker.yaw = args.yaw.unwrap_or(setup.yaw);
    walker.intent = setup.intent;
    let mut session = Session::new(reg, setup.grid, walker, cfg.physics);

    let dt = 1.0 / args.fps;
    let frames = (args.seconds * args.fps).round() as u64;
    let per_second = args.fps.round().max(1.0) as u64;
    for frame in 1..=frames {
        session.frame(dt);
        if frame % per_second == 0 {
            let w = &session.walker;
            log::info!(
                "t={:.2}s pos=({:.3},{:.3},{:.3}) ground={} water={}",
                frame as f32 * dt,
                w.pos.x,
                w.pos.y,
                w.pos.z,
                w.on_ground,
                w.in_water
            );
        }
    }

    let w = &session.walker;
    println!(
        "{:?}: {} ticks, head ({:.3}, {:.3}, {:.3}), feet y {:.3}, on_ground {}, in_water {}",
        args.scene,
        session.engine.ticks(),
        w.pos.x,
        w.pos.y,
        w.pos.z,
        w.feet_position().y,
        w.on_ground,
        w.in_water
    );
    Ok(())
}

fn edit_demo(reg: BlockRegistry, cfg: &SimConfig) -> Result<(), Box<dyn Error>> {
    let setup = Scene::Platform.build(&reg, &cfg.chunk)?;
    let walker = Walker::new(setup.spawn, &cfg.walker);
    let id = |name: &str| reg.id_by_name(name).ok_or_else(|| format!("block registry has no '{}' block", name));
    let (dirt, torch, glass) = (id("dirt")?, id("torch")?, id("glass")?);
    let mut session = Session::new(reg, setup.grid, walker, cfg.physics);
    report(&session, "generated");

    session.place(1, 6, 1, torch);
    session.place(0, 6, 0, glass);
    session.place(2, 5, 2, dirt);
    session.remove(0, 5, 2);
    report(&session, "edited");

    let made = session.geometry_arrived(glass);
    println!("glass geometry arrived: {} deferred instance(s) created", made);
    report(&session, "after geometry");

    session.instances.check_consistency(&session.grid)?;
    let (ox, oz) = session.grid.origin();
    let stats = session.edits.stats();
    println!(
        "edit store: {} chunk(s), {} block edit(s), {} dirty; rev {} needs_save {}",
        stats.chunk_entries,
        stats.block_edits,
        stats.dirty_chunks,
        session.edits.get_rev(ox, oz),
        session.edits.needs_save(ox, oz)
    );
    let rev = session.edits.get_rev(ox, oz);
    session.edits.mark_saved(ox, oz, rev);
    println!("after save: needs_save {}", session.edits.needs_save(ox, oz));
    Ok(())
}

fn report(session: &Session, label: &str) {
    println!(
        "[{}] {} instance(s), {} pending geometry",
        label,
        session.instances.total_count(),
        session.instances.pending_count()
    );
    let mut tables: Vec<_> = session.instances.tables().collect();
    tables.sort_by_key(|t| t.id());
    for t in tables {
        let name = session.reg.get(t.id()).map(|b| b.name.as_str()).unwrap_or("?");
        println!("  {:>8} ({:>2}): {}/{}", name, t.id(), t.count(), t.capacity());
    }
}
