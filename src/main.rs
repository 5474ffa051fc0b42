mod app;
mod gpu;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use winit::event_loop::{ControlFlow, EventLoop};

use life_canvas::config::{
    CELL_SIZE, DEFAULT_TICK_INTERVAL_MS, GRID_HEIGHT, GRID_WIDTH, SAVE_FILE_NAME,
};
use life_canvas::{persistence, Simulation};

use crate::app::App;

/// Conway's Game of Life with mouse editing
#[derive(Parser, Debug)]
#[command(name = "life-canvas", version)]
struct Args {
    /// Grid width in cells
    #[arg(long, default_value_t = GRID_WIDTH)]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = GRID_HEIGHT)]
    height: usize,

    /// Pixels per cell
    #[arg(long, default_value_t = CELL_SIZE, value_parser = clap::value_parser!(u32).range(1..=64))]
    cell_size: u32,

    /// Milliseconds between generations
    #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL_MS)]
    tick_ms: u64,

    /// Start from a save file instead of an empty grid
    #[arg(long)]
    load: Option<PathBuf>,

    /// File written by S and read by L
    #[arg(long, default_value = SAVE_FILE_NAME)]
    save_path: PathBuf,

    /// Fill the starting grid randomly with this fraction of live cells
    #[arg(long, value_parser = parse_density)]
    random: Option<f64>,

    /// Start running immediately
    #[arg(long)]
    run: bool,
}

/// Accept a live-cell fraction in `0.0..=1.0`
fn parse_density(value: &str) -> Result<f64, String> {
    let density: f64 = value.parse().map_err(|e| format!("{}", e))?;
    if (0.0..=1.0).contains(&density) {
        Ok(density)
    } else {
        Err(format!("density must be between 0 and 1, got {}", value))
    }
}

fn initial_simulation(args: &Args) -> anyhow::Result<(Simulation, u32)> {
    if let Some(path) = &args.load {
        let save = persistence::load(path)
            .with_context(|| format!("cannot load {}", path.display()))?;
        let grid = save.to_grid()?;
        return Ok((Simulation::new(grid), save.cell_size_px()?));
    }

    let mut simulation = Simulation::with_size(args.width, args.height)?;
    if let Some(density) = args.random {
        simulation.randomize(&mut rand::thread_rng(), density);
    }
    Ok((simulation, args.cell_size))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::debug!("{:?}", args);

    let (mut simulation, cell_size) = initial_simulation(&args)?;
    let interval = simulation.set_tick_interval(args.tick_ms);
    if args.run {
        simulation.start();
    }
    log::info!(
        "Starting {} with {} live cells, {} ms per generation",
        if simulation.is_running() { "running" } else { "stopped" },
        simulation.grid().population(),
        interval.as_millis()
    );

    let event_loop = EventLoop::new().context("cannot create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(simulation, cell_size, args.save_path);
    event_loop.run_app(&mut app)?;
    Ok(())
}
