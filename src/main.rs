use anyhow::{Context, Result};
use clap::Parser;
use ecosim_core::{init_logging, route_panics_to_tracing, Metrics};
use ecosim_lib::model::config::AppConfig;
use ecosim_lib::model::history::LiveEvent;
use ecosim_lib::model::world::World;
use std::path::Path;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless creature ecosystem simulation", long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Overrides the configured world seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop after this many ticks (runs until extinction if omitted)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Resume from a saved snapshot
    #[arg(long)]
    load: Option<String>,

    /// Write a snapshot here when the run ends
    #[arg(long)]
    save: Option<String>,

    /// Directory for the live event log
    #[arg(long)]
    log_dir: Option<String>,

    /// Ticks between metric summaries
    #[arg(long, default_value_t = 1000)]
    report_every: u64,
}

fn load_config(path: &str) -> Result<AppConfig> {
    if !Path::new(path).exists() {
        tracing::info!(path, "No config file found, using defaults");
        return Ok(AppConfig::default());
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    AppConfig::from_toml(&content).with_context(|| format!("parsing config {path}"))
}

fn main() -> Result<()> {
    init_logging();
    route_panics_to_tracing();
    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }

    let mut world = match &args.log_dir {
        Some(dir) => World::new_at(config, dir)?,
        None => World::new(config)?,
    };

    if let Some(path) = &args.load {
        let snapshot = ecosim_io::load_snapshot(path)?;
        world.restore(snapshot)?;
    }

    let metrics = Metrics::with_interval(args.report_every);
    let end = args.ticks.map(|t| world.tick + t);
    loop {
        if end.is_some_and(|end| world.tick >= end) {
            break;
        }
        let started = Instant::now();
        let events = world.update();
        let births = events
            .iter()
            .filter(|e| matches!(e, LiveEvent::Birth { .. }))
            .count();
        let deaths = events
            .iter()
            .filter(|e| matches!(e, LiveEvent::Death { .. }))
            .count();
        metrics.record_births(births);
        metrics.record_deaths(deaths);
        metrics.record_policy_failures(world.policy_failures);
        metrics.record_tick(started.elapsed(), world.creatures.len(), world.food.len());

        if world.creatures.is_empty() {
            tracing::warn!(tick = world.tick, "Population extinct, stopping");
            break;
        }
    }

    if let Err(e) = world.logger.flush() {
        tracing::warn!(error = %e, "Failed to flush live events");
    }

    tracing::info!(
        ticks = metrics.tick_count(),
        creatures = world.creatures.len(),
        births = metrics.births(),
        deaths = metrics.deaths(),
        policy_failures = metrics.policy_failures(),
        elapsed_ms = metrics.elapsed().as_millis() as u64,
        "Run finished"
    );

    if let Some(path) = &args.save {
        ecosim_io::save_snapshot(&world.snapshot(), path)?;
    }
    Ok(())
}
