//! Headless driver: build a world, run it for a number of ticks and report
//! Run with: cargo run --release -- --ticks 1000 --seed 7

use clap::Parser;
use runegrid::diagnostics::{gene_diversity, population_stats};
use runegrid::{EntityKind, SimConfig, World};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file overriding the default knobs
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the world's random source (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Override the configured initial mob count
    #[arg(long)]
    mobs: Option<usize>,

    /// Override the configured initial plant count
    #[arg(long)]
    plants: Option<usize>,

    /// Print a population summary every N ticks (0 disables)
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// Number of recent events printed at the end
    #[arg(long, default_value_t = 10)]
    events: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(mobs) = args.mobs {
        config.initial_mobs = mobs;
    }
    if let Some(plants) = args.plants {
        config.initial_plants = plants;
    }

    let (initial_plants, initial_mobs) = (config.initial_plants, config.initial_mobs);

    let mut world = World::new(config, args.seed.unwrap_or_else(rand::random))?;
    world.populate(EntityKind::Plant, initial_plants);
    world.populate(EntityKind::Mob, initial_mobs);

    let (width, height) = world.dimensions();
    let seed = world.seed();
    tracing::info!(width, height, seed, initial_plants, initial_mobs, "starting run");

    for tick in 1..=args.ticks {
        world.advance_tick();

        if args.report_every > 0 && tick % args.report_every == 0 {
            tracing::info!(tick, "{}", population_stats(&world).report());
        }
        if world.mob_count() == 0 && world.plant_count() == 0 {
            tracing::warn!(tick, "world is empty, stopping early");
            break;
        }
    }

    let stats = &world.stats;
    tracing::info!(
        ticks = stats.ticks,
        plant_births = stats.plant_births,
        mob_births = stats.mob_births,
        plant_deaths = stats.plant_deaths,
        mob_deaths = stats.mob_deaths,
        battles = stats.battles,
        "run complete"
    );
    tracing::info!("{}", population_stats(&world).report());

    let mut diversity: Vec<(char, usize)> = gene_diversity(&world).into_iter().collect();
    diversity.sort();
    tracing::info!(?diversity, "gene counts");

    if let Some(mob) = world.most_prolific_mob() {
        tracing::info!("most prolific {}: {}", mob.id, mob.stats_line());
        for row in mob.runes.render_rows() {
            tracing::info!("|{}|", row);
        }
    }
    for event in world.recent_events(args.events) {
        tracing::info!("{}", event);
    }

    Ok(())
}
