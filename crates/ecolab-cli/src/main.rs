use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ecolab_core::config::{PopulationConfig, SimConfig};
use ecolab_core::world::World;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

const WARMUP_TICKS: usize = 10;
const BENCHMARK_TICKS: usize = 200;

#[derive(Parser)]
#[command(name = "ecolab")]
#[command(about = "Grid predator-prey simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single simulation from a config file
    Run {
        /// Path to config file (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Output directory for counts.json and summary.json (optional)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Override the configured number of ticks
        #[arg(long)]
        iterations: Option<usize>,
    },
    /// Time a fixed set of scenario sizes
    Benchmark,
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

fn run_benchmark(side: usize, prey_count: usize, predator_count: usize) -> Result<()> {
    let config = SimConfig {
        grid_width: side,
        grid_height: side,
        grow_rate: side,
        early_stop: false,
        population: PopulationConfig {
            prey_count,
            predator_count,
            ..PopulationConfig::default()
        },
        ..SimConfig::default()
    };
    let mut world = World::from_config(config).context("failed to initialize benchmark world")?;

    for _ in 0..WARMUP_TICKS {
        world.step();
    }

    let started = Instant::now();
    let mut agent_ticks = 0usize;
    for _ in 0..BENCHMARK_TICKS {
        agent_ticks += world.step().population;
    }
    let elapsed = started.elapsed().as_secs_f64();
    let ticks_per_sec = BENCHMARK_TICKS as f64 / elapsed.max(f64::EPSILON);
    let avg_population = agent_ticks as f64 / BENCHMARK_TICKS as f64;

    println!("--- {side}x{side} grid, {prey_count} prey + {predator_count} predators ---");
    println!("  Avg tick:      {:.0} us ({ticks_per_sec:.1} ticks/sec)", 1_000_000.0 / ticks_per_sec);
    println!("  Avg roster:    {avg_population:.1} agents");
    let counts = world.population_counts();
    println!(
        "  Final:         {} prey, {} predators, resource {}",
        counts.prey, counts.predators, counts.resource_total
    );
    println!();
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::DumpDefaultConfig => {
            let config = SimConfig::default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Benchmark => {
            if cfg!(debug_assertions) {
                eprintln!("WARNING: running in debug mode. Results are not representative.");
                eprintln!("         Use: cargo run -p ecolab-cli --release -- benchmark");
                eprintln!();
            }
            println!("Warmup: {WARMUP_TICKS} ticks, Benchmark: {BENCHMARK_TICKS} ticks");
            println!();

            let scenarios = [
                (30, 40, 10),
                (60, 150, 50),    // default config
                (120, 600, 200),
                (240, 2400, 800), // stress test
            ];
            for (side, prey, predators) in scenarios {
                run_benchmark(side, prey, predators)?;
            }
        }
        Commands::Run {
            config,
            out,
            iterations,
        } => {
            let file = File::open(&config).context("failed to open config file")?;
            let reader = BufReader::new(file);
            let mut sim_config: SimConfig =
                serde_json::from_reader(reader).context("failed to parse config")?;
            if let Some(iterations) = iterations {
                sim_config.iterations = iterations;
            }

            sim_config.validate().context("Config validation error")?;

            let mut world = World::from_config(sim_config).context("failed to initialize world")?;
            let grid = world.grid();
            info!(
                path = ?config,
                iterations = world.config().iterations,
                width = grid.width(),
                height = grid.height(),
                cap = grid.cap(),
                grow_rate = grid.grow_rate(),
                agents = world.agents.len(),
                "loaded config"
            );
            let record = world.run().context("simulation run failed")?;
            let summary = &record.summary;

            println!(
                "Run complete after {} ticks{}. Births: {}, deaths: {}, kills: {}",
                summary.ticks_run,
                if summary.early_stopped { " (early stop)" } else { "" },
                summary.total_births,
                summary.total_deaths,
                summary.total_kills,
            );
            println!(
                "Final: {} prey, {} predators, resource {}",
                summary.final_counts.prey,
                summary.final_counts.predators,
                summary.final_counts.resource_total,
            );

            if let Some(out_dir) = out {
                std::fs::create_dir_all(&out_dir).context("failed to create output directory")?;

                let counts_path = out_dir.join("counts.json");
                let file = File::create(counts_path).context("failed to create counts file")?;
                serde_json::to_writer_pretty(file, &record.counts())
                    .context("failed to write counts")?;

                let summary_path = out_dir.join("summary.json");
                let file = File::create(summary_path).context("failed to create summary file")?;
                serde_json::to_writer_pretty(file, summary).context("failed to write summary")?;
                println!("Results saved to {:?}", out_dir);
            }
        }
    }
    Ok(())
}
