//! Headless driver for the predator/herbivore/plant ecosystem simulation.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "eco",
    about = "Predators, herbivores and plants on a 2D plane",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation headless and report the population
    Run {
        /// Number of ticks to simulate (default: 150 = five seconds at 30 fps)
        #[arg(short, long, default_value = "150")]
        ticks: u64,

        /// RNG seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Frame rate speeds are scaled against (overrides the config file)
        #[arg(long)]
        fps: Option<f64>,

        /// JSON config file (default: built-in defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of independent runs with consecutive seeds
        #[arg(short, long, default_value = "1")]
        runs: u64,

        /// Show every event and the final agent list
        #[arg(short, long)]
        verbose: bool,

        /// Print machine-readable JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration as JSON
    Config {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    // Logs go to stderr so `--json` output stays parseable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            ticks,
            seed,
            fps,
            config,
            runs,
            verbose,
            json,
        } => commands::run::run(config.as_deref(), ticks, seed, fps, runs, verbose, json),
        Commands::Config { output } => commands::config::run(output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
