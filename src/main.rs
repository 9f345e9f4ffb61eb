use clap::{Parser, Subcommand};
use std::path::Path;

use cellground::cli::commands;
use cellground::config::simulation::SimulationConfig;
use cellground::config::worldgen::GenerationParams;

#[derive(Parser)]
#[command(name = "cellground")]
#[command(about = "A layered grid ecosystem simulator with energy-driven organism behavior")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a world and run the paced simulation loop
    Run {
        /// Path to world generation config file
        #[arg(short, long, default_value = "worldgen.toml")]
        worldgen: String,

        /// Override the generation seed
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Generate a world, advance it quietly, and print a summary
    Inspect {
        /// Path to world generation config file
        #[arg(short, long, default_value = "worldgen.toml")]
        worldgen: String,

        /// Number of ticks to advance before reporting
        #[arg(short, long, default_value_t = 0)]
        ticks: u64,

        /// Override the generation seed
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match SimulationConfig::from_file(Path::new(&cli.config)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    match cli.command {
        Commands::Run { worldgen, seed } => {
            let params = match load_params(&worldgen, seed) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error loading generation config: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = commands::run_simulation(&config, &params).await {
                eprintln!("Simulation error: {}", e);
                std::process::exit(1);
            }
        }

        Commands::Inspect {
            worldgen,
            ticks,
            seed,
        } => {
            let params = match load_params(&worldgen, seed) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error loading generation config: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = commands::inspect(&config, &params, ticks) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn load_params(path: &str, seed_override: Option<u64>) -> Result<GenerationParams, String> {
    let mut params = GenerationParams::from_file(Path::new(path))?;
    if let Some(seed) = seed_override {
        params.seed = seed;
    }
    Ok(params)
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
