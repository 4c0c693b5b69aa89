//! `ecosim` - run creature scenarios headless.
//!
//! - `ecosim run` - step a scenario and print a summary
//! - `ecosim defaults` - print the built-in scenario as YAML

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use eco_sim::{ScenarioConfig, Simulation};

#[derive(Parser)]
#[command(name = "ecosim")]
#[command(about = "Headless creature ecosystem sandbox", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario
    Run {
        /// Scenario file (YAML); the built-in scenario when omitted
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Override the scenario's step count
        #[arg(long)]
        steps: Option<u64>,

        /// Override the scenario's seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the built-in scenario
    Defaults,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            steps,
            seed,
            json,
        } => run(scenario, steps, seed, json),
        Commands::Defaults => {
            let yaml = ScenarioConfig::default()
                .to_yaml()
                .context("Failed to render default scenario")?;
            print!("{yaml}");
            Ok(())
        }
    }
}

fn run(scenario: Option<PathBuf>, steps: Option<u64>, seed: Option<u64>, json: bool) -> Result<()> {
    let mut config = match &scenario {
        Some(path) => ScenarioConfig::load(path)
            .with_context(|| format!("Failed to load scenario from {}", path.display()))?,
        None => ScenarioConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    let steps = steps.unwrap_or(config.steps);

    let mut sim = Simulation::new(config).context("Failed to set up simulation")?;
    let summary = sim.run(steps);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to encode summary")?
        );
    } else {
        print!("{summary}");
    }
    Ok(())
}
