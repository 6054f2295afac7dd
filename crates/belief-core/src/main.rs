//! Belief Dynamics Simulator
//!
//! Runs one simulation and prints the requested result as JSON. Parameters
//! come from an optional TOML file, then command-line overrides.

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use belief_core::{AbortSignal, SimError, SimulationConfig, SimulationEngine, TableCache};

/// Environment variable holding the log filter
const LOG_ENV: &str = "BELIEF_LOG";

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "belief_sim")]
#[command(about = "Simulate trust-discounted belief dynamics on a toroidal grid")]
struct Args {
    /// TOML file with run parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Grid side length
    #[arg(long)]
    dim: Option<usize>,

    /// Maximum number of steps
    #[arg(long)]
    steps: Option<u64>,

    /// Neighborhood size, including the agent itself
    #[arg(long)]
    degree: Option<usize>,

    /// True success probability of the uncertain option
    #[arg(short = 'p', long)]
    p: Option<f64>,

    /// Trials per experiment
    #[arg(short = 'n', long)]
    n: Option<u32>,

    /// Trust-decay multiplier
    #[arg(short = 'm', long)]
    m: Option<f64>,

    /// Update-table granularity
    #[arg(long)]
    granularity: Option<u32>,

    /// Output mode: correct, map, entropy, polarized or storedValues
    #[arg(long)]
    output: Option<String>,

    /// Print a JSON snapshot after every step
    #[arg(long)]
    watch: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    /// Base configuration with command-line overrides applied.
    fn resolve(&self) -> Result<SimulationConfig, SimError> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_file(path)?,
            None => SimulationConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(dim) = self.dim {
            config.dim = dim;
        }
        if let Some(steps) = self.steps {
            config.max_steps = steps;
        }
        if let Some(degree) = self.degree {
            config.degree = degree;
        }
        if let Some(p) = self.p {
            config.p = p;
        }
        if let Some(n) = self.n {
            config.n = n;
        }
        if let Some(m) = self.m {
            config.m = m;
        }
        if let Some(granularity) = self.granularity {
            config.granularity = granularity;
        }
        if let Some(output) = &self.output {
            config.output_mode = output.clone();
        }
        Ok(config)
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn simulate(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    let config = args.resolve()?;
    tracing::info!(seed = config.seed, output = %config.output_mode, "starting simulation");

    let cache = TableCache::new();
    let mut engine = SimulationEngine::new(
        &config,
        &cache,
        AbortSignal::new(),
        SmallRng::seed_from_u64(config.seed),
    )?;

    if args.watch {
        println!("{}", serde_json::to_string(&engine.snapshot())?);
        while !engine.status().is_terminal() {
            let snapshot = engine.advance();
            println!("{}", serde_json::to_string(&snapshot)?);
        }
    } else {
        engine.run_to_completion();
    }

    tracing::info!(
        steps = engine.step(),
        status = %engine.status(),
        "simulation complete"
    );

    let result = engine.assemble_named(&config.output_mode)?;
    Ok(serde_json::to_string_pretty(&result)?)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.json_logs);

    match simulate(&args) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
