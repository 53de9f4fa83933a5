use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use shopforge_core::{ConfigError, SimulationConfig};
use shopforge_generate::{GenerateOptions, GenerationError, PipelineEngine};
use thiserror::Error;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("config file error: {0}")]
    ConfigFile(String),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}

#[derive(Parser, Debug)]
#[command(name = "shopforge", version, about = "Shopforge retail mock-data CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the catalog, customer and transaction datasets.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// TOML file overriding the built-in parameter set.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output directory for runs.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,
    /// Run seed controlling all random draws.
    #[arg(long, default_value_t = 332)]
    seed: u64,
    /// Override the number of customers to simulate.
    #[arg(long)]
    customers: Option<u64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Generate(args) => {
            let mut config = load_config(args.config.as_deref())?;
            if let Some(customers) = args.customers {
                config.customers.n_customers = customers;
            }
            config.validate()?;

            let engine = PipelineEngine::new(GenerateOptions {
                out_dir: args.out_dir,
                seed: args.seed,
            });
            let result = engine.run(&config)?;
            println!("mock data written to {}", result.run_dir.display());
            Ok(())
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<SimulationConfig, CliError> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .map_err(|err| CliError::ConfigFile(format!("{}: {err}", path.display())))?;
    toml::from_str(&contents)
        .map_err(|err| CliError::ConfigFile(format!("{}: {err}", path.display())))
}
