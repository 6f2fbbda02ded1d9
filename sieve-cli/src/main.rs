use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sieve_cli::commands::{self, config as config_cmd, like, run, verify};
use sieve_cli::config::Config;

/// Command-line interface for the Sieve columnar filter and aggregate kernel
#[derive(Parser)]
#[command(name = "sieve")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, env = "SIEVE_CONFIG")]
    pub config: Option<String>,

    /// Verbose output (kernel debug logs on stderr)
    #[arg(short, long)]
    pub verbose: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the query on a batch and print the filtered rows and result
    Run(run::RunArgs),
    /// Check the query result on the reference batch
    Verify(verify::VerifyArgs),
    /// Evaluate a LIKE pattern against ad-hoc values
    Like(like::LikeArgs),
    /// Configuration management
    Config(config_cmd::ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn,sieve_core=debug,sieve_cli=debug".into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = commands::OutputContext {
        json: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Run(args) => {
            let cfg = Config::load(cli.config.as_deref())?;
            run::execute(args, &cfg, &output)
        }
        Commands::Verify(args) => verify::execute(args, &output),
        Commands::Like(args) => like::execute(args, &output),
        // Only `config show` reads the file
        Commands::Config(args) => config_cmd::execute(args, cli.config.as_deref(), &output),
    }
}
