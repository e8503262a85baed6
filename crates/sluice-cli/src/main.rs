//! # sluice CLI entry point
//!
//! Parses command-line arguments, loads configuration from the environment,
//! initializes tracing, and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sluice_cli::config::{CliConfig, LogFormat};
use sluice_cli::fileset::{
    run_digest, run_inspect, run_pullup, run_subst, DigestArgs, InspectArgs, PullupArgs, SubstArgs,
};
use sluice_cli::resources::{run_fit, run_require, FitArgs, RequireArgs};

/// Inspect pipeline cache keys and resource envelopes.
#[derive(Parser, Debug)]
#[command(name = "sluice", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the content digest of a fileset document.
    Digest(DigestArgs),

    /// Summarize a fileset document: rendering, digest, counts, sizes.
    Inspect(InspectArgs),

    /// Merge a fileset tree into a single mapping.
    Pullup(PullupArgs),

    /// Substitute resolved files for references in a fileset document.
    Subst(SubstArgs),

    /// Check whether a demand fits a capacity.
    Fit(FitArgs),

    /// Fold demands into the capacity envelope that covers all of them.
    Require(RequireArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sluice: {e}");
            return ExitCode::from(1);
        }
    };

    init_tracing(cli.verbose, config.log_format);
    tracing::debug!(?config, "sluice starting");

    let digester = config.digester();
    let mut out = std::io::stdout().lock();

    let result = match &cli.command {
        Commands::Digest(args) => run_digest(args, &digester, &mut out),
        Commands::Inspect(args) => run_inspect(args, &digester, &mut out),
        Commands::Pullup(args) => run_pullup(args, &mut out),
        Commands::Subst(args) => run_subst(args, &mut out),
        Commands::Fit(args) => run_fit(args, &mut out),
        Commands::Require(args) => run_require(args, &mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// `RUST_LOG` wins when set; otherwise the `-v` count picks the level.
fn init_tracing(verbose: u8, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
