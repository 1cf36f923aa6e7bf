//! Command-line interface for querying the mapfeed sources.
//!
//! Every subcommand layers its source configuration through `ortho_config`:
//! defaults, then configuration files, then `MAPFEED_` environment
//! variables, then CLI flags.
#![forbid(unsafe_code)]

mod commands;
mod config;
mod error;

use std::io::Write;

use clap::{Parser, Subcommand};
use mapfeed_core::ShapeKind;
use tracing_subscriber::EnvFilter;

use commands::{HttpRegistryBuilder, RegistryBuilder};
use config::SourceArgs;
pub use error::CliError;

/// Filter applied when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Run the mapfeed CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration, a source fetch
/// or writing the output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging()?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &HttpRegistryBuilder, &mut stdout)
}

fn init_logging() -> Result<(), CliError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| CliError::Logging(err.to_string()))
}

fn dispatch(
    command: Command,
    builder: &dyn RegistryBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Fetch(args) => commands::run_fetch(args.kind, args.sources, builder, writer),
        Command::Types(args) => commands::run_types(args, builder, writer),
        Command::Status(args) => commands::run_status(args, builder, writer),
        Command::Settings(args) => commands::run_settings(args, builder, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "mapfeed",
    about = "Fetch zones, school doors and school districts from map services",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch every shape of one kind and print it as JSON.
    Fetch(FetchArgs),
    /// List the shape kinds the current settings make available.
    Types(SourceArgs),
    /// Print provider identity and status as JSON.
    Status(SourceArgs),
    /// Print every setting with its effective value.
    Settings(SourceArgs),
}

/// CLI arguments for the `fetch` subcommand.
#[derive(Debug, Clone, clap::Args)]
struct FetchArgs {
    /// Shape kind: base, zone, school-door or school-district.
    #[arg(value_name = "kind")]
    kind: ShapeKind,
    #[command(flatten)]
    sources: SourceArgs,
}

#[cfg(test)]
mod tests;
