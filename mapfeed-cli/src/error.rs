//! Error types emitted by the mapfeed CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use mapfeed_core::FetchError;
use mapfeed_data::ClientBuildError;
use thiserror::Error;

/// Errors emitted by the mapfeed CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A request timeout of zero seconds was configured.
    #[error("--{field} must be at least one second")]
    ZeroTimeout { field: &'static str },
    /// Installing the log subscriber failed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
    /// Building the async runtime failed.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Building the HTTP source clients failed.
    #[error(transparent)]
    BuildSources(#[from] ClientBuildError),
    /// A source fetch failed.
    #[error("failed to fetch {kind}: {source}")]
    Fetch {
        kind: mapfeed_core::ShapeKind,
        #[source]
        source: FetchError,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
