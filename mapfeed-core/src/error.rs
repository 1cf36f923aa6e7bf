use thiserror::Error;

use crate::{ShapeKind, SourceId};

/// Errors from [`crate::Aggregator`] and [`crate::SourceClient`] fetches.
///
/// Soft misses (disabled or unmapped kinds) never surface here; they resolve
/// to an empty result before any client is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The operation is deliberately not supported by this provider.
    #[error("{operation} is not supported by this provider")]
    Unsupported {
        /// Name of the rejected operation.
        operation: &'static str,
    },
    /// A descriptor-driven client was invoked without a descriptor.
    #[error("source {source_id} requires a source descriptor")]
    MissingDescriptor {
        /// Source that was invoked.
        source_id: SourceId,
    },
    /// A source returned shapes of a different kind than it is routed for.
    #[error("source {source_id} returned {actual} shapes where {expected} was requested")]
    KindMismatch {
        /// Source that was invoked.
        source_id: SourceId,
        /// Kind the caller requested.
        expected: ShapeKind,
        /// Kind the source produced.
        actual: ShapeKind,
    },
    /// The configured source URL could not be turned into a request URL.
    #[error("invalid source URL {url:?}: {message}")]
    InvalidUrl {
        /// URL as configured.
        url: String,
        /// Parser message.
        message: String,
    },
    /// The request did not complete within the client's timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Fully qualified request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The server answered with an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description from the transport.
        message: String,
    },
    /// The request failed before a response was received.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Error description from the transport.
        message: String,
    },
    /// The service returned an error object instead of features.
    #[error("service at {url} returned error {code}: {message}")]
    Service {
        /// Fully qualified request URL.
        url: String,
        /// Service-specific error code.
        code: i64,
        /// Service-supplied message.
        message: String,
    },
    /// The response body or a feature within it could not be decoded.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Fully qualified request URL.
        url: String,
        /// Description of the decode failure.
        message: String,
    },
}
