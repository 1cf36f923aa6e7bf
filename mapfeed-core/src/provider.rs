//! The capability interface hosts bind to, plus status and info reporting.
//!
//! [`DataProvider`] is deliberately plain: any composition mechanism (a
//! registry, a dependency-injection container or manual wiring) can hold an
//! implementation without knowing how it was discovered.

use std::time::Duration;

use async_trait::async_trait;

use crate::{AvailableTypes, FetchError, Shape};

/// Name under which the provider presents itself to hosts.
pub const PROVIDER_NAME: &str = "ArcGisDataProvider";

/// Operator-facing description of the provider.
pub const PROVIDER_DESCRIPTION: &str = "Supplies geodata from ArcGIS sources";

/// Optional inputs to [`DataProvider::fetch_all`].
///
/// Both fields are accepted for compatibility with hosts that pass them and
/// are not consulted by this provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOptions {
    /// Object the request is scoped to.
    pub root_object: Option<serde_json::Value>,
    /// Whether related properties should be expanded.
    pub include_properties: bool,
}

/// Health signal reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderStatus {
    /// Whether the provider considers itself reachable.
    pub is_online: bool,
    /// Time taken to produce the status.
    pub response_time: Duration,
    /// Operator-facing message.
    pub message: String,
}

impl ProviderStatus {
    /// Static "online" status.
    ///
    /// Sources are not probed, so an unreachable feature service still reports
    /// online here; failures surface from the fetch itself.
    #[must_use]
    pub fn online() -> Self {
        Self {
            is_online: true,
            response_time: Duration::ZERO,
            message: "OK".to_owned(),
        }
    }
}

/// Identity and status of a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Provider name.
    pub name: &'static str,
    /// Provider description.
    pub description: &'static str,
    /// Crate version the provider was built from.
    pub version: &'static str,
    /// Current status.
    pub status: ProviderStatus,
}

/// A source of typed geodata that hosts can query generically.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetch every shape of type `T`.
    ///
    /// Types the provider cannot currently produce yield an empty `Vec`.
    async fn fetch_all<T: Shape>(&self, options: &FetchOptions) -> Result<Vec<T>, FetchError>;

    /// Fetch one shape by identifier.
    async fn fetch_single<T: Shape>(
        &self,
        id: &str,
        include_properties: bool,
    ) -> Result<T, FetchError>;

    /// Kinds the provider can currently produce, starting with the base marker.
    fn available_types(&self) -> AvailableTypes;

    /// Current health signal.
    fn status(&self) -> ProviderStatus;

    /// Identity plus current status.
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: PROVIDER_NAME,
            description: PROVIDER_DESCRIPTION,
            version: env!("CARGO_PKG_VERSION"),
            status: self.status(),
        }
    }
}
