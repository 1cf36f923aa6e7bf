//! HTTP source clients for the mapfeed aggregator.
//!
//! Responsibilities:
//! - Query ArcGIS feature services for zones and school doors.
//! - Query the Bergen municipal WFS for school districts.
//! - Map transport, service and payload failures onto
//!   [`mapfeed_core::FetchError`].
//!
//! Boundaries:
//! - Do not decide which source serves which kind (lives in `mapfeed-core`).
//! - Do not cache; every fetch reaches the remote service.
//!
//! Invariants:
//! - Clients are immutable after construction and safe to share.
//! - Layer and feature order follows the service response.

#![forbid(unsafe_code)]

pub mod arcgis;
pub mod bergenskart;
mod geometry;
mod http;
mod properties;

use std::sync::Arc;

pub use arcgis::{ArcGisFeatureClient, FeatureLayer};
pub use bergenskart::{BergenskartClient, BergenskartConfig};
pub use http::{ClientBuildError, DEFAULT_USER_AGENT, HttpClientConfig};
use mapfeed_core::SourceRegistry;

/// Build a registry wired to the live services.
///
/// # Errors
///
/// Returns [`ClientBuildError`] if any HTTP client cannot be built.
///
/// # Examples
///
/// ```
/// use mapfeed_core::{Aggregator, InMemorySettings};
/// use mapfeed_data::{BergenskartConfig, HttpClientConfig, http_registry};
///
/// let registry = http_registry(&HttpClientConfig::default(), BergenskartConfig::default())?;
/// let aggregator = Aggregator::new(InMemorySettings::new(), registry);
/// # let _ = aggregator;
/// # Ok::<(), mapfeed_data::ClientBuildError>(())
/// ```
pub fn http_registry(
    http: &HttpClientConfig,
    districts: BergenskartConfig,
) -> Result<SourceRegistry, ClientBuildError> {
    Ok(SourceRegistry::new(
        Arc::new(ArcGisFeatureClient::new(FeatureLayer::Zones, http)?),
        Arc::new(ArcGisFeatureClient::new(FeatureLayer::SchoolDoors, http)?),
        Arc::new(BergenskartClient::new(districts, http)?),
    ))
}
