//! Facade crate for the mapfeed geodata aggregator.
//!
//! This crate re-exports the core provider types and exposes the HTTP source
//! clients behind the `http-sources` feature.

#![forbid(unsafe_code)]

pub use mapfeed_core::{
    Aggregator, AvailableTypes, BaseShape, DataProvider, FetchError, FetchOptions,
    InMemorySettings, ProviderInfo, ProviderSettings, ProviderStatus, SchoolDistrictShape,
    SchoolDoor, SettingKey, SettingValue, SettingsSource, Shape, ShapeCollection, ShapeKind,
    SourceClient, SourceDescriptor, SourceRegistry, ZoneShape, default_settings,
};

#[cfg(feature = "http-sources")]
pub use mapfeed_data::{
    ArcGisFeatureClient, BergenskartClient, BergenskartConfig, ClientBuildError, FeatureLayer,
    HttpClientConfig, http_registry,
};
