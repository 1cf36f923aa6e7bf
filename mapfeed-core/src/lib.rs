//! Core domain types and dispatch logic for the mapfeed geodata provider.
//!
//! Responsibilities:
//! - Define the typed shapes callers request and the tags they are routed by.
//! - Describe the settings catalogue and take per-call snapshots of it.
//! - Route a requested kind to the one source able to produce it.
//! - Aggregate source results behind the [`DataProvider`] capability.
//!
//! Boundaries:
//! - No network or file I/O; concrete source clients live in `mapfeed-data`.
//! - No caching; settings and descriptors are read fresh on every call.

#![forbid(unsafe_code)]

pub mod aggregator;
mod error;
mod provider;
pub mod router;
pub mod settings;
mod shape;
mod source;

#[doc(hidden)]
pub mod test_support;

pub use aggregator::Aggregator;
pub use error::FetchError;
pub use provider::{
    DataProvider, FetchOptions, PROVIDER_DESCRIPTION, PROVIDER_NAME, ProviderInfo, ProviderStatus,
};
pub use router::{AvailableTypes, EnabledSources, Route, available_types, resolve};
pub use settings::{
    DEFAULT_ZONE_SOURCE_URL, InMemorySettings, ProviderSettings, SCHOOL_DOOR_NAME_FIELD,
    SCHOOL_DOOR_NUMBER_FIELD, SettingCategory, SettingDefinition, SettingKey, SettingValue,
    SettingsSource, default_settings,
};
pub use shape::{
    BaseShape, SchoolDistrictShape, SchoolDoor, Shape, ShapeCollection, ShapeKind, UnknownShapeKind,
    ZoneShape,
};
pub use source::{SourceClient, SourceDescriptor, SourceId, SourceRegistry};
