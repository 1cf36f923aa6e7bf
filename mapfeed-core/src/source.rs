//! Source-client capability and the registry the aggregator dispatches into.
//!
//! A [`SourceClient`] performs one kind of remote fetch. Feature-service
//! clients are driven by a per-call [`SourceDescriptor`]; the vendor-special
//! client ignores it. How a client talks to its backend, decodes responses
//! and applies timeouts is entirely its own concern.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{FetchError, ShapeCollection};

/// Logical sources the provider knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    /// Zone feature service.
    Zones,
    /// School-door feature service.
    SchoolDoors,
    /// Bergenskart school-district integration.
    Bergenskart,
}

impl SourceId {
    /// Return the source name as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zones => "zones",
            Self::SchoolDoors => "school-doors",
            Self::Bergenskart => "bergenskart",
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call configuration for a feature-service source.
///
/// The field keys act as a lookup schema, letting one client serve sources
/// whose upstream attribute names differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Base URL of the feature service.
    pub source_url: String,
    /// Attribute holding the feature name.
    pub name_field: String,
    /// Attribute holding the feature number.
    pub number_field: String,
}

impl SourceDescriptor {
    /// Bundle a URL with its name and number field keys.
    #[must_use]
    pub fn new(
        source_url: impl Into<String>,
        name_field: impl Into<String>,
        number_field: impl Into<String>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            name_field: name_field.into(),
            number_field: number_field.into(),
        }
    }
}

/// Fetch shapes from one remote source.
///
/// Implementations return every shape the source publishes, in the order the
/// backend yields them, or fail with a transport, service or decode
/// [`FetchError`]. Dropping the returned future abandons the request.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Fetch all shapes, using `descriptor` when the client is schema-driven.
    async fn fetch(
        &self,
        descriptor: Option<&SourceDescriptor>,
    ) -> Result<ShapeCollection, FetchError>;
}

/// The three source clients the router can resolve to.
#[derive(Clone)]
pub struct SourceRegistry {
    zones: Arc<dyn SourceClient>,
    school_doors: Arc<dyn SourceClient>,
    bergenskart: Arc<dyn SourceClient>,
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("zones", &"<dyn SourceClient>")
            .field("school_doors", &"<dyn SourceClient>")
            .field("bergenskart", &"<dyn SourceClient>")
            .finish()
    }
}

impl SourceRegistry {
    /// Register one client per source.
    #[must_use]
    pub const fn new(
        zones: Arc<dyn SourceClient>,
        school_doors: Arc<dyn SourceClient>,
        bergenskart: Arc<dyn SourceClient>,
    ) -> Self {
        Self {
            zones,
            school_doors,
            bergenskart,
        }
    }

    /// Client registered for `id`.
    #[must_use]
    pub fn client(&self, id: SourceId) -> &dyn SourceClient {
        match id {
            SourceId::Zones => self.zones.as_ref(),
            SourceId::SchoolDoors => self.school_doors.as_ref(),
            SourceId::Bergenskart => self.bergenskart.as_ref(),
        }
    }
}
