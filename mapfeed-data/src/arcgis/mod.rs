//! ArcGIS feature-service source.
//!
//! [`ArcGisFeatureClient`] lists a service's layers, queries each one for the
//! configured name and number attributes, and decodes the results into zones
//! or school doors. Geometry is requested in WGS84 (`outSR=4326`). Large
//! layers are paged with `resultOffset` for as long as the service reports
//! `exceededTransferLimit`.
//!
//! Polygon rings follow ESRI winding: clockwise rings are exteriors and
//! counter-clockwise rings are holes in the preceding exterior.

mod client;
mod decode;
pub mod response;

pub use client::ArcGisFeatureClient;

use mapfeed_core::{ShapeCollection, ShapeKind, SourceId};

/// Which shape family an [`ArcGisFeatureClient`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureLayer {
    /// Polygon layers decoded as zones.
    Zones,
    /// Point layers decoded as school doors.
    SchoolDoors,
}

impl FeatureLayer {
    /// Shape kind produced for this layer.
    #[must_use]
    pub const fn kind(self) -> ShapeKind {
        match self {
            Self::Zones => ShapeKind::Zone,
            Self::SchoolDoors => ShapeKind::SchoolDoor,
        }
    }

    /// Source slot this layer is registered under.
    #[must_use]
    pub const fn source_id(self) -> SourceId {
        match self {
            Self::Zones => SourceId::Zones,
            Self::SchoolDoors => SourceId::SchoolDoors,
        }
    }

    /// Lower-case label used in log messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zones => "zones",
            Self::SchoolDoors => "school doors",
        }
    }

    pub(crate) const fn empty_collection(self) -> ShapeCollection {
        match self {
            Self::Zones => ShapeCollection::Zones(Vec::new()),
            Self::SchoolDoors => ShapeCollection::SchoolDoors(Vec::new()),
        }
    }
}
