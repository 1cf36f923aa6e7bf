//! Typed geographic results returned by source clients.
//!
//! Every concrete shape carries a [`ShapeKind`] tag through the [`Shape`]
//! trait. The tag is what the router dispatches on, so a request for
//! `Vec<ZoneShape>` never needs runtime type inspection.
//!
//! # Examples
//! ```
//! use mapfeed_core::{Shape, ShapeKind, ZoneShape};
//!
//! assert_eq!(ZoneShape::KIND, ShapeKind::Zone);
//! assert_eq!(ShapeKind::Zone.to_string(), "zone");
//! ```

use geo::{MultiPolygon, Point};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Routing tag identifying a shape type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ShapeKind {
    /// Abstract base marker. Advertised by discovery, produced by no source.
    Base,
    /// Fare or service zones from a feature service.
    Zone,
    /// School entrance points from a feature service.
    SchoolDoor,
    /// School district polygons from the Bergenskart map server.
    SchoolDistrict,
}

impl ShapeKind {
    /// Every kind in discovery order.
    pub const ALL: [Self; 4] = [
        Self::Base,
        Self::Zone,
        Self::SchoolDoor,
        Self::SchoolDistrict,
    ];

    /// Return the kind as a lowercase, kebab-case `&str`.
    ///
    /// # Examples
    /// ```
    /// use mapfeed_core::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::SchoolDoor.as_str(), "school-door");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Zone => "zone",
            Self::SchoolDoor => "school-door",
            Self::SchoolDistrict => "school-district",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`ShapeKind`] name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown shape kind '{0}'")]
pub struct UnknownShapeKind(pub String);

impl std::str::FromStr for ShapeKind {
    type Err = UnknownShapeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "zone" | "zones" => Ok(Self::Zone),
            "school-door" | "school-doors" => Ok(Self::SchoolDoor),
            "school-district" | "school-districts" => Ok(Self::SchoolDistrict),
            _ => Err(UnknownShapeKind(s.to_owned())),
        }
    }
}

/// A zone polygon with the name and number read from the upstream schema.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneShape {
    /// Zone display name.
    pub name: String,
    /// Zone number as published upstream.
    pub number: String,
    /// Zone outline. Holes are kept as polygon interiors.
    pub geometry: MultiPolygon<f64>,
}

/// A school entrance point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchoolDoor {
    /// Name of the school the door belongs to.
    pub name: String,
    /// School number as published upstream.
    pub number: String,
    /// Door position in WGS84 longitude/latitude.
    pub location: Point<f64>,
}

/// A school district polygon from the vendor-special source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchoolDistrictShape {
    /// District name.
    pub name: String,
    /// District identifier, when the vendor publishes one.
    pub number: Option<String>,
    /// District outline.
    pub geometry: MultiPolygon<f64>,
}

/// Abstract base marker for discovery.
///
/// No source produces values of this type, so fetching it always resolves to
/// an empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BaseShape;

/// Result of one source fetch, tagged by the shape kind it holds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ShapeCollection {
    /// Zones from the zone feature service.
    Zones(Vec<ZoneShape>),
    /// Doors from the school-door feature service.
    SchoolDoors(Vec<SchoolDoor>),
    /// Districts from the Bergenskart client.
    SchoolDistricts(Vec<SchoolDistrictShape>),
}

impl ShapeCollection {
    /// Kind of the shapes held by this collection.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Zones(_) => ShapeKind::Zone,
            Self::SchoolDoors(_) => ShapeKind::SchoolDoor,
            Self::SchoolDistricts(_) => ShapeKind::SchoolDistrict,
        }
    }

    /// Number of shapes in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Zones(zones) => zones.len(),
            Self::SchoolDoors(doors) => doors.len(),
            Self::SchoolDistricts(districts) => districts.len(),
        }
    }

    /// Whether the collection holds no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Capability shared by every typed geographic result.
///
/// `KIND` drives routing; `from_collection` adapts a source result back into
/// the requested type and returns `None` when the collection holds a
/// different kind.
pub trait Shape: Sized + Send + 'static {
    /// Routing tag for this type.
    const KIND: ShapeKind;

    /// Extract shapes of this type from a source result.
    fn from_collection(collection: ShapeCollection) -> Option<Vec<Self>>;
}

impl Shape for ZoneShape {
    const KIND: ShapeKind = ShapeKind::Zone;

    fn from_collection(collection: ShapeCollection) -> Option<Vec<Self>> {
        match collection {
            ShapeCollection::Zones(zones) => Some(zones),
            _ => None,
        }
    }
}

impl Shape for SchoolDoor {
    const KIND: ShapeKind = ShapeKind::SchoolDoor;

    fn from_collection(collection: ShapeCollection) -> Option<Vec<Self>> {
        match collection {
            ShapeCollection::SchoolDoors(doors) => Some(doors),
            _ => None,
        }
    }
}

impl Shape for SchoolDistrictShape {
    const KIND: ShapeKind = ShapeKind::SchoolDistrict;

    fn from_collection(collection: ShapeCollection) -> Option<Vec<Self>> {
        match collection {
            ShapeCollection::SchoolDistricts(districts) => Some(districts),
            _ => None,
        }
    }
}

impl Shape for BaseShape {
    const KIND: ShapeKind = ShapeKind::Base;

    fn from_collection(_collection: ShapeCollection) -> Option<Vec<Self>> {
        None
    }
}
