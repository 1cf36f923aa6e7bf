//! ArcGIS REST response types for service metadata and layer queries.
//!
//! Only the fields the client reads are modelled; everything else in the
//! payload is ignored.
//!
//! See: <https://developers.arcgis.com/rest/services-reference/enterprise/query-feature-service-layer/>

use serde::Deserialize;
use serde_json::{Map, Value};

/// Error object ArcGIS embeds in an HTTP 200 response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorBody {
    /// Service error code, usually mirroring an HTTP status.
    pub code: i64,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Additional detail lines.
    #[serde(default)]
    pub details: Vec<String>,
}

impl ErrorBody {
    /// Message with any detail lines appended.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.details.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({})", self.message, self.details.join("; "))
        }
    }
}

/// Feature service metadata returned by `{service}?f=json`.
#[derive(Debug, Deserialize)]
pub struct ServiceInfo {
    /// Layers published by the service, in service order.
    #[serde(default)]
    pub layers: Vec<LayerInfo>,
    /// Present when the service rejected the request.
    pub error: Option<ErrorBody>,
}

/// One layer entry in [`ServiceInfo`].
#[derive(Debug, Deserialize)]
pub struct LayerInfo {
    /// Layer identifier used in query URLs.
    pub id: u32,
    /// Layer display name.
    #[serde(default)]
    pub name: String,
}

/// Layer metadata returned by `{service}/{layer}?f=json`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDetails {
    /// Name of the object-id field, when the layer has one.
    pub object_id_field: Option<String>,
    /// Query capabilities; missing on servers older than 10.3.
    pub advanced_query_capabilities: Option<QueryCapabilities>,
    /// Present when the service rejected the request.
    pub error: Option<ErrorBody>,
}

impl LayerDetails {
    /// Whether the layer honours `resultOffset`/`resultRecordCount`.
    #[must_use]
    pub fn supports_pagination(&self) -> bool {
        self.advanced_query_capabilities
            .as_ref()
            .is_some_and(|caps| caps.supports_pagination)
    }

    /// Field to order paged queries by, when the layer can sort on it.
    #[must_use]
    pub fn order_by_field(&self) -> Option<&str> {
        self.advanced_query_capabilities
            .as_ref()
            .filter(|caps| caps.supports_order_by)
            .and(self.object_id_field.as_deref())
    }
}

/// The subset of `advancedQueryCapabilities` the client reads.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCapabilities {
    /// Layer supports offset-based paging.
    #[serde(default)]
    pub supports_pagination: bool,
    /// Layer supports `orderByFields`.
    #[serde(default)]
    pub supports_order_by: bool,
}

/// Layer query response returned by `{service}/{layer}/query?f=json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// Matching features in response order.
    #[serde(default)]
    pub features: Vec<Feature>,
    /// `true` when more features remain beyond this page.
    #[serde(default)]
    pub exceeded_transfer_limit: bool,
    /// Present when the layer rejected the query.
    pub error: Option<ErrorBody>,
}

/// A single feature with its attributes and geometry.
#[derive(Debug, PartialEq, Deserialize)]
pub struct Feature {
    /// Attribute values keyed by field name.
    #[serde(default)]
    pub attributes: Map<String, Value>,
    /// Feature geometry, absent when the service omits it.
    pub geometry: Option<Geometry>,
}

/// ArcGIS JSON geometry.
///
/// Polygons carry `rings`; points carry `x`/`y`. Other geometry kinds fail
/// to deserialise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Geometry {
    /// Polygon made of one or more closed rings.
    Polygon {
        /// Rings as lists of `[x, y]` positions. Extra ordinates are dropped.
        rings: Vec<Vec<Vec<f64>>>,
    },
    /// Single point.
    Point {
        /// Longitude in WGS84 output.
        x: f64,
        /// Latitude in WGS84 output.
        y: f64,
    },
}
