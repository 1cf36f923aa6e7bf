//! Bergen municipality school district source.
//!
//! Districts are not published through the feature services the other
//! sources use. [`BergenskartClient`] instead issues a single WFS 2.0
//! `GetFeature` request for a GeoJSON layer and decodes each `Polygon` or
//! `MultiPolygon` feature into a [`mapfeed_core::SchoolDistrictShape`].

mod client;
pub mod response;

pub use client::BergenskartClient;

/// WFS endpoint of the Bergen municipal map server.
pub const DEFAULT_WFS_URL: &str = "https://kart.bergen.kommune.no/geoserver/wfs";

/// Layer holding school district polygons.
pub const DEFAULT_TYPE_NAME: &str = "skole:skolekretser";

/// Fixed query issued by [`BergenskartClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BergenskartConfig {
    /// WFS service endpoint.
    pub url: String,
    /// Feature type to request.
    pub type_name: String,
    /// Property holding the district name.
    pub name_property: String,
    /// Property holding the district number, when the layer has one.
    pub number_property: String,
}

impl Default for BergenskartConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WFS_URL.to_owned(),
            type_name: DEFAULT_TYPE_NAME.to_owned(),
            name_property: "skolekretsnavn".to_owned(),
            number_property: "skolekretsnummer".to_owned(),
        }
    }
}

impl BergenskartConfig {
    /// Point the query at another endpoint.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Override the property keys.
    #[must_use]
    pub fn with_properties(
        mut self,
        name_property: impl Into<String>,
        number_property: impl Into<String>,
    ) -> Self {
        self.name_property = name_property.into();
        self.number_property = number_property.into();
        self
    }
}
