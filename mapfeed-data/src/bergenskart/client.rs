//! WFS client for Bergen school district polygons.

use std::time::Duration;

use async_trait::async_trait;
use geo::MultiPolygon;
use log::{debug, warn};
use mapfeed_core::{FetchError, SchoolDistrictShape, ShapeCollection, SourceClient, SourceDescriptor};
use reqwest::Client;
use serde_json::Value;

use super::BergenskartConfig;
use super::response::{FeatureCollection, GeoFeature, GeoGeometry};
use crate::geometry::polygon_in_order;
use crate::http::{ClientBuildError, HttpClientConfig, get_json, parse_base_url};
use crate::properties::attribute_text;

/// [`SourceClient`] that loads school districts from the Bergen municipal
/// map server.
///
/// The query is fixed by [`BergenskartConfig`]; any descriptor passed to
/// [`SourceClient::fetch`] is ignored.
#[derive(Debug, Clone)]
pub struct BergenskartClient {
    config: BergenskartConfig,
    client: Client,
    timeout: Duration,
}

impl BergenskartClient {
    /// Create a client for the given WFS query.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::HttpClient`] if the HTTP client cannot be
    /// built.
    pub fn new(
        config: BergenskartConfig,
        http: &HttpClientConfig,
    ) -> Result<Self, ClientBuildError> {
        Ok(Self {
            config,
            client: http.build_client()?,
            timeout: http.timeout,
        })
    }

    /// Query this client issues.
    #[must_use]
    pub const fn config(&self) -> &BergenskartConfig {
        &self.config
    }

    fn decode(&self, feature: &GeoFeature) -> Result<SchoolDistrictShape, String> {
        let name = attribute_text(&feature.properties, &self.config.name_property)
            .map_err(|err| format!("{}: {err}", feature_label(feature)))?;
        let number = attribute_text(&feature.properties, &self.config.number_property).ok();
        let geometry = match &feature.geometry {
            Some(GeoGeometry::Polygon { coordinates }) => {
                MultiPolygon::new(vec![polygon_in_order(coordinates)?])
            }
            Some(GeoGeometry::MultiPolygon { coordinates }) => coordinates
                .iter()
                .map(|rings| polygon_in_order(rings))
                .collect::<Result<Vec<_>, _>>()
                .map(MultiPolygon::new)?,
            Some(GeoGeometry::Unsupported) => {
                return Err(format!("district {name}: geometry is not polygonal"));
            }
            None => return Err(format!("district {name}: geometry missing")),
        };
        Ok(SchoolDistrictShape {
            name,
            number,
            geometry,
        })
    }
}

#[async_trait]
impl SourceClient for BergenskartClient {
    async fn fetch(
        &self,
        descriptor: Option<&SourceDescriptor>,
    ) -> Result<ShapeCollection, FetchError> {
        if descriptor.is_some() {
            debug!("district source ignores its descriptor");
        }
        let mut url = parse_base_url(&self.config.url)?;
        url.query_pairs_mut()
            .append_pair("service", "WFS")
            .append_pair("version", "2.0.0")
            .append_pair("request", "GetFeature")
            .append_pair("typeNames", &self.config.type_name)
            .append_pair("outputFormat", "application/json")
            .append_pair("srsName", "EPSG:4326");
        let body: FeatureCollection = get_json(&self.client, &url, self.timeout).await?;
        debug!("{url}: {} district feature(s)", body.features.len());

        let districts = body
            .features
            .iter()
            .map(|feature| self.decode(feature))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|message| FetchError::Decode {
                url: url.to_string(),
                message,
            })?;
        if districts.is_empty() {
            warn!("{url} returned no school districts");
        }
        Ok(ShapeCollection::SchoolDistricts(districts))
    }
}

fn feature_label(feature: &GeoFeature) -> String {
    match &feature.id {
        Some(Value::String(id)) => format!("feature {id}"),
        Some(other) => format!("feature {other}"),
        None => "feature".to_owned(),
    }
}
