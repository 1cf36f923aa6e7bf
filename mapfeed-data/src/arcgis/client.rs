//! HTTP client for ArcGIS feature services.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use mapfeed_core::{FetchError, ShapeCollection, SourceClient, SourceDescriptor};
use reqwest::Client;
use url::Url;

use super::FeatureLayer;
use super::decode::{self, FieldKeys};
use super::response::{ErrorBody, Feature, LayerDetails, QueryResponse, ServiceInfo};
use crate::http::{ClientBuildError, HttpClientConfig, get_json, parse_base_url};

/// Features requested per query page.
const PAGE_SIZE: usize = 1000;

/// Upper bound on pages read from one layer.
const MAX_PAGES: usize = 1000;

/// [`SourceClient`] reading zones or school doors from an ArcGIS feature
/// service.
///
/// The descriptor's URL names either a whole service, in which case every
/// layer is queried in service order, or a single layer ending in its numeric
/// id.
///
/// Layers advertising `supportsPagination` are read page by page. Paging
/// stops with a decode error when a page repeats its predecessor or after a
/// fixed page budget. Other layers are queried once.
#[derive(Debug, Clone)]
pub struct ArcGisFeatureClient {
    layer: FeatureLayer,
    client: Client,
    timeout: Duration,
}

impl ArcGisFeatureClient {
    /// Create a client producing `layer` shapes.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::HttpClient`] if the HTTP client cannot be
    /// built.
    pub fn new(layer: FeatureLayer, config: &HttpClientConfig) -> Result<Self, ClientBuildError> {
        Ok(Self {
            layer,
            client: config.build_client()?,
            timeout: config.timeout,
        })
    }

    /// Shape family this client produces.
    #[must_use]
    pub const fn layer(&self) -> FeatureLayer {
        self.layer
    }

    async fn layer_urls(&self, base: &Url) -> Result<Vec<Url>, FetchError> {
        if ends_with_layer_id(base) {
            return Ok(vec![base.clone()]);
        }
        let mut info_url = base.clone();
        info_url.query_pairs_mut().append_pair("f", "json");
        let info: ServiceInfo = get_json(&self.client, &info_url, self.timeout).await?;
        if let Some(error) = info.error {
            return Err(service_error(&info_url, &error));
        }
        debug!(
            "{} lists {} layer(s) at {base}",
            self.layer.as_str(),
            info.layers.len()
        );
        info.layers
            .iter()
            .map(|layer| child_url(base, &[&layer.id.to_string()]))
            .collect()
    }

    async fn layer_details(&self, layer_url: &Url) -> Result<LayerDetails, FetchError> {
        let mut info_url = layer_url.clone();
        info_url.query_pairs_mut().append_pair("f", "json");
        let mut details: LayerDetails = get_json(&self.client, &info_url, self.timeout).await?;
        if let Some(error) = details.error.take() {
            return Err(service_error(&info_url, &error));
        }
        Ok(details)
    }

    async fn query_page(
        &self,
        query_url: &Url,
        out_fields: &str,
        paging: Option<Paging<'_>>,
    ) -> Result<QueryResponse, FetchError> {
        let mut page_url = query_url.clone();
        {
            let mut pairs = page_url.query_pairs_mut();
            pairs
                .append_pair("where", "1=1")
                .append_pair("outFields", out_fields)
                .append_pair("returnGeometry", "true")
                .append_pair("outSR", "4326");
            if let Some(paging) = paging {
                if let Some(field) = paging.order_by {
                    pairs.append_pair("orderByFields", field);
                }
                pairs
                    .append_pair("resultOffset", &paging.offset.to_string())
                    .append_pair("resultRecordCount", &PAGE_SIZE.to_string());
            }
            pairs.append_pair("f", "json");
        }
        let mut page: QueryResponse = get_json(&self.client, &page_url, self.timeout).await?;
        if let Some(error) = page.error.take() {
            return Err(service_error(&page_url, &error));
        }
        Ok(page)
    }

    async fn query_layer(
        &self,
        layer_url: &Url,
        keys: FieldKeys<'_>,
    ) -> Result<Vec<Feature>, FetchError> {
        let details = self.layer_details(layer_url).await?;
        let query_url = child_url(layer_url, &["query"])?;
        let out_fields = format!("{},{}", keys.name, keys.number);

        if !details.supports_pagination() {
            let page = self.query_page(&query_url, &out_fields, None).await?;
            if page.exceeded_transfer_limit {
                warn!(
                    "{layer_url} cannot page; keeping the first {} feature(s)",
                    page.features.len()
                );
            }
            return Ok(page.features);
        }

        let order_by = details.order_by_field();
        let mut features = Vec::new();
        let mut last_page: Vec<Feature> = Vec::new();
        for _ in 0..MAX_PAGES {
            let offset = features.len() + last_page.len();
            let paging = Paging { offset, order_by };
            let page = self.query_page(&query_url, &out_fields, Some(paging)).await?;
            if !last_page.is_empty() && page.features == last_page {
                return Err(FetchError::Decode {
                    url: query_url.to_string(),
                    message: format!(
                        "page at offset {offset} repeats the previous page; resultOffset is ignored"
                    ),
                });
            }
            features.append(&mut last_page);
            last_page = page.features;
            if !page.exceeded_transfer_limit || last_page.is_empty() {
                features.append(&mut last_page);
                return Ok(features);
            }
            debug!("{layer_url}: paging past offset {offset}");
        }
        Err(FetchError::Decode {
            url: query_url.to_string(),
            message: format!("layer still reports more features after {MAX_PAGES} pages"),
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Paging<'a> {
    offset: usize,
    order_by: Option<&'a str>,
}

#[async_trait]
impl SourceClient for ArcGisFeatureClient {
    async fn fetch(
        &self,
        descriptor: Option<&SourceDescriptor>,
    ) -> Result<ShapeCollection, FetchError> {
        let Some(found) = descriptor else {
            return Err(FetchError::MissingDescriptor {
                source_id: self.layer.source_id(),
            });
        };
        let base = parse_base_url(&found.source_url)?;
        let keys = FieldKeys {
            name: &found.name_field,
            number: &found.number_field,
        };

        let mut collection = self.layer.empty_collection();
        for layer_url in self.layer_urls(&base).await? {
            let features = self.query_layer(&layer_url, keys).await?;
            debug!("{layer_url}: {} feature(s)", features.len());
            let decoded = decode_into(&mut collection, &features, keys);
            decoded.map_err(|message| FetchError::Decode {
                url: layer_url.to_string(),
                message,
            })?;
        }
        if collection.is_empty() {
            warn!("{base} returned no {}", self.layer.as_str());
        }
        Ok(collection)
    }
}

fn decode_into(
    collection: &mut ShapeCollection,
    features: &[Feature],
    keys: FieldKeys<'_>,
) -> Result<(), String> {
    match collection {
        ShapeCollection::Zones(zones) => {
            for feature in features {
                zones.push(decode::zone(feature, keys)?);
            }
        }
        ShapeCollection::SchoolDoors(doors) => {
            for feature in features {
                doors.push(decode::school_door(feature, keys)?);
            }
        }
        ShapeCollection::SchoolDistricts(_) => {
            return Err("feature services do not provide school districts".to_owned());
        }
    }
    Ok(())
}

fn ends_with_layer_id(url: &Url) -> bool {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .is_some_and(|last| !last.is_empty() && last.parse::<u32>().is_ok())
}

fn child_url(base: &Url, segments: &[&str]) -> Result<Url, FetchError> {
    let mut child = base.clone();
    child
        .path_segments_mut()
        .map_err(|()| FetchError::InvalidUrl {
            url: base.to_string(),
            message: "URL cannot carry path segments".to_owned(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(child)
}

fn service_error(url: &Url, error: &ErrorBody) -> FetchError {
    FetchError::Service {
        url: url.to_string(),
        code: error.code,
        message: error.describe(),
    }
}
