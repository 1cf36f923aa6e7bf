//! Dispatch typed fetch requests to the configured sources.
//!
//! Each call takes a fresh [`ProviderSettings`] snapshot, resolves the
//! requested kind through the router and either awaits the matching
//! [`SourceClient`](crate::SourceClient) or returns an empty result.
//!
//! Only genuine source failures become errors. A kind that is unmapped or
//! switched off is a soft miss, so callers can probe every kind without
//! guarding against errors for sources they have not configured.
//!
//! The aggregator keeps no mutable state; concurrent fetches for the same or
//! different kinds need no coordination.

use async_trait::async_trait;
use log::debug;

use crate::router::{AvailableTypes, available_types, resolve};
use crate::{
    DataProvider, FetchError, FetchOptions, ProviderSettings, ProviderStatus, Shape,
    ShapeCollection, ShapeKind, SettingsSource, SourceId, SourceRegistry,
};

/// Routes fetch requests to source clients according to current settings.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use mapfeed_core::test_support::{StubSourceClient, sample_zone};
/// use mapfeed_core::{
///     Aggregator, BaseShape, DataProvider, FetchOptions, InMemorySettings, SourceRegistry,
///     ZoneShape,
/// };
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build()?.block_on(async {
/// let registry = SourceRegistry::new(
///     Arc::new(StubSourceClient::with_zones(vec![sample_zone("Bergen sentrum", "1")])),
///     Arc::new(StubSourceClient::with_doors(Vec::new())),
///     Arc::new(StubSourceClient::with_districts(Vec::new())),
/// );
/// let aggregator = Aggregator::new(InMemorySettings::new(), registry);
///
/// let zones: Vec<ZoneShape> = aggregator.fetch_all(&FetchOptions::default()).await?;
/// assert_eq!(zones.len(), 1);
///
/// let nothing: Vec<BaseShape> = aggregator.fetch_all(&FetchOptions::default()).await?;
/// assert!(nothing.is_empty());
/// # Ok::<(), mapfeed_core::FetchError>(())
/// # })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Aggregator<S> {
    settings: S,
    sources: SourceRegistry,
}

impl<S: SettingsSource> Aggregator<S> {
    /// Build an aggregator over `settings` and the registered `sources`.
    #[must_use]
    pub const fn new(settings: S, sources: SourceRegistry) -> Self {
        Self { settings, sources }
    }

    /// Current settings snapshot.
    #[must_use]
    pub fn settings(&self) -> ProviderSettings {
        ProviderSettings::load(&self.settings)
    }

    /// Fetch the shapes for `kind` without committing to a concrete type.
    ///
    /// Returns `Ok(None)` when no enabled source produces `kind`.
    ///
    /// # Errors
    ///
    /// Propagates the source client's error unchanged.
    pub async fn fetch_kind(
        &self,
        kind: ShapeKind,
        options: &FetchOptions,
    ) -> Result<Option<ShapeCollection>, FetchError> {
        let fetched = self.dispatch(kind, options).await?;
        Ok(fetched.map(|(_, collection)| collection))
    }

    async fn dispatch(
        &self,
        kind: ShapeKind,
        _options: &FetchOptions,
    ) -> Result<Option<(SourceId, ShapeCollection)>, FetchError> {
        let settings = self.settings();
        let Some(route) = resolve(kind, &settings) else {
            debug!("no source produces {kind}; returning an empty result");
            return Ok(None);
        };
        if !route.enabled {
            debug!(
                "source {} for {kind} is disabled; returning an empty result",
                route.source
            );
            return Ok(None);
        }

        debug!("fetching {kind} from source {}", route.source);
        let collection = self
            .sources
            .client(route.source)
            .fetch(route.descriptor.as_ref())
            .await?;
        debug!(
            "source {} returned {} {kind} shapes",
            route.source,
            collection.len()
        );
        Ok(Some((route.source, collection)))
    }
}

#[async_trait]
impl<S: SettingsSource> DataProvider for Aggregator<S> {
    async fn fetch_all<T: Shape>(&self, options: &FetchOptions) -> Result<Vec<T>, FetchError> {
        let Some((source_id, collection)) = self.dispatch(T::KIND, options).await? else {
            return Ok(Vec::new());
        };
        let actual = collection.kind();
        T::from_collection(collection).ok_or(FetchError::KindMismatch {
            source_id,
            expected: T::KIND,
            actual,
        })
    }

    async fn fetch_single<T: Shape>(
        &self,
        _id: &str,
        _include_properties: bool,
    ) -> Result<T, FetchError> {
        Err(FetchError::Unsupported {
            operation: "fetch_single",
        })
    }

    fn available_types(&self) -> AvailableTypes {
        available_types(&self.settings())
    }

    fn status(&self) -> ProviderStatus {
        ProviderStatus::online()
    }
}
