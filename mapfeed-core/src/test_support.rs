//! Test doubles for the source-client seam.
//!
//! [`StubSourceClient`] returns a pre-configured collection or error without
//! any I/O. Optional delays and barriers let tests observe how concurrent
//! fetches interleave, and the in-flight counter shows whether a dropped
//! fetch was abandoned.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use geo::{MultiPolygon, point, polygon};
use tokio::sync::Barrier;

use crate::{
    FetchError, SchoolDistrictShape, SchoolDoor, ShapeCollection, SourceClient, SourceDescriptor,
    ZoneShape,
};

/// Stub [`SourceClient`] for tests.
///
/// # Example
///
/// ```
/// use mapfeed_core::test_support::{StubSourceClient, sample_zone};
/// use mapfeed_core::SourceClient;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build()?.block_on(async {
/// let stub = StubSourceClient::with_zones(vec![sample_zone("Sentrum", "1")]);
/// let collection = stub.fetch(None).await?;
/// assert_eq!(collection.len(), 1);
/// assert_eq!(stub.calls(), 1);
/// # Ok::<(), mapfeed_core::FetchError>(())
/// # })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct StubSourceClient {
    response: Result<ShapeCollection, FetchError>,
    delay: Option<Duration>,
    barrier: Option<Arc<Barrier>>,
    calls: AtomicUsize,
    in_flight: Arc<AtomicUsize>,
    last_descriptor: Mutex<Option<SourceDescriptor>>,
}

impl StubSourceClient {
    fn new(response: Result<ShapeCollection, FetchError>) -> Self {
        Self {
            response,
            delay: None,
            barrier: None,
            calls: AtomicUsize::new(0),
            in_flight: Arc::new(AtomicUsize::new(0)),
            last_descriptor: Mutex::new(None),
        }
    }

    /// Stub returning `zones`.
    #[must_use]
    pub fn with_zones(zones: Vec<ZoneShape>) -> Self {
        Self::new(Ok(ShapeCollection::Zones(zones)))
    }

    /// Stub returning `doors`.
    #[must_use]
    pub fn with_doors(doors: Vec<SchoolDoor>) -> Self {
        Self::new(Ok(ShapeCollection::SchoolDoors(doors)))
    }

    /// Stub returning `districts`.
    #[must_use]
    pub fn with_districts(districts: Vec<SchoolDistrictShape>) -> Self {
        Self::new(Ok(ShapeCollection::SchoolDistricts(districts)))
    }

    /// Stub failing with `error`.
    #[must_use]
    pub fn with_error(error: FetchError) -> Self {
        Self::new(Err(error))
    }

    /// Sleep for `delay` before answering.
    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Wait on `barrier` before answering.
    ///
    /// Sharing a barrier of size `n` between `n` stubs only lets any of them
    /// answer once all are in flight at the same time.
    #[must_use]
    pub fn gated(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    /// Number of fetches started so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of fetches started and neither finished nor dropped.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Descriptor passed to the most recent fetch.
    #[must_use]
    pub fn last_descriptor(&self) -> Option<SourceDescriptor> {
        self.last_descriptor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Decrements the in-flight counter when a fetch completes or is dropped.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SourceClient for StubSourceClient {
    async fn fetch(
        &self,
        descriptor: Option<&SourceDescriptor>,
    ) -> Result<ShapeCollection, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_descriptor
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = descriptor.cloned();
        let _guard = InFlight::enter(&self.in_flight);

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}

/// Zone covering a small square near Bergen.
#[must_use]
pub fn sample_zone(name: &str, number: &str) -> ZoneShape {
    ZoneShape {
        name: name.to_owned(),
        number: number.to_owned(),
        geometry: sample_area(),
    }
}

/// Door at a fixed point near Bergen.
#[must_use]
pub fn sample_door(name: &str, number: &str) -> SchoolDoor {
    SchoolDoor {
        name: name.to_owned(),
        number: number.to_owned(),
        location: point!(x: 5.3167, y: 60.3975),
    }
}

/// District covering the same square as [`sample_zone`].
#[must_use]
pub fn sample_district(name: &str) -> SchoolDistrictShape {
    SchoolDistrictShape {
        name: name.to_owned(),
        number: None,
        geometry: sample_area(),
    }
}

fn sample_area() -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon![
        (x: 5.30, y: 60.39),
        (x: 5.33, y: 60.39),
        (x: 5.33, y: 60.40),
        (x: 5.30, y: 60.40),
        (x: 5.30, y: 60.39),
    ]])
}
