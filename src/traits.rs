//! Capability seams for the tour pipeline.
//!
//! The pipeline never talks to a network directly. Geocoding, photo search,
//! and waiting between retries all go through these traits so callers can
//! plug in real backends or in-memory doubles.

use std::time::Duration;

use crate::error::{GeocodeError, PhotoError};
use crate::geo::GeoPoint;
use crate::itinerary::Place;
use crate::sequencer::{SkippedPlace, TourOutcome};

/// Status reported by a geocoding backend for a single request.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeReply {
    /// Candidates in backend ranking order. May be empty.
    Ok(Vec<GeocodeCandidate>),
    /// Rate limited; the same request should be retried later.
    QuotaExceeded,
    /// Any other status, carried verbatim.
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    pub location: GeoPoint,
    pub formatted_address: Option<String>,
}

/// Turns a free-text address into candidate locations.
pub trait Geocoder {
    fn geocode(&self, address: &str) -> Result<GeocodeReply, GeocodeError>;
}

/// A photo returned by a search, with its pixel dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoDescriptor {
    pub url: String,
    pub width_px: u32,
    pub height_px: u32,
}

impl PhotoDescriptor {
    /// Raw width/height ratio, or `None` for degenerate dimensions.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width_px == 0 || self.height_px == 0 {
            return None;
        }
        Some(self.width_px as f64 / self.height_px as f64)
    }
}

/// What to search photos for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoQuery {
    /// Photos in `owner`'s library tagged with `tag`.
    Personal { owner: String, tag: String },
    /// Public photos matching free text.
    Community { query: String, max_results: usize },
}

/// Searches a photo library. Results come back in ranking order.
pub trait PhotoSearch {
    fn search(&self, query: &PhotoQuery) -> Result<Vec<PhotoDescriptor>, PhotoError>;
}

/// Blocks the pipeline between retries.
pub trait Pause {
    fn pause(&self, delay: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Progress notifications emitted while a tour is assembled.
pub trait TourObserver {
    fn place_resolved(&mut self, _index: usize, _place: &Place) {}

    fn place_skipped(&mut self, _skipped: &SkippedPlace) {}

    fn completed(&mut self, _outcome: &TourOutcome) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TourObserver for NoopObserver {}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, address: &str) -> Result<GeocodeReply, GeocodeError> {
        (**self).geocode(address)
    }
}

impl<T: PhotoSearch + ?Sized> PhotoSearch for &T {
    fn search(&self, query: &PhotoQuery) -> Result<Vec<PhotoDescriptor>, PhotoError> {
        (**self).search(query)
    }
}

impl<T: Pause + ?Sized> Pause for &T {
    fn pause(&self, delay: Duration) {
        (**self).pause(delay)
    }
}
