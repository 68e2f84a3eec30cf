//! Test fixtures for tour-planner.
//!
//! Provides:
//! - Real city coordinates
//! - In-memory geocoding and photo backends
//! - A pause that records delays instead of sleeping

#![allow(dead_code)]

pub mod world_cities;

pub use world_cities::*;

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tour_planner::error::{GeocodeError, PhotoError};
use tour_planner::geo::GeoPoint;
use tour_planner::geocode::{GeocodeResolver, RetryPolicy};
use tour_planner::itinerary::address_key;
use tour_planner::photos::{PhotoMode, PhotoProvider};
use tour_planner::sequencer::TourSequencer;
use tour_planner::traits::{
    GeocodeCandidate, GeocodeReply, Geocoder, Pause, PhotoDescriptor, PhotoQuery, PhotoSearch,
};

/// Geocoder backed by a fixed address book. Unknown addresses have no match.
///
/// Addresses are looked up case- and whitespace-insensitively.
#[derive(Debug, Default)]
pub struct AddressBook {
    entries: HashMap<String, GeoPoint>,
    /// Quota-exceeded replies to hand out before answering, per address.
    throttled: RefCell<HashMap<String, u32>>,
    pub requests: RefCell<Vec<String>>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, lat: f64, lng: f64) -> Self {
        self.entries.insert(address_key(address), GeoPoint::new(lat, lng));
        self
    }

    pub fn with_cities(mut self, cities: &[City]) -> Self {
        for city in cities {
            self = self.with(city.name, city.lat, city.lng);
        }
        self
    }

    /// The next `times` requests for `address` report quota exhaustion.
    pub fn throttle(self, address: &str, times: u32) -> Self {
        self.throttled.borrow_mut().insert(address_key(address), times);
        self
    }

    pub fn location(&self, address: &str) -> GeoPoint {
        self.entries[&address_key(address)]
    }
}

impl Geocoder for AddressBook {
    fn geocode(&self, address: &str) -> Result<GeocodeReply, GeocodeError> {
        self.requests.borrow_mut().push(address.to_string());
        let key = address_key(address);

        if let Some(remaining) = self.throttled.borrow_mut().get_mut(&key) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(GeocodeReply::QuotaExceeded);
            }
        }

        Ok(GeocodeReply::Ok(
            self.entries
                .get(&key)
                .map(|location| GeocodeCandidate {
                    location: *location,
                    formatted_address: Some(address.to_string()),
                })
                .into_iter()
                .collect(),
        ))
    }
}

/// Photo backend that returns the same photos for every query.
#[derive(Debug, Default)]
pub struct PhotoAlbum {
    photos: Vec<PhotoDescriptor>,
    pub queries: RefCell<Vec<PhotoQuery>>,
}

impl PhotoAlbum {
    pub fn new(photos: Vec<PhotoDescriptor>) -> Self {
        Self {
            photos,
            queries: RefCell::new(Vec::new()),
        }
    }

    /// One landscape and one portrait photo.
    pub fn pair() -> Self {
        Self::new(vec![
            photo("http://photos/wide.jpg", 1600, 1200),
            photo("http://photos/tall.jpg", 900, 1200),
        ])
    }
}

impl PhotoSearch for PhotoAlbum {
    fn search(&self, query: &PhotoQuery) -> Result<Vec<PhotoDescriptor>, PhotoError> {
        self.queries.borrow_mut().push(query.clone());
        Ok(self.photos.clone())
    }
}

/// Photo backend whose every request fails.
pub struct BrokenAlbum;

impl PhotoSearch for BrokenAlbum {
    fn search(&self, _query: &PhotoQuery) -> Result<Vec<PhotoDescriptor>, PhotoError> {
        Err(PhotoError::InvalidUrl("feed unavailable".to_string()))
    }
}

pub fn photo(url: &str, width_px: u32, height_px: u32) -> PhotoDescriptor {
    PhotoDescriptor {
        url: url.to_string(),
        width_px,
        height_px,
    }
}

/// Records requested delays without sleeping.
#[derive(Debug, Default)]
pub struct RecordingPause {
    pub delays: RefCell<VecDeque<Duration>>,
}

impl Pause for RecordingPause {
    fn pause(&self, delay: Duration) {
        self.delays.borrow_mut().push_back(delay);
    }
}

/// A sequencer over in-memory backends with reproducible jitter.
pub fn sequencer<'a, S: PhotoSearch>(
    book: &'a AddressBook,
    pause: &'a RecordingPause,
    photos: S,
) -> TourSequencer<&'a AddressBook, S, &'a RecordingPause> {
    TourSequencer::with_resolver(
        GeocodeResolver::with_pause(book, pause, RetryPolicy::default()),
        PhotoProvider::new(photos, PhotoMode::Community),
    )
    .with_seed(42)
}
