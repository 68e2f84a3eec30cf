//! Route geometry traced by the tour.
//!
//! Every camera keyframe contributes one point projected down to a fixed
//! ground altitude, so the path stays on the surface no matter how high the
//! camera flies.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Ordered route coordinates, stored as (longitude, latitude, altitude).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64, f64)>,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `location` at the given altitude in meters.
    pub fn push(&mut self, location: &GeoPoint, altitude: f64) {
        self.points.push((location.lon(), location.lat(), altitude));
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Renders the points as a KML coordinate tuple list (`lon,lat,alt `).
    pub fn to_kml_coordinates(&self) -> String {
        let mut out = String::new();
        for (lon, lat, alt) in &self.points {
            let _ = write!(out, "{},{},{} ", lon, lat, alt);
        }
        out
    }
}
