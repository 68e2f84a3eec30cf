//! Great-circle geometry on a spherical Earth.
//!
//! Distances are in kilometers, angles in degrees.

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// An immutable latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Same latitude, shifted east by `degrees` (negative moves west).
    pub fn offset_lon(&self, degrees: f64) -> Self {
        Self::new(self.lat, self.lon + degrees)
    }

    /// Point halfway along the great-circle path between `self` and `other`.
    pub fn midpoint(&self, other: &GeoPoint) -> GeoPoint {
        let lat1 = self.lat.to_radians();
        let lon1 = self.lon.to_radians();
        let lat2 = other.lat.to_radians();
        let delta_lon = (other.lon - self.lon).to_radians();

        let bx = lat2.cos() * delta_lon.cos();
        let by = lat2.cos() * delta_lon.sin();

        let lat_mid = (lat1.sin() + lat2.sin())
            .atan2(((lat1.cos() + bx).powi(2) + by.powi(2)).sqrt());
        let lon_mid = lon1 + by.atan2(lat1.cos() + bx);

        GeoPoint::new(lat_mid.to_degrees(), normalize_lon(lon_mid.to_degrees()))
    }

    /// Initial bearing from `self` towards `other`, in `[0, 360)`.
    pub fn bearing_to(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let delta_lon = (other.lon - self.lon).to_radians();

        let y = delta_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }

    /// Haversine distance in kilometers.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lon = (other.lon - self.lon).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

fn normalize_lon(lon: f64) -> f64 {
    (lon + 540.0) % 360.0 - 180.0
}
