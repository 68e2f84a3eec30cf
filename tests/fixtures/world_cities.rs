//! Well-known city coordinates for tour fixtures.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct City {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl City {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }
}

// ============================================================================
// Europe (good for train/car legs)
// ============================================================================

pub const EUROPE: &[City] = &[
    City::new("Paris", 48.8566, 2.3522),
    City::new("Brussels", 50.8503, 4.3517),
    City::new("Amsterdam", 52.3676, 4.9041),
    City::new("Berlin", 52.5200, 13.4050),
    City::new("Prague", 50.0755, 14.4378),
    City::new("Vienna", 48.2082, 16.3738),
];

// ============================================================================
// Long-haul hubs (good for plane/layover legs)
// ============================================================================

pub const HUBS: &[City] = &[
    City::new("London", 51.5074, -0.1278),
    City::new("Dubai", 25.2048, 55.2708),
    City::new("Singapore", 1.3521, 103.8198),
    City::new("Sydney", -33.8688, 151.2093),
    City::new("Tokyo", 35.6762, 139.6503),
    City::new("San Francisco", 37.7749, -122.4194),
];
