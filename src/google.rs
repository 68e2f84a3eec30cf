//! Google Geocoding API adapter.

use serde::Deserialize;

use crate::error::GeocodeError;
use crate::geo::GeoPoint;
use crate::traits::{GeocodeCandidate, GeocodeReply, Geocoder};

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl GoogleConfig {
    /// Reads `TOUR_GEOCODER_URL`, `TOUR_GEOCODER_KEY` and `TOUR_GEOCODER_TIMEOUT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("TOUR_GEOCODER_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("TOUR_GEOCODER_KEY").ok().or(defaults.api_key),
            timeout_secs: std::env::var("TOUR_GEOCODER_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    config: GoogleConfig,
    client: reqwest::blocking::Client,
}

impl GoogleGeocoder {
    pub fn new(config: GoogleConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for GoogleGeocoder {
    fn geocode(&self, address: &str) -> Result<GeocodeReply, GeocodeError> {
        let url = format!(
            "{}/maps/api/geocode/json",
            self.config.base_url.trim_end_matches('/')
        );

        let mut request = self.client.get(url).query(&[("address", address)]);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let body = request
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<GeocodeResponse>())?;

        Ok(body.into_reply())
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    formatted_address: Option<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GeocodeResponse {
    fn into_reply(self) -> GeocodeReply {
        match self.status.as_str() {
            "OK" | "ZERO_RESULTS" => GeocodeReply::Ok(
                self.results
                    .into_iter()
                    .map(|result| GeocodeCandidate {
                        location: GeoPoint::new(
                            result.geometry.location.lat,
                            result.geometry.location.lng,
                        ),
                        formatted_address: result.formatted_address,
                    })
                    .collect(),
            ),
            "OVER_QUERY_LIMIT" => GeocodeReply::QuotaExceeded,
            _ => GeocodeReply::Other(self.status),
        }
    }
}
