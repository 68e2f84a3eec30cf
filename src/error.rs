//! Error types for the tour pipeline.

use thiserror::Error;

/// Terminal geocoding failures. Places that simply cannot be resolved are
/// reported as [`crate::geocode::Resolution::Skipped`] instead.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding quota still exceeded after {attempts} attempts")]
    QuotaExhausted { attempts: u32 },

    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("photo search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid photo service url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum ItineraryError {
    #[error("failed to read itinerary: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse itinerary: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("itinerary has no places")]
    Empty,
}
