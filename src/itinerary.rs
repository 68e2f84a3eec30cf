//! Itinerary input: the ordered places a tour visits and how to travel
//! between them.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ItineraryError;
use crate::geo::GeoPoint;

/// How the traveller reaches a place from the one before it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum TravelMode {
    /// No mode given. Expected only for the first place.
    #[default]
    None,
    Layover,
    Plane,
    Train,
    Car,
    Unrecognized(String),
}

impl TravelMode {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "none" => TravelMode::None,
            "layover" => TravelMode::Layover,
            "plane" => TravelMode::Plane,
            "train" => TravelMode::Train,
            "car" => TravelMode::Car,
            _ => TravelMode::Unrecognized(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TravelMode::None => "none",
            TravelMode::Layover => "layover",
            TravelMode::Plane => "plane",
            TravelMode::Train => "train",
            TravelMode::Car => "car",
            TravelMode::Unrecognized(raw) => raw,
        }
    }
}

impl From<&str> for TravelMode {
    fn from(raw: &str) -> Self {
        TravelMode::parse(raw)
    }
}

impl From<Option<String>> for TravelMode {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map(TravelMode::parse).unwrap_or_default()
    }
}

impl From<TravelMode> for String {
    fn from(mode: TravelMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stop of the tour.
///
/// `resolved_address` and `location` stay empty until the place is geocoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(rename = "address")]
    pub raw_address: String,
    #[serde(default)]
    pub mode: TravelMode,
    #[serde(default, skip_deserializing)]
    pub resolved_address: Option<String>,
    #[serde(default, skip_deserializing)]
    pub location: Option<GeoPoint>,
}

impl Place {
    pub fn new(address: impl Into<String>, mode: impl Into<TravelMode>) -> Self {
        Self {
            raw_address: address.into(),
            mode: mode.into(),
            resolved_address: None,
            location: None,
        }
    }

    /// Records a successful geocode.
    pub fn resolve(&mut self, location: GeoPoint) {
        self.resolved_address = Some(display_address(&self.raw_address));
        self.location = Some(location);
    }

    /// The name shown on markers and overlays.
    pub fn title(&self) -> &str {
        self.resolved_address.as_deref().unwrap_or(&self.raw_address)
    }
}

/// A saved trip: title, optional photo owner, and the places in visiting order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub title: String,
    /// Photo library owner; when absent, community photos are used.
    #[serde(default)]
    pub username: Option<String>,
    pub places: Vec<Place>,
}

impl Itinerary {
    pub fn from_json(json: &str) -> Result<Self, ItineraryError> {
        let itinerary: Itinerary = serde_json::from_str(json)?;
        if itinerary.places.is_empty() {
            return Err(ItineraryError::Empty);
        }
        Ok(itinerary)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ItineraryError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Collapses whitespace and capitalizes the first letter of every word.
pub fn display_address(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Key used to decide whether two addresses name the same marker.
pub fn address_key(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
