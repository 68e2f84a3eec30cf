//! tour-planner core
//!
//! Turns an ordered list of places into a KML flight tour: camera moves,
//! waits, markers, photo overlays, and the traced route.

pub mod traits;
pub mod error;
pub mod geo;
pub mod polyline;
pub mod itinerary;
pub mod geocode;
pub mod google;
pub mod picasa;
pub mod photos;
pub mod overlay;
pub mod flight;
pub mod document;
pub mod sequencer;
