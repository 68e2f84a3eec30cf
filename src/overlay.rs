//! Ground overlay placement for photos.

use crate::geo::GeoPoint;

/// Length in degrees of the shorter edge of every photo overlay.
pub const OVERLAY_SHORT_EDGE_DEG: f64 = 0.07;

/// The viewer draws overlays stretched; raw ratios are divided by this.
pub const PIXEL_ASPECT_CORRECTION: f64 = 0.75;

/// A photo draped over a latitude/longitude box.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPlacement {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub rotation_degrees: f64,
    pub title: String,
    pub url: String,
}

/// Anchors a photo's south-west corner at `location`.
///
/// `angle` is the orientation the photo should face; the overlay is rotated
/// by its negation.
pub fn place(
    location: &GeoPoint,
    aspect_ratio_raw: f64,
    angle: f64,
    title: impl Into<String>,
    url: impl Into<String>,
) -> OverlayPlacement {
    let (width, height) = overlay_size(aspect_ratio_raw);

    OverlayPlacement {
        north: location.lat() + height,
        south: location.lat(),
        east: location.lon() + width,
        west: location.lon(),
        rotation_degrees: -angle,
        title: title.into(),
        url: url.into(),
    }
}

/// (width, height) in degrees with the short edge pinned.
pub fn overlay_size(aspect_ratio_raw: f64) -> (f64, f64) {
    let ratio = aspect_ratio_raw / PIXEL_ASPECT_CORRECTION;
    if ratio < 1.0 {
        (OVERLAY_SHORT_EDGE_DEG, OVERLAY_SHORT_EDGE_DEG / ratio)
    } else {
        (OVERLAY_SHORT_EDGE_DEG * ratio, OVERLAY_SHORT_EDGE_DEG)
    }
}
