//! Camera flight planning between consecutive stops.
//!
//! Air legs arc up towards space and come back down; ground legs skim along
//! the route at a low altitude, looking down the direction of travel.

use crate::geo::GeoPoint;
use crate::itinerary::TravelMode;

/// Camera altitude for ground-level views, in meters.
pub const ALT_GROUND: f64 = 20_000.0;
/// Camera altitude while following a ground route, in meters.
pub const ALT_AIR: f64 = 80_000.0;
/// Apex of an air arc, in meters.
pub const ALT_SPACE: f64 = 3_000_000.0;

/// Pause at the first stop, in seconds.
pub const WAIT_START: f64 = 5.0;
pub const WAIT_LAYOVER: f64 = 1.5;
pub const WAIT_PLANE: f64 = 3.0;
pub const WAIT_GROUND: f64 = 3.0;

/// Kilometers covered per second of tour time.
pub const SPEED_PLANE: f64 = 5_000.0;
pub const SPEED_TRAIN: f64 = 500.0;

/// No single leg is faster than this, in seconds.
pub const MIN_LEG_SECONDS: f64 = 0.5;

pub const DEFAULT_TILT: f64 = 5.0;

/// One camera pose and how long the camera takes to reach it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraKeyframe {
    pub position: GeoPoint,
    pub duration_seconds: f64,
    pub altitude_meters: f64,
    pub heading_degrees: f64,
    pub tilt_degrees: f64,
}

impl CameraKeyframe {
    /// Keyframe with the default heading (north) and tilt.
    pub fn new(position: GeoPoint, duration_seconds: f64, altitude_meters: f64) -> Self {
        Self {
            position,
            duration_seconds,
            altitude_meters,
            heading_degrees: 0.0,
            tilt_degrees: DEFAULT_TILT,
        }
    }

    pub fn heading(mut self, heading_degrees: f64) -> Self {
        self.heading_degrees = heading_degrees;
        self
    }

    pub fn tilt(mut self, tilt_degrees: f64) -> Self {
        self.tilt_degrees = tilt_degrees;
        self
    }
}

/// Camera motion for one leg of the tour.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPlan {
    pub keyframes: Vec<CameraKeyframe>,
    /// Pause after arriving, if any.
    pub trailing_wait: Option<f64>,
    /// Orientation used when placing this stop's photos.
    pub photo_angle: f64,
    /// Great-circle length of the leg in kilometers.
    pub distance_km: f64,
}

/// Opening shot: the camera sits at the first stop and holds.
pub fn plan_start(location: &GeoPoint) -> FlightPlan {
    FlightPlan {
        keyframes: vec![CameraKeyframe::new(*location, 0.0, ALT_GROUND)],
        trailing_wait: Some(WAIT_START),
        photo_angle: 0.0,
        distance_km: 0.0,
    }
}

/// Plans the camera path from `prev` to `curr` for the given mode.
pub fn plan_leg(prev: &GeoPoint, curr: &GeoPoint, mode: &TravelMode) -> FlightPlan {
    let mid = curr.midpoint(prev);
    let q1 = prev.midpoint(&mid);
    let e1 = prev.midpoint(&q1);
    let q2 = curr.midpoint(&mid);
    let e2 = curr.midpoint(&q2);

    let heading = prev.bearing_to(curr);
    let distance_km = prev.distance_to(curr);

    let plane_time = (distance_km / SPEED_PLANE).max(MIN_LEG_SECONDS);
    let train_time = (distance_km / SPEED_TRAIN).max(MIN_LEG_SECONDS);

    let air_arc = || {
        vec![
            CameraKeyframe::new(e1, plane_time, ALT_SPACE * 7.0 / 8.0),
            CameraKeyframe::new(mid, plane_time, ALT_SPACE),
            CameraKeyframe::new(e2, plane_time, ALT_SPACE * 7.0 / 8.0),
            CameraKeyframe::new(*curr, plane_time, ALT_GROUND),
        ]
    };

    let (keyframes, trailing_wait, photo_angle) = match mode {
        TravelMode::Layover => (air_arc(), Some(WAIT_LAYOVER), 0.0),
        TravelMode::Plane => (air_arc(), Some(WAIT_PLANE), 0.0),
        TravelMode::Train | TravelMode::Car => (
            vec![
                CameraKeyframe::new(*prev, train_time, ALT_AIR).heading(heading).tilt(20.0),
                CameraKeyframe::new(q1, train_time, ALT_AIR).heading(heading).tilt(40.0),
                CameraKeyframe::new(e2, train_time, ALT_AIR).heading(heading).tilt(20.0),
                CameraKeyframe::new(*curr, train_time, ALT_GROUND).heading(heading),
            ],
            Some(WAIT_GROUND),
            heading,
        ),
        TravelMode::None | TravelMode::Unrecognized(_) => (Vec::new(), None, 0.0),
    };

    FlightPlan {
        keyframes,
        trailing_wait,
        photo_angle,
        distance_km,
    }
}
