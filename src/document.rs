//! Tour document accumulation and KML rendering.
//!
//! The builder is append-only: fragments go in as the tour is planned and
//! [`TourDocumentBuilder::serialize`] renders them without consuming them,
//! so the same builder always renders the same document.

use std::collections::HashSet;
use std::fmt::Write;

use quick_xml::escape::escape;

use crate::flight::{ALT_GROUND, CameraKeyframe, FlightPlan};
use crate::geo::GeoPoint;
use crate::itinerary::address_key;
use crate::overlay::OverlayPlacement;
use crate::polyline::Polyline;

pub const DEFAULT_TOUR_NAME: &str = "Cool";

const KML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?><kml xmlns="http://www.opengis.net/kml/2.2" xmlns:gx="http://www.google.com/kml/ext/2.2" xmlns:kml="http://www.opengis.net/kml/2.2" xmlns:atom="http://www.w3.org/2005/Atom">"#;

const PATH_COLOR: &str = "ff0000ff";
const PATH_WIDTH: u32 = 4;

/// An element of the tour playlist.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistEntry {
    FlyTo(CameraKeyframe),
    Wait(f64),
}

/// A named point marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Placemark {
    pub name: String,
    pub location: GeoPoint,
}

#[derive(Debug, Clone)]
pub struct TourDocumentBuilder {
    name: String,
    playlist: Vec<PlaylistEntry>,
    overlays: Vec<OverlayPlacement>,
    placemarks: Vec<Placemark>,
    marked: HashSet<String>,
    polyline: Polyline,
    distance_km: f64,
}

impl Default for TourDocumentBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TOUR_NAME)
    }
}

impl TourDocumentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            playlist: Vec::new(),
            overlays: Vec::new(),
            placemarks: Vec::new(),
            marked: HashSet::new(),
            polyline: Polyline::new(),
            distance_km: 0.0,
        }
    }

    /// Adds a camera move and traces its ground position on the route.
    pub fn append_keyframe(&mut self, keyframe: CameraKeyframe) {
        self.polyline.push(&keyframe.position, ALT_GROUND);
        self.playlist.push(PlaylistEntry::FlyTo(keyframe));
    }

    pub fn append_wait(&mut self, seconds: f64) {
        self.playlist.push(PlaylistEntry::Wait(seconds));
    }

    /// Marks `address` once; later marks for the same address are ignored.
    /// Returns whether a marker was added.
    pub fn append_placemark(&mut self, address: &str, location: GeoPoint) -> bool {
        if !self.marked.insert(address_key(address)) {
            return false;
        }
        self.placemarks.push(Placemark {
            name: address.to_string(),
            location,
        });
        true
    }

    pub fn append_overlay(&mut self, placement: OverlayPlacement) {
        self.overlays.push(placement);
    }

    pub fn add_distance(&mut self, km: f64) {
        self.distance_km += km;
    }

    /// Appends a planned leg: its keyframes, its trailing wait, and its distance.
    pub fn append_plan(&mut self, plan: &FlightPlan) {
        for keyframe in &plan.keyframes {
            self.append_keyframe(*keyframe);
        }
        if let Some(wait) = plan.trailing_wait {
            self.append_wait(wait);
        }
        self.add_distance(plan.distance_km);
    }

    /// Total traveled distance in kilometers.
    pub fn total_distance(&self) -> f64 {
        self.distance_km
    }

    pub fn playlist(&self) -> &[PlaylistEntry] {
        &self.playlist
    }

    pub fn keyframe_count(&self) -> usize {
        self.playlist
            .iter()
            .filter(|entry| matches!(entry, PlaylistEntry::FlyTo(_)))
            .count()
    }

    pub fn overlays(&self) -> &[OverlayPlacement] {
        &self.overlays
    }

    pub fn placemarks(&self) -> &[Placemark] {
        &self.placemarks
    }

    pub fn polyline(&self) -> &Polyline {
        &self.polyline
    }

    /// Renders the accumulated tour as a KML document.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(1024 + 400 * self.playlist.len());
        out.push_str(KML_HEADER);
        out.push_str("<Document><name>Tour</name>");

        let _ = write!(out, "<gx:Tour><name>{}</name><gx:Playlist>", escape(self.name.as_str()));
        for entry in &self.playlist {
            match entry {
                PlaylistEntry::FlyTo(keyframe) => write_fly_to(&mut out, keyframe),
                PlaylistEntry::Wait(seconds) => {
                    let _ = write!(
                        out,
                        "<gx:Wait><gx:duration>{}</gx:duration></gx:Wait>",
                        seconds
                    );
                }
            }
        }
        out.push_str("</gx:Playlist></gx:Tour>");

        for overlay in &self.overlays {
            write_overlay(&mut out, overlay);
        }

        let _ = write!(
            out,
            "<Placemark><name>Path</name><LineString><extrude>1</extrude><tessellate>1</tessellate>\
             <coordinates>{}</coordinates></LineString><Style><LineStyle><color>{}</color>\
             <width>{}</width></LineStyle></Style></Placemark>",
            self.polyline.to_kml_coordinates(),
            PATH_COLOR,
            PATH_WIDTH
        );

        for placemark in &self.placemarks {
            let _ = write!(
                out,
                "<Placemark><name>{}</name><Point><coordinates>{},{},0</coordinates></Point></Placemark>",
                escape(placemark.name.as_str()),
                placemark.location.lon(),
                placemark.location.lat()
            );
        }

        out.push_str("</Document></kml>");
        out
    }
}

fn write_fly_to(out: &mut String, keyframe: &CameraKeyframe) {
    let _ = write!(
        out,
        "<gx:FlyTo><gx:duration>{}</gx:duration><gx:flyToMode>smooth</gx:flyToMode>\
         <Camera><latitude>{}</latitude><longitude>{}</longitude><altitude>{}</altitude>\
         <heading>{}</heading><tilt>{}</tilt><roll>0</roll><altitudeMode>absolute</altitudeMode>\
         </Camera></gx:FlyTo>",
        keyframe.duration_seconds,
        keyframe.position.lat(),
        keyframe.position.lon(),
        keyframe.altitude_meters,
        keyframe.heading_degrees,
        keyframe.tilt_degrees
    );
}

fn write_overlay(out: &mut String, overlay: &OverlayPlacement) {
    let _ = write!(
        out,
        "<GroundOverlay><name>{}</name><Icon><href>{}</href></Icon><LatLonBox>\
         <north>{}</north><south>{}</south><east>{}</east><west>{}</west>\
         <rotation>{}</rotation></LatLonBox></GroundOverlay>",
        escape(overlay.title.as_str()),
        escape(overlay.url.as_str()),
        overlay.north,
        overlay.south,
        overlay.east,
        overlay.west,
        overlay.rotation_degrees
    );
}
