//! Tour assembly: resolves each place in order, plans the camera path from
//! the previous stop, and collects photos.
//!
//! Places are processed strictly one after another. The next geocode request
//! is only issued once the current place has been marked, planned, and
//! decorated with photos, which keeps the distance total and the route
//! polyline in visiting order.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::document::{DEFAULT_TOUR_NAME, TourDocumentBuilder};
use crate::flight::{plan_leg, plan_start};
use crate::geo::GeoPoint;
use crate::geocode::{GeocodeResolver, Resolution};
use crate::itinerary::Place;
use crate::photos::PhotoProvider;
use crate::traits::{Geocoder, NoopObserver, Pause, PhotoSearch, ThreadPause, TourObserver};

/// A place that contributed nothing to the tour.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPlace {
    pub index: usize,
    pub address: String,
    pub reason: String,
}

/// A place that made it onto the tour, with its geocoded position.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    pub index: usize,
    pub address: String,
    pub location: GeoPoint,
}

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct TourOutcome {
    /// The rendered KML document.
    pub document: String,
    pub total_distance_km: f64,
    /// Places on the tour, in visiting order.
    pub resolved: Vec<ResolvedPlace>,
    pub skipped: Vec<SkippedPlace>,
    pub builder: TourDocumentBuilder,
}

/// Where the sequencer is in the place list.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    AwaitingGeocode(usize),
    Planning {
        index: usize,
        location: GeoPoint,
    },
    AwaitingPhotos {
        index: usize,
        location: GeoPoint,
        angle: f64,
    },
    Done,
}

pub struct TourSequencer<G, S, P = ThreadPause> {
    resolver: GeocodeResolver<G, P>,
    photos: PhotoProvider<S>,
    rng: StdRng,
    name: String,
}

impl<G: Geocoder, S: PhotoSearch> TourSequencer<G, S> {
    pub fn new(geocoder: G, photos: PhotoProvider<S>) -> Self {
        Self::with_resolver(GeocodeResolver::new(geocoder), photos)
    }
}

impl<G: Geocoder, S: PhotoSearch, P: Pause> TourSequencer<G, S, P> {
    pub fn with_resolver(resolver: GeocodeResolver<G, P>, photos: PhotoProvider<S>) -> Self {
        Self {
            resolver,
            photos,
            rng: StdRng::from_os_rng(),
            name: DEFAULT_TOUR_NAME.to_string(),
        }
    }

    /// Sets the name of the tour playlist.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Makes photo jitter reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn run(&mut self, places: &mut [Place]) -> TourOutcome {
        self.run_with(places, &mut NoopObserver)
    }

    /// Builds the tour, filling in each place's resolved address and location.
    pub fn run_with(
        &mut self,
        places: &mut [Place],
        observer: &mut impl TourObserver,
    ) -> TourOutcome {
        info!(places = places.len(), tour = %self.name, "assembling tour");

        let mut builder = TourDocumentBuilder::new(self.name.clone());
        let mut resolved = Vec::new();
        let mut skipped = Vec::new();
        let mut previous: Option<GeoPoint> = None;
        let mut stage = Stage::AwaitingGeocode(0);

        loop {
            stage = match stage {
                Stage::AwaitingGeocode(index) if index >= places.len() => Stage::Done,
                Stage::AwaitingGeocode(index) => {
                    let place = &mut places[index];
                    let reason = match self.resolver.resolve(&place.raw_address) {
                        Ok(Resolution::Resolved { location, .. }) => {
                            place.resolve(location);
                            observer.place_resolved(index, place);
                            None
                        }
                        Ok(Resolution::Skipped(reason)) => Some(reason.to_string()),
                        Err(err) => Some(err.to_string()),
                    };

                    match (reason, place.location) {
                        (None, Some(location)) => Stage::Planning { index, location },
                        (reason, _) => {
                            let skip = SkippedPlace {
                                index,
                                address: place.raw_address.clone(),
                                reason: reason.unwrap_or_default(),
                            };
                            warn!("skipping place {} ({:?}): {}", index, skip.address, skip.reason);
                            observer.place_skipped(&skip);
                            skipped.push(skip);
                            Stage::AwaitingGeocode(index + 1)
                        }
                    }
                }
                Stage::Planning { index, location } => {
                    let place = &places[index];
                    builder.append_placemark(place.title(), location);
                    resolved.push(ResolvedPlace {
                        index,
                        address: place.title().to_string(),
                        location,
                    });

                    let plan = match previous {
                        None => plan_start(&location),
                        Some(prev) => plan_leg(&prev, &location, &place.mode),
                    };
                    debug!(
                        index,
                        mode = %place.mode,
                        keyframes = plan.keyframes.len(),
                        distance_km = plan.distance_km,
                        "planned leg"
                    );
                    builder.append_plan(&plan);
                    previous = Some(location);

                    Stage::AwaitingPhotos {
                        index,
                        location,
                        angle: plan.photo_angle,
                    }
                }
                Stage::AwaitingPhotos {
                    index,
                    location,
                    angle,
                } => {
                    let title = places[index].title();
                    let overlays = self.photos.overlays_for(&location, title, angle, &mut self.rng);
                    for overlay in overlays {
                        builder.append_overlay(overlay);
                    }
                    Stage::AwaitingGeocode(index + 1)
                }
                Stage::Done => break,
            };
        }

        let outcome = TourOutcome {
            document: builder.serialize(),
            total_distance_km: builder.total_distance(),
            resolved,
            skipped,
            builder,
        };
        info!(
            distance_km = outcome.total_distance_km,
            skipped = outcome.skipped.len(),
            "tour complete"
        );
        observer.completed(&outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::{GeocodeError, PhotoError};
    use crate::geocode::RetryPolicy;
    use crate::photos::{NoPhotoSearch, PhotoMode};
    use crate::traits::{GeocodeCandidate, GeocodeReply, PhotoDescriptor, PhotoQuery};

    struct MapGeocoder(HashMap<&'static str, (f64, f64)>);

    impl Geocoder for MapGeocoder {
        fn geocode(&self, address: &str) -> Result<GeocodeReply, GeocodeError> {
            Ok(match self.0.get(address) {
                Some(&(lat, lon)) => GeocodeReply::Ok(vec![GeocodeCandidate {
                    location: GeoPoint::new(lat, lon),
                    formatted_address: None,
                }]),
                None => GeocodeReply::Ok(vec![]),
            })
        }
    }

    struct OnePhoto;

    impl PhotoSearch for OnePhoto {
        fn search(&self, _query: &PhotoQuery) -> Result<Vec<PhotoDescriptor>, PhotoError> {
            Ok(vec![PhotoDescriptor {
                url: "http://p/1.jpg".to_string(),
                width_px: 400,
                height_px: 300,
            }])
        }
    }

    struct NoPause;

    impl Pause for NoPause {
        fn pause(&self, _delay: std::time::Duration) {}
    }

    fn geocoder() -> MapGeocoder {
        MapGeocoder(HashMap::from([
            ("A", (0.0, 0.0)),
            ("B", (0.0, 1.0)),
            ("C", (1.0, 1.0)),
        ]))
    }

    fn sequencer<S: PhotoSearch>(search: S) -> TourSequencer<MapGeocoder, S, NoPause> {
        TourSequencer::with_resolver(
            GeocodeResolver::with_pause(geocoder(), NoPause, RetryPolicy::default()),
            PhotoProvider::new(search, PhotoMode::Community),
        )
        .with_seed(11)
    }

    #[test]
    fn test_unresolvable_place_is_skipped_and_tour_continues() {
        let mut places = vec![
            Place::new("A", ""),
            Place::new("Atlantis", "plane"),
            Place::new("B", "train"),
        ];
        let outcome = sequencer(NoPhotoSearch).run(&mut places);

        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].index, 1);
        assert_eq!(outcome.skipped[0].address, "Atlantis");
        assert!(places[1].location.is_none());
        assert_eq!(outcome.builder.placemarks().len(), 2);
        assert_eq!(outcome.builder.keyframe_count(), 5);
        let expected = GeoPoint::new(0.0, 0.0).distance_to(&GeoPoint::new(0.0, 1.0));
        assert!((outcome.total_distance_km - expected).abs() < 1e-9);
    }

    #[test]
    fn test_first_resolved_place_opens_the_tour() {
        let mut places = vec![Place::new("Nowhere", ""), Place::new("C", "plane")];
        let outcome = sequencer(NoPhotoSearch).run(&mut places);

        assert_eq!(outcome.builder.keyframe_count(), 1);
        assert_eq!(outcome.total_distance_km, 0.0);
    }

    #[test]
    fn test_photo_angle_follows_route_for_ground_legs() {
        let mut places = vec![Place::new("A", ""), Place::new("B", "car")];
        let outcome = sequencer(OnePhoto).run(&mut places);

        let overlays = outcome.builder.overlays();
        assert_eq!(overlays.len(), 2);
        // start: angle 0 plus jitter; car leg east: 90 plus jitter
        assert!(overlays[0].rotation_degrees.abs() <= 10.0);
        assert!(overlays[1].rotation_degrees <= -80.0 && overlays[1].rotation_degrees >= -100.0);
        assert_eq!(overlays[1].title, "B");
    }

    #[test]
    fn test_places_receive_resolved_data() {
        let mut places = vec![Place::new("A", ""), Place::new("C", "layover")];
        sequencer(NoPhotoSearch).run(&mut places);
        assert_eq!(places[1].location, Some(GeoPoint::new(1.0, 1.0)));
        assert_eq!(places[1].resolved_address.as_deref(), Some("C"));
    }

    #[test]
    fn test_outcome_lists_resolved_places_in_order() {
        let mut places = vec![
            Place::new("c", ""),
            Place::new("Atlantis", "car"),
            Place::new("A", "plane"),
        ];
        let mut geocoder = geocoder();
        geocoder.0.insert("c", (1.0, 1.0));
        let outcome = TourSequencer::with_resolver(
            GeocodeResolver::with_pause(geocoder, NoPause, RetryPolicy::default()),
            PhotoProvider::new(NoPhotoSearch, PhotoMode::Community),
        )
        .run(&mut places);

        assert_eq!(
            outcome.resolved,
            vec![
                ResolvedPlace {
                    index: 0,
                    address: "C".to_string(),
                    location: GeoPoint::new(1.0, 1.0),
                },
                ResolvedPlace {
                    index: 2,
                    address: "A".to_string(),
                    location: GeoPoint::new(0.0, 0.0),
                },
            ]
        );
        assert_eq!(outcome.skipped[0].index, 1);
    }

    #[test]
    fn test_observer_sees_every_outcome() {
        #[derive(Default)]
        struct Log(Vec<String>);

        impl TourObserver for Log {
            fn place_resolved(&mut self, index: usize, _place: &Place) {
                self.0.push(format!("resolved {}", index));
            }
            fn place_skipped(&mut self, skipped: &SkippedPlace) {
                self.0.push(format!("skipped {}", skipped.index));
            }
            fn completed(&mut self, _outcome: &TourOutcome) {
                self.0.push("done".to_string());
            }
        }

        let mut log = Log::default();
        let mut places = vec![Place::new("A", ""), Place::new("Z", "car"), Place::new("B", "car")];
        sequencer(NoPhotoSearch).run_with(&mut places, &mut log);
        assert_eq!(log.0, vec!["resolved 0", "skipped 1", "resolved 2", "done"]);
    }
}
