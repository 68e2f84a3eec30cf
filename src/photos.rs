//! Photo lookup for each stop and conversion into overlays.

use rand::Rng;
use tracing::{debug, warn};

use crate::error::PhotoError;
use crate::geo::GeoPoint;
use crate::overlay::{self, OverlayPlacement};
use crate::traits::{PhotoDescriptor, PhotoQuery, PhotoSearch};

/// Photos shown per place.
pub const MAX_PHOTOS_PER_PLACE: usize = 2;

/// Longitude shift applied to the second photo so the two don't overlap.
pub const SECOND_PHOTO_OFFSET_DEG: f64 = -0.1;

/// Maximum random tilt, either way, added to each photo's orientation.
pub const PHOTO_JITTER_DEG: f64 = 10.0;

/// Which library photos are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoMode {
    /// The owner's own photos, tagged with the place's address.
    Personal { owner: String },
    /// Public photos matching the place's address.
    Community,
}

impl PhotoMode {
    /// Personal mode when an owner is known, community otherwise.
    pub fn for_owner(owner: Option<&str>) -> Self {
        match owner {
            Some(owner) if !owner.trim().is_empty() => PhotoMode::Personal {
                owner: owner.to_string(),
            },
            _ => PhotoMode::Community,
        }
    }

    pub fn query_for(&self, address: &str) -> PhotoQuery {
        match self {
            PhotoMode::Personal { owner } => PhotoQuery::Personal {
                owner: owner.clone(),
                tag: address.to_string(),
            },
            PhotoMode::Community => PhotoQuery::Community {
                query: address.to_string(),
                max_results: MAX_PHOTOS_PER_PLACE,
            },
        }
    }
}

pub struct PhotoProvider<S> {
    search: S,
    mode: PhotoMode,
}

impl<S: PhotoSearch> PhotoProvider<S> {
    pub fn new(search: S, mode: PhotoMode) -> Self {
        Self { search, mode }
    }

    /// Up to [`MAX_PHOTOS_PER_PLACE`] usable photos for `address`, best first.
    pub fn fetch(&self, address: &str) -> Result<Vec<PhotoDescriptor>, PhotoError> {
        let query = self.mode.query_for(address);
        let mut photos = self.search.search(&query)?;
        photos.retain(is_usable);
        photos.truncate(MAX_PHOTOS_PER_PLACE);
        debug!(address, found = photos.len(), "photo search");
        Ok(photos)
    }

    /// Fetches photos for a place and lays them out as overlays.
    ///
    /// A failed search is logged and yields no overlays.
    pub fn overlays_for(
        &self,
        location: &GeoPoint,
        address: &str,
        angle: f64,
        rng: &mut impl Rng,
    ) -> Vec<OverlayPlacement> {
        match self.fetch(address) {
            Ok(photos) => layout_photos(location, address, &photos, angle, rng),
            Err(err) => {
                warn!("photo search for {:?} failed: {}", address, err);
                Vec::new()
            }
        }
    }
}

/// Never finds any photos.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPhotoSearch;

impl PhotoSearch for NoPhotoSearch {
    fn search(&self, _query: &PhotoQuery) -> Result<Vec<PhotoDescriptor>, PhotoError> {
        Ok(Vec::new())
    }
}

fn is_usable(photo: &PhotoDescriptor) -> bool {
    if photo.aspect_ratio().is_some() {
        return true;
    }
    warn!("ignoring photo {} with zero size", photo.url);
    false
}

/// First usable photo sits on the place, the second just west of it. Each
/// gets its own jittered orientation around `angle`.
pub fn layout_photos(
    location: &GeoPoint,
    address: &str,
    photos: &[PhotoDescriptor],
    angle: f64,
    rng: &mut impl Rng,
) -> Vec<OverlayPlacement> {
    photos
        .iter()
        .filter_map(|photo| photo.aspect_ratio().map(|ratio| (photo, ratio)))
        .take(MAX_PHOTOS_PER_PLACE)
        .enumerate()
        .map(|(i, (photo, ratio))| {
            let (anchor, title) = if i == 0 {
                (*location, address.to_string())
            } else {
                (
                    location.offset_lon(SECOND_PHOTO_OFFSET_DEG),
                    format!("{} {}", address, i + 1),
                )
            };
            let jitter = rng.random_range(-PHOTO_JITTER_DEG..=PHOTO_JITTER_DEG);
            overlay::place(&anchor, ratio, angle + jitter, title, photo.url.clone())
        })
        .collect()
}
