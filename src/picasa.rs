//! Picasa Web Albums (GData JSON feed) photo search adapter.

use reqwest::Url;
use serde::Deserialize;
use tracing::warn;

use crate::error::PhotoError;
use crate::traits::{PhotoDescriptor, PhotoQuery, PhotoSearch};

#[derive(Debug, Clone)]
pub struct PicasaConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for PicasaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://picasaweb.google.com".to_string(),
            timeout_secs: 10,
        }
    }
}

impl PicasaConfig {
    /// Reads `TOUR_PHOTOS_URL` and `TOUR_PHOTOS_TIMEOUT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("TOUR_PHOTOS_URL").unwrap_or(defaults.base_url),
            timeout_secs: std::env::var("TOUR_PHOTOS_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PicasaFeed {
    config: PicasaConfig,
    client: reqwest::blocking::Client,
}

impl PicasaFeed {
    pub fn new(config: PicasaConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl PicasaFeed {
    /// Base URL with `segments` appended, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, PhotoError> {
        let base = &self.config.base_url;
        let mut url = Url::parse(base)
            .map_err(|err| PhotoError::InvalidUrl(format!("{}: {}", base, err)))?;
        url.path_segments_mut()
            .map_err(|_| PhotoError::InvalidUrl(base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl PhotoSearch for PicasaFeed {
    fn search(&self, query: &PhotoQuery) -> Result<Vec<PhotoDescriptor>, PhotoError> {
        let request = match query {
            PhotoQuery::Personal { owner, tag } => self
                .client
                .get(self.endpoint(&["data", "feed", "api", "user", owner])?)
                .query(&[("kind", "photo"), ("tag", tag.as_str()), ("alt", "json")]),
            PhotoQuery::Community { query, max_results } => self
                .client
                .get(self.endpoint(&["data", "feed", "api", "all"])?)
                .query(&[
                    ("q", query.clone()),
                    ("max-results", max_results.to_string()),
                    ("alt", "json".to_string()),
                ]),
        };

        let body = request
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<FeedResponse>())?;

        Ok(body.into_photos())
    }
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    feed: Feed,
}

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    content: Content,
    #[serde(rename = "gphoto$width")]
    width: Text,
    #[serde(rename = "gphoto$height")]
    height: Text,
}

#[derive(Debug, Deserialize)]
struct Content {
    src: String,
}

#[derive(Debug, Deserialize)]
struct Text {
    #[serde(rename = "$t")]
    value: NumberOrText,
}

/// GData serializes numbers as strings, but some mirrors emit plain numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u32),
    Text(String),
}

impl NumberOrText {
    fn as_u32(&self) -> Option<u32> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl FeedResponse {
    /// Entries with unreadable dimensions are dropped; the rest keep feed order.
    fn into_photos(self) -> Vec<PhotoDescriptor> {
        self.feed
            .entry
            .into_iter()
            .filter_map(|entry| {
                match (entry.width.value.as_u32(), entry.height.value.as_u32()) {
                    (Some(width_px), Some(height_px)) => Some(PhotoDescriptor {
                        url: entry.content.src,
                        width_px,
                        height_px,
                    }),
                    _ => {
                        warn!(
                            "ignoring photo {} with unreadable size {:?}x{:?}",
                            entry.content.src, entry.width.value, entry.height.value
                        );
                        None
                    }
                }
            })
            .collect()
    }
}
