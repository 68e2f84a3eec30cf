//! Address resolution with rate-limit retries.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::GeocodeError;
use crate::geo::GeoPoint;
use crate::traits::{GeocodeReply, Geocoder, Pause, ThreadPause};

/// Backoff applied while the geocoding backend reports quota exhaustion.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total requests allowed for one address, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            base_delay: Duration::from_millis(300),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Why an address produced no location.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoCandidates,
    Status(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoCandidates => write!(f, "no matching location"),
            SkipReason::Status(status) => write!(f, "geocoder status {}", status),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved {
        location: GeoPoint,
        formatted_address: Option<String>,
    },
    Skipped(SkipReason),
}

/// Resolves addresses through a [`Geocoder`], retrying while it is throttled.
pub struct GeocodeResolver<G, P = ThreadPause> {
    geocoder: G,
    pause: P,
    policy: RetryPolicy,
}

impl<G: Geocoder> GeocodeResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self::with_pause(geocoder, ThreadPause, RetryPolicy::default())
    }
}

impl<G: Geocoder, P: Pause> GeocodeResolver<G, P> {
    pub fn with_pause(geocoder: G, pause: P, policy: RetryPolicy) -> Self {
        Self {
            geocoder,
            pause,
            policy,
        }
    }

    pub fn resolve(&self, address: &str) -> Result<Resolution, GeocodeError> {
        let attempts = self.policy.max_attempts.max(1);

        for attempt in 0..attempts {
            match self.geocoder.geocode(address)? {
                GeocodeReply::Ok(candidates) => {
                    return Ok(match candidates.into_iter().next() {
                        Some(first) => {
                            debug!(
                                address,
                                lat = first.location.lat(),
                                lon = first.location.lon(),
                                "geocoded"
                            );
                            Resolution::Resolved {
                                location: first.location,
                                formatted_address: first.formatted_address,
                            }
                        }
                        None => Resolution::Skipped(SkipReason::NoCandidates),
                    });
                }
                GeocodeReply::QuotaExceeded if attempt + 1 < attempts => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        "geocoding quota exceeded for {:?} (attempt {}), retrying in {:?}",
                        address,
                        attempt + 1,
                        delay
                    );
                    self.pause.pause(delay);
                }
                GeocodeReply::QuotaExceeded => break,
                GeocodeReply::Other(status) => {
                    return Ok(Resolution::Skipped(SkipReason::Status(status)));
                }
            }
        }

        Err(GeocodeError::QuotaExhausted { attempts })
    }
}
