//! Two-tier location resolution with alternative-postcode probing.

use std::sync::Arc;
use std::time::Duration;

use gym_map_models::GeocodeSource;

use crate::rate_limit::RateLimiter;
use crate::{Coordinates, PostcodeApi, Resolution};

/// How many alternative postcodes to probe after the exact lookup misses.
const MAX_ALTERNATIVES: u32 = 2;

/// Resolves a postcode (or, failing that, a free-text name) to
/// coordinates.
///
/// Every lookup in every tier passes through the shared [`RateLimiter`]
/// first. Lookup faults are logged and treated the same as "not found";
/// resolution never blocks the pipeline.
pub struct GeocodingResolver {
    api: Arc<dyn PostcodeApi>,
    limiter: RateLimiter,
}

impl GeocodingResolver {
    /// Creates a resolver over the given API with a minimum interval
    /// between outbound lookups.
    #[must_use]
    pub fn new(api: Arc<dyn PostcodeApi>, min_interval: Duration) -> Self {
        Self {
            api,
            limiter: RateLimiter::new(min_interval),
        }
    }

    /// Resolves coordinates for a gym.
    ///
    /// Tier 1: exact postcode lookup, then up to two alternative
    /// postcodes derived by decrementing the final character. Tier 2:
    /// free-text search for `"<fallback_name>, UK"`.
    pub async fn resolve(&self, postcode: Option<&str>, fallback_name: &str) -> Resolution {
        if let Some(postcode) = postcode {
            if let Some(coords) = self.try_postcode(postcode).await {
                log::info!("Successfully geocoded {postcode}");
                return resolved(coords, GeocodeSource::Postcode);
            }

            for alternative in alternatives(postcode) {
                log::info!("Trying alternative postcode: {alternative}");
                if let Some(coords) = self.try_postcode(&alternative).await {
                    log::info!("Geocoded alternative postcode {alternative} for {postcode}");
                    return resolved(coords, GeocodeSource::Postcode);
                }
            }

            log::info!("Failed to geocode {postcode} and its alternatives");
        }

        let query = format!("{fallback_name}, UK");
        self.limiter.wait().await;
        match self.api.search(&query).await {
            Ok(Some(coords)) => resolved(coords, GeocodeSource::LocationName),
            Ok(None) => Resolution::Unresolved,
            Err(e) => {
                log::warn!("Free-text geocoding failed for {query:?}: {e}");
                Resolution::Unresolved
            }
        }
    }

    /// One rate-limited postcode lookup with faults absorbed to `None`.
    async fn try_postcode(&self, postcode: &str) -> Option<Coordinates> {
        self.limiter.wait().await;
        match self.api.lookup(postcode).await {
            Ok(found) => found,
            Err(e) => {
                log::warn!("Postcode lookup failed for {postcode}: {e}");
                None
            }
        }
    }
}

const fn resolved(coords: Coordinates, source: GeocodeSource) -> Resolution {
    Resolution::Resolved {
        latitude: coords.latitude,
        longitude: coords.longitude,
        source,
    }
}

/// Alternative postcodes obtained by decrementing the character code of
/// the final character, stopping before `'A'`.
///
/// The inward code ends in a letter for well-formed postcodes; for a
/// salvaged string ending in a digit the floor check stops probing
/// immediately, which is the intended conservative behavior.
fn alternatives(postcode: &str) -> Vec<String> {
    let Some(last) = postcode.chars().last() else {
        return Vec::new();
    };
    let base = &postcode[..postcode.len() - last.len_utf8()];
    let code = last as u32;

    let mut probes = Vec::new();
    for step in 1..=MAX_ALTERNATIVES {
        if code < u32::from(b'A') + step {
            break;
        }
        if let Some(replacement) = char::from_u32(code - step) {
            probes.push(format!("{base}{replacement}"));
        }
    }
    probes
}
