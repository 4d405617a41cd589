#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Postcode extraction and coordinate resolution for the gym map pipeline.
//!
//! Resolves a gym's location in two tiers against the postcodes.io API:
//!
//! 1. **Exact postcode lookup**, followed by up to two alternative
//!    postcodes derived by decrementing the final character (listing
//!    pages occasionally carry a postcode one sector off).
//! 2. **Free-text search** using the gym name suffixed with `", UK"`.
//!
//! Resolution is strictly best-effort: a gym that cannot be geocoded is
//! reported as [`Resolution::Unresolved`], never as an error. Transport
//! and parse faults are logged and absorbed. All outbound lookups pass
//! through a shared [`rate_limit::RateLimiter`].

pub mod postcode;
pub mod postcodes_io;
pub mod rate_limit;
pub mod resolve;

use async_trait::async_trait;
use gym_map_models::GeocodeSource;
use thiserror::Error;

pub use resolve::GeocodingResolver;

/// A latitude/longitude pair (WGS84) returned by a lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Outcome of resolving a gym's location.
///
/// The pipeline never fails on geocoding: either the coordinates were
/// found (with their provenance) or the gym goes into the checkpoint
/// without them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Coordinates were found.
    Resolved {
        latitude: f64,
        longitude: f64,
        /// Which tier produced the coordinates.
        source: GeocodeSource,
    },
    /// Neither the postcode lookups nor the free-text search matched.
    Unresolved,
}

impl Resolution {
    /// Returns `true` if coordinates were found.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Errors from a single lookup against the geocoding service.
///
/// "Not found" is not an error; lookups return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// Lookup operations offered by the geocoding service.
///
/// Implemented by [`postcodes_io::PostcodesIo`] for production and by
/// scripted fakes in tests.
#[async_trait]
pub trait PostcodeApi: Send + Sync {
    /// Looks up an exact postcode. `Ok(None)` means the postcode is
    /// unknown to the service.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the HTTP request or response parsing
    /// fails.
    async fn lookup(&self, postcode: &str) -> Result<Option<Coordinates>, GeocodeError>;

    /// Searches free text, returning the first hit if any.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the HTTP request or response parsing
    /// fails.
    async fn search(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError>;
}
