#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The extraction-and-geocoding pipeline.
//!
//! [`discovery`] enumerates gym candidates from the directory page,
//! [`extract`] turns one candidate into a fully-resolved record,
//! [`retry`] wraps extraction with classification-aware retry and
//! session replacement, and [`runner`] drives the whole set in fixed
//! batches with a checkpoint snapshot after each one ([`checkpoint`]).
//!
//! Per-candidate faults never abort a run: the runner converts them to
//! error-tagged records and moves on. Only directory discovery and
//! checkpoint I/O are fatal.

pub mod checkpoint;
pub mod config;
pub mod discovery;
pub mod extract;
pub mod progress;
pub mod retry;
pub mod runner;

#[cfg(test)]
pub(crate) mod testing;

use gym_map_browser::SessionError;
use thiserror::Error;

/// Errors that can occur while scraping.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The directory page could not be read. Fatal to the whole run.
    #[error("directory page discovery failed: {message}")]
    Discovery {
        /// Description of what went wrong.
        message: String,
    },

    /// A browsing operation failed. Timeouts and invalidated sessions
    /// are retryable; everything else is not.
    #[error(transparent)]
    Navigation(#[from] SessionError),

    /// A required page element was absent. Permanent for the candidate.
    #[error("required element missing: {selector}")]
    ElementMissing {
        /// The CSS selector that matched nothing.
        selector: String,
    },

    /// The displayed price could not be parsed as a number.
    #[error("price text {text:?} is not a number")]
    PriceFormat {
        /// The offending price text.
        text: String,
    },

    /// A retryable fault persisted through every attempt.
    #[error("failed to process {name} after {attempts} attempts")]
    RetriesExhausted {
        /// Candidate name.
        name: String,
        /// How many attempts were made.
        attempts: u32,
    },

    /// I/O error (checkpoint write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Transient faults worth another attempt on the same candidate.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Navigation(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Faults that kill the browsing session: the handle must be
    /// discarded and a fresh session opened before the next attempt.
    #[must_use]
    pub const fn needs_new_session(&self) -> bool {
        match self {
            Self::Navigation(e) => e.invalidates_session(),
            _ => false,
        }
    }
}
