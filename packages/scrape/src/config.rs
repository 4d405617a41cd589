//! Compile-time embedded scrape target configuration.
//!
//! The target site (URLs, selectors, pacing) is defined in
//! `config/target.toml` and embedded at build time, keeping the CLI a
//! single no-argument entry point.

use std::time::Duration;

use serde::Deserialize;

const TARGET_TOML: &str = include_str!("../config/target.toml");

/// Everything site-specific about a scrape run.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Directory page listing all gyms.
    pub listing_url: String,
    /// CSS selector for gym links on the directory page.
    pub link_selector: String,
    /// Case-insensitive marker excluding not-yet-open gyms at discovery.
    pub opening_soon_marker: String,
    /// Case-insensitive marker for placeholder detail pages, skipped
    /// without producing a record.
    pub coming_soon_marker: String,
    /// CSS selector for the price element on a detail page.
    pub price_selector: String,
    /// CSS selector for the address element on a detail page.
    pub address_selector: String,
    /// Checkpoint file path, relative to the working directory.
    pub output_path: String,
    /// Base URL of the postcode lookup service.
    pub geocoder_base_url: String,

    /// Upper bound on a single navigation, in milliseconds.
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,
    /// Attempts per candidate before recording a terminal failure.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Cooldown between attempts on a transient fault, in milliseconds.
    #[serde(default = "default_retry_cooldown_ms")]
    pub retry_cooldown_ms: u64,
    /// Candidates per checkpoint batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Pause between batches, in milliseconds.
    #[serde(default = "default_batch_pause_ms")]
    pub batch_pause_ms: u64,
    /// Minimum interval between geocoding requests, in milliseconds.
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,
}

const fn default_navigation_timeout_ms() -> u64 {
    30_000
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_retry_cooldown_ms() -> u64 {
    5_000
}

const fn default_batch_size() -> usize {
    10
}

const fn default_batch_pause_ms() -> u64 {
    1_000
}

const fn default_rate_limit_ms() -> u64 {
    100
}

impl TargetConfig {
    /// Returns the embedded target configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (a compile-time
    /// guarantee in practice; the config tests cover it).
    #[must_use]
    pub fn embedded() -> Self {
        toml::de::from_str(TARGET_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded target config: {e}"))
    }

    /// Navigation timeout as a [`Duration`].
    #[must_use]
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Retry cooldown as a [`Duration`].
    #[must_use]
    pub const fn retry_cooldown(&self) -> Duration {
        Duration::from_millis(self.retry_cooldown_ms)
    }

    /// Inter-batch pause as a [`Duration`].
    #[must_use]
    pub const fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms)
    }

    /// Geocoding rate-limit interval as a [`Duration`].
    #[must_use]
    pub const fn rate_limit_interval(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}
