#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cumulative price summary over the persisted gym records.
//!
//! Reads the checkpoint file the pipeline writes and groups gyms by
//! price point: for each unique price (ascending), the gyms introduced
//! at that price and the cumulative count of gyms at or below it.
//! Records without a price (terminal failures) are excluded.

use std::collections::HashSet;
use std::path::Path;

use gym_map_models::SiteRecord;
use thiserror::Error;

/// Errors from reading or summarizing the checkpoint file.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Checkpoint file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Checkpoint file is not a valid record array.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One price point in the cumulative summary.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBand {
    /// Monthly price in GBP.
    pub price: f64,
    /// Number of distinct gyms priced at or below this point.
    pub cumulative: usize,
    /// Gyms first seen at this price point.
    pub names: Vec<String>,
}

/// Loads the persisted record set from `path`.
///
/// # Errors
///
/// Returns [`ReportError`] if the file cannot be read or parsed.
pub fn load_records(path: &Path) -> Result<Vec<SiteRecord>, ReportError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Builds the cumulative price summary.
///
/// Unique prices are sorted ascending; a gym name counts once, at the
/// first (lowest) price it appears with.
#[must_use]
#[allow(clippy::float_cmp)] // prices compared against members of the dedup'd list
pub fn summarize(records: &[SiteRecord]) -> Vec<PriceBand> {
    let priced: Vec<(&str, f64)> = records
        .iter()
        .filter_map(|r| r.price.map(|p| (r.name.as_str(), p)))
        .collect();

    let mut prices: Vec<f64> = priced.iter().map(|(_, p)| *p).collect();
    prices.sort_by(f64::total_cmp);
    prices.dedup();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut bands = Vec::with_capacity(prices.len());

    for price in prices {
        let names: Vec<String> = priced
            .iter()
            .filter(|(name, p)| *p == price && !seen.contains(name))
            .map(|(name, _)| (*name).to_string())
            .collect();
        for (name, p) in &priced {
            if *p == price {
                seen.insert(*name);
            }
        }
        bands.push(PriceBand {
            price,
            cumulative: seen.len(),
            names,
        });
    }

    bands
}

/// Renders the summary as operator-readable text.
#[must_use]
pub fn render(bands: &[PriceBand]) -> String {
    let mut out = String::from("\nGym Price Analysis (Cumulative Summary)\n\n");
    for band in bands {
        out.push_str(&format!("£{}: {} gyms\n", band.price, band.cumulative));
        for name in &band.names {
            out.push_str(&format!("- {name}\n"));
        }
        out.push('\n');
    }
    out
}
