#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared data model for the gym map pipeline.
//!
//! Defines the candidate and record types passed between discovery,
//! extraction, and reporting, plus the serialization shape of the
//! persisted checkpoint file (`gym-prices.json`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A gym discovered on the directory page, awaiting data extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteCandidate {
    /// Display name from the directory link text.
    pub name: String,
    /// Absolute URL of the gym's detail page.
    pub url: String,
}

impl SiteCandidate {
    /// Creates a candidate from a directory link.
    #[must_use]
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// Provenance of a resolved coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodeSource {
    /// Resolved from the postcode lookup endpoint (possibly via an
    /// alternative-postcode probe).
    Postcode,
    /// Resolved from the free-text search endpoint using the gym name.
    LocationName,
}

impl fmt::Display for GeocodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postcode => write!(f, "postcode"),
            Self::LocationName => write!(f, "location_name"),
        }
    }
}

/// One fully-processed gym, the unit persisted in the checkpoint file.
///
/// Exactly one of two shapes holds: a data record with `price` set and
/// `error` absent, or a terminal-failure record with all data fields
/// null and `error` set. Coordinate fields are only set together with
/// `geocode_source`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    pub name: String,
    pub url: String,
    /// Monthly price in GBP. Null only on a terminal failure.
    pub price: Option<f64>,
    /// Free-text address from the detail page, if present.
    pub address: Option<String>,
    /// Postcode extracted from the address, if one was found.
    pub postcode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// How the coordinates were resolved, if they were.
    pub geocode_source: Option<GeocodeSource>,
    /// Terminal failure message. Omitted from JSON for data records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SiteRecord {
    /// Builds the terminal-failure record for a candidate that could not
    /// be processed: all data fields null, `error` set.
    #[must_use]
    pub fn failed(candidate: &SiteCandidate, message: &str) -> Self {
        Self {
            name: candidate.name.clone(),
            url: candidate.url.clone(),
            price: None,
            address: None,
            postcode: None,
            latitude: None,
            longitude: None,
            geocode_source: None,
            error: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_record() -> SiteRecord {
        SiteRecord {
            name: "London Holborn".to_string(),
            url: "https://example.com/gyms/london-holborn".to_string(),
            price: Some(24.99),
            address: Some("1 High Holborn, London WC1V 6DX".to_string()),
            postcode: Some("WC1V 6DX".to_string()),
            latitude: Some(51.517),
            longitude: Some(-0.118),
            geocode_source: Some(GeocodeSource::Postcode),
            error: None,
        }
    }

    #[test]
    fn data_record_omits_error_key() {
        let json = serde_json::to_value(data_record()).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["price"], 24.99);
        assert_eq!(json["geocodeSource"], "postcode");
    }

    #[test]
    fn failed_record_has_only_error_set() {
        let candidate = SiteCandidate::new("Leeds", "https://example.com/gyms/leeds");
        let record = SiteRecord::failed(&candidate, "navigation timed out");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["error"], "navigation timed out");
        assert_eq!(json["price"], serde_json::Value::Null);
        assert_eq!(json["latitude"], serde_json::Value::Null);
        assert_eq!(json["geocodeSource"], serde_json::Value::Null);
    }

    #[test]
    fn geocode_source_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(GeocodeSource::LocationName).unwrap(),
            "location_name"
        );
        assert_eq!(GeocodeSource::LocationName.to_string(), "location_name");
    }

    #[test]
    fn record_round_trips_through_json() {
        let json = serde_json::to_string(&data_record()).unwrap();
        let back: SiteRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "London Holborn");
        assert_eq!(back.price, Some(24.99));
        assert_eq!(back.error, None);
    }
}
