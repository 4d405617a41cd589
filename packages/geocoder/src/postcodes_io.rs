//! postcodes.io client.
//!
//! Free, no API key. Two endpoints are used:
//! `GET /postcodes/{postcode}` for exact lookup and `GET /postcodes?q=`
//! for free-text search. A non-2xx HTTP status or a body `status` other
//! than 200 means "not found", not a fault.
//!
//! See <https://postcodes.io/docs>

use async_trait::async_trait;

use crate::{Coordinates, GeocodeError, PostcodeApi};

/// Default public instance.
pub const DEFAULT_BASE_URL: &str = "https://api.postcodes.io";

/// HTTP client for the postcodes.io API.
pub struct PostcodesIo {
    client: reqwest::Client,
    base_url: String,
}

impl PostcodesIo {
    /// Creates a client against the given base URL (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(base_url: &str) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PostcodeApi for PostcodesIo {
    async fn lookup(&self, postcode: &str) -> Result<Option<Coordinates>, GeocodeError> {
        // Postcodes carry an inner space; encode it for the path segment.
        let encoded = postcode.replace(' ', "%20");
        let resp = self
            .client
            .get(format!("{}/postcodes/{encoded}", self.base_url))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Ok(None);
        }

        let body: serde_json::Value = resp.json().await?;
        parse_lookup(&body)
    }

    async fn search(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let resp = self
            .client
            .get(format!("{}/postcodes", self.base_url))
            .query(&[("q", query)])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Ok(None);
        }

        let body: serde_json::Value = resp.json().await?;
        parse_search(&body)
    }
}

/// Parses a `GET /postcodes/{postcode}` response body.
fn parse_lookup(body: &serde_json::Value) -> Result<Option<Coordinates>, GeocodeError> {
    if body["status"].as_i64() != Some(200) {
        return Ok(None);
    }
    parse_result(&body["result"]).map(Some)
}

/// Parses a `GET /postcodes?q=` response body, taking the first hit.
fn parse_search(body: &serde_json::Value) -> Result<Option<Coordinates>, GeocodeError> {
    if body["status"].as_i64() != Some(200) {
        return Ok(None);
    }
    let Some(first) = body["result"].as_array().and_then(|results| results.first()) else {
        return Ok(None);
    };
    parse_result(first).map(Some)
}

fn parse_result(result: &serde_json::Value) -> Result<Coordinates, GeocodeError> {
    let latitude = result["latitude"]
        .as_f64()
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing latitude in postcodes.io result".to_string(),
        })?;
    let longitude = result["longitude"]
        .as_f64()
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing longitude in postcodes.io result".to_string(),
        })?;
    Ok(Coordinates {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lookup_result() {
        let body = serde_json::json!({
            "status": 200,
            "result": { "postcode": "NW1 6XE", "latitude": 51.5237, "longitude": -0.1585 }
        });
        let coords = parse_lookup(&body).unwrap().unwrap();
        assert!((coords.latitude - 51.5237).abs() < 1e-6);
        assert!((coords.longitude - -0.1585).abs() < 1e-6);
    }

    #[test]
    fn lookup_not_found_is_none() {
        let body = serde_json::json!({ "status": 404, "error": "Postcode not found" });
        assert!(parse_lookup(&body).unwrap().is_none());
    }

    #[test]
    fn lookup_without_coordinates_is_parse_error() {
        let body = serde_json::json!({ "status": 200, "result": { "postcode": "NW1 6XE" } });
        assert!(matches!(
            parse_lookup(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn search_takes_first_hit() {
        let body = serde_json::json!({
            "status": 200,
            "result": [
                { "latitude": 53.8008, "longitude": -1.5491 },
                { "latitude": 53.7997, "longitude": -1.5492 }
            ]
        });
        let coords = parse_search(&body).unwrap().unwrap();
        assert!((coords.latitude - 53.8008).abs() < 1e-6);
    }

    #[test]
    fn search_with_no_hits_is_none() {
        let empty = serde_json::json!({ "status": 200, "result": [] });
        assert!(parse_search(&empty).unwrap().is_none());

        let null = serde_json::json!({ "status": 200, "result": null });
        assert!(parse_search(&null).unwrap().is_none());
    }
}
