//! Single-candidate record extraction.

use gym_map_browser::Session;
use gym_map_geocoder::postcode::extract_postcode;
use gym_map_geocoder::{GeocodingResolver, Resolution};
use gym_map_models::{SiteCandidate, SiteRecord};

use crate::ScrapeError;
use crate::config::TargetConfig;

/// Turns one candidate into a fully-resolved [`SiteRecord`]: navigate,
/// read price and address, derive the postcode, resolve coordinates.
pub struct RecordExtractor<'a> {
    config: &'a TargetConfig,
    resolver: &'a GeocodingResolver,
}

impl<'a> RecordExtractor<'a> {
    #[must_use]
    pub const fn new(config: &'a TargetConfig, resolver: &'a GeocodingResolver) -> Self {
        Self { config, resolver }
    }

    /// Extracts the record for `candidate`.
    ///
    /// Returns `Ok(None)` for placeholder listings ("coming soon"),
    /// which produce no record at all. The price element is required;
    /// the address element is not (a missing address just means no
    /// postcode tier, so geocoding falls back to the gym name).
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Navigation`] for browsing faults,
    /// [`ScrapeError::ElementMissing`] when the price element is absent,
    /// and [`ScrapeError::PriceFormat`] when its text has no leading
    /// number.
    pub async fn extract(
        &self,
        candidate: &SiteCandidate,
        session: &mut dyn Session,
    ) -> Result<Option<SiteRecord>, ScrapeError> {
        let marker = self.config.coming_soon_marker.to_lowercase();
        if candidate.name.to_lowercase().contains(&marker) {
            log::debug!("Skipping placeholder listing {}", candidate.name);
            return Ok(None);
        }

        session.navigate(&candidate.url).await?;

        let price_text = session
            .text_of(&self.config.price_selector)
            .await?
            .ok_or_else(|| ScrapeError::ElementMissing {
                selector: self.config.price_selector.clone(),
            })?;
        let price = parse_price(&price_text).ok_or_else(|| ScrapeError::PriceFormat {
            text: price_text.clone(),
        })?;

        let address = session.text_of(&self.config.address_selector).await?;
        let postcode = address.as_deref().and_then(extract_postcode);

        let resolution = self
            .resolver
            .resolve(postcode.as_deref(), &candidate.name)
            .await;
        let (latitude, longitude, geocode_source) = match resolution {
            Resolution::Resolved {
                latitude,
                longitude,
                source,
            } => (Some(latitude), Some(longitude), Some(source)),
            Resolution::Unresolved => (None, None, None),
        };

        Ok(Some(SiteRecord {
            name: candidate.name.clone(),
            url: candidate.url.clone(),
            price: Some(price),
            address,
            postcode,
            latitude,
            longitude,
            geocode_source,
            error: None,
        }))
    }
}

/// Parses a displayed price by skipping leading currency symbols and
/// reading the leading decimal number: `"£24.99/month"` → `24.99`.
fn parse_price(text: &str) -> Option<f64> {
    let digits_onward = text.trim_start_matches(|c: char| !c.is_ascii_digit());
    let end = digits_onward
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(digits_onward.len());
    digits_onward[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use async_trait::async_trait;
    use gym_map_geocoder::{Coordinates, GeocodeError, PostcodeApi};
    use gym_map_models::GeocodeSource;

    use super::*;
    use crate::testing::{MockBrowser, Script};

    /// Succeeds on postcode lookups, fails free-text search.
    struct PostcodeOnlyApi;

    #[async_trait]
    impl PostcodeApi for PostcodeOnlyApi {
        async fn lookup(&self, _postcode: &str) -> Result<Option<Coordinates>, GeocodeError> {
            Ok(Some(Coordinates {
                latitude: 51.5237,
                longitude: -0.1585,
            }))
        }

        async fn search(&self, _query: &str) -> Result<Option<Coordinates>, GeocodeError> {
            Ok(None)
        }
    }

    fn resolver() -> GeocodingResolver {
        GeocodingResolver::new(Arc::new(PostcodeOnlyApi), Duration::ZERO)
    }

    fn candidate() -> SiteCandidate {
        SiteCandidate::new("London Baker Street", "https://example.com/gyms/baker-street")
    }

    #[tokio::test]
    async fn extracts_a_fully_resolved_record() {
        let config = TargetConfig::embedded();
        let script = Script::new();
        script.set_text(
            "https://example.com/gyms/baker-street",
            &config.price_selector,
            "£24.99",
        );
        script.set_text(
            "https://example.com/gyms/baker-street",
            &config.address_selector,
            "221B Baker Street, London NW1 6XE",
        );
        let mut session = MockBrowser::new(script).session().await;

        let resolver = resolver();
        let extractor = RecordExtractor::new(&config, &resolver);
        let record = extractor
            .extract(&candidate(), session.as_mut())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.price, Some(24.99));
        assert_eq!(record.postcode.as_deref(), Some("NW1 6XE"));
        assert_eq!(record.geocode_source, Some(GeocodeSource::Postcode));
        assert_eq!(record.latitude, Some(51.5237));
        assert!(record.error.is_none());
    }

    #[tokio::test]
    async fn missing_price_element_is_an_extraction_fault() {
        let config = TargetConfig::embedded();
        let script = Script::new();
        script.set_text(
            "https://example.com/gyms/baker-street",
            &config.address_selector,
            "221B Baker Street, London NW1 6XE",
        );
        let mut session = MockBrowser::new(script).session().await;

        let resolver = resolver();
        let extractor = RecordExtractor::new(&config, &resolver);
        let result = extractor.extract(&candidate(), session.as_mut()).await;

        assert!(matches!(result, Err(ScrapeError::ElementMissing { .. })));
    }

    #[tokio::test]
    async fn missing_address_is_tolerated() {
        let config = TargetConfig::embedded();
        let script = Script::new();
        script.set_text(
            "https://example.com/gyms/baker-street",
            &config.price_selector,
            "£18.99",
        );
        let mut session = MockBrowser::new(script).session().await;

        let resolver = resolver();
        let extractor = RecordExtractor::new(&config, &resolver);
        let record = extractor
            .extract(&candidate(), session.as_mut())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.price, Some(18.99));
        assert!(record.address.is_none());
        assert!(record.postcode.is_none());
        // Free-text fallback found nothing either.
        assert!(record.geocode_source.is_none());
        assert!(record.latitude.is_none());
    }

    #[tokio::test]
    async fn unparseable_price_text_is_a_fault() {
        let config = TargetConfig::embedded();
        let script = Script::new();
        script.set_text(
            "https://example.com/gyms/baker-street",
            &config.price_selector,
            "call us",
        );
        let mut session = MockBrowser::new(script).session().await;

        let resolver = resolver();
        let extractor = RecordExtractor::new(&config, &resolver);
        let result = extractor.extract(&candidate(), session.as_mut()).await;

        assert!(matches!(result, Err(ScrapeError::PriceFormat { .. })));
    }

    #[tokio::test]
    async fn coming_soon_placeholder_produces_no_record() {
        let config = TargetConfig::embedded();
        let script = Script::new();
        let browser = MockBrowser::new(Arc::clone(&script));
        let mut session = browser.session().await;

        let resolver = resolver();
        let extractor = RecordExtractor::new(&config, &resolver);
        let placeholder =
            SiteCandidate::new("Hull West - Coming Soon", "https://example.com/gyms/hull");
        let record = extractor
            .extract(&placeholder, session.as_mut())
            .await
            .unwrap();

        assert!(record.is_none());
        // Skipped before touching the browser.
        assert_eq!(script.navigations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn parse_price_strips_currency_and_trailing_text() {
        assert_eq!(parse_price("£24.99"), Some(24.99));
        assert_eq!(parse_price("£24.99/month"), Some(24.99));
        assert_eq!(parse_price("From £19.99 a month"), Some(19.99));
        assert_eq!(parse_price("24"), Some(24.0));
        assert_eq!(parse_price("call us"), None);
        assert_eq!(parse_price(""), None);
    }
}
