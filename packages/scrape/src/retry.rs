//! Classification-aware retry around record extraction.

use std::time::Duration;

use gym_map_browser::{Browser, Session};
use gym_map_models::{SiteCandidate, SiteRecord};

use crate::ScrapeError;
use crate::config::TargetConfig;
use crate::extract::RecordExtractor;

/// Wraps [`RecordExtractor`] with bounded retries.
///
/// Transient navigation faults get another attempt after a cooldown; a
/// fault that invalidated the browsing session additionally swaps the
/// session handle for a freshly opened one. Every other fault is
/// terminal for the candidate and propagates immediately.
pub struct RetryController<'a> {
    browser: &'a dyn Browser,
    max_attempts: u32,
    cooldown: Duration,
}

impl<'a> RetryController<'a> {
    #[must_use]
    pub fn new(browser: &'a dyn Browser, config: &TargetConfig) -> Self {
        Self::with_policy(browser, config.max_attempts, config.retry_cooldown())
    }

    /// Explicit policy constructor, used by tests to drop the cooldown.
    #[must_use]
    pub const fn with_policy(
        browser: &'a dyn Browser,
        max_attempts: u32,
        cooldown: Duration,
    ) -> Self {
        Self {
            browser,
            max_attempts,
            cooldown,
        }
    }

    /// Runs the extractor for one candidate with retry.
    ///
    /// On a session-invalidating fault the old handle is closed and
    /// `session` is replaced in place, so the caller keeps using the
    /// same slot for subsequent candidates.
    ///
    /// # Errors
    ///
    /// Returns the extractor's fault for non-retryable failures, or
    /// [`ScrapeError::RetriesExhausted`] when a transient fault survived
    /// every attempt.
    pub async fn process(
        &self,
        extractor: &RecordExtractor<'_>,
        candidate: &SiteCandidate,
        session: &mut Box<dyn Session>,
    ) -> Result<Option<SiteRecord>, ScrapeError> {
        for attempt in 1..=self.max_attempts {
            let fault = match extractor.extract(candidate, session.as_mut()).await {
                Ok(record) => return Ok(record),
                Err(e) if e.is_retryable() => e,
                Err(e) => return Err(e),
            };

            if attempt == self.max_attempts {
                log::error!(
                    "Giving up on {} after {attempt} attempts: {fault}",
                    candidate.name
                );
                return Err(ScrapeError::RetriesExhausted {
                    name: candidate.name.clone(),
                    attempts: attempt,
                });
            }

            log::warn!(
                "Transient fault on {} (attempt {attempt}/{}): {fault}",
                candidate.name,
                self.max_attempts
            );
            tokio::time::sleep(self.cooldown).await;

            if fault.needs_new_session() {
                // The old handle is dead; swap in a fresh session.
                if let Err(e) = session.close().await {
                    log::debug!("Failed to close invalidated session: {e}");
                }
                *session = self.browser.open().await?;
            }
        }

        unreachable!("retry loop exited without returning")
    }
}
