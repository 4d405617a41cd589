//! Batch-driven pipeline execution with per-batch checkpointing.

use std::path::Path;
use std::sync::Arc;

use gym_map_browser::Session;
use gym_map_models::{SiteCandidate, SiteRecord};

use crate::config::TargetConfig;
use crate::extract::RecordExtractor;
use crate::progress::ProgressCallback;
use crate::retry::RetryController;
use crate::{ScrapeError, checkpoint};

/// Drives the pipeline over all discovered candidates in fixed-size
/// batches, persisting the full snapshot after each batch.
///
/// A candidate whose processing fails terminally becomes an
/// error-tagged record; the run always continues to the next candidate.
/// Only checkpoint I/O failures abort the run, leaving the batches
/// already persisted on disk.
pub struct BatchRunner<'a> {
    config: &'a TargetConfig,
    extractor: RecordExtractor<'a>,
    retry: RetryController<'a>,
    progress: Arc<dyn ProgressCallback>,
}

impl<'a> BatchRunner<'a> {
    #[must_use]
    pub fn new(
        config: &'a TargetConfig,
        extractor: RecordExtractor<'a>,
        retry: RetryController<'a>,
        progress: Arc<dyn ProgressCallback>,
    ) -> Self {
        Self {
            config,
            extractor,
            retry,
            progress,
        }
    }

    /// Processes every candidate in order and returns the final record
    /// set. Records appear in discovery order; placeholder candidates
    /// are simply absent.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] only for checkpoint persistence failures.
    pub async fn run(
        &self,
        candidates: &[SiteCandidate],
        session: &mut Box<dyn Session>,
    ) -> Result<Vec<SiteRecord>, ScrapeError> {
        let total = candidates.len();
        self.progress.set_total(total as u64);

        let output = Path::new(&self.config.output_path);
        let mut records: Vec<SiteRecord> = Vec::with_capacity(total);
        let batch_count = candidates.chunks(self.config.batch_size).count();

        for (batch_index, batch) in candidates.chunks(self.config.batch_size).enumerate() {
            for (offset, candidate) in batch.iter().enumerate() {
                let processed = batch_index * self.config.batch_size + offset + 1;
                let percent = percent_of(processed, total);

                match self.retry.process(&self.extractor, candidate, session).await {
                    Ok(Some(record)) => {
                        let located = record.geocode_source.map_or_else(
                            || "No coordinates".to_string(),
                            |source| format!("Geocoded ({source})"),
                        );
                        let price = record.price.unwrap_or_default();
                        log::info!(
                            "[{percent:.1}%] Processed: {} - £{price} - {located}",
                            candidate.name
                        );
                        records.push(record);
                    }
                    Ok(None) => {
                        log::info!("[{percent:.1}%] Skipped placeholder: {}", candidate.name);
                    }
                    Err(e) => {
                        log::error!("[{percent:.1}%] Error processing {}: {e}", candidate.name);
                        records.push(SiteRecord::failed(candidate, &e.to_string()));
                    }
                }

                self.progress.inc(1);
                self.progress.set_message(candidate.name.clone());
            }

            checkpoint::write_snapshot(output, &records).await?;
            log::info!(
                "Progress saved: {}/{total} gyms processed",
                (batch_index * self.config.batch_size) + batch.len()
            );

            if batch_index + 1 < batch_count {
                tokio::time::sleep(self.config.batch_pause()).await;
            }
        }

        self.progress.finish(format!("Processed {total} gyms"));
        Ok(records)
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent_of(processed: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        (processed as f64 / total as f64) * 100.0
    }
}
