#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! No-argument entry point for the gym map scrape pipeline.
//!
//! Launches a headless browser, discovers gyms on the directory page,
//! processes them in checkpointed batches, and always tears the
//! browsing session down on the way out. Per-gym failures are recorded
//! in the checkpoint and do not affect the exit code; only a top-level
//! fault (browser launch, directory discovery, checkpoint I/O) exits
//! non-zero. Partial checkpoints survive either way.

mod progress;

use std::process::ExitCode;
use std::sync::Arc;

use gym_map_browser::chromium::ChromiumBrowser;
use gym_map_browser::{Browser, Session};
use gym_map_geocoder::GeocodingResolver;
use gym_map_geocoder::postcodes_io::PostcodesIo;
use gym_map_scrape::config::TargetConfig;
use gym_map_scrape::discovery;
use gym_map_scrape::extract::RecordExtractor;
use gym_map_scrape::retry::RetryController;
use gym_map_scrape::runner::BatchRunner;
use indicatif::MultiProgress;

#[tokio::main]
async fn main() -> ExitCode {
    let multi = progress::init_logger();
    let config = TargetConfig::embedded();

    match run(&config, &multi).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Run aborted: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Opens the browsing session, runs the pipeline, and closes the
/// session even when the pipeline faults.
async fn run(
    config: &TargetConfig,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let browser = ChromiumBrowser::new(config.navigation_timeout());
    let mut session = browser.open().await?;

    let result = scrape(config, &browser, &mut session, multi).await;

    if let Err(e) = session.close().await {
        log::warn!("Failed to close browsing session: {e}");
    }
    result
}

async fn scrape(
    config: &TargetConfig,
    browser: &ChromiumBrowser,
    session: &mut Box<dyn Session>,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let candidates = discovery::discover_sites(session.as_mut(), config).await?;

    let api = Arc::new(PostcodesIo::new(&config.geocoder_base_url)?);
    let resolver = GeocodingResolver::new(api, config.rate_limit_interval());
    let extractor = RecordExtractor::new(config, &resolver);
    let retry = RetryController::new(browser, config);
    let bar = progress::IndicatifProgress::records_bar(multi, "Collecting gym data");
    let runner = BatchRunner::new(config, extractor, retry, bar);

    let records = runner.run(&candidates, session).await?;
    log::info!(
        "Data saved to {} ({} records)",
        config.output_path,
        records.len()
    );
    Ok(())
}
