#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Prints the cumulative price summary for the persisted gym records.

use std::path::Path;

use gym_map_scrape::config::TargetConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let config = TargetConfig::embedded();
    let path = Path::new(&config.output_path);
    let records = gym_map_report::load_records(path)?;
    log::info!("Loaded {} records from {}", records.len(), path.display());

    let bands = gym_map_report::summarize(&records);
    print!("{}", gym_map_report::render(&bands));
    Ok(())
}
