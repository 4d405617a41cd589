//! Checkpoint persistence.
//!
//! The checkpoint is the complete ordered record set serialized as
//! pretty-printed JSON. It is rewritten in full after every batch, via
//! a sibling temp file and an atomic rename so a crash mid-write never
//! leaves a torn snapshot at the target path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use gym_map_models::SiteRecord;

use crate::ScrapeError;

/// Writes the full snapshot of `records` to `path`.
///
/// # Errors
///
/// Returns [`ScrapeError::Json`] if serialization fails or
/// [`ScrapeError::Io`] if the temp-file write or rename fails.
pub async fn write_snapshot(path: &Path, records: &[SiteRecord]) -> Result<(), ScrapeError> {
    let json = serde_json::to_vec_pretty(records)?;
    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, &json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Sibling path with `.tmp` appended, so the rename stays on one
/// filesystem.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("snapshot"), ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}
