//! Disk cache for the roadway-network snapshot.
//!
//! The raw server JSON is persisted as-is; keeping the exact payload
//! means a cached snapshot and a fresh fetch go through the same parse
//! path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::InfraError;
use crate::types::InfraSnapshot;

/// File name of the cached snapshot inside the cache directory.
pub const SNAPSHOT_FILE: &str = "infra.json";

/// Location of the snapshot file under the given cache directory.
pub fn snapshot_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(SNAPSHOT_FILE)
}

/// Persist the raw snapshot JSON, creating the cache directory if needed.
pub fn save_raw(cache_dir: &Path, raw_json: &str) -> Result<PathBuf, InfraError> {
    fs::create_dir_all(cache_dir)?;
    let path = snapshot_path(cache_dir);
    fs::write(&path, raw_json)?;
    tracing::debug!(path = %path.display(), bytes = raw_json.len(), "Snapshot cached");
    Ok(path)
}

/// Load and parse the cached snapshot, if one exists.
pub fn load(cache_dir: &Path) -> Result<Option<InfraSnapshot>, InfraError> {
    let path = snapshot_path(cache_dir);
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path)?;
    let snapshot = serde_json::from_str(&raw)?;
    Ok(Some(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let raw = r#"{"config":{"infra_cfg_date":"2020-01-01"},"corridor_list":[],"rnode_list":{},"detector_list":{},"meter_list":{},"api_urls":{}}"#;
        save_raw(dir.path(), raw).unwrap();

        let snapshot = load(dir.path()).unwrap().expect("snapshot present");
        assert_eq!(snapshot.config.infra_cfg_date.as_deref(), Some("2020-01-01"));
    }

    #[test]
    fn load_missing_cache_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn load_corrupt_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        save_raw(dir.path(), "not json at all").unwrap();
        assert!(load(dir.path()).is_err());
    }
}
