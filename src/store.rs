//! Weekly snapshot persistence.
//!
//! One pretty-printed JSON document per run, named `week_<YYYY-MM-DD>.json`,
//! in a dedicated directory. Only the latest document is ever read back.

use crate::error::StoreError;
use crate::models::Snapshot;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const FILE_PREFIX: &str = "week_";
const FILE_SUFFIX: &str = ".json";

/// The part of a stored snapshot the week-over-week delta needs.
#[derive(Debug, Deserialize)]
struct StoredSnapshot {
    #[serde(default)]
    summary: Option<StoredSummary>,
}

#[derive(Debug, Deserialize)]
struct StoredSummary {
    #[serde(default)]
    overall_pct: Option<i64>,
}

/// Directory of weekly snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open the store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot for a given week.
    pub fn path_for(&self, week: &str) -> PathBuf {
        self.dir.join(format!("{}{}{}", FILE_PREFIX, week, FILE_SUFFIX))
    }

    /// The most recent snapshot file, by sorted name.
    pub fn latest_path(&self) -> Result<Option<PathBuf>, StoreError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(FILE_PREFIX) && n.ends_with(FILE_SUFFIX))
            })
            .collect();

        files.sort();
        Ok(files.pop())
    }

    /// Overall percentage of the latest snapshot.
    ///
    /// `Ok(None)` when there is no snapshot or it has no summary. A summary
    /// without `overall_pct` counts as 0.
    pub fn latest_overall_pct(&self) -> Result<Option<i64>, StoreError> {
        let Some(path) = self.latest_path()? else {
            return Ok(None);
        };
        debug!("Loading previous snapshot: {}", path.display());

        let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let stored: StoredSnapshot =
            serde_json::from_str(&content).map_err(|source| StoreError::Json { path, source })?;

        Ok(stored.summary.map(|s| s.overall_pct.unwrap_or(0)))
    }

    /// Write a snapshot, replacing any earlier file for the same week.
    pub fn save(&self, snapshot: &Snapshot) -> Result<PathBuf, StoreError> {
        let path = self.path_for(&snapshot.week);
        let content = serde_json::to_string_pretty(snapshot).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        std::fs::write(&path, content).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}
