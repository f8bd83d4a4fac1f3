//! Snapshot file service
//!
//! Sources snapshot bytes from disk, decodes them into JSON and hands them to
//! the store; serializes the current collection back out on export.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use serde_json::Value;
use tracing::debug;

use crate::application::services::ClusterStore;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::Collection;
use crate::infrastructure::traits::FileSystem;

const SAMPLE_DATA: &str = include_str!("../../../data/sample_data.json");

/// Reads and writes collection snapshots as JSON files.
pub struct SnapshotService {
    fs: Arc<dyn FileSystem>,
    max_input_bytes: u64,
    pretty: bool,
}

impl SnapshotService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: &Settings) -> Self {
        Self {
            fs,
            max_input_bytes: settings.max_input_bytes,
            pretty: settings.pretty,
        }
    }

    /// Read and parse a snapshot file without validating its structure.
    pub fn read(&self, path: &Path) -> ApplicationResult<Value> {
        debug!("read: {}", path.display());
        if !self.fs.exists(path) {
            return Err(ApplicationError::NotFound(path.to_path_buf()));
        }

        let size = self
            .fs
            .file_size(path)
            .with_path_context("stat snapshot", path)?;
        if size > self.max_input_bytes {
            return Err(ApplicationError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.max_input_bytes,
            });
        }

        let bytes = self.fs.read(path).with_path_context("read snapshot", path)?;
        let text = String::from_utf8(bytes).map_err(|_| ApplicationError::Encoding {
            path: path.to_path_buf(),
        })?;
        serde_json::from_str(&text).map_err(|source| ApplicationError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `path` and load it into `store`.
    pub fn load_into(&self, store: &mut ClusterStore, path: &Path) -> ApplicationResult<()> {
        let raw = self.read(path)?;
        store.load(raw)?;
        Ok(())
    }

    /// Serialize a collection in the configured style.
    pub fn to_json(&self, collection: &Collection) -> ApplicationResult<String> {
        let result = if self.pretty {
            serde_json::to_string_pretty(collection)
        } else {
            serde_json::to_string(collection)
        };
        result.map_err(|e| ApplicationError::OperationFailed {
            context: "serialize snapshot".into(),
            source: Box::new(e),
        })
    }

    /// Write `collection` to `target`.
    ///
    /// If `target` is a directory, a timestamped file name is generated inside it.
    /// Returns the path written.
    pub fn write(&self, target: &Path, collection: &Collection) -> ApplicationResult<PathBuf> {
        let path = if self.fs.is_dir(target) {
            target.join(Self::export_file_name(&chrono::Local::now()))
        } else {
            target.to_path_buf()
        };
        let json = self.to_json(collection)?;
        self.fs
            .ensure_parent(&path)
            .with_path_context("create directory for", &path)?;
        self.fs
            .write(&path, &json)
            .with_path_context("write snapshot", &path)?;
        debug!("write: {} clusters to {}", collection.clusters.len(), path.display());
        Ok(path)
    }

    /// `clusters_updated_<YYYYmmdd_HHMMSS>.json`
    pub fn export_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!("clusters_updated_{}.json", now.format("%Y%m%d_%H%M%S"))
    }

    /// Built-in example snapshot.
    pub fn sample() -> ApplicationResult<Value> {
        serde_json::from_str(SAMPLE_DATA).map_err(|source| ApplicationError::InvalidJson {
            path: PathBuf::from("<sample>"),
            source,
        })
    }
}
