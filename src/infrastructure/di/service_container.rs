//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ClusterStore, SnapshotService};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Snapshot file reader/writer
    pub snapshots: SnapshotService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let snapshots = SnapshotService::new(Arc::clone(&fs), &settings);

        Self {
            settings,
            fs,
            snapshots,
        }
    }

    /// Fresh, empty store sized by the configured history limit.
    pub fn new_store(&self) -> ClusterStore {
        ClusterStore::new(self.settings.max_history)
    }
}
