//! In-memory cluster workbench.
//!
//! [`ClusterStore`] holds a collection of clusters (named groups of members
//! with weak relationships to each other), validates snapshots on load and
//! applies merge, move, split and drag-drop edits with bounded undo.
//!
//! ```
//! use cluster_tool::ClusterStore;
//! use serde_json::json;
//!
//! let mut store = ClusterStore::default();
//! store
//!     .load(json!({"clusters": [
//!         {"id": "c1", "name": "One", "members": [{"id": "m1", "name": "Ann"}]},
//!         {"id": "c2", "name": "Two", "members": []}
//!     ]}))
//!     .unwrap();
//!
//! assert!(store.move_members("c1", "c2", &["m1".to_string()]));
//! assert!(store.undo());
//! assert_eq!(store.cluster("c1").unwrap().members.len(), 1);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::{ClusterStore, SnapshotService};
pub use domain::{Cluster, Collection, Member, Metrics, ValidationError};
