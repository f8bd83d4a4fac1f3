//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Reasons a raw snapshot is rejected by `ClusterStore::load`.
///
/// Indices are 0-based; the display text reports them 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid JSON: root element must be an object")]
    InvalidJson,

    #[error("missing required 'clusters' key in JSON")]
    MissingClusters,

    #[error("'clusters' must be an array")]
    ClustersNotArray,

    #[error("no clusters found in the data")]
    NoClusters,

    #[error("cluster {} is not a valid object", .cluster + 1)]
    ClusterNotObject { cluster: usize },

    #[error("cluster {} missing required keys: {}", .cluster + 1, .keys.join(", "))]
    MissingKeys { cluster: usize, keys: Vec<String> },

    #[error("cluster {}: 'members' must be an array", .cluster + 1)]
    MembersNotArray { cluster: usize },

    #[error("cluster {}, member {} is not a valid object", .cluster + 1, .member + 1)]
    MemberNotObject { cluster: usize, member: usize },

    #[error("cluster {}, member {} missing: {}", .cluster + 1, .member + 1, .keys.join(", "))]
    MemberMissingKeys {
        cluster: usize,
        member: usize,
        keys: Vec<String>,
    },

    #[error("duplicate cluster IDs found: {}", .ids.join(", "))]
    DuplicateIds { ids: Vec<String> },

    #[error("unexpected error: {cause}")]
    Unexpected { cause: String },
}

impl ValidationError {
    /// Stable snake_case code for the presentation layer.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidJson => "invalid_json",
            Self::MissingClusters => "missing_clusters",
            Self::ClustersNotArray => "clusters_not_array",
            Self::NoClusters => "no_clusters",
            Self::ClusterNotObject { .. } => "cluster_not_object",
            Self::MissingKeys { .. } => "missing_keys",
            Self::MembersNotArray { .. } => "members_not_array",
            Self::MemberNotObject { .. } => "member_not_object",
            Self::MemberMissingKeys { .. } => "member_missing_keys",
            Self::DuplicateIds { .. } => "duplicate_ids",
            Self::Unexpected { .. } => "unexpected_error",
        }
    }
}
