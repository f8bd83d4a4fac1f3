//! Domain entities: core data structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An identified entity belonging to exactly one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique within the owning cluster (not across clusters)
    pub id: String,
    pub name: String,
    /// Free-form attributes, e.g. `{"role": "Developer"}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// A named group owning an ordered list of members.
///
/// `relationships` holds weak references to other clusters by id. They are
/// not guaranteed to resolve and are only repaired by merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub members: Vec<Member>,
    #[serde(default)]
    pub relationships: Vec<String>,
}

impl Cluster {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            members: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn with_members(mut self, members: Vec<Member>) -> Self {
        self.members = members;
        self
    }

    pub fn with_relationships<I, S>(mut self, relationships: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationships = relationships.into_iter().map(Into::into).collect();
        self
    }

    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }

    pub fn has_member(&self, member_id: &str) -> bool {
        self.member(member_id).is_some()
    }

    pub fn relates_to(&self, cluster_id: &str) -> bool {
        self.relationships.iter().any(|r| r == cluster_id)
    }

    /// Split members into (selected, remaining), both in original order.
    pub fn partition_members(&self, member_ids: &[String]) -> (Vec<Member>, Vec<Member>) {
        self.members
            .iter()
            .cloned()
            .partition(|m| member_ids.iter().any(|id| *id == m.id))
    }

    /// Case-insensitive match on the cluster name or any member name.
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .members
                .iter()
                .any(|m| m.name.to_lowercase().contains(needle))
    }
}

/// Root object: owns all clusters, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub clusters: Vec<Cluster>,
}

impl Collection {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn position(&self, cluster_id: &str) -> Option<usize> {
        self.clusters.iter().position(|c| c.id == cluster_id)
    }

    pub fn get(&self, cluster_id: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == cluster_id)
    }

    pub fn contains(&self, cluster_id: &str) -> bool {
        self.position(cluster_id).is_some()
    }

    pub fn total_members(&self) -> usize {
        self.clusters.iter().map(|c| c.members.len()).sum()
    }

    pub fn total_relationships(&self) -> usize {
        self.clusters.iter().map(|c| c.relationships.len()).sum()
    }

    pub fn metrics(&self) -> Metrics {
        let total_clusters = self.clusters.len();
        let total_members = self.total_members();
        let avg = if total_clusters == 0 {
            0.0
        } else {
            total_members as f64 / total_clusters as f64
        };
        Metrics {
            total_clusters,
            total_members,
            avg_members_per_cluster: (avg * 100.0).round_ties_even() / 100.0,
            total_relationships: self.total_relationships(),
        }
    }

    /// Clusters whose name or member names contain `query` (case-insensitive).
    /// An empty query returns every cluster.
    pub fn search(&self, query: &str) -> Vec<&Cluster> {
        if query.is_empty() {
            return self.clusters.iter().collect();
        }
        let needle = query.to_lowercase();
        self.clusters.iter().filter(|c| c.matches(&needle)).collect()
    }
}

/// Summary counts over a collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_clusters: usize,
    pub total_members: usize,
    /// Rounded to two decimals (ties to even), 0 when there are no clusters
    pub avg_members_per_cluster: f64,
    /// Relationship entries, not unique edges (A->B and B->A count as 2)
    pub total_relationships: usize,
}
