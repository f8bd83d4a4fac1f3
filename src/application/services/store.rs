//! Cluster store service
//!
//! Owns the live collection and its undo history. Every mutation is computed
//! on a working copy and committed in one step, so a rejected operation leaves
//! both the collection and the history untouched.

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    decode_collection, Cluster, Collection, History, Member, Metrics, ValidationError,
    DEFAULT_MAX_HISTORY,
};

/// Length of generated cluster ids.
const CLUSTER_ID_LEN: usize = 8;

/// In-memory cluster collection with bounded undo.
#[derive(Debug, Clone)]
pub struct ClusterStore {
    collection: Collection,
    history: History,
}

impl Default for ClusterStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl ClusterStore {
    /// Create an empty store keeping at most `max_history` snapshots.
    pub fn new(max_history: usize) -> Self {
        Self {
            collection: Collection::default(),
            history: History::new(max_history),
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Owned copy of the current state, e.g. for serialization.
    pub fn export(&self) -> Collection {
        self.collection.clone()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Validate `raw` and replace the current collection with it.
    ///
    /// On error the store is unchanged.
    pub fn load(&mut self, raw: Value) -> Result<(), ValidationError> {
        let collection = decode_collection(raw).inspect_err(|e| {
            debug!("load: rejected ({}): {}", e.kind(), e);
        })?;
        debug!(
            "load: {} clusters, {} members",
            collection.clusters.len(),
            collection.total_members()
        );
        self.collection = collection;
        self.save_state();
        Ok(())
    }

    /// Record a copy of the current collection, evicting the oldest snapshot when full.
    ///
    /// Every successful edit calls this after applying its change, so the
    /// newest snapshot always equals the live collection and `undo` steps back
    /// to the one before it. Rejected edits record nothing.
    pub fn save_state(&mut self) {
        self.history.push(self.collection.clone());
        debug!("save_state: history length {}", self.history.len());
    }

    /// Revert to the state before the most recent edit.
    ///
    /// Returns `false` when there is nothing to go back to.
    pub fn undo(&mut self) -> bool {
        match self.history.step_back() {
            Some(previous) => {
                self.collection = previous;
                debug!("undo: history length {}", self.history.len());
                true
            }
            None => {
                debug!("undo: nothing to undo");
                false
            }
        }
    }

    pub fn cluster(&self, cluster_id: &str) -> Option<&Cluster> {
        self.collection.get(cluster_id)
    }

    pub fn member(&self, cluster_id: &str, member_id: &str) -> Option<&Member> {
        self.cluster(cluster_id)?.member(member_id)
    }

    pub fn metrics(&self) -> Metrics {
        self.collection.metrics()
    }

    pub fn search(&self, query: &str) -> Vec<&Cluster> {
        self.collection.search(query)
    }

    /// Merge `absorbed_id` into `keep_id` and rename the result.
    ///
    /// Members of the absorbed cluster whose id already exists in the kept
    /// cluster are dropped. References to the absorbed cluster elsewhere are
    /// redirected to the kept one. Merging a cluster with itself is rejected.
    pub fn merge_clusters(&mut self, keep_id: &str, absorbed_id: &str, new_name: &str) -> bool {
        if keep_id == absorbed_id {
            debug!("merge: refusing to merge {} with itself", keep_id);
            return false;
        }
        let (Some(keep_idx), Some(absorbed_idx)) = (
            self.collection.position(keep_id),
            self.collection.position(absorbed_id),
        ) else {
            debug!("merge: unknown cluster {} or {}", keep_id, absorbed_id);
            return false;
        };

        let mut next = self.collection.clone();
        let absorbed = next.clusters.remove(absorbed_idx);
        let keep_idx = if absorbed_idx < keep_idx {
            keep_idx - 1
        } else {
            keep_idx
        };

        let kept = &mut next.clusters[keep_idx];
        for member in absorbed.members {
            if !kept.has_member(&member.id) {
                kept.members.push(member);
            }
        }

        let mut relationships: Vec<String> = Vec::new();
        for rel in kept.relationships.iter().chain(&absorbed.relationships) {
            if rel != keep_id && rel != absorbed_id && !relationships.contains(rel) {
                relationships.push(rel.clone());
            }
        }
        kept.relationships = relationships;
        kept.name = new_name.to_string();

        for cluster in next.clusters.iter_mut() {
            if cluster.relates_to(absorbed_id) {
                cluster.relationships.retain(|r| r != absorbed_id);
                if cluster.id != keep_id && !cluster.relates_to(keep_id) {
                    cluster.relationships.push(keep_id.to_string());
                }
            }
        }

        debug!("merge: {} <- {} as {:?}", keep_id, absorbed_id, new_name);
        self.commit(next);
        true
    }

    /// Move the selected members from `source_id` to the end of `target_id`.
    ///
    /// Fails when no selected member is in the source. Member ids are not
    /// de-duplicated against the target. With `source_id == target_id` the
    /// selected members move to the end of that cluster.
    pub fn move_members(&mut self, source_id: &str, target_id: &str, member_ids: &[String]) -> bool {
        let (Some(source_idx), Some(target_idx)) = (
            self.collection.position(source_id),
            self.collection.position(target_id),
        ) else {
            debug!("move: unknown cluster {} or {}", source_id, target_id);
            return false;
        };

        let (moving, staying) = self.collection.clusters[source_idx].partition_members(member_ids);
        if moving.is_empty() {
            debug!("move: none of {:?} found in {}", member_ids, source_id);
            return false;
        }

        let count = moving.len();
        let mut next = self.collection.clone();
        next.clusters[source_idx].members = staying;
        // source_idx == target_idx reorders within one cluster
        next.clusters[target_idx].members.extend(moving);

        debug!("move: {} members {} -> {}", count, source_id, target_id);
        self.commit(next);
        true
    }

    /// Move the selected members of `cluster_id` into a new cluster appended to the collection.
    pub fn split_cluster(&mut self, cluster_id: &str, member_ids: &[String], new_name: &str) -> bool {
        let Some(source_idx) = self.collection.position(cluster_id) else {
            debug!("split: unknown cluster {}", cluster_id);
            return false;
        };

        let (moving, staying) = self.collection.clusters[source_idx].partition_members(member_ids);
        if moving.is_empty() {
            debug!("split: none of {:?} found in {}", member_ids, cluster_id);
            return false;
        }

        let new_id = self.generate_cluster_id();
        let mut next = self.collection.clone();
        next.clusters[source_idx].members = staying;
        next.clusters
            .push(Cluster::new(new_id.clone(), new_name).with_members(moving));

        debug!("split: {} -> new cluster {} {:?}", cluster_id, new_id, new_name);
        self.commit(next);
        true
    }

    /// Move a single member, as dropped onto another cluster.
    pub fn handle_drag_drop(&mut self, source_id: &str, member_id: &str, target_id: &str) -> bool {
        if self.member(source_id, member_id).is_none() {
            debug!("drag_drop: member {} not in {}", member_id, source_id);
            return false;
        }
        self.move_members(source_id, target_id, &[member_id.to_string()])
    }

    /// Remove every cluster. Undoable.
    pub fn clear(&mut self) -> bool {
        if self.collection.is_empty() {
            return false;
        }
        debug!("clear: dropping {} clusters", self.collection.clusters.len());
        self.commit(Collection::default());
        true
    }

    fn commit(&mut self, next: Collection) {
        self.collection = next;
        self.save_state();
    }

    /// Short random id not used by any current cluster.
    fn generate_cluster_id(&self) -> String {
        loop {
            let mut candidate = Uuid::new_v4().simple().to_string();
            candidate.truncate(CLUSTER_ID_LEN);
            if !self.collection.contains(&candidate) {
                return candidate;
            }
        }
    }
}
