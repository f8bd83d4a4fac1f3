//! Bounded undo history of collection snapshots.

use std::collections::VecDeque;

use crate::domain::entities::Collection;

/// Default number of snapshots kept.
pub const DEFAULT_MAX_HISTORY: usize = 10;

/// FIFO of owned snapshots; the oldest entry is evicted once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<Collection>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl History {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Store a snapshot, evicting the oldest when full.
    pub fn push(&mut self, snapshot: Collection) {
        while self.snapshots.len() >= self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn latest(&self) -> Option<&Collection> {
        self.snapshots.back()
    }

    /// Drop the newest snapshot and return a copy of the one before it.
    ///
    /// Returns `None` (and leaves the history untouched) with fewer than two entries.
    pub fn step_back(&mut self) -> Option<Collection> {
        if self.snapshots.len() < 2 {
            return None;
        }
        self.snapshots.pop_back();
        self.snapshots.back().cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collection> {
        self.snapshots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Cluster;

    fn snapshot(id: &str) -> Collection {
        Collection::new(vec![Cluster::new(id, id)])
    }

    #[test]
    fn given_bound_two_when_pushing_five_then_keeps_newest_two() {
        let mut history = History::new(2);
        for i in 0..5 {
            history.push(snapshot(&format!("c{i}")));
            assert!(history.len() <= 2);
        }

        let ids: Vec<&str> = history.iter().map(|c| c.clusters[0].id.as_str()).collect();
        assert_eq!(ids, vec!["c3", "c4"]);
    }

    #[test]
    fn given_single_entry_when_stepping_back_then_none() {
        let mut history = History::default();
        history.push(snapshot("a"));

        assert!(history.step_back().is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn given_two_entries_when_stepping_back_then_returns_older() {
        let mut history = History::default();
        history.push(snapshot("a"));
        history.push(snapshot("b"));

        assert_eq!(history.step_back(), Some(snapshot("a")));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn given_zero_capacity_when_created_then_holds_one() {
        let mut history = History::new(0);
        history.push(snapshot("a"));
        history.push(snapshot("b"));

        assert_eq!(history.capacity(), 1);
        assert_eq!(history.latest(), Some(&snapshot("b")));
    }
}
