//! Interactive preconditions checked before an edit reaches the store.
//!
//! The store itself accepts these edits (e.g. moving every member out of a
//! cluster); the guards keep a user from emptying clusters by accident.

use thiserror::Error;

use crate::domain::Cluster;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("need at least 2 clusters to {0}")]
    NeedTwoClusters(&'static str),

    #[error("please select different clusters")]
    SameCluster,

    #[error("source cluster has no members to move")]
    NoMembersToMove,

    #[error("cannot move all members, leave at least one in the original cluster")]
    CannotMoveAll,

    #[error("cluster needs at least 2 members to split")]
    TooSmallToSplit,

    #[error("no members selected")]
    EmptySelection,
}

pub fn require_two_clusters(count: usize, operation: &'static str) -> Result<(), GuardError> {
    if count < 2 {
        return Err(GuardError::NeedTwoClusters(operation));
    }
    Ok(())
}

pub fn require_distinct(first: &str, second: &str) -> Result<(), GuardError> {
    if first == second {
        return Err(GuardError::SameCluster);
    }
    Ok(())
}

/// A move must select something and leave at least one member behind.
pub fn require_movable(source: &Cluster, selected: &[String]) -> Result<(), GuardError> {
    if source.members.is_empty() {
        return Err(GuardError::NoMembersToMove);
    }
    require_leaves_one(source, selected)
}

/// A split needs two members and must leave at least one behind.
pub fn require_splittable(source: &Cluster, selected: &[String]) -> Result<(), GuardError> {
    if source.members.len() < 2 {
        return Err(GuardError::TooSmallToSplit);
    }
    require_leaves_one(source, selected)
}

fn require_leaves_one(source: &Cluster, selected: &[String]) -> Result<(), GuardError> {
    if selected.is_empty() {
        return Err(GuardError::EmptySelection);
    }
    let (moving, staying) = source.partition_members(selected);
    if !moving.is_empty() && staying.is_empty() {
        return Err(GuardError::CannotMoveAll);
    }
    Ok(())
}
