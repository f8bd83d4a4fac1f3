//! User-facing outcome text for store operations

use std::fmt;

/// Store operations surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Merge,
    Move,
    Split,
    DragDrop,
    Undo,
    Clear,
}

impl Operation {
    pub fn success_message(&self) -> &'static str {
        match self {
            Self::Load => "Data loaded successfully!",
            Self::Merge => "Clusters merged successfully!",
            Self::Move | Self::DragDrop => "Members moved successfully!",
            Self::Split => "Cluster split successfully!",
            Self::Undo => "Operation undone!",
            Self::Clear => "Workbench cleared",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Load => "Failed to load data",
            Self::Merge => "Failed to merge clusters",
            Self::Move | Self::DragDrop => "Failed to move members",
            Self::Split => "Failed to split cluster",
            Self::Undo => "Nothing to undo",
            Self::Clear => "Nothing to clear",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Load => "load",
            Self::Merge => "merge",
            Self::Move => "move",
            Self::Split => "split",
            Self::DragDrop => "drag",
            Self::Undo => "undo",
            Self::Clear => "clear",
        };
        f.write_str(name)
    }
}

/// One-line summary shown after a successful load.
pub fn loaded_summary(clusters: usize, members: usize) -> String {
    format!("Loaded {clusters} clusters with {members} total members")
}

pub fn no_matching_clusters(query: &str) -> String {
    format!("No clusters found matching '{query}'")
}

pub fn showing_results(count: usize, query: &str) -> String {
    format!("Showing {count} clusters matching '{query}'")
}
