//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Cluster workbench: validate, inspect and edit cluster snapshots with undo
#[derive(Parser, Debug)]
#[command(name = "cluster-tool")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output to stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Additional config file (applied after the global config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Snapshot to read.
#[derive(Args, Debug, Clone)]
pub struct Input {
    /// Snapshot JSON file
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

/// Where to export the edited snapshot.
#[derive(Args, Debug, Clone)]
pub struct Output {
    /// Output file or directory (default: stdout)
    #[arg(short, long, value_hint = ValueHint::AnyPath)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a snapshot file
    Validate {
        #[command(flatten)]
        input: Input,
    },

    /// Show clusters, members and relationships as a tree
    Show {
        #[command(flatten)]
        input: Input,
        /// Only clusters matching this query
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show collection metrics
    Metrics {
        #[command(flatten)]
        input: Input,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find clusters by cluster or member name (case-insensitive)
    Search {
        #[command(flatten)]
        input: Input,
        /// Search term
        query: String,
    },

    /// Merge SECOND into FIRST under a new name
    Merge {
        #[command(flatten)]
        input: Input,
        /// Cluster that is kept
        first: String,
        /// Cluster that is absorbed and removed
        second: String,
        /// Name of the merged cluster
        #[arg(short, long)]
        name: String,
        #[command(flatten)]
        output: Output,
    },

    /// Move members between clusters
    Move {
        #[command(flatten)]
        input: Input,
        /// Source cluster
        source: String,
        /// Target cluster
        target: String,
        /// Member ids to move
        #[arg(required = true, num_args = 1..)]
        members: Vec<String>,
        #[command(flatten)]
        output: Output,
    },

    /// Split members off into a new cluster
    Split {
        #[command(flatten)]
        input: Input,
        /// Cluster to split
        cluster: String,
        /// Member ids for the new cluster
        #[arg(required = true, num_args = 1..)]
        members: Vec<String>,
        /// Name of the new cluster
        #[arg(short, long)]
        name: String,
        #[command(flatten)]
        output: Output,
    },

    /// Move a single member (drag and drop)
    Drag {
        #[command(flatten)]
        input: Input,
        /// Source cluster
        source: String,
        /// Member id
        member: String,
        /// Target cluster
        target: String,
        #[command(flatten)]
        output: Output,
    },

    /// Interactive session with undo (commands read from stdin)
    Shell {
        /// Snapshot to start from (default: empty workbench)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Print the built-in sample snapshot
    Sample,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Init,

    /// Show config paths
    Path,
}
