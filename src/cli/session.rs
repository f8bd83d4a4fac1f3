//! Interactive workbench session
//!
//! Reads one command per line and applies it to a single long-lived store, so
//! edits can be undone and the result exported at any point. Failed commands
//! are reported and the session continues.

use std::io::{BufRead, Write};
use std::path::Path;

use tracing::{debug, instrument};

use crate::application::services::{ClusterStore, SnapshotService};
use crate::application::{guards, messages, ApplicationError, Operation};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::infrastructure::{InfraError, ServiceContainer};
use crate::util::path::expand_path;

const HELP: &str = "\
commands:
  load <file>                     replace the workbench with a snapshot file
  sample                          load the built-in sample
  show [query]                    clusters as a tree
  metrics                         collection metrics
  search <query>                  clusters matching a cluster or member name
  merge <keep> <absorb> <name>    merge two clusters
  move <source> <target> <member>...
  split <cluster> <name> <member>...
  drag <source> <member> <target> move one member
  undo                            revert the last edit
  clear                           empty the workbench
  history                         number of stored snapshots
  export [path]                   print or write the current snapshot
  help                            this text
  quit                            leave the session
Quote arguments containing spaces: merge a b \"New Name\"";

/// Whether the session should keep reading.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Session<'a> {
    container: &'a ServiceContainer,
    store: ClusterStore,
    prompt: bool,
}

impl<'a> Session<'a> {
    pub fn new(container: &'a ServiceContainer, store: ClusterStore) -> Self {
        Self {
            container,
            store,
            prompt: false,
        }
    }

    /// Print a prompt before each line (for terminals).
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn store(&self) -> &ClusterStore {
        &self.store
    }

    /// Process lines until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> CliResult<()> {
        if self.prompt {
            output::prompt("cluster>");
        }
        for line in input.lines() {
            let line = line.map_err(|e| InfraError::io("read command", e))?;
            match self.execute_line(&line, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => writeln!(out, "error: {e}").map_err(write_err)?,
            }
            if self.prompt {
                output::prompt("cluster>");
            }
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self, out))]
    fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> CliResult<Flow> {
        let args = split_args(line)?;
        let Some((command, rest)) = args.split_first() else {
            return Ok(Flow::Continue);
        };
        debug!("command {} with {} args", command, rest.len());

        match (command.as_str(), rest) {
            ("quit" | "exit", _) => return Ok(Flow::Quit),
            ("help", _) => say(out, HELP)?,
            ("load", [file]) => {
                self.container
                    .snapshots
                    .load_into(&mut self.store, &expand_path(Path::new(file)))?;
                self.report_loaded(out)?;
            }
            ("sample", []) => {
                self.store
                    .load(SnapshotService::sample()?)
                    .map_err(ApplicationError::from)?;
                self.report_loaded(out)?;
            }
            ("show", query) => {
                let query = query.join(" ");
                let clusters = self.store.search(&query);
                let tree = output::cluster_tree(self.store.collection(), &clusters);
                say(out, tree)?;
            }
            ("metrics", []) => {
                let m = self.store.metrics();
                say(out, format!("clusters: {}", m.total_clusters))?;
                say(out, format!("members: {}", m.total_members))?;
                say(out, format!("avg members per cluster: {:.2}", m.avg_members_per_cluster))?;
                say(out, format!("relationships: {}", m.total_relationships))?;
            }
            ("search", query) if !query.is_empty() => {
                let query = query.join(" ");
                let hits = self.store.search(&query);
                if hits.is_empty() {
                    say(out, messages::no_matching_clusters(&query))?;
                } else {
                    say(out, messages::showing_results(hits.len(), &query))?;
                    for cluster in hits {
                        say(out, format!("  {}", output::cluster_label(cluster)))?;
                    }
                }
            }
            ("merge", [keep, absorb, name]) => {
                guards::require_two_clusters(self.store.collection().clusters.len(), "merge")?;
                guards::require_distinct(keep, absorb)?;
                let ok = self.store.merge_clusters(keep, absorb, name);
                self.report(out, Operation::Merge, ok)?;
            }
            ("move", [source, target, members @ ..]) if !members.is_empty() => {
                guards::require_distinct(source, target)?;
                if let Some(cluster) = self.store.cluster(source) {
                    guards::require_movable(cluster, members)?;
                }
                let ok = self.store.move_members(source, target, members);
                self.report(out, Operation::Move, ok)?;
            }
            ("split", [cluster_id, name, members @ ..]) if !members.is_empty() => {
                if let Some(cluster) = self.store.cluster(cluster_id) {
                    guards::require_splittable(cluster, members)?;
                }
                let ok = self.store.split_cluster(cluster_id, members, name);
                self.report(out, Operation::Split, ok)?;
                if let Some(created) = self.store.collection().clusters.last().filter(|_| ok) {
                    say(out, format!("  new cluster: {}", output::cluster_label(created)))?;
                }
            }
            ("drag", [source, member, target]) => {
                let ok = self.store.handle_drag_drop(source, member, target);
                self.report(out, Operation::DragDrop, ok)?;
            }
            ("undo", []) => {
                let ok = self.store.undo();
                self.report(out, Operation::Undo, ok)?;
            }
            ("clear", []) => {
                let ok = self.store.clear();
                self.report(out, Operation::Clear, ok)?;
            }
            ("history", []) => say(
                out,
                format!(
                    "{} of {} snapshots",
                    self.store.history().len(),
                    self.store.history().capacity()
                ),
            )?,
            ("export", []) => {
                let json = self.container.snapshots.to_json(self.store.collection())?;
                say(out, json)?;
            }
            ("export", [path]) => {
                let written = self
                    .container
                    .snapshots
                    .write(&expand_path(Path::new(path)), self.store.collection())?;
                say(out, format!("exported to {}", written.display()))?;
            }
            _ => {
                return Err(CliError::Usage(format!(
                    "unknown or incomplete command: {line} (try 'help')"
                )))
            }
        }
        Ok(Flow::Continue)
    }

    fn report_loaded<W: Write>(&self, out: &mut W) -> CliResult<()> {
        let metrics = self.store.metrics();
        say(out, Operation::Load.success_message())?;
        say(
            out,
            messages::loaded_summary(metrics.total_clusters, metrics.total_members),
        )
    }

    fn report<W: Write>(&self, out: &mut W, operation: Operation, ok: bool) -> CliResult<()> {
        debug!("{} -> {}", operation, ok);
        if !ok {
            return Err(CliError::OperationFailed(operation));
        }
        say(out, operation.success_message())
    }
}

fn say<W: Write>(out: &mut W, msg: impl std::fmt::Display) -> CliResult<()> {
    writeln!(out, "{msg}").map_err(write_err)
}

fn write_err(e: std::io::Error) -> CliError {
    InfraError::io("write output", e).into()
}

/// Split a command line on whitespace, honoring single and double quotes.
fn split_args(line: &str) -> CliResult<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quote.is_some() {
        return Err(CliError::Usage(format!("unterminated quote in: {line}")));
    }
    if in_token {
        args.push(current);
    }
    Ok(args)
}
