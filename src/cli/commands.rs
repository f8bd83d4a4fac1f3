//! Command dispatch

use std::io::{self, IsTerminal};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::{ClusterStore, SnapshotService};
use crate::application::{guards, messages, ApplicationError, Operation};
use crate::cli::args::{Cli, Commands, ConfigCommands, Input, Output};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::session::Session;
use crate::config::{global_config_path, Settings};
use crate::domain::Cluster;
use crate::infrastructure::{InfraError, ServiceContainer};
use crate::util::path::expand_path;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config_file = cli.config.as_deref().map(expand_path);
    let settings = Settings::load(config_file.as_deref())?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Validate { input }) => cmd_validate(&container, input),
        Some(Commands::Show { input, query }) => cmd_show(&container, input, query.as_deref()),
        Some(Commands::Metrics { input, json }) => cmd_metrics(&container, input, *json),
        Some(Commands::Search { input, query }) => cmd_search(&container, input, query),
        Some(Commands::Merge {
            input,
            first,
            second,
            name,
            output,
        }) => cmd_merge(&container, input, first, second, name, output),
        Some(Commands::Move {
            input,
            source,
            target,
            members,
            output,
        }) => cmd_move(&container, input, source, target, members, output),
        Some(Commands::Split {
            input,
            cluster,
            members,
            name,
            output,
        }) => cmd_split(&container, input, cluster, members, name, output),
        Some(Commands::Drag {
            input,
            source,
            member,
            target,
            output,
        }) => cmd_drag(&container, input, source, member, target, output),
        Some(Commands::Shell { file }) => cmd_shell(&container, file.as_deref()),
        Some(Commands::Sample) => cmd_sample(&container),
        Some(Commands::Config { command }) => cmd_config(&container, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        None => Ok(()),
    }
}

/// Load the snapshot named by `input` into a fresh store.
fn open_store(container: &ServiceContainer, input: &Input) -> CliResult<ClusterStore> {
    let mut store = container.new_store();
    container
        .snapshots
        .load_into(&mut store, &expand_path(&input.file))?;
    Ok(store)
}

/// Write the edited snapshot to the requested target, or stdout.
fn export(container: &ServiceContainer, store: &ClusterStore, target: &Output) -> CliResult<()> {
    match &target.output {
        Some(path) => {
            let written = container
                .snapshots
                .write(&expand_path(path), store.collection())?;
            output::success(&format!("Exported to {}", written.display()));
        }
        None => output::info(&container.snapshots.to_json(store.collection())?),
    }
    Ok(())
}

fn require_cluster<'s>(store: &'s ClusterStore, id: &str) -> CliResult<&'s Cluster> {
    store
        .cluster(id)
        .ok_or_else(|| CliError::InvalidArgs(format!("unknown cluster: {id}")))
}

#[instrument(skip(container))]
fn cmd_validate(container: &ServiceContainer, input: &Input) -> CliResult<()> {
    let store = open_store(container, input)?;
    let metrics = store.metrics();
    output::success(Operation::Load.success_message());
    output::info(&messages::loaded_summary(
        metrics.total_clusters,
        metrics.total_members,
    ));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, input: &Input, query: Option<&str>) -> CliResult<()> {
    let store = open_store(container, input)?;
    let query = query.unwrap_or_default();
    let mut clusters = store.search(query);
    if !query.is_empty() && clusters.is_empty() {
        output::warning(&messages::no_matching_clusters(query));
        clusters = store.search("");
    }
    output::info(&output::cluster_tree(store.collection(), &clusters));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_metrics(container: &ServiceContainer, input: &Input, json: bool) -> CliResult<()> {
    let store = open_store(container, input)?;
    let metrics = store.metrics();
    if json {
        let text = serde_json::to_string_pretty(&metrics).map_err(|e| {
            ApplicationError::OperationFailed {
                context: "serialize metrics".into(),
                source: Box::new(e),
            }
        })?;
        output::info(&text);
    } else {
        output::metrics(&metrics);
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_search(container: &ServiceContainer, input: &Input, query: &str) -> CliResult<()> {
    let store = open_store(container, input)?;
    let hits = store.search(query);
    if hits.is_empty() {
        output::warning(&messages::no_matching_clusters(query));
        return Ok(());
    }
    output::header(&messages::showing_results(hits.len(), query));
    for cluster in hits {
        output::detail(&output::cluster_label(cluster));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_merge(
    container: &ServiceContainer,
    input: &Input,
    first: &str,
    second: &str,
    name: &str,
    target: &Output,
) -> CliResult<()> {
    let mut store = open_store(container, input)?;
    guards::require_two_clusters(store.collection().clusters.len(), "merge")?;
    guards::require_distinct(first, second)?;
    require_cluster(&store, first)?;
    require_cluster(&store, second)?;

    if !store.merge_clusters(first, second, name) {
        return Err(CliError::OperationFailed(Operation::Merge));
    }
    output::success(Operation::Merge.success_message());
    export(container, &store, target)
}

#[instrument(skip(container))]
fn cmd_move(
    container: &ServiceContainer,
    input: &Input,
    source: &str,
    target_cluster: &str,
    members: &[String],
    target: &Output,
) -> CliResult<()> {
    let mut store = open_store(container, input)?;
    guards::require_two_clusters(store.collection().clusters.len(), "move members")?;
    guards::require_distinct(source, target_cluster)?;
    guards::require_movable(require_cluster(&store, source)?, members)?;
    require_cluster(&store, target_cluster)?;

    if !store.move_members(source, target_cluster, members) {
        return Err(CliError::OperationFailed(Operation::Move));
    }
    output::success(Operation::Move.success_message());
    export(container, &store, target)
}

#[instrument(skip(container))]
fn cmd_split(
    container: &ServiceContainer,
    input: &Input,
    cluster: &str,
    members: &[String],
    name: &str,
    target: &Output,
) -> CliResult<()> {
    let mut store = open_store(container, input)?;
    guards::require_splittable(require_cluster(&store, cluster)?, members)?;

    if !store.split_cluster(cluster, members, name) {
        return Err(CliError::OperationFailed(Operation::Split));
    }
    output::success(Operation::Split.success_message());
    if let Some(created) = store.collection().clusters.last() {
        output::success(&format!("New cluster: {}", output::cluster_label(created)));
    }
    export(container, &store, target)
}

#[instrument(skip(container))]
fn cmd_drag(
    container: &ServiceContainer,
    input: &Input,
    source: &str,
    member: &str,
    target_cluster: &str,
    target: &Output,
) -> CliResult<()> {
    let mut store = open_store(container, input)?;
    guards::require_distinct(source, target_cluster)?;

    if !store.handle_drag_drop(source, member, target_cluster) {
        return Err(CliError::OperationFailed(Operation::DragDrop));
    }
    output::success(Operation::DragDrop.success_message());
    export(container, &store, target)
}

#[instrument(skip(container))]
fn cmd_shell(container: &ServiceContainer, file: Option<&std::path::Path>) -> CliResult<()> {
    let mut store = container.new_store();
    if let Some(file) = file {
        container
            .snapshots
            .load_into(&mut store, &expand_path(file))?;
        let metrics = store.metrics();
        output::success(&messages::loaded_summary(
            metrics.total_clusters,
            metrics.total_members,
        ));
    }

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut session = Session::new(container, store).with_prompt(interactive);
    let mut stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout)
}

fn cmd_sample(container: &ServiceContainer) -> CliResult<()> {
    let mut store = container.new_store();
    store
        .load(SnapshotService::sample()?)
        .map_err(ApplicationError::from)?;
    output::info(&container.snapshots.to_json(store.collection())?);
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Init => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                let state = if container.fs.exists(&path) {
                    "exists"
                } else {
                    "not found"
                };
                output::info(&format!("global: {} ({state})", path.display()));
            }
            None => {
                return Err(CliError::Infra(InfraError::io(
                    "resolve config directory",
                    io::Error::new(io::ErrorKind::NotFound, "no home directory"),
                )))
            }
        },
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
