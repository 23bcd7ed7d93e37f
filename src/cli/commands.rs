//! CLI command implementations

use std::cell::Cell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{ConditionsEditor, Topic};
use crate::cli::args::{Cli, Commands, ConfigCommands, EditAction, EditVerb};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Node, TreeNodeConvert};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::DocumentStore;

/// Execute the parsed CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let dir = cli.dir.clone().or_else(|| std::env::current_dir().ok());
    let settings = Settings::load(dir.as_deref())?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Tree { catalog, data }) => cmd_tree(&container, catalog.as_deref(), data.as_deref()),
        Some(Commands::Collect {
            catalog,
            data,
            compact,
        }) => cmd_collect(&container, catalog.as_deref(), data.as_deref(), *compact),
        Some(Commands::Edit {
            catalog,
            data,
            actions,
            output,
            compact,
        }) => cmd_edit(
            &container,
            catalog.as_deref(),
            data.as_deref(),
            actions,
            output.as_deref(),
            *compact,
        ),
        Some(Commands::Fields { catalog }) => cmd_fields(&container, catalog.as_deref()),
        Some(Commands::Config { command }) => cmd_config(&container, dir.as_deref(), command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

fn catalog_path(container: &ServiceContainer, catalog: Option<&Path>) -> CliResult<PathBuf> {
    catalog
        .map(Path::to_path_buf)
        .or_else(|| container.settings.catalog.clone())
        .ok_or_else(|| CliError::Usage("no field catalog given (use --catalog or set 'catalog' in settings)".into()))
}

/// Editor loaded with catalog and data, not yet rendered.
fn load_editor(container: &ServiceContainer, catalog: Option<&Path>, data: Option<&Path>) -> CliResult<ConditionsEditor> {
    let documents = container.documents();
    let fields = documents.load_catalog(&catalog_path(container, catalog)?)?;
    let data = data.map(|path| documents.load_tree(path)).transpose()?;
    Ok(container.editor_for(fields, data))
}

fn to_json(container: &ServiceContainer, node: &Node, compact: bool) -> CliResult<String> {
    Ok(DocumentStore::to_json(node, container.settings.output.pretty && !compact)?)
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, catalog: Option<&Path>, data: Option<&Path>) -> CliResult<()> {
    let mut editor = load_editor(container, catalog, data)?;
    let live = editor.render()?;
    output::document(&live.to_tree_string());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_collect(
    container: &ServiceContainer,
    catalog: Option<&Path>,
    data: Option<&Path>,
    compact: bool,
) -> CliResult<()> {
    let mut editor = load_editor(container, catalog, data)?;
    editor.render()?;
    let collected = editor.snapshot()?;
    output::document(&to_json(container, &collected, compact)?);
    Ok(())
}

#[instrument(skip(container, actions))]
fn cmd_edit(
    container: &ServiceContainer,
    catalog: Option<&Path>,
    data: Option<&Path>,
    actions: &[EditAction],
    output_path: Option<&Path>,
    compact: bool,
) -> CliResult<()> {
    let mut editor = load_editor(container, catalog, data)?;
    editor.render()?;

    let updates = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&updates);
    editor.subscribe(Topic::Update, move |_| counter.set(counter.get() + 1));

    for action in actions {
        debug!(?action, "applying");
        apply_action(&mut editor, action)?;
    }

    let collected = editor.snapshot()?;
    match output_path {
        Some(path) => {
            let pretty = container.settings.output.pretty && !compact;
            container.documents().write_tree(path, &collected, pretty)?;
            output::written(updates.get(), path);
        }
        None => output::document(&to_json(container, &collected, compact)?),
    }
    Ok(())
}

/// Apply one interaction to the rendered editor.
pub fn apply_action(editor: &mut ConditionsEditor, action: &EditAction) -> CliResult<()> {
    let idx = editor.resolve(&action.path)?;
    match &action.verb {
        EditVerb::AddCondition => {
            editor.add_condition(idx)?;
        }
        EditVerb::AddSubCondition => {
            editor.add_sub_condition(idx)?;
        }
        EditVerb::Remove => editor.remove(idx)?,
        EditVerb::Kind(kind) => editor.change_kind(idx, *kind)?,
        EditVerb::Field(name) => editor.change_field(idx, name)?,
        EditVerb::Operator(name) => editor.change_operator(idx, name)?,
        EditVerb::Value(value) => editor.change_value(idx, value.clone())?,
        EditVerb::Source(source) => editor.change_value_source(idx, source)?,
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_fields(container: &ServiceContainer, catalog: Option<&Path>) -> CliResult<()> {
    let fields = container
        .documents()
        .load_catalog(&catalog_path(container, catalog)?)?;
    for field in &fields {
        output::field(field);
        for operator in &field.operators {
            output::operator(operator);
        }
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer, dir: Option<&Path>, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::document(&container.settings.to_toml()?),
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unavailable>".into());
            output::location("global", &global);
            if let Some(dir) = dir {
                output::location("local", &local_config_path(dir).display());
            }
        }
    }
    Ok(())
}
