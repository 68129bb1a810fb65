//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::render::{format_ids, render_choices, render_flat, render_forest};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, ExpansionArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{
    compute_expand_all_state, flatten, parent_choices, search, CategoryId, ExpansionState,
    FlatNode, ParentChoice, MAX_LEVELS,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::List {
            file,
            exclude,
            expansion,
            json,
        }) => cmd_list(file.as_deref(), *exclude, expansion, *json),
        Some(Commands::Tree { file }) => cmd_tree(file.as_deref()),
        Some(Commands::ExpandAll { file }) => cmd_expand_all(file.as_deref()),
        Some(Commands::Toggle {
            file,
            id,
            expanded,
            from_all,
        }) => cmd_toggle(file.as_deref(), *id, expanded, *from_all),
        Some(Commands::Parents {
            file,
            editing,
            json,
        }) => cmd_parents(file.as_deref(), *editing, *json),
        Some(Commands::Check {
            file,
            category,
            parent,
        }) => cmd_check(file.as_deref(), *category, *parent),
        Some(Commands::Validate { file }) => cmd_validate(file.as_deref()),
        Some(Commands::Search { query, file }) => cmd_search(file.as_deref(), query),
        Some(Commands::Config { command }) => cmd_config(command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `catree --help`".to_string(),
        )),
    }
}

/// Load settings (local config next to the listing) and wire up services.
fn container(file: Option<&Path>) -> CliResult<ServiceContainer> {
    let local_dir = match file.and_then(Path::parent) {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?,
    };
    let settings = Settings::load(Some(local_dir.as_path()))?;
    let listing: PathBuf = match file {
        Some(file) => file.to_path_buf(),
        None => settings.source.clone().ok_or(ApplicationError::NoSource)?,
    };
    debug!("container: listing={}", listing.display());
    Ok(ServiceContainer::new(settings, &listing))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| InfraError::io("serialize output", e.into()))?;
    output::info(&json);
    Ok(())
}

#[derive(Serialize)]
struct ListRow<'a> {
    id: CategoryId,
    name: &'a str,
    level: usize,
    has_children: bool,
    is_active: bool,
}

impl<'a> From<&FlatNode<'a>> for ListRow<'a> {
    fn from(node: &FlatNode<'a>) -> Self {
        Self {
            id: node.category.id,
            name: &node.category.name,
            level: node.level,
            has_children: node.category.has_children(),
            is_active: node.category.is_active,
        }
    }
}

#[derive(Serialize)]
struct ChoiceRow<'a> {
    #[serde(flatten)]
    row: ListRow<'a>,
    selectable: bool,
}

impl<'a> From<&ParentChoice<'a>> for ChoiceRow<'a> {
    fn from(choice: &ParentChoice<'a>) -> Self {
        Self {
            row: ListRow::from(&choice.node),
            selectable: choice.selectable,
        }
    }
}

#[instrument(skip(expansion))]
fn cmd_list(
    file: Option<&Path>,
    exclude: Option<CategoryId>,
    expansion: &ExpansionArgs,
    json: bool,
) -> CliResult<()> {
    let services = container(file)?;
    let forest = services.categories.load()?;
    let state = expansion.state();
    let nodes = flatten(&forest, exclude, state.as_ref())?;

    if json {
        let rows: Vec<ListRow<'_>> = nodes.iter().map(ListRow::from).collect();
        return print_json(&rows);
    }
    for line in render_flat(&nodes, state.as_ref(), services.settings.indent) {
        output::info(&line);
    }
    Ok(())
}

#[instrument]
fn cmd_tree(file: Option<&Path>) -> CliResult<()> {
    let services = container(file)?;
    let forest = services.categories.load()?;
    if forest.is_empty() {
        output::warning(&format!(
            "no categories in {}",
            services.categories.source_name()
        ));
        return Ok(());
    }
    print!("{}", render_forest(&forest));
    Ok(())
}

#[instrument]
fn cmd_expand_all(file: Option<&Path>) -> CliResult<()> {
    let services = container(file)?;
    let forest = services.categories.load()?;
    let state = compute_expand_all_state(&forest)?;
    output::info(&format_ids(&state));
    Ok(())
}

#[instrument(skip(expanded))]
fn cmd_toggle(
    file: Option<&Path>,
    id: CategoryId,
    expanded: &[CategoryId],
    from_all: bool,
) -> CliResult<()> {
    let services = container(file)?;
    let forest = services.categories.load()?;
    let current = if from_all {
        None
    } else {
        Some(expanded.iter().copied().collect::<ExpansionState>())
    };
    let state = services.categories.toggle(&forest, current, id)?;
    output::info(&format_ids(&state));
    Ok(())
}

#[instrument]
fn cmd_parents(file: Option<&Path>, editing: Option<CategoryId>, json: bool) -> CliResult<()> {
    let services = container(file)?;
    let forest = services.categories.load()?;
    let choices = parent_choices(&forest, editing)?;

    if json {
        let rows: Vec<ChoiceRow<'_>> = choices.iter().map(ChoiceRow::from).collect();
        return print_json(&rows);
    }
    for line in render_choices(&choices, services.settings.indent) {
        output::info(&line);
    }
    Ok(())
}

#[instrument]
fn cmd_check(
    file: Option<&Path>,
    category: Option<CategoryId>,
    parent: Option<CategoryId>,
) -> CliResult<()> {
    let services = container(file)?;
    let forest = services.categories.load()?;
    services.categories.check_parent(&forest, category, parent)?;

    let target = parent.map_or_else(|| "top level".to_string(), |p| format!("#{p}"));
    match category {
        Some(category) => output::success(&format!("#{category} may be moved under {target}")),
        None => output::success(&format!("a new category may be created under {target}")),
    }
    Ok(())
}

#[instrument]
fn cmd_validate(file: Option<&Path>) -> CliResult<()> {
    let services = container(file)?;
    let forest = services.categories.load()?;
    services.categories.validate(&forest)?;
    let count = flatten(&forest, None, None)?.len();
    output::success(&format!(
        "{}: {} categories, at most {} levels",
        services.categories.source_name(),
        count,
        MAX_LEVELS
    ));
    Ok(())
}

#[instrument]
fn cmd_search(file: Option<&Path>, query: &str) -> CliResult<()> {
    let services = container(file)?;
    let forest = services.categories.load()?;
    let matches = search(&forest, query);
    if matches.is_empty() {
        output::warning(&format!("no category matches '{query}'"));
        return Ok(());
    }
    let nodes = flatten(&matches, None, None)?;
    for line in render_flat(&nodes, None, services.settings.indent) {
        output::info(&line);
    }
    Ok(())
}

fn cmd_config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show { dir } => {
            let dir = match dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?,
            };
            let settings = Settings::load(Some(dir.as_path()))?;
            print!("{}", settings.to_toml()?);
        }
        ConfigCommands::Template => print!("{}", Settings::template()),
        ConfigCommands::Path => {
            output::header("Config locations");
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail(&"global: <no home directory>"),
            }
            output::detail(&format!(
                "local:  {}",
                local_config_path(Path::new("<dir>")).display()
            ));
            output::detail(&"env:    CATREE_*");
        }
    }
    Ok(())
}
