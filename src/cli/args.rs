//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::{CategoryId, ExpansionState};

/// Category tree for classifieds marketplaces: flatten, expand/collapse, and parent validation
#[derive(Parser, Debug)]
#[command(name = "catree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Flatten the tree into an indented list
    List {
        /// Category listing (JSON), default: `source` from config
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Leave out this category and everything below it
        #[arg(long)]
        exclude: Option<CategoryId>,
        #[command(flatten)]
        expansion: ExpansionArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the whole forest as a tree
    Tree {
        /// Category listing (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Print the ids of all categories that have children
    ExpandAll {
        /// Category listing (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Expand or collapse one category and print the resulting state
    Toggle {
        /// Category listing (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Category to toggle
        #[arg(long)]
        id: CategoryId,
        /// Currently expanded ids (comma-separated); empty = all collapsed
        #[arg(long, value_delimiter = ',', conflicts_with = "from_all")]
        expanded: Vec<CategoryId>,
        /// Start from "everything expanded"
        #[arg(long)]
        from_all: bool,
    },

    /// List parent choices for a category
    Parents {
        /// Category listing (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Category being edited (it and its descendants are left out)
        #[arg(long)]
        editing: Option<CategoryId>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate a parent selection
    Check {
        /// Category listing (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Category being moved (omit when creating a new one)
        #[arg(long)]
        category: Option<CategoryId>,
        /// New parent (omit for top level)
        #[arg(long)]
        parent: Option<CategoryId>,
    },

    /// Check the listing for cycles, depth and naming problems
    Validate {
        /// Category listing (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Show categories whose name matches, with their ancestors
    Search {
        /// Case-insensitive text to look for
        query: String,
        /// Category listing (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

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

/// Expansion state for flattening. Neither flag = everything expanded.
#[derive(Args, Debug, Default)]
pub struct ExpansionArgs {
    /// Collapse every category
    #[arg(long, conflicts_with = "expanded")]
    pub collapsed: bool,
    /// Expand only these ids (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub expanded: Vec<CategoryId>,
}

impl ExpansionArgs {
    pub fn state(&self) -> Option<ExpansionState> {
        if self.collapsed {
            Some(ExpansionState::collapsed())
        } else if self.expanded.is_empty() {
            None
        } else {
            Some(self.expanded.iter().copied().collect())
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show {
        /// Directory whose .catree.toml is applied (default: cwd)
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },
    /// Print a commented template config
    Template,
    /// Show config file locations
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_expanded_ids_when_parsing_list_then_explicit_state() {
        let cli = Cli::parse_from(["catree", "list", "cats.json", "--expanded", "1,4"]);
        match cli.command {
            Some(Commands::List { expansion, .. }) => {
                let state = expansion.state().unwrap();
                assert!(state.contains(1));
                assert!(state.contains(4));
                assert_eq!(state.len(), 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_no_expansion_flags_when_parsing_list_then_expand_all() {
        let cli = Cli::parse_from(["catree", "list"]);
        match cli.command {
            Some(Commands::List { expansion, .. }) => assert!(expansion.state().is_none()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_collapsed_and_expanded_when_parsing_then_conflict() {
        let result = Cli::try_parse_from(["catree", "list", "--collapsed", "--expanded", "1"]);
        assert!(result.is_err());
    }
}
