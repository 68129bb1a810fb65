//! catree: category tree model for classifieds marketplaces.
//!
//! Ad categories form a forest of at most three levels. The [`domain`] layer
//! flattens it for display honoring expand/collapse state, excludes subtrees
//! from parent pickers, and validates parent selections; the outer layers
//! load listings, read configuration, and expose everything on the CLI.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{
    compute_expand_all_state, flatten, is_valid_parent, Category, CategoryId, Children,
    DomainError, ExpansionState, FlatNode,
};
