//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod tree;

pub use arena::{CategoryArena, CategoryNode};
pub use builder::{load_forest, ForestBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult, ErrorKind};
pub use tree::{
    compute_expand_all_state, find, flatten, is_valid_parent, parent_choices, retain_active,
    search, subtree_ids, validate_links, validate_new_child, validate_parent, validate_reparent,
    validate_structure,
};
