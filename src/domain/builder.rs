//! Forest builder: turns fetched category records into a nested forest.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, warn};

use crate::domain::arena::CategoryArena;
use crate::domain::entities::{Category, CategoryId, Children, MAX_LEVELS};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::validate_links;

/// Result type for tree operations.
pub type TreeResult<T> = DomainResult<T>;

/// Assembles category forests from flat `parent_id` listings or adopts nested ones.
pub struct ForestBuilder {
    sort_siblings: bool,
}

impl Default for ForestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ForestBuilder {
    pub fn new() -> Self {
        Self {
            sort_siblings: true,
        }
    }

    /// Keep siblings in listing order instead of ordering them by `sort_order`.
    pub fn keep_listing_order(mut self) -> Self {
        self.sort_siblings = false;
        self
    }

    /// Build a forest from records linked by `parent_id`.
    ///
    /// Records whose parent is not part of the listing become top-level
    /// categories and lose their `parent_id`. Nested `children` on the input
    /// records are ignored.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn build(&self, records: Vec<Category>) -> TreeResult<Vec<Category>> {
        let mut known = HashSet::with_capacity(records.len());
        for record in &records {
            if record.name.trim().is_empty() {
                return Err(DomainError::EmptyName(record.id));
            }
            if !known.insert(record.id) {
                return Err(DomainError::DuplicateId(record.id));
            }
        }

        let mut arena = CategoryArena::new();
        let mut index_by_id = HashMap::with_capacity(records.len());
        let mut listing = Vec::with_capacity(records.len());

        for mut record in records {
            let id = record.id;
            match record.parent_id {
                Some(parent_id) if parent_id == id => {
                    return Err(DomainError::CycleDetected(id));
                }
                Some(parent_id) if !known.contains(&parent_id) => {
                    warn!("category {id}: parent {parent_id} not in listing, treating as top-level");
                    record.parent_id = None;
                }
                _ => {}
            }
            let parent_id = record.parent_id;
            let idx = arena.insert_node(record);
            index_by_id.insert(id, idx);
            listing.push((id, parent_id, idx));
        }

        for &(_, parent_id, idx) in &listing {
            let parent_idx = parent_id.and_then(|parent_id| index_by_id.get(&parent_id).copied());
            arena.attach(idx, parent_idx);
        }

        // Nodes on a parent_id loop never hang below a top-level node
        let reachable: HashSet<CategoryId> = arena.iter().map(|(_, node)| node.data.id).collect();
        if let Some(&(id, _, _)) = listing.iter().find(|(id, _, _)| !reachable.contains(id)) {
            return Err(DomainError::CycleDetected(id));
        }

        if self.sort_siblings {
            arena.sort_siblings();
        }

        let depth = arena.depth();
        if depth > MAX_LEVELS {
            warn!("category listing is {depth} levels deep, only {MAX_LEVELS} are displayed");
        }
        debug!(
            "build: {} categories, {} top-level",
            arena.len(),
            arena.roots().len()
        );

        Ok(arena.to_forest())
    }

    /// Take an already nested forest as is, after checking its links.
    ///
    /// Data deeper than [`MAX_LEVELS`] is kept with a warning, as for flat
    /// listings; flattening never shows it.
    #[instrument(level = "debug", skip(self, forest), fields(roots = forest.len()))]
    pub fn adopt(&self, mut forest: Vec<Category>) -> TreeResult<Vec<Category>> {
        let depth = validate_links(&forest)?;
        if depth > MAX_LEVELS {
            warn!("category listing is {depth} levels deep, only {MAX_LEVELS} are displayed");
        }
        if self.sort_siblings {
            sort_nested(&mut forest);
        }
        Ok(forest)
    }
}

/// Stable sort of every sibling list by `sort_order`.
fn sort_nested(forest: &mut [Category]) {
    forest.sort_by_key(|category| category.sort_order);
    for category in forest.iter_mut() {
        if let Children::Fetched(children) = &mut category.children {
            sort_nested(children);
        }
    }
}

/// Load records as returned by the fetch service, flat or nested.
///
/// A listing in which some record carries fetched children is taken as a
/// nested forest; anything else, including records with empty `children`
/// arrays, is linked by `parent_id` through [`ForestBuilder::build`].
#[instrument(level = "debug", skip(builder, records))]
pub fn load_forest(builder: &ForestBuilder, records: Vec<Category>) -> TreeResult<Vec<Category>> {
    if records.iter().any(Category::has_children) {
        debug!("load_forest: nested listing");
        builder.adopt(records)
    } else {
        debug!("load_forest: flat listing");
        builder.build(records)
    }
}
