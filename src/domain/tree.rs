//! Category tree operations over a forest of nested categories.
//!
//! All functions are pure: the forest and the expansion state are owned by
//! the caller and never mutated here.

use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::domain::entities::{
    Category, CategoryId, Children, ExpansionState, FlatNode, ParentChoice, MAX_LEVEL,
};
use crate::domain::error::{DomainError, DomainResult};

/// Flatten the forest into a pre-order listing of visible nodes.
///
/// * `exclude_id` drops that category together with its whole subtree.
/// * `expansion = None` expands every node with children, an empty state
///   expands nothing, otherwise a node is expanded iff its id is in the state.
///
/// Nodes are never emitted below [`MAX_LEVEL`], whatever the data contains.
/// A category nested under an ancestor with the same id fails with
/// [`DomainError::CycleDetected`]; the same id in unrelated branches is kept.
#[instrument(level = "debug", skip(forest, expansion))]
pub fn flatten<'a>(
    forest: &'a [Category],
    exclude_id: Option<CategoryId>,
    expansion: Option<&ExpansionState>,
) -> DomainResult<Vec<FlatNode<'a>>> {
    let mut walk = FlattenWalk {
        exclude_id,
        expansion,
        ancestors: Vec::new(),
        out: Vec::new(),
    };
    walk.visit(forest, 0)?;
    debug!("flatten: {} visible nodes", walk.out.len());
    Ok(walk.out)
}

struct FlattenWalk<'a, 's> {
    exclude_id: Option<CategoryId>,
    expansion: Option<&'s ExpansionState>,
    ancestors: Vec<CategoryId>,
    out: Vec<FlatNode<'a>>,
}

impl<'a> FlattenWalk<'a, '_> {
    fn visit(&mut self, nodes: &'a [Category], level: usize) -> DomainResult<()> {
        for node in nodes {
            if Some(node.id) == self.exclude_id {
                continue;
            }
            if self.ancestors.contains(&node.id) {
                return Err(DomainError::CycleDetected(node.id));
            }

            self.out.push(FlatNode {
                category: node,
                level,
            });

            if node.has_children() && self.is_expanded(node.id) && level < MAX_LEVEL {
                self.ancestors.push(node.id);
                self.visit(node.children(), level + 1)?;
                self.ancestors.pop();
            }
        }
        Ok(())
    }

    fn is_expanded(&self, id: CategoryId) -> bool {
        self.expansion.map_or(true, |state| state.contains(id))
    }
}

/// Collect the id of every category that has at least one child, at any depth.
///
/// Materializes "expand all" as an explicit state so single nodes can be
/// collapsed afterwards.
#[instrument(level = "debug", skip(forest))]
pub fn compute_expand_all_state(forest: &[Category]) -> DomainResult<ExpansionState> {
    fn collect(
        nodes: &[Category],
        ancestors: &mut Vec<CategoryId>,
        state: &mut ExpansionState,
    ) -> DomainResult<()> {
        for node in nodes {
            if ancestors.contains(&node.id) {
                return Err(DomainError::CycleDetected(node.id));
            }
            if node.has_children() {
                state.extend([node.id]);
                ancestors.push(node.id);
                collect(node.children(), ancestors, state)?;
                ancestors.pop();
            }
        }
        Ok(())
    }

    let mut state = ExpansionState::collapsed();
    collect(forest, &mut Vec::new(), &mut state)?;
    Ok(state)
}

/// Only level 0 and level 1 categories may take children.
pub fn is_valid_parent(target_level: usize) -> bool {
    target_level < MAX_LEVEL
}

/// Reject `candidate` at `level` as a parent when its children would exceed the depth bound.
pub fn validate_parent(candidate: &Category, level: usize) -> DomainResult<()> {
    if is_valid_parent(level) {
        Ok(())
    } else {
        Err(DomainError::InvalidParent {
            id: candidate.id,
            level,
        })
    }
}

/// Locate a category and its depth (pre-order, first match wins).
pub fn find(forest: &[Category], id: CategoryId) -> Option<(&Category, usize)> {
    fn search(nodes: &[Category], id: CategoryId, level: usize) -> Option<(&Category, usize)> {
        for node in nodes {
            if node.id == id {
                return Some((node, level));
            }
            if let Some(found) = search(node.children(), id, level + 1) {
                return Some(found);
            }
        }
        None
    }
    search(forest, id, 0)
}

/// The category itself plus all fetched descendants.
pub fn subtree_ids(category: &Category) -> BTreeSet<CategoryId> {
    let mut ids = BTreeSet::new();
    let mut stack = vec![category];
    while let Some(node) = stack.pop() {
        ids.insert(node.id);
        stack.extend(node.children());
    }
    ids
}

/// Deepest fetched descendant below `category` and its distance (0 for a leaf).
fn deepest_descendant(category: &Category) -> (CategoryId, usize) {
    category
        .children()
        .iter()
        .map(|child| {
            let (id, height) = deepest_descendant(child);
            (id, height + 1)
        })
        .fold((category.id, 0), |best, candidate| {
            if candidate.1 > best.1 {
                candidate
            } else {
                best
            }
        })
}

/// Parent picker listing: the fully expanded forest without the category being
/// edited (and its descendants), each entry flagged with whether it may take children.
#[instrument(level = "debug", skip(forest))]
pub fn parent_choices(
    forest: &[Category],
    editing: Option<CategoryId>,
) -> DomainResult<Vec<ParentChoice<'_>>> {
    Ok(flatten(forest, editing, None)?
        .into_iter()
        .map(|node| ParentChoice {
            node,
            selectable: is_valid_parent(node.level),
        })
        .collect())
}

/// Check that a new category may be created under `parent_id`.
pub fn validate_new_child(forest: &[Category], parent_id: CategoryId) -> DomainResult<()> {
    let (parent, level) =
        find(forest, parent_id).ok_or(DomainError::CategoryNotFound(parent_id))?;
    validate_parent(parent, level)
}

/// Check that `category_id` may be moved under `new_parent_id` (`None` = top level).
///
/// The parent must not be the category or one of its descendants, must itself
/// be a valid parent, and the moved subtree must stay within the depth bound.
#[instrument(level = "debug", skip(forest))]
pub fn validate_reparent(
    forest: &[Category],
    category_id: CategoryId,
    new_parent_id: Option<CategoryId>,
) -> DomainResult<()> {
    let (category, _) =
        find(forest, category_id).ok_or(DomainError::CategoryNotFound(category_id))?;

    let new_level = match new_parent_id {
        None => 0,
        Some(parent_id) => {
            if subtree_ids(category).contains(&parent_id) {
                return Err(DomainError::SelfOrDescendantParent {
                    category: category_id,
                    parent: parent_id,
                });
            }
            let (parent, parent_level) =
                find(forest, parent_id).ok_or(DomainError::CategoryNotFound(parent_id))?;
            validate_parent(parent, parent_level)?;
            parent_level + 1
        }
    };

    let (deepest_id, height) = deepest_descendant(category);
    let deepest_level = new_level + height;
    if deepest_level > MAX_LEVEL {
        return Err(DomainError::DepthExceeded {
            id: deepest_id,
            level: deepest_level,
        });
    }
    Ok(())
}

/// Copy of `node` carrying `children` instead of its own.
fn with_children_replaced(node: &Category, children: Children) -> Category {
    Category {
        id: node.id,
        name: node.name.clone(),
        parent_id: node.parent_id,
        children,
        sort_order: node.sort_order,
        is_active: node.is_active,
        image_url: node.image_url.clone(),
    }
}

/// Drop inactive categories together with their subtrees.
pub fn retain_active(forest: &[Category]) -> Vec<Category> {
    forest
        .iter()
        .filter(|node| node.is_active)
        .map(|node| {
            let children = match &node.children {
                Children::NotFetched => Children::NotFetched,
                Children::Fetched(children) => Children::Fetched(retain_active(children)),
            };
            with_children_replaced(node, children)
        })
        .collect()
}

/// Case-insensitive name filter.
///
/// Keeps every matching category with its full subtree, plus the ancestors
/// needed to reach it. A blank query keeps the forest as is.
#[instrument(level = "debug", skip(forest))]
pub fn search(forest: &[Category], query: &str) -> Vec<Category> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return forest.to_vec();
    }

    fn prune(node: &Category, needle: &str) -> Option<Category> {
        if node.name.to_lowercase().contains(needle) {
            return Some(node.clone());
        }
        let kept: Vec<Category> = node
            .children()
            .iter()
            .filter_map(|child| prune(child, needle))
            .collect();
        if kept.is_empty() {
            None
        } else {
            Some(with_children_replaced(node, Children::Fetched(kept)))
        }
    }

    forest
        .iter()
        .filter_map(|node| prune(node, &needle))
        .collect()
}

/// Full structural check of a nested forest.
///
/// Fails on blank names, data below [`MAX_LEVEL`], a category nested under an
/// ancestor with the same id, children whose `parent_id` points elsewhere and
/// top-level categories that declare a parent.
#[instrument(level = "debug", skip(forest))]
pub fn validate_structure(forest: &[Category]) -> DomainResult<()> {
    StructureCheck {
        depth_bound: true,
        ancestors: Vec::new(),
        levels: 0,
    }
    .run(forest)
    .map(|_| ())
}

/// Same checks as [`validate_structure`] except the depth bound.
///
/// Returns the number of levels the forest spans, so callers can decide how
/// to treat data deeper than the model shows.
#[instrument(level = "debug", skip(forest))]
pub fn validate_links(forest: &[Category]) -> DomainResult<usize> {
    StructureCheck {
        depth_bound: false,
        ancestors: Vec::new(),
        levels: 0,
    }
    .run(forest)
}

struct StructureCheck {
    depth_bound: bool,
    ancestors: Vec<CategoryId>,
    levels: usize,
}

impl StructureCheck {
    fn run(mut self, forest: &[Category]) -> DomainResult<usize> {
        for root in forest {
            if let Some(parent) = root.parent_id {
                return Err(DomainError::DetachedTopLevel {
                    id: root.id,
                    parent,
                });
            }
        }
        self.check(forest, None, 0)?;
        Ok(self.levels)
    }

    fn check(
        &mut self,
        nodes: &[Category],
        parent: Option<&Category>,
        level: usize,
    ) -> DomainResult<()> {
        for node in nodes {
            if node.name.trim().is_empty() {
                return Err(DomainError::EmptyName(node.id));
            }
            if self.ancestors.contains(&node.id) {
                return Err(DomainError::CycleDetected(node.id));
            }
            if self.depth_bound && level > MAX_LEVEL {
                return Err(DomainError::DepthExceeded { id: node.id, level });
            }
            if let (Some(parent), Some(declared)) = (parent, node.parent_id) {
                if declared != parent.id {
                    return Err(DomainError::ParentMismatch {
                        child: node.id,
                        declared,
                        actual: parent.id,
                    });
                }
            }
            self.levels = self.levels.max(level + 1);
            self.ancestors.push(node.id);
            self.check(node.children(), Some(node), level + 1)?;
            self.ancestors.pop();
        }
        Ok(())
    }
}
