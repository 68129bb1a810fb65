//! Arena-based forest used while assembling categories from flat records.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{Category, Children};

/// Node in the arena-based forest.
#[derive(Debug)]
pub struct CategoryNode {
    /// Category record; its own `children` field is ignored here
    pub data: Category,
    /// Index of parent node in the arena, None for top-level nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena
    pub children: Vec<Index>,
}

/// Arena-based forest of categories.
///
/// Nodes are inserted unlinked and attached afterwards, since a flat listing
/// may name a parent before or after its children.
#[derive(Debug, Default)]
pub struct CategoryArena {
    arena: Arena<CategoryNode>,
    roots: Vec<Index>,
}

impl CategoryArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    #[instrument(level = "trace", skip(self, data), fields(id = data.id))]
    pub fn insert_node(&mut self, data: Category) -> Index {
        self.arena.insert(CategoryNode {
            data,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Attach `node_idx` under `parent`, or as a top-level node when `parent` is None.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, node_idx: Index, parent: Option<Index>) {
        if let Some(node) = self.arena.get_mut(node_idx) {
            node.parent = parent;
        }
        match parent.and_then(|parent_idx| self.arena.get_mut(parent_idx)) {
            Some(parent_node) => parent_node.children.push(node_idx),
            None => self.roots.push(node_idx),
        }
    }

    pub fn get_node(&self, idx: Index) -> Option<&CategoryNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    /// Order top-level nodes and every sibling list by `sort_order`; ties keep insertion order.
    #[instrument(level = "debug", skip(self))]
    pub fn sort_siblings(&mut self) {
        let keys: HashMap<Index, i32> = self
            .arena
            .iter()
            .map(|(idx, node)| (idx, node.data.sort_order))
            .collect();
        let sort_key = |idx: &Index| keys.get(idx).copied().unwrap_or_default();

        self.roots.sort_by_key(sort_key);
        for (_, node) in self.arena.iter_mut() {
            node.children.sort_by_key(sort_key);
        }
    }

    /// Pre-order iterator over every node reachable from a top-level node.
    pub fn iter(&self) -> ForestIterator<'_> {
        ForestIterator::new(self)
    }

    /// Number of levels of the deepest tree (0 for an empty forest).
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Build the nested forest. Every reachable node gets `Children::Fetched`.
    #[instrument(level = "debug", skip(self))]
    pub fn to_forest(&self) -> Vec<Category> {
        self.roots
            .iter()
            .filter_map(|&root| self.materialize(root))
            .collect()
    }

    fn materialize(&self, node_idx: Index) -> Option<Category> {
        let node = self.get_node(node_idx)?;
        let children = node
            .children
            .iter()
            .filter_map(|&child| self.materialize(child))
            .collect();
        let mut category = node.data.clone();
        category.children = Children::Fetched(children);
        Some(category)
    }
}

pub struct ForestIterator<'a> {
    arena: &'a CategoryArena,
    stack: Vec<Index>,
}

impl<'a> ForestIterator<'a> {
    fn new(arena: &'a CategoryArena) -> Self {
        // Reverse so the first root is popped first
        let stack = arena.roots.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for ForestIterator<'a> {
    type Item = (Index, &'a CategoryNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_linked_nodes_when_iterating_then_preorder() {
        let mut arena = CategoryArena::new();
        let root = arena.insert_node(Category::new(1, "root"));
        let child = arena.insert_node(Category::new(2, "child"));
        let other = arena.insert_node(Category::new(3, "other"));
        arena.attach(root, None);
        arena.attach(child, Some(root));
        arena.attach(other, None);

        let ids: Vec<_> = arena.iter().map(|(_, node)| node.data.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(arena.depth(), 2);
    }

    #[test]
    fn given_sort_orders_when_sorting_then_siblings_reordered() {
        let mut arena = CategoryArena::new();
        let first = arena.insert_node(Category::new(1, "first").with_sort_order(5));
        let second = arena.insert_node(Category::new(2, "second").with_sort_order(1));
        arena.attach(first, None);
        arena.attach(second, None);

        arena.sort_siblings();

        let forest = arena.to_forest();
        assert_eq!(forest[0].id, 2);
        assert_eq!(forest[1].id, 1);
        assert_eq!(forest[0].children, Children::Fetched(vec![]));
    }
}
