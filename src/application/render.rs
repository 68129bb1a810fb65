//! Text rendering of forests and flattened listings.

use itertools::Itertools;
use termtree::Tree;

use crate::domain::{Category, ExpansionState, FlatNode, ParentChoice};

/// Conversion into a printable `termtree`.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for Category {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children().iter().map(|c| c.to_tree_string()).collect();
        Tree::new(label(self)).with_leaves(leaves)
    }
}

/// `name (#id)`, with markers for inactive nodes and unfetched children.
pub fn label(category: &Category) -> String {
    let mut label = format!("{} (#{})", category.name, category.id);
    if !category.is_active {
        label.push_str(" [inactive]");
    }
    if category.children.is_not_fetched() {
        label.push_str(" …");
    }
    label
}

/// Render every tree of the forest, one after another.
pub fn render_forest(forest: &[Category]) -> String {
    forest
        .iter()
        .map(|category| category.to_tree_string().to_string())
        .collect()
}

/// One line per node, indented by level. Collapsed nodes with children get a `+`.
pub fn render_flat(
    nodes: &[FlatNode<'_>],
    expansion: Option<&ExpansionState>,
    indent: usize,
) -> Vec<String> {
    nodes
        .iter()
        .map(|node| {
            let marker = match expansion {
                Some(state) if node.category.has_children() && !state.contains(node.category.id) => {
                    "+ "
                }
                _ => "  ",
            };
            format!(
                "{}{}{}",
                " ".repeat(node.level * indent),
                marker,
                label(node.category)
            )
        })
        .collect()
}

/// Parent picker lines; entries that cannot take children are flagged.
pub fn render_choices(choices: &[ParentChoice<'_>], indent: usize) -> Vec<String> {
    choices
        .iter()
        .map(|choice| {
            let suffix = if choice.selectable { "" } else { "  (max depth)" };
            format!(
                "{}{}{}",
                " ".repeat(choice.node.level * indent),
                label(choice.node.category),
                suffix
            )
        })
        .collect()
}

/// Comma-separated ids, the format `--expanded` accepts.
pub fn format_ids(state: &ExpansionState) -> String {
    state.iter().join(",")
}
