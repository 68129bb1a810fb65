//! Domain entities: core data structures

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a category as assigned by the backend.
pub type CategoryId = i64;

/// Deepest zero-based level a category may live at (root = 0).
pub const MAX_LEVEL: usize = 2;

/// Number of levels the hierarchy allows.
pub const MAX_LEVELS: usize = MAX_LEVEL + 1;

/// Ad category as delivered by the category fetch service.
///
/// JSON uses camelCase keys; snake_case spellings and WordPress' `parent`
/// are accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// `None` for top-level categories. WordPress sends `0` for "no parent".
    #[serde(
        default,
        alias = "parent_id",
        alias = "parent",
        deserialize_with = "deserialize_parent_id"
    )]
    pub parent_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Children::is_not_fetched")]
    pub children: Children,
    #[serde(default, alias = "sort_order")]
    pub sort_order: i32,
    #[serde(default = "default_true", alias = "is_active")]
    pub is_active: bool,
    #[serde(default, alias = "image_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn default_true() -> bool {
    true
}

fn deserialize_parent_id<'de, D>(deserializer: D) -> Result<Option<CategoryId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<CategoryId>::deserialize(deserializer)?.filter(|&id| id != 0))
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
            children: Children::NotFetched,
            sort_order: 0,
            is_active: true,
            image_url: None,
        }
    }

    pub fn with_parent(mut self, parent_id: CategoryId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Attach fetched children. Their `parent_id` is left untouched.
    pub fn with_children(mut self, children: impl Into<Vec<Category>>) -> Self {
        self.children = Children::Fetched(children.into());
        self
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Fetched children, empty when none were fetched.
    pub fn children(&self) -> &[Category] {
        self.children.as_slice()
    }

    /// True only when children were fetched and there is at least one.
    pub fn has_children(&self) -> bool {
        !self.children.as_slice().is_empty()
    }
}

/// Children of a category, distinguishing "not fetched" from "fetched, none".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Vec<Category>>", into = "Option<Vec<Category>>")]
pub enum Children {
    /// Descendants were not requested; says nothing about their existence.
    #[default]
    NotFetched,
    /// Descendants were requested; an empty list confirms there are none.
    Fetched(Vec<Category>),
}

impl Children {
    pub fn as_slice(&self) -> &[Category] {
        match self {
            Children::NotFetched => &[],
            Children::Fetched(children) => children,
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, Children::Fetched(_))
    }

    pub fn is_not_fetched(&self) -> bool {
        !self.is_fetched()
    }
}

impl From<Option<Vec<Category>>> for Children {
    fn from(value: Option<Vec<Category>>) -> Self {
        match value {
            Some(children) => Children::Fetched(children),
            None => Children::NotFetched,
        }
    }
}

impl From<Children> for Option<Vec<Category>> {
    fn from(value: Children) -> Self {
        match value {
            Children::Fetched(children) => Some(children),
            Children::NotFetched => None,
        }
    }
}

/// A category positioned in a flattened listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlatNode<'a> {
    pub category: &'a Category,
    /// Zero-based depth in the listing.
    pub level: usize,
}

/// Entry of the parent picker: a flattened node plus whether it may take children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParentChoice<'a> {
    #[serde(flatten)]
    pub node: FlatNode<'a>,
    pub selectable: bool,
}

/// Set of expanded category ids.
///
/// "Expand everything" is expressed by passing no state at all; an empty
/// state means every node is collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionState {
    expanded: BTreeSet<CategoryId>,
}

impl ExpansionState {
    /// Everything collapsed.
    pub fn collapsed() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.expanded.contains(&id)
    }

    /// Flip one id. Returns true if the id is expanded afterwards.
    pub fn toggle(&mut self, id: CategoryId) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.expanded.iter().copied()
    }
}

impl FromIterator<CategoryId> for ExpansionState {
    fn from_iter<T: IntoIterator<Item = CategoryId>>(iter: T) -> Self {
        Self {
            expanded: iter.into_iter().collect(),
        }
    }
}

impl Extend<CategoryId> for ExpansionState {
    fn extend<T: IntoIterator<Item = CategoryId>>(&mut self, iter: T) {
        self.expanded.extend(iter);
    }
}
