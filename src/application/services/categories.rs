//! Category service
//!
//! Loads category forests through a [`CategorySource`] and answers the
//! expansion and parent-selection questions the admin and ad-posting screens ask.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{
    self, compute_expand_all_state, find, load_forest, retain_active, validate_new_child,
    validate_reparent, Category, CategoryId, DomainError, ExpansionState, ForestBuilder,
};
use crate::infrastructure::traits::CategorySource;

/// How a listing is turned into a forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Keep inactive categories and their subtrees
    pub include_inactive: bool,
    /// Order siblings by `sort_order`, for flat and nested listings alike
    pub sort_siblings: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            include_inactive: true,
            sort_siblings: true,
        }
    }
}

impl From<&Settings> for LoadOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            include_inactive: settings.include_inactive,
            sort_siblings: settings.sort_siblings,
        }
    }
}

/// Service for loading category forests and validating edits against them.
pub struct CategoryService {
    source: Arc<dyn CategorySource>,
    options: LoadOptions,
}

impl CategoryService {
    /// Create a new category service.
    pub fn new(source: Arc<dyn CategorySource>, options: LoadOptions) -> Self {
        Self { source, options }
    }

    pub fn source_name(&self) -> String {
        self.source.name()
    }

    /// Fetch the listing and build the forest (full reload).
    #[instrument(level = "debug", skip(self), fields(source = %self.source.name()))]
    pub fn load(&self) -> ApplicationResult<Vec<Category>> {
        let body = self
            .source
            .fetch()
            .with_context("fetch categories", &self.source.name())?;
        let records = Self::parse(&body, &self.source.name())?;
        debug!("load: {} records", records.len());

        let builder = if self.options.sort_siblings {
            ForestBuilder::new()
        } else {
            ForestBuilder::new().keep_listing_order()
        };
        let forest = load_forest(&builder, records)?;

        if self.options.include_inactive {
            Ok(forest)
        } else {
            Ok(retain_active(&forest))
        }
    }

    /// Parse a JSON listing of category records.
    pub fn parse(body: &str, source_name: &str) -> ApplicationResult<Vec<Category>> {
        serde_json::from_str(body).map_err(|e| ApplicationError::InvalidListing {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
    }

    /// Toggle one node's expansion.
    ///
    /// Without a current state everything is expanded; that state is
    /// materialized first so the single node can be collapsed.
    #[instrument(level = "debug", skip(self, forest, current))]
    pub fn toggle(
        &self,
        forest: &[Category],
        current: Option<ExpansionState>,
        id: CategoryId,
    ) -> ApplicationResult<ExpansionState> {
        if find(forest, id).is_none() {
            return Err(DomainError::CategoryNotFound(id).into());
        }
        let mut state = match current {
            Some(state) => state,
            None => compute_expand_all_state(forest)?,
        };
        let expanded = state.toggle(id);
        debug!("toggle: {id} expanded={expanded}");
        Ok(state)
    }

    /// Check a parent selection.
    ///
    /// With `category` set this validates moving that category under `parent`
    /// (`None` = top level); without it, creating a new category under `parent`.
    #[instrument(level = "debug", skip(self, forest))]
    pub fn check_parent(
        &self,
        forest: &[Category],
        category: Option<CategoryId>,
        parent: Option<CategoryId>,
    ) -> ApplicationResult<()> {
        match (category, parent) {
            (Some(category), parent) => validate_reparent(forest, category, parent)?,
            (None, Some(parent)) => validate_new_child(forest, parent)?,
            // New top-level category
            (None, None) => {}
        }
        Ok(())
    }

    /// Structural validation of the loaded forest.
    pub fn validate(&self, forest: &[Category]) -> ApplicationResult<()> {
        domain::validate_structure(forest)?;
        Ok(())
    }
}
