//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::{CategoryService, LoadOptions};
use crate::config::Settings;
use crate::infrastructure::traits::{CategorySource, JsonFileSource};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Category listing origin
    pub source: Arc<dyn CategorySource>,

    /// Category loading and validation
    pub categories: CategoryService,
}

impl ServiceContainer {
    /// Create a new service container reading the listing from a JSON file.
    pub fn new(settings: Settings, listing: &Path) -> Self {
        Self::with_deps(settings, Arc::new(JsonFileSource::new(listing)))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, source: Arc<dyn CategorySource>) -> Self {
        let categories = CategoryService::new(Arc::clone(&source), LoadOptions::from(&settings));
        let settings = Arc::new(settings);

        Self {
            settings,
            source,
            categories,
        }
    }
}
