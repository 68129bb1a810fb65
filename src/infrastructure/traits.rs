//! I/O boundary traits for testability
//!
//! The category fetch service is an external collaborator; these traits
//! abstract how its listing reaches us, allowing services to be tested
//! with in-memory implementations.

use std::io;
use std::path::PathBuf;

use crate::domain::Category;

/// Origin of a category listing (JSON array of category records).
pub trait CategorySource: Send + Sync {
    /// Human-readable origin for messages, e.g. a file path.
    fn name(&self) -> String;

    /// Fetch the raw JSON listing.
    fn fetch(&self) -> io::Result<String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Listing stored in a JSON file, e.g. a saved REST response.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CategorySource for JsonFileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}

/// In-memory listing.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    body: String,
}

impl StaticSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Serialize records into a listing.
    pub fn from_records(records: &[Category]) -> io::Result<Self> {
        Ok(Self::new(serde_json::to_string(records)?))
    }
}

impl CategorySource for StaticSource {
    fn name(&self) -> String {
        "<memory>".to_string()
    }

    fn fetch(&self) -> io::Result<String> {
        Ok(self.body.clone())
    }
}
