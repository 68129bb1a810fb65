//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (CategorySource) but are
//! themselves concrete structs, not traits.

mod categories;

pub use categories::{CategoryService, LoadOptions};
