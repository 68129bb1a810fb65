//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/catree/catree.toml`
//! 3. Local config: `<dir>/.catree.toml` (directory of the category listing, or cwd)
//! 4. Environment variables: `CATREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Unified configuration for catree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Default category listing (JSON) used when no file is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Keep inactive categories in the loaded forest
    pub include_inactive: bool,
    /// Order siblings by `sortOrder` (flat and nested listings)
    pub sort_siblings: bool,
    /// Spaces per level in list output
    pub indent: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: None,
            include_inactive: true,
            sort_siblings: true,
            indent: 2,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub source: Option<PathBuf>,
    pub include_inactive: Option<bool>,
    pub sort_siblings: Option<bool>,
    pub indent: Option<usize>,
}

/// Get the XDG config directory for catree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "catree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("catree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".catree.toml")
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string, leaving it untouched on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    ///
    /// A relative `source` in the overlay is resolved against `overlay_dir`.
    fn merge_with(&self, overlay: &RawSettings, overlay_dir: Option<&Path>) -> Self {
        let source = overlay.source.as_ref().map(|source| match overlay_dir {
            Some(dir) if source.is_relative() && !source.starts_with("~") => dir.join(source),
            _ => source.clone(),
        });
        Self {
            source: source.or_else(|| self.source.clone()),
            include_inactive: overlay.include_inactive.unwrap_or(self.include_inactive),
            sort_siblings: overlay.sort_siblings.unwrap_or(self.sort_siblings),
            indent: overlay.indent.unwrap_or(self.indent),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(source) = &self.source {
            self.source = Some(PathBuf::from(expand_env_vars(
                source.to_string_lossy().as_ref(),
            )));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.catree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw, None);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw, Some(dir));
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply CATREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(Environment::with_prefix("CATREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("source") {
            settings.source = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("include_inactive") {
            settings.include_inactive = val;
        }
        if let Ok(val) = config.get_bool("sort_siblings") {
            settings.sort_siblings = val;
        }
        if let Ok(val) = config.get_int("indent") {
            settings.indent = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("CATREE_INDENT must not be negative, got {val}"),
            })?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# catree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/catree/catree.toml
#   Local:  <dir>/.catree.toml   (next to the category listing, or in cwd)
#   Env:    CATREE_* environment variables (explicit overrides)

# Category listing used when no file is passed (JSON array of categories)
# source = "~/marketplace/categories.json"

# Keep inactive categories (they are still part of the tree)
# include_inactive = true

# Order siblings by sortOrder (flat and nested listings)
# sort_siblings = true

# Spaces per level in `catree list`
# indent = 2
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
