//! Integration tests for Settings config loading.
//!
//! Note: these tests run against temp directories only; a global config in
//! the user's home would shift the baseline they merge onto.

use std::fs;

use tempfile::TempDir;

use catree::config::{expand_env_vars, local_config_path, Settings};

#[test]
fn given_no_local_config_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.indent, 2);
    assert!(settings.include_inactive);
}

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "include_inactive = false\nindent = 4\n",
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert!(!settings.include_inactive);
    assert_eq!(settings.indent, 4);
}

#[test]
fn given_relative_source_when_load_then_resolved_against_config_dir() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "source = \"data/categories.json\"\n",
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(
        settings.source,
        Some(dir.path().join("data").join("categories.json"))
    );
}

#[test]
fn given_malformed_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "indent = \"wide\"\n").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().starts_with("config error: parse"));
}

#[test]
fn given_env_override_when_load_then_env_wins() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "sort_siblings = true\n").unwrap();
    std::env::set_var("CATREE_SORT_SIBLINGS", "false");

    // Act
    let settings = Settings::load(Some(dir.path()));
    std::env::remove_var("CATREE_SORT_SIBLINGS");

    // Assert
    assert!(!settings.expect("load settings").sort_siblings);
}

#[test]
fn given_settings_when_serializing_then_toml_round_trips() {
    let settings = Settings {
        indent: 3,
        ..Settings::default()
    };

    let text = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&text).unwrap();

    assert_eq!(parsed, settings);
}

#[test]
fn given_template_when_parsing_then_all_defaults() {
    let parsed: Settings = toml::from_str(&Settings::template()).unwrap();
    assert_eq!(parsed, Settings::default());
}

#[test]
fn given_env_variable_when_expanding_then_replaced() {
    std::env::set_var("CATREE_TEST_DATA", "/srv/catalog");
    assert_eq!(
        expand_env_vars("$CATREE_TEST_DATA/categories.json"),
        "/srv/catalog/categories.json"
    );
    assert_eq!(expand_env_vars("$CATREE_UNSET_VAR/x"), "$CATREE_UNSET_VAR/x");
}
