//! Integration tests for configuration resolution
//!
//! Note: Uses the serial_test crate to prevent ENV variable race
//! conditions. Tests that manipulate PHISHTOUR_DATABASE are marked with
//! #[serial] to ensure they run sequentially, not in parallel.

use phishtour_common::config::{
    default_database_path, resolve_database_path, TomlConfig, DATABASE_ENV_VAR,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

#[test]
#[serial]
fn test_cli_argument_has_highest_priority() {
    env::set_var(DATABASE_ENV_VAR, "/env/phishtour.db");
    let toml = TomlConfig {
        database_path: Some("/toml/phishtour.db".to_string()),
        api_base_url: None,
    };

    let resolved = resolve_database_path(Some("/cli/phishtour.db"), &toml);
    assert_eq!(resolved, PathBuf::from("/cli/phishtour.db"));

    env::remove_var(DATABASE_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_beats_toml() {
    env::set_var(DATABASE_ENV_VAR, "/env/phishtour.db");
    let toml = TomlConfig {
        database_path: Some("/toml/phishtour.db".to_string()),
        api_base_url: None,
    };

    let resolved = resolve_database_path(None, &toml);
    assert_eq!(resolved, PathBuf::from("/env/phishtour.db"));

    env::remove_var(DATABASE_ENV_VAR);
}

#[test]
#[serial]
fn test_toml_beats_default() {
    env::remove_var(DATABASE_ENV_VAR);
    let toml = TomlConfig {
        database_path: Some("/toml/phishtour.db".to_string()),
        api_base_url: None,
    };

    let resolved = resolve_database_path(None, &toml);
    assert_eq!(resolved, PathBuf::from("/toml/phishtour.db"));
}

#[test]
#[serial]
fn test_default_used_with_no_overrides() {
    env::remove_var(DATABASE_ENV_VAR);

    let resolved = resolve_database_path(None, &TomlConfig::default());
    assert_eq!(resolved, default_database_path());
    assert!(!resolved.as_os_str().is_empty());
}

#[test]
#[serial]
fn test_empty_env_var_is_ignored() {
    env::set_var(DATABASE_ENV_VAR, "");

    let resolved = resolve_database_path(None, &TomlConfig::default());
    assert_eq!(resolved, default_database_path());

    env::remove_var(DATABASE_ENV_VAR);
}
