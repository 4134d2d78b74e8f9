//! Configuration resolution against the platform config location
//!
//! Tests that manipulate XDG_CONFIG_HOME are marked #[serial] so they do
//! not race each other.

use serial_test::serial;
use std::env;
use std::fs;
use std::time::Duration;
use subtrack_common::config::{default_config_path, ConfigOverrides, ServiceConfig};

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_default_config_file_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    env::set_var("XDG_CONFIG_HOME", dir.path());

    let path = default_config_path().unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        "bind_addr = \"0.0.0.0:9100\"\nrequest_timeout_secs = 7\n",
    )
    .unwrap();

    let cfg = ServiceConfig::resolve(ConfigOverrides::default()).unwrap();
    assert_eq!(cfg.bind_addr, "0.0.0.0:9100");
    assert_eq!(cfg.request_timeout, Duration::from_secs(7));

    env::remove_var("XDG_CONFIG_HOME");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_missing_default_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    env::set_var("XDG_CONFIG_HOME", dir.path());

    let cfg = ServiceConfig::resolve(ConfigOverrides::default()).unwrap();
    assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
    assert_eq!(cfg.max_connections, 25);
    assert_eq!(cfg.log_level, "info");

    env::remove_var("XDG_CONFIG_HOME");
}

#[test]
#[serial]
fn test_cli_override_wins_over_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("subtrack.toml");
    fs::write(&file, "database = \"from-file.db\"\n[logging]\nlevel = \"warn\"\n").unwrap();

    let cfg = ServiceConfig::resolve(ConfigOverrides {
        database: Some("from-cli.db".to_string()),
        config_file: Some(file),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(cfg.database, "from-cli.db");
    assert_eq!(cfg.log_level, "warn");
}
