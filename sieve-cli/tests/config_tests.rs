//! Configuration module tests

use sieve_cli::config::Config;
use sieve_core::QueryParams;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(config.input.is_none());
    assert_eq!(config.query, QueryParams::default());
}

#[test]
fn test_config_missing_file_is_default() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from_path(&temp_dir.path().join("absent.toml")).unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        input: Some(PathBuf::from("batch.json")),
        query: QueryParams {
            quantity_below: 12,
            status: b'N',
            comment_pattern: "PROMO%WINTER".parse().unwrap(),
            ..QueryParams::default()
        },
    };
    config.save_to_path(&config_path).unwrap();

    let loaded = Config::load_from_path(&config_path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_partial_query_table() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[query]\nquantity_below = 30\n").unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.query.quantity_below, 30);
    assert_eq!(config.query.status, b'A');
    assert_eq!(config.query.comment_pattern.to_string(), "PROMO%SUMMER");
}

#[test]
fn test_config_saved_file_is_readable_toml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    Config::default().save_to_path(&config_path).unwrap();

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[query]"));
    assert!(content.contains("status = \"A\""));
    assert!(content.contains("comment_pattern = \"PROMO%SUMMER\""));
}

#[test]
fn test_config_rejects_bad_status() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[query]\nstatus = \"AR\"\n").unwrap();

    assert!(Config::load_from_path(&config_path).is_err());
}

#[test]
fn test_config_rejects_inverted_discount_range() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[query]\ndiscount_min = 0.09\ndiscount_max = 0.01\n",
    )
    .unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(format!("{:#}", err).contains("discount_min"));
}

#[test]
fn test_config_resolve_path() {
    assert_eq!(
        Config::resolve_path(Some("/tmp/sieve.toml")),
        PathBuf::from("/tmp/sieve.toml")
    );
    assert!(Config::resolve_path(None).ends_with("sieve/config.toml"));
}
