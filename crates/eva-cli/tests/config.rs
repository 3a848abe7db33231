//! Tests for loading importer settings.

use std::fs;
use std::path::Path;

use eva_cli::config::ImportConfig;

#[test]
fn file_overrides_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("eva-import.toml");
    fs::write(
        &path,
        "data_dir = \"/var/lib/eva\"\ndeny_list = [\"Unknown\", \"TBC\"]\n",
    )
    .expect("write config");

    let config = ImportConfig::from_file(&path).expect("load config");
    assert_eq!(config.data_dir, Path::new("/var/lib/eva"));
    assert_eq!(config.store_path, Path::new("temp-data/evaluations.json"));

    let filter = config.value_filter();
    assert!(!filter.is_allowed("unknown at this stage"));
    assert!(filter.is_allowed("Not applicable"));
}

#[test]
fn missing_named_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.toml");
    let error = ImportConfig::from_file(&missing).expect_err("missing");
    assert!(format!("{error:#}").contains("absent.toml"));
}

#[test]
fn default_filter_drops_placeholders() {
    let filter = ImportConfig::default().value_filter();
    assert!(!filter.is_allowed("Information not provided"));
    assert!(filter.is_allowed("England"));
}
