//! Unit tests for the settings engine: load/save, dot-path updates and reset.

use std::fs;

use markshelf::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use markshelf::types::filter::{SortOption, SortOrder};
use markshelf::types::settings::{AppSettings, BackendKind};
use serde_json::json;
use tempfile::TempDir;

fn engine_in(dir: &TempDir) -> SettingsEngine {
    let path = dir.path().join("settings.json").to_string_lossy().to_string();
    SettingsEngine::new(Some(path))
}

#[test]
fn test_load_defaults_when_no_file() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    assert_eq!(engine.load().unwrap(), AppSettings::default());
}

#[test]
fn test_default_settings_values() {
    let defaults = AppSettings::default();
    assert_eq!(defaults.backend.kind, BackendKind::Sqlite);
    assert_eq!(defaults.backend.base_url, "http://localhost:8080/api");
    assert!(defaults.backend.database_path.is_none());
    assert!(!defaults.backend.seed_demo_data);
    assert_eq!(defaults.view.sort_option, SortOption::Created);
    assert_eq!(defaults.view.sort_order, SortOrder::Desc);
    assert_eq!(defaults.logging.filter, "info");
}

#[test]
fn test_set_value_persists_to_disk() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    engine.load().unwrap();
    engine.set_value("backend.kind", json!("memory")).unwrap();

    let mut reloaded = engine_in(&dir);
    assert_eq!(reloaded.load().unwrap().backend.kind, BackendKind::Memory);
}

#[test]
fn test_set_value_sort_enums() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    engine.set_value("view.sort_option", json!("frequent")).unwrap();
    engine.set_value("view.sort_order", json!("asc")).unwrap();
    assert_eq!(engine.get_settings().view.sort_option, SortOption::Frequent);
    assert_eq!(engine.get_settings().view.sort_order, SortOrder::Asc);
}

#[test]
fn test_set_value_invalid_key() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    assert!(engine.set_value("nonexistent.key", json!(true)).is_err());
    assert!(engine.set_value("backend.nope", json!(true)).is_err());
    assert!(engine.set_value("", json!(true)).is_err());
}

#[test]
fn test_set_value_through_leaf_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    assert!(engine.set_value("logging.filter.level", json!("debug")).is_err());
}

#[test]
fn test_set_value_invalid_value_type() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    assert!(engine.set_value("backend.seed_demo_data", json!("yes")).is_err());
    assert!(engine.set_value("backend.kind", json!("postgres")).is_err());
    assert_eq!(*engine.get_settings(), AppSettings::default());
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in(&dir);
    engine.set_value("logging.filter", json!("markshelf=debug")).unwrap();
    engine.reset().unwrap();
    assert_eq!(*engine.get_settings(), AppSettings::default());

    let mut reloaded = engine_in(&dir);
    assert_eq!(reloaded.load().unwrap(), AppSettings::default());
}

#[test]
fn test_load_malformed_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("settings.json"), "{ invalid json }").unwrap();
    let mut engine = engine_in(&dir);
    assert!(engine.load().is_err());
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("settings.json");
    let engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));
    engine.save().unwrap();
    assert!(path.exists());
}
