// SPDX-License-Identifier: PMPL-1.0-or-later

//! Tests for the multi-file localization manager driven by configuration

use ltf_engine::config::{Config, LoadMode};
use ltf_engine::i18n::Language;
use ltf_engine::localization::Localization;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

#[test]
fn test_config_driven_loading() {
    let dir = TempDir::new().unwrap();
    write(
        &dir.path().join("menu.ltf"),
        "[start]\n[en] Start\n[ru] Старт\n",
    );
    write(
        &dir.path().join("locales/items.ltf"),
        "[sword]\n[en] Sword\n[ru] Меч\n[shield]\n[en] Shield\n",
    );
    write(&dir.path().join("locales/broken.ltf"), "[potion]\n[zz.x] ???\n");
    let config_path = dir.path().join("ltf.yaml");
    write(
        &config_path,
        "language: ru\nfiles:\n  - menu.ltf\ndirectories:\n  - locales\n",
    );

    let mut config = Config::load(&config_path).unwrap();
    config.resolve_paths(dir.path());

    let mut loc = Localization::from_config(&config);
    let summary = loc.load_config(&config);

    assert_eq!(summary.loaded.len(), 2);
    assert_eq!(summary.failed.len(), 1);
    assert!(summary.failed[0].1.is_format());
    assert_eq!(loc.loaded_count(), 2);

    assert_eq!(loc.get("start").unwrap(), "Старт");
    assert_eq!(loc.get("sword").unwrap(), "Меч");
    // Falls back to English.
    assert_eq!(loc.get("shield").unwrap(), "Shield");
    assert!(loc.get("potion").unwrap_err().is_lookup());
}

#[test]
fn test_index_mode_with_single_language() {
    let dir = TempDir::new().unwrap();
    let menu = dir.path().join("menu.ltf");
    write(&menu, "[start]\n[en] Start\n[de] Los\\\ngeht's\n");

    let config = Config {
        language: Language::German,
        fallback_language: None,
        mode: LoadMode::Index,
        all_languages: false,
        files: vec![menu],
        directories: Vec::new(),
    };
    let mut loc = Localization::from_config(&config);
    assert!(loc.load_config(&config).is_clean());

    assert_eq!(loc.get("start").unwrap(), "Los\ngeht's");
    let file = loc.file("menu.ltf").unwrap();
    assert_eq!(file.languages_present("start").unwrap().len(), 1);

    loc.set_language(Language::English);
    assert_eq!(loc.get("start").unwrap(), "Start");

    loc.unload_all();
    assert_eq!(loc.loaded_count(), 0);
    assert!(loc.get("start").unwrap_err().is_lookup());
}

#[test]
fn test_single_language_loading_keeps_the_fallback() {
    let dir = TempDir::new().unwrap();
    let menu = dir.path().join("menu.ltf");
    write(
        &menu,
        "[start]\n[en] Start\n[ru] Старт\n[de] Los\n[quit]\n[en] Quit\n[de] Ende\n",
    );

    let config = Config {
        language: Language::Russian,
        fallback_language: Some(Language::English),
        mode: LoadMode::Table,
        all_languages: false,
        files: vec![menu],
        directories: Vec::new(),
    };
    let mut loc = Localization::from_config(&config);
    assert!(loc.load_config(&config).is_clean());

    assert_eq!(loc.get("start").unwrap(), "Старт");
    assert_eq!(loc.get("quit").unwrap(), "Quit");
    // German is neither current nor fallback.
    let file = loc.file("menu.ltf").unwrap();
    assert_eq!(file.languages_present("start").unwrap().len(), 2);
    assert_eq!(file.languages_present("quit").unwrap().len(), 1);
}
