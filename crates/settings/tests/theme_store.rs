use std::fs;

use tempfile::tempdir;
use zenith_settings::{ThemeName, ThemeStore};

#[test]
fn load_missing_file_returns_default() {
    let temp = tempdir().expect("tempdir");
    let store = ThemeStore::for_project(temp.path());
    assert_eq!(store.path(), temp.path().join("data/settings.json"));
    assert_eq!(store.load(), ThemeName::Purple);
    assert!(store.try_load().expect("missing file is not an error").is_none());
}

#[test]
fn save_and_reload_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let store = ThemeStore::for_project(temp.path());

    store.save(ThemeName::Dark).expect("save");
    assert_eq!(store.load(), ThemeName::Dark);
    assert!(!temp.path().join("data/settings.tmp").exists());

    store.save(ThemeName::Purple).expect("overwrite");
    assert_eq!(store.load(), ThemeName::Purple);
}

#[test]
fn saved_record_uses_lowercase_name() {
    let temp = tempdir().expect("tempdir");
    let store = ThemeStore::for_project(temp.path());
    store.save(ThemeName::Dark).expect("save");

    let contents = fs::read_to_string(store.path()).expect("read settings");
    let value: serde_json::Value = serde_json::from_str(&contents).expect("valid json");
    assert_eq!(value, serde_json::json!({ "theme": "dark" }));
}

#[test]
fn corrupt_file_falls_back_to_default() {
    let temp = tempdir().expect("tempdir");
    let store = ThemeStore::for_project(temp.path());
    fs::create_dir_all(temp.path().join("data")).expect("data dir");

    for contents in ["{ not json", r#"{ "theme": "neon" }"#, "[]"] {
        fs::write(store.path(), contents).expect("write corrupt settings");
        assert_eq!(store.load(), ThemeName::Purple);
        assert!(store.try_load().is_err());
    }
}

#[test]
fn unreadable_path_falls_back_to_default() {
    let temp = tempdir().expect("tempdir");
    let store = ThemeStore::for_project(temp.path());
    fs::create_dir_all(store.path()).expect("directory in place of the file");
    assert_eq!(store.load(), ThemeName::Purple);
}
