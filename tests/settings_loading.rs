use std::path::PathBuf;

use refindex::ConfError;
use refindex::settings::Settings;

#[test]
fn defaults_enable_shortcuts() {
    let settings = Settings::default();
    assert_eq!(settings.log_filter, "info");
    assert!(settings.shortcuts.enabled);
    assert!(settings.store.build_index);
    assert_eq!(settings.store.tree, None);
}

#[test]
fn toml_overrides_only_what_it_names() {
    let settings = Settings::from_toml(
        r#"
        log_filter = "refindex=debug"

        [shortcuts]
        enabled = false

        [store]
        tree = "conf/devices.json"
        "#,
    )
    .expect("valid settings");
    assert_eq!(settings.log_filter, "refindex=debug");
    assert!(!settings.shortcuts.enabled);
    assert_eq!(settings.store.tree, Some(PathBuf::from("conf/devices.json")));
    assert!(settings.store.build_index, "unspecified keys keep their defaults");
}

#[test]
fn empty_source_gives_defaults() {
    assert_eq!(Settings::from_toml("").expect("empty is fine"), Settings::default());
}

#[test]
fn missing_file_is_not_an_error() {
    let settings = Settings::load_from("no-such-refindex-settings").expect("optional file");
    assert!(settings.shortcuts.enabled);
}

#[test]
fn settings_file_is_read() {
    let path = std::env::temp_dir().join("refindex_settings_test.toml");
    std::fs::write(&path, "[store]\nbuild_index = false\n").expect("write settings");
    let settings = Settings::load_from(path.to_str().expect("utf-8 path")).expect("valid settings");
    assert!(!settings.store.build_index);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn malformed_settings_are_reported() {
    assert!(matches!(Settings::from_toml("[shortcuts]\nenabled = \"sometimes\""), Err(ConfError::Settings(_))));
}
