use lexico_core::{AppConfig, AppPaths, ConfigError, ConfigStore};

fn store_in(dir: &tempfile::TempDir) -> (AppPaths, ConfigStore) {
    let paths = AppPaths::new(dir.path());
    let store = ConfigStore::new(&paths);
    (paths, store)
}

#[test]
fn load_api_key_without_config_file_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = store_in(&dir);

    let err = store.load_api_key().unwrap_err();
    assert!(matches!(err, ConfigError::Missing { .. }));
    assert!(err.needs_init());
    assert!(!store.has_api_key());
}

#[test]
fn save_then_load_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let (paths, store) = store_in(&dir);

    store.save_api_key("k1").unwrap();
    assert_eq!(store.load_api_key().unwrap(), "k1");
    assert!(store.has_api_key());
    assert_eq!(store.path(), paths.config_file());
}

#[test]
fn empty_config_file_means_key_not_set() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = store_in(&dir);

    assert!(store.ensure_exists().unwrap());
    assert!(!store.ensure_exists().unwrap());
    assert_eq!(store.load().unwrap(), AppConfig::default());
    assert!(matches!(
        store.load_api_key().unwrap_err(),
        ConfigError::KeyNotSet
    ));

    std::fs::write(store.path(), "").unwrap();
    assert!(matches!(
        store.load_api_key().unwrap_err(),
        ConfigError::KeyNotSet
    ));
}

#[test]
fn malformed_config_is_reported_as_needing_init() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = store_in(&dir);
    std::fs::write(store.path(), "{ not json").unwrap();

    let err = store.load_api_key().unwrap_err();
    assert!(matches!(err, ConfigError::Malformed { .. }));
    assert!(err.needs_init());
}

#[test]
fn saving_key_replaces_malformed_config() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = store_in(&dir);
    std::fs::write(store.path(), "{ not json").unwrap();

    store.save_api_key("k1").unwrap();
    assert_eq!(store.load_api_key().unwrap(), "k1");
}

#[test]
fn save_api_key_rejects_blank_and_keeps_other_fields() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = store_in(&dir);
    std::fs::write(
        store.path(),
        r#"{ "api_base_url": "http://localhost:9000/v4" }"#,
    )
    .unwrap();

    assert!(matches!(
        store.save_api_key("   ").unwrap_err(),
        ConfigError::EmptyKey
    ));

    store.save_api_key(" k2 ").unwrap();
    let config = store.load().unwrap();
    assert_eq!(config.api_key.as_deref(), Some("k2"));
    assert_eq!(
        config.api_base_url.as_deref(),
        Some("http://localhost:9000/v4")
    );
}

#[test]
fn paths_are_derived_from_base_dir() {
    let paths = AppPaths::new("/tmp/lexico-home");
    assert_eq!(
        paths.config_file(),
        std::path::Path::new("/tmp/lexico-home/config.json")
    );
    assert_eq!(
        paths.db_file(),
        std::path::Path::new("/tmp/lexico-home/vocabulary.db")
    );
    assert_eq!(paths.log_dir(), std::path::Path::new("/tmp/lexico-home/logs"));
}
