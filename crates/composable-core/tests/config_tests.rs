//! Integration tests for configuration and mapping files on disk

use composable_core::config::consts::CONFIG_FILE;
use composable_core::{Config, CoreError, MappingTable};
use composable_testkit::{temp_dir_in_workspace, write_fixture};

#[test]
fn test_load_or_default_without_file() {
    let temp = temp_dir_in_workspace();
    let config = Config::load_or_default(temp.path().join(CONFIG_FILE)).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_file_overrides_defaults() {
    let temp = temp_dir_in_workspace();
    let path = write_fixture(
        temp.path(),
        CONFIG_FILE,
        r#"
[bridge]
allowed_origins = ["https://editor.example.com"]

[render_wait]
timeout_ms = 500

[export]
directory = "exports"
"#,
    );

    let config = Config::load_or_default(&path).unwrap();

    assert_eq!(config.bridge.allowed_origins, ["https://editor.example.com"]);
    assert_eq!(config.render_wait.timeout_ms, 500);
    assert_eq!(config.render_wait.interval_ms, 100);
    assert_eq!(config.converter.max_depth, 128);
    assert_eq!(config.export.directory, std::path::PathBuf::from("exports"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let temp = temp_dir_in_workspace();
    let path = write_fixture(
        temp.path(),
        CONFIG_FILE,
        "[render_wait]\ntimeout_ms = 50\ninterval_ms = 100\n",
    );

    let err = Config::from_file(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalidValue { ref field, .. } if field == "render_wait.interval_ms"));
    assert!(err.to_string().starts_with("CONFIG_INVALID_VALUE"));
}

#[test]
fn test_mapping_file() {
    let temp = temp_dir_in_workspace();
    let path = write_fixture(
        temp.path(),
        "mappings.json",
        r#"[{"nodeIds": [{"nodeId": "7:1"}], "codeComponentName": "PriceTag"}]"#,
    );

    let table = MappingTable::from_file(&path).unwrap();
    assert_eq!(table.entries().len(), 1);
    assert!(table.lookup("7:1").is_some());

    let broken = write_fixture(temp.path(), "broken.json", r#"{"nodeIds": []}"#);
    assert!(matches!(
        MappingTable::from_file(&broken),
        Err(CoreError::MappingInvalid(_))
    ));
}
