//! 配置文件加载
use std::io::Write;

use filterstats::{load_config, FilterStatsError, RetryPolicy};

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "groups:\n  - name: AdGuard\n    urls:\n      - https://filters.adtidy.org/extension/ublock/filters/2.txt\nfetch:\n  retries: 1\n"
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.groups.len(), 1);
    assert_eq!(config.groups[0].name, "AdGuard");
    assert_eq!(config.fetch.retry, RetryPolicy::Times(1));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    match load_config(&path) {
        Err(FilterStatsError::ConfigError(msg)) => {
            assert_eq!(msg, format!("Configuration file not found: {}", path.display()));
        }
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_invalid_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "groups: []\n").unwrap();

    let err = load_config(file.path()).unwrap_err();
    assert_eq!(err.to_string(), "\"groups\" array must not be empty");
}
