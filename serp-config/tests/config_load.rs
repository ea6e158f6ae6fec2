use serp_common::observability::LogFormat;
use serp_config::SerpConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: "0.1"
serpapi:
  api_key: "${SERPAPI_API_KEY}"
  timeout_secs: 20
defaults:
  hl: de
logging:
  format: json
  emit_stderr: true
  "#;
    let p = write_yaml(&tmp, "serp.yaml", file_yaml);

    let config = temp_env::with_var("SERPAPI_API_KEY", Some("from-env"), || {
        SerpConfigLoader::new()
            .with_file(p)
            .load()
            .expect("load system config")
    });

    assert_eq!(config.version.as_deref(), Some("0.1"));
    assert_eq!(config.serpapi.api_key.as_deref(), Some("from-env"));
    assert_eq!(config.serpapi.timeout_secs, Some(20));
    assert_eq!(config.defaults.hl, "de");
    assert_eq!(config.defaults.gl, "us");
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(config.logging.emit_stderr);
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "serp.yaml",
        "serpapi:\n  api_key: from-file\n  endpoint: https://serpapi.com/search\n",
    );

    let config = temp_env::with_vars(
        [
            ("SERP__SERPAPI__API_KEY", Some("from-env-override")),
            ("SERP__SERPAPI__TIMEOUT_SECS", Some("7")),
        ],
        || SerpConfigLoader::new().with_file(&p).load().expect("load"),
    );

    assert_eq!(config.serpapi.api_key.as_deref(), Some("from-env-override"));
    assert_eq!(config.serpapi.timeout_secs, Some(7));
}

#[test]
#[serial]
fn missing_optional_file_is_fine() {
    let tmp = TempDir::new().unwrap();
    let config = SerpConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("optional file may be absent");
    assert!(config.serpapi.api_key.is_none());
    assert_eq!(config.defaults.imgsz, "m");
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = SerpConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(result.is_err());
}
