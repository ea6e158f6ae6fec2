//! Glue between configuration, the CLI and the tool.

use std::path::PathBuf;

use serde_json::Value;
use serp_common::observability::LogConfig;
use serp_common::{Credentials, SerpError, ToolParameters};
use serp_config::{SerpConfig, SerpConfigLoader, default_config_path};
use serp_google::params::SearchDefaults;
use serp_google::{CREDENTIAL_NAME, GoogleProvider, GoogleSearchTool};

/// Explicit `--config` must exist; the default location is optional.
pub fn load_config(explicit: Option<PathBuf>) -> serp_common::Result<SerpConfig> {
    let loader = match (explicit, default_config_path()) {
        (Some(path), _) => SerpConfigLoader::new().with_file(path),
        (None, Some(default)) => SerpConfigLoader::new().with_optional_file(default),
        (None, None) => SerpConfigLoader::new(),
    };
    loader.load().map_err(|e| SerpError::Config(e.to_string()))
}

pub fn log_config(cfg: &SerpConfig) -> LogConfig {
    LogConfig {
        app_name: "serp",
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.emit_stderr,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
    }
}

pub fn build_tool(cfg: &SerpConfig) -> serp_common::Result<GoogleSearchTool> {
    let mut tool = GoogleSearchTool::with_endpoint(&cfg.serpapi.endpoint)
        .map_err(|e| SerpError::Config(format!("serpapi.endpoint: {e}")))?
        .with_defaults(SearchDefaults {
            hl: cfg.defaults.hl.clone(),
            gl: cfg.defaults.gl.clone(),
            imgsz: cfg.defaults.imgsz.clone(),
        });
    if let Some(timeout) = cfg.serpapi.timeout() {
        tool = tool.with_timeout(timeout);
    }
    Ok(tool)
}

pub fn build_provider(cfg: &SerpConfig) -> serp_common::Result<GoogleProvider> {
    build_tool(cfg).map(GoogleProvider::new)
}

/// Host-side credential injection.
pub fn credentials(cfg: &SerpConfig) -> Credentials {
    match &cfg.serpapi.api_key {
        Some(key) => Credentials::new().with(CREDENTIAL_NAME, key.as_str()),
        None => Credentials::new(),
    }
}

/// Only flags the user actually passed end up in the map.
pub fn search_parameters(
    query: String,
    hl: Option<String>,
    gl: Option<String>,
    location: Option<String>,
    imgsz: Option<String>,
) -> ToolParameters {
    let mut params = ToolParameters::new();
    params.insert("query".into(), Value::String(query));
    for (key, value) in [("hl", hl), ("gl", gl), ("location", location), ("imgsz", imgsz)] {
        if let Some(v) = value {
            params.insert(key.into(), Value::String(v));
        }
    }
    params
}
