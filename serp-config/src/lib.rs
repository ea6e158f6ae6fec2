//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Sources merge in the order they are added, with `SERP__`-prefixed
//! environment variables applied last (`SERP__SERPAPI__API_KEY` overrides
//! `serpapi.api_key`). After merging, `${VAR}` placeholders in any string are
//! expanded from the process environment.
//!
//! ```yaml
//! version: "1"
//! serpapi:
//!   api_key: "${SERPAPI_API_KEY}"
//!   endpoint: "https://serpapi.com/search"
//!   timeout_secs: 30
//! defaults:
//!   hl: en
//!   gl: us
//!   imgsz: m
//! logging:
//!   filter: info
//!   format: json
//!   emit_stderr: false
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use serp_common::observability::LogFormat;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "SERP";

pub const DEFAULT_ENDPOINT: &str = "https://serpapi.com/search";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SerpConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub serpapi: SerpApiConfig,
    #[serde(default)]
    pub defaults: ParameterDefaults,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the SerpApi endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SerpApiConfig {
    /// The `serpapi_api_key` credential handed to the tool.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Unset keeps the HTTP client's own default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            timeout_secs: None,
        }
    }
}

impl SerpApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Fallbacks for optional tool parameters when the caller leaves them out.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterDefaults {
    #[serde(default = "default_hl")]
    pub hl: String,
    #[serde(default = "default_gl")]
    pub gl: String,
    #[serde(default = "default_imgsz")]
    pub imgsz: String,
}

impl Default for ParameterDefaults {
    fn default() -> Self {
        Self {
            hl: default_hl(),
            gl: default_gl(),
            imgsz: default_imgsz(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub emit_stderr: bool,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
            emit_stderr: false,
            dir: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}
fn default_hl() -> String {
    "en".into()
}
fn default_gl() -> String {
    "us".into()
}
fn default_imgsz() -> String {
    "m".into()
}
fn default_filter() -> String {
    "info".into()
}

/// `<config_dir>/serp/serp.yaml`, e.g. `~/.config/serp/serp.yaml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("serp").join("serp.yaml"))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct SerpConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for SerpConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SerpConfigLoader {
    /// Start with no files; only built-in defaults and `SERP__` env overrides.
    ///
    /// ```
    /// use serp_config::SerpConfigLoader;
    ///
    /// let config = SerpConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.serpapi.endpoint, "https://serpapi.com/search");
    /// assert_eq!(config.defaults.hl, "en");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be missing, for setups driven purely by environment.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use serp_config::SerpConfigLoader;
    ///
    /// let cfg = SerpConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// serpapi:
    ///   api_key: "example"
    ///   timeout_secs: 10
    /// defaults:
    ///   gl: de
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.serpapi.api_key.as_deref(), Some("example"));
    /// assert_eq!(cfg.serpapi.timeout().unwrap().as_secs(), 10);
    /// assert_eq!(cfg.defaults.gl, "de");
    /// assert_eq!(cfg.defaults.imgsz, "m");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use serp_config::SerpConfigLoader;
    ///
    /// unsafe { std::env::set_var("SERP_DOC_KEY", "injected-from-env"); }
    ///
    /// let config = SerpConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// serpapi:
    ///   api_key: "${SERP_DOC_KEY}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.serpapi.api_key.as_deref(), Some("injected-from-env"));
    ///
    /// unsafe { std::env::remove_var("SERP_DOC_KEY"); }
    /// ```
    pub fn load(self) -> Result<SerpConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: SerpConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        tracing::debug!(
            endpoint = %typed.serpapi.endpoint,
            has_api_key = typed.serpapi.api_key.is_some(),
            "config.loaded"
        );
        Ok(typed)
    }
}
