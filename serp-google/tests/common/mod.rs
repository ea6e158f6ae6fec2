#![allow(dead_code)]

use std::sync::OnceLock;

use serde_json::Value;
use serp_common::observability::{LogConfig, LogFormat};
use serp_common::{Credentials, ToolParameters};
use serp_google::{CREDENTIAL_NAME, GoogleSearchTool};
use wiremock::MockServer;

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "serp-tests",
            log_dir: Some(std::env::temp_dir().join("serp-tests")),
            emit_stderr: true,
            format: if std::env::var("SERP_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".to_string(),
        };

        serp_common::observability::init_logging(config).unwrap_or_default()
    });
}

pub fn tool_for(server: &MockServer) -> GoogleSearchTool {
    GoogleSearchTool::with_endpoint(&format!("{}/search", server.uri())).expect("valid endpoint")
}

pub fn creds(key: &str) -> Credentials {
    Credentials::new().with(CREDENTIAL_NAME, key)
}

pub fn params(v: Value) -> ToolParameters {
    v.as_object().cloned().expect("object literal")
}

/// Query pairs of every request the mock server saw.
pub async fn recorded_queries(server: &MockServer) -> Vec<Vec<(String, String)>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|req| {
            req.url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .collect()
}

/// A local port with nothing listening on it.
pub fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}
