//! Minimal HTTP client with safe logging and query-string auth.
//!
//! - Request options: query params and query-string `Auth`
//! - Redacts sensitive query params and never logs secret values
//! - Single attempt per call: no retries, no backoff
//! - Optional *raw* request/response logging via `SERP_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), serp_http::HttpError> {
//! let client = serp_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", serp_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Security: logs only ever include the auth param name, not the secret.
//! The raw curl line and network error text never carry the secret either.
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated) and final errors, plus raw
//! request/response lines (target `http.raw`) when `SERP_HTTP_RAW=1`.

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::borrow::Cow;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "SERP_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)
const SNIPPET_MAX: usize = 500;
const REDACTED: &str = "<redacted>";

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn is_secret_param(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "access_token"
            | "authorization"
            | "auth"
            | "key"
            | "api_key"
            | "apikey"
            | "token"
            | "secret"
            | "client_secret"
            | "bearer"
    )
}

/// Copy of `url` with every secret query param value replaced.
fn redact_url(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if is_secret_param(&k) {
                REDACTED.to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    let mut out = url.clone();
    if pairs.is_empty() {
        out.set_query(None);
    } else {
        out.query_pairs_mut().clear().extend_pairs(pairs);
    }
    out
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(method: &Method, url: &Url) -> String {
    format!("curl -X{method} '{}'", redact_url(url).as_str())
}

/// Display text of `err` and every error beneath it, joined with `": "`.
///
/// reqwest's own `Display` stops at "error sending request"; the cause
/// (refused, DNS, timeout) lives further down the chain.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut cur = err.source();
    while let Some(inner) = cur {
        let text = inner.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        cur = inner.source();
    }
    parts.join(": ")
}

/// Network failure text with the request URL (and its api_key) stripped.
fn network_message(err: reqwest::Error) -> String {
    error_chain(&err.without_url())
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if key.eq_ignore_ascii_case("authorization") || key.eq_ignore_ascii_case("set-cookie") {
                REDACTED.to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl HttpError {
    /// HTTP status for errors that got as far as a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ==============================
// Auth & Request Options
// ==============================

/// Query-string credential, appended after every other query param.
///
/// `Debug` never prints the value.
///
/// ```
/// use serp_http::Auth;
/// use std::borrow::Cow;
///
/// let auth = Auth { name: "api_key", value: Cow::Borrowed("secret") };
/// assert_eq!(auth.name, "api_key");
/// assert!(!format!("{auth:?}").contains("secret"));
/// ```
#[derive(Clone)]
pub struct Auth<'a> {
    pub name: &'a str,
    pub value: Cow<'a, str>,
}

impl fmt::Debug for Auth<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("name", &self.name)
            .field("value", &REDACTED)
            .finish()
    }
}

/// Per-request options for the HTTP client.
///
/// ```
/// use serp_http::{Auth, RequestOpts};
/// use std::borrow::Cow;
///
/// let opts = RequestOpts {
///     query: Some(vec![("q", Cow::Borrowed("weather"))]),
///     auth: Some(Auth { name: "api_key", value: Cow::Borrowed("demo") }),
/// };
///
/// assert_eq!(opts.query.as_ref().map(Vec::len), Some(1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>, // e.g. [("q", "term".into())]
    pub auth: Option<Auth<'a>>,
}

// ==============================
// Client
// ==============================

#[derive(Clone, Debug)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    /// `None` leaves reqwest's own default in place.
    pub default_timeout: Option<Duration>,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use serp_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new("https://serpapi.com/search")?;
    /// assert!(client.default_timeout.is_none());
    /// assert_eq!(client.base_url().path(), "/search");
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: None,
        })
    }

    /// Apply a timeout to every request that doesn't set its own.
    ///
    /// ```no_run
    /// use serp_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?
    ///     .with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Some(Duration::from_secs(2)));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = Some(dur);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// GET JSON with per-request query params and auth.
    ///
    /// An empty `path` targets the base URL itself.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json_internal(Method::GET, path, opts).await
    }

    fn resolve(&self, path: &str) -> Result<Url, HttpError> {
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn request_json_internal<T>(
        &self,
        method: Method,
        path: &str,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let mut url = self.resolve(path)?;

        // Query params (auth last so it never shadows caller params in logs).
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in opts.query.iter().flatten() {
                pairs.append_pair(k, v);
            }
            if let Some(Auth { name, value }) = &opts.auth {
                pairs.append_pair(name, value);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        let mut rb = self.inner.request(method.clone(), url.clone());
        if let Some(timeout) = self.default_timeout {
            rb = rb.timeout(timeout);
        }

        // ----- Safe request logging (pre-send) -----
        let auth_param = opts.auth.as_ref().map(|a| a.name).unwrap_or("none");
        let redacted_q: Vec<(String, String)> = redact_url(&url)
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let host_path = format!("{}{}", url.host_str().unwrap_or("-"), url.path());

        tracing::debug!(
            method=%method,
            host_path=%host_path,
            query=?redacted_q,
            timeout_ms=?self.default_timeout.map(|d| d.as_millis() as u64),
            auth_param,
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(&method, &url);
            tracing::debug!(target: "http.raw", %curl, "request");
        }

        // ----- Send -----
        let t0 = std::time::Instant::now();
        let resp = rb.send().await.map_err(|err| {
            // reqwest errors embed the full URL; strip it so the key never leaks.
            let message = network_message(err);
            tracing::warn!(host_path=%host_path, message=%message, "http.network_error.send");
            HttpError::Network(message)
        })?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|err| {
            let message = network_message(err);
            tracing::warn!(host_path=%host_path, message=%message, "http.network_error.body");
            HttpError::Network(message)
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            "http.response.headers"
        );

        if raw_enabled() {
            let hdrs = redact_headers(&headers);
            let mut body_snip = bytes.to_vec();
            let truncated = body_snip.len() > RAW_MAX_BODY;
            if truncated {
                body_snip.truncate(RAW_MAX_BODY);
            }
            let text = String::from_utf8_lossy(&body_snip);
            tracing::info!(
                target:"http.raw",
                status=%status,
                duration_ms=dur_ms,
                headers=?hdrs,
                body=%text,
                truncated
            );
        }

        let snippet = snip_body(&bytes);
        tracing::trace!(body_snippet=%snippet, "http.response.body_snippet");

        // ----- Success path -----
        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                tracing::warn!(
                    serde_line=%e.line(),
                    serde_col=%e.column(),
                    serde_err=%e.to_string(),
                    body_snippet=%snippet,
                    "http.response.decode_error"
                );
                HttpError::Decode(e.to_string(), snippet)
            });
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(
            %status,
            message=%message,
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Api { status, message })
    }
}

// ==============================
// Helpers
// ==============================

fn extract_error_message(body: &[u8]) -> String {
    // SerpApi error bodies: {"error": "..."}
    #[derive(Deserialize)]
    struct Envelope {
        error: String,
    }

    match serde_json::from_slice::<Envelope>(body) {
        Ok(env) if !env.error.is_empty() => env.error,
        _ => snip_body(body),
    }
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_secret_query_params() {
        let url = Url::parse("https://serpapi.com/search?api_key=abc&q=rust").unwrap();
        let red = redact_url(&url);
        let pairs: Vec<_> = red.query_pairs().collect();
        assert_eq!(pairs[0].1, REDACTED);
        assert_eq!(pairs[1].1, "rust");
    }

    #[test]
    fn curl_never_contains_secret() {
        let url = Url::parse("https://serpapi.com/search?q=x&api_key=topsecret").unwrap();
        let curl = make_curl(&Method::GET, &url);
        assert!(!curl.contains("topsecret"));
        assert!(curl.starts_with("curl -XGET"));
    }

    #[derive(Debug, Error)]
    #[error("error sending request")]
    struct Sending(#[source] std::io::Error);

    #[test]
    fn error_chain_joins_every_cause() {
        let refused =
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "Connection refused");
        assert_eq!(
            error_chain(&Sending(refused)),
            "error sending request: Connection refused"
        );
    }

    #[test]
    fn error_chain_of_leaf_is_its_display() {
        let err = HttpError::Decode("bad".into(), "body".into());
        assert_eq!(error_chain(&err), "decode error: bad, body_snippet: body");
    }

    #[test]
    fn error_message_from_serpapi_envelope() {
        let body = br#"{"error":"Invalid API key. Your API key should be here: https://serpapi.com/manage-api-key"}"#;
        assert!(extract_error_message(body).starts_with("Invalid API key"));
    }

    #[test]
    fn non_string_error_field_falls_back_to_snippet() {
        let body = br#"{"error":{"message":"quota exceeded"}}"#;
        assert_eq!(extract_error_message(body), r#"{"error":{"message":"quota exceeded"}}"#);
    }

    #[test]
    fn error_message_falls_back_to_snippet() {
        assert_eq!(extract_error_message(b"Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn snippet_truncates_on_char_boundary() {
        let body = "é".repeat(400);
        let s = snip_body(body.as_bytes());
        assert!(s.ends_with("..."));
        assert!(s.len() <= SNIPPET_MAX + 3);
    }
}
