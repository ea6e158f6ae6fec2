//! Google Search tool backed by [SerpApi](https://serpapi.com/search-api).
//!
//! - [`GoogleSearchTool`]: validates `hl`/`gl`, calls SerpApi once, projects the response
//! - [`locale`]: bundled country/language reference lists
//! - [`params`]: typed tool parameters with defaults
//! - [`result`]: the simplified result shape and its projection
//! - [`GoogleProvider`]: credential validation for the provider
//!
//! Every failure inside [`serp_common::Tool::invoke`] is reported as a text
//! message; nothing escapes to the host as an error.

pub mod error;
pub mod locale;
pub mod params;
pub mod provider;
pub mod result;
pub mod tool;

pub use error::{InvocationError, ParameterError, ProviderCredentialError};
pub use provider::GoogleProvider;
pub use result::{OrganicResult, SearchResult};
pub use tool::{GoogleSearchTool, SERP_API_URL};

/// Name under which the host injects the SerpApi key.
pub const CREDENTIAL_NAME: &str = "serpapi_api_key";
