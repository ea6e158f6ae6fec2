//! Typed tool parameters and the outbound query they produce.

use std::borrow::Cow;
use std::fmt;

use serde::Deserialize;
use serp_common::ToolParameters;

use crate::error::ParameterError;

pub const ENGINE: &str = "google";
pub const GOOGLE_DOMAIN: &str = "google.com";

/// Fallbacks for the optional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDefaults {
    pub hl: String,
    pub gl: String,
    pub imgsz: String,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            hl: "en".to_string(),
            gl: "us".to_string(),
            imgsz: "m".to_string(),
        }
    }
}

/// Parameters exactly as the caller sent them; `None` means absent or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchArgs {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub hl: Option<String>,
    #[serde(default)]
    pub gl: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub imgsz: Option<String>,
}

impl SearchArgs {
    /// Unknown keys are ignored; wrongly typed known keys are rejected.
    pub fn from_parameters(params: &ToolParameters) -> Result<Self, ParameterError> {
        serde_json::from_value(serde_json::Value::Object(params.clone()))
            .map_err(|e| ParameterError::Invalid(e.to_string()))
    }

    pub fn hl_or<'a>(&'a self, defaults: &'a SearchDefaults) -> &'a str {
        self.hl.as_deref().unwrap_or(&defaults.hl)
    }

    pub fn gl_or<'a>(&'a self, defaults: &'a SearchDefaults) -> &'a str {
        self.gl.as_deref().unwrap_or(&defaults.gl)
    }
}

/// Everything needed for one SerpApi call. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct SearchRequestParameters {
    query: String,
    hl: String,
    gl: String,
    location: Option<String>,
    imgsz: String,
    api_key: String,
}

impl SearchRequestParameters {
    /// Resolve defaults and check required fields.
    ///
    /// ```
    /// use serp_google::params::{SearchArgs, SearchDefaults, SearchRequestParameters};
    ///
    /// let args = SearchArgs { query: Some("weather".into()), location: Some(String::new()), ..Default::default() };
    /// let params = SearchRequestParameters::build(&args, Some("key"), &SearchDefaults::default()).unwrap();
    /// assert_eq!(params.hl(), "en");
    /// assert_eq!(params.gl(), "us");
    /// assert_eq!(params.imgsz(), "m");
    /// assert_eq!(params.location(), None);
    /// ```
    pub fn build(
        args: &SearchArgs,
        api_key: Option<&str>,
        defaults: &SearchDefaults,
    ) -> Result<Self, ParameterError> {
        let query = args.query.as_deref().ok_or(ParameterError::MissingQuery)?;
        if query.trim().is_empty() {
            return Err(ParameterError::EmptyQuery);
        }
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(ParameterError::MissingCredential(crate::CREDENTIAL_NAME))?;

        Ok(Self {
            query: query.to_string(),
            hl: args.hl_or(defaults).to_string(),
            gl: args.gl_or(defaults).to_string(),
            location: args.location.clone().filter(|l| !l.is_empty()),
            imgsz: args.imgsz.as_deref().unwrap_or(&defaults.imgsz).to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Parse the host's parameter map and build in one step.
    pub fn from_tool_parameters(
        params: &ToolParameters,
        api_key: Option<&str>,
        defaults: &SearchDefaults,
    ) -> Result<Self, ParameterError> {
        Self::build(&SearchArgs::from_parameters(params)?, api_key, defaults)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn hl(&self) -> &str {
        &self.hl
    }

    pub fn gl(&self) -> &str {
        &self.gl
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn imgsz(&self) -> &str {
        &self.imgsz
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Query string pairs, minus the credential (sent as query auth).
    pub fn query_pairs(&self) -> Vec<(&'static str, Cow<'_, str>)> {
        let mut pairs = vec![
            ("q", Cow::Borrowed(self.query.as_str())),
            ("engine", Cow::Borrowed(ENGINE)),
            ("google_domain", Cow::Borrowed(GOOGLE_DOMAIN)),
            ("gl", Cow::Borrowed(self.gl.as_str())),
            ("hl", Cow::Borrowed(self.hl.as_str())),
            ("imgsz", Cow::Borrowed(self.imgsz.as_str())),
        ];
        if let Some(location) = &self.location {
            pairs.push(("location", Cow::Borrowed(location.as_str())));
        }
        pairs
    }
}

impl fmt::Debug for SearchRequestParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchRequestParameters")
            .field("query", &self.query)
            .field("hl", &self.hl)
            .field("gl", &self.gl)
            .field("location", &self.location)
            .field("imgsz", &self.imgsz)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
