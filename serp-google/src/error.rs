use serp_http::HttpError;

/// The outbound call did not produce a usable response.
///
/// Covers network failures, non-success statuses and bodies that are not JSON.
#[derive(Debug, thiserror::Error)]
#[error(
    "An error occurred while invoking the tool: {cause}. Please refer to https://serpapi.com/locations-api for the list of valid locations."
)]
pub struct InvocationError {
    pub cause: String,
    #[source]
    pub source: Option<HttpError>,
}

impl InvocationError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
            source: None,
        }
    }
}

impl From<HttpError> for InvocationError {
    fn from(err: HttpError) -> Self {
        Self {
            cause: err.to_string(),
            source: Some(err),
        }
    }
}

/// Tool parameters could not be turned into a request.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("Missing required parameter 'query'.")]
    MissingQuery,
    #[error("Parameter 'query' must not be empty.")]
    EmptyQuery,
    #[error("Invalid tool parameters: {0}")]
    Invalid(String),
    #[error("Missing credential '{0}'. Configure a SerpApi key for this tool.")]
    MissingCredential(&'static str),
}

/// A provider credential check failed; carries the message the tool emitted.
#[derive(Debug, thiserror::Error)]
#[error("credential validation failed: {0}")]
pub struct ProviderCredentialError(pub String);
