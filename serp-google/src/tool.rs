use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use serp_common::{Credentials, Tool, ToolMessage, ToolParameters};
use serp_http::{Auth, HttpClient, HttpError, RequestOpts};

use crate::CREDENTIAL_NAME;
use crate::error::{InvocationError, ParameterError};
use crate::locale::{LocaleAdvisory, validate_locale};
use crate::params::{SearchArgs, SearchDefaults, SearchRequestParameters};
use crate::result::{SearchResult, project};

/// SerpApi's Google Search endpoint.
pub const SERP_API_URL: &str = "https://serpapi.com/search";

const TOOL_NAME: &str = "google_search";
const TOOL_DESCRIPTION: &str = "Search Google through SerpApi and return the knowledge graph summary and organic results.";

/// Google Search over SerpApi.
///
/// One invocation validates the locale, makes at most one GET and yields the
/// advisories followed by exactly one result or error message.
///
/// ```no_run
/// use serde_json::json;
/// use serp_common::{Credentials, Tool};
/// use serp_google::GoogleSearchTool;
///
/// # async fn demo() -> Result<(), serp_http::HttpError> {
/// let tool = GoogleSearchTool::new()?;
/// let creds = Credentials::new().with("serpapi_api_key", "YOUR_KEY");
/// let params = json!({"query": "weather", "gl": "us"});
/// for msg in tool.invoke(&creds, params.as_object().unwrap()).await {
///     println!("{}", serde_json::to_string(&msg).unwrap());
/// }
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct GoogleSearchTool {
    http: HttpClient,
    defaults: SearchDefaults,
}

impl GoogleSearchTool {
    /// Tool pointed at the public SerpApi endpoint.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_endpoint(SERP_API_URL)
    }

    /// Tool pointed at another endpoint (proxies, test servers).
    pub fn with_endpoint(endpoint: &str) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(endpoint)?,
            defaults: SearchDefaults::default(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    pub fn with_defaults(mut self, defaults: SearchDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &SearchDefaults {
        &self.defaults
    }

    /// Advisories for unknown `hl`/`gl` codes. Never blocks the search.
    pub fn validate(&self, hl: &str, gl: &str) -> Vec<LocaleAdvisory> {
        validate_locale(hl, gl)
    }

    /// Typed parameters from the host's map plus the injected credential.
    pub fn build_request_parameters(
        &self,
        params: &ToolParameters,
        credential: Option<&str>,
    ) -> Result<SearchRequestParameters, ParameterError> {
        SearchRequestParameters::from_tool_parameters(params, credential, &self.defaults)
    }

    /// One GET against the endpoint, projected on success.
    pub async fn execute(
        &self,
        params: &SearchRequestParameters,
    ) -> Result<SearchResult, InvocationError> {
        tracing::info!(
            hl = params.hl(),
            gl = params.gl(),
            imgsz = params.imgsz(),
            has_location = params.location().is_some(),
            query_len = params.query().len(),
            "serpapi.request.start"
        );

        let opts = RequestOpts {
            query: Some(params.query_pairs()),
            auth: Some(Auth {
                name: "api_key",
                value: Cow::Borrowed(params.api_key()),
            }),
        };

        let raw: Value = self.http.get_json("", opts).await.map_err(|err| {
            tracing::warn!(error = %err, status = ?err.status(), "serpapi.request.failed");
            InvocationError::from(err)
        })?;

        let result = project(&raw);
        tracing::info!(
            organic_results = result.organic_count(),
            has_knowledge_graph = result.title.is_some(),
            "serpapi.response.projected"
        );
        Ok(result)
    }

    async fn run(&self, credentials: &Credentials, parameters: &ToolParameters) -> Vec<ToolMessage> {
        let mut out = Vec::new();

        let args = match SearchArgs::from_parameters(parameters) {
            Ok(args) => args,
            Err(err) => {
                out.push(ToolMessage::text(err.to_string()));
                return out;
            }
        };

        out.extend(
            self.validate(args.hl_or(&self.defaults), args.gl_or(&self.defaults))
                .into_iter()
                .map(|advisory| ToolMessage::text(advisory.to_string())),
        );

        let request = match SearchRequestParameters::build(
            &args,
            credentials.get(CREDENTIAL_NAME),
            &self.defaults,
        ) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(error = %err, "serpapi.parameters.rejected");
                out.push(ToolMessage::text(err.to_string()));
                return out;
            }
        };

        let terminal = match self.execute(&request).await {
            Ok(result) => match serde_json::to_value(&result) {
                Ok(value) => ToolMessage::json(value),
                Err(err) => ToolMessage::text(InvocationError::new(err.to_string()).to_string()),
            },
            Err(err) => ToolMessage::text(err.to_string()),
        };
        out.push(terminal);
        out
    }
}

#[async_trait]
impl Tool for GoogleSearchTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        TOOL_DESCRIPTION
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query."
                },
                "hl": {
                    "type": "string",
                    "description": "Interface language code. See https://serpapi.com/google-languages",
                    "default": self.defaults.hl
                },
                "gl": {
                    "type": "string",
                    "description": "Country code. See https://serpapi.com/google-countries",
                    "default": self.defaults.gl
                },
                "location": {
                    "type": "string",
                    "description": "Where the search should originate from. See https://serpapi.com/locations-api"
                },
                "imgsz": {
                    "type": "string",
                    "description": "Image size hint, e.g. l, m, i, qsvga.",
                    "default": self.defaults.imgsz
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(
        &self,
        credentials: &Credentials,
        parameters: &ToolParameters,
    ) -> Vec<ToolMessage> {
        self.run(credentials, parameters).await
    }
}
