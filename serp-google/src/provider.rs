//! Provider-level operations: credential checks before the tool is enabled.

use serde_json::json;
use serp_common::{Credentials, Tool, ToolMessage};

use crate::error::ProviderCredentialError;
use crate::tool::GoogleSearchTool;

const PROBE_QUERY: &str = "test";

/// The SerpApi provider, owning the tools it exposes.
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    search: GoogleSearchTool,
}

impl GoogleProvider {
    pub fn new(search: GoogleSearchTool) -> Self {
        Self { search }
    }

    pub fn search_tool(&self) -> &GoogleSearchTool {
        &self.search
    }

    /// Tools registered under this provider.
    pub fn tools(&self) -> Vec<&dyn Tool> {
        vec![&self.search]
    }

    /// Run a probe search with the candidate credentials.
    ///
    /// Succeeds when the probe ends in a JSON result; otherwise the error text
    /// the tool produced is returned.
    pub async fn validate_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<(), ProviderCredentialError> {
        let probe = json!({ "query": PROBE_QUERY });
        let params = probe.as_object().cloned().unwrap_or_default();
        let messages = self.search.invoke(credentials, &params).await;

        match messages.last() {
            Some(ToolMessage::Json(_)) => {
                tracing::info!("provider.credentials.valid");
                Ok(())
            }
            Some(ToolMessage::Text(text)) => {
                tracing::warn!(reason = %text, "provider.credentials.invalid");
                Err(ProviderCredentialError(text.clone()))
            }
            None => Err(ProviderCredentialError("probe produced no output".into())),
        }
    }
}
