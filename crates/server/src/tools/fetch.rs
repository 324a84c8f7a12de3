//! sw_fetch tool implementation.
//!
//! Hands one request to the interceptor. When the worker declines to handle
//! it, the request goes to the network unmodified, as a browser would.

use std::collections::BTreeMap;

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_client::{EventOutcome, WorkerEvent, resolve};
use swcache_core::Request;

use super::{ToolState, json_result};
use crate::error::ToolError;

fn default_method() -> String {
    "GET".to_string()
}

/// Parameters for the sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchParams {
    /// Absolute URL, or a path resolved against the configured origin.
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,

    /// Request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Output from the sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchOutput {
    /// Whether the worker produced the response itself.
    pub intercepted: bool,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Body decoded as UTF-8 (lossy).
    pub body: String,
}

/// Implementation of the sw_fetch tool.
pub async fn fetch_impl(state: &ToolState, params: SwFetchParams) -> Result<CallToolResult, McpError> {
    let method = params.method.trim();
    if method.is_empty() {
        return Err(ToolError::InvalidInput("method must not be empty".to_string()).into());
    }

    let url = resolve(&params.url, state.worker.context().origin())
        .map_err(|e| ToolError::InvalidInput(format!("{}: {e}", params.url)))?;
    let request = params
        .headers
        .into_iter()
        .fold(Request::new(method, url), |request, (name, value)| request.with_header(name, value));

    let (intercepted, response) = match state.worker.dispatch(WorkerEvent::Fetch(request.clone())).await? {
        EventOutcome::Respond(response) => (true, response),
        _ => (false, state.passthrough.fetch(&request).await?),
    };

    let output = SwFetchOutput {
        intercepted,
        status: response.status,
        body: response.body_text(),
        headers: response.headers,
    };
    json_result(&output)
}
