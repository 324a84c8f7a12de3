//! MCP tool implementations.
//!
//! Each tool fires one worker event (or inspects the cache) and reports the
//! result as pretty-printed JSON text content.

pub mod cache;
pub mod events;
pub mod fetch;
pub mod lifecycle;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;
use swcache_client::Worker;
use swcache_core::Network;

use crate::error::ToolError;
use crate::host::McpHost;

pub use events::{ClickParams, MessageParams, PushParams};
pub use fetch::SwFetchParams;

/// Everything a tool needs.
#[derive(Clone)]
pub struct ToolState {
    pub worker: Arc<Worker>,
    /// Network used for requests the worker declines to intercept.
    pub passthrough: Arc<dyn Network>,
    pub host: Arc<McpHost>,
}

pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| ToolError::Serialize(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Parse the JSON text content of a tool result.
#[cfg(test)]
pub(crate) fn parse_output<T: serde::de::DeserializeOwned>(result: &CallToolResult) -> T {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    let text = content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}
