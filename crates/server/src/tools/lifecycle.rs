//! sw_install / sw_activate tool implementations.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::Serialize;
use swcache_client::WorkerEvent;

use super::{ToolState, json_result};
use crate::host::HostSnapshot;

/// Output from the lifecycle tools.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct LifecycleOutput {
    /// Lifecycle phase after the event.
    pub phase: String,
    /// Partitions present in the store.
    pub partitions: Vec<String>,
    pub host: HostSnapshot,
}

async fn report(state: &ToolState) -> Result<CallToolResult, McpError> {
    let mut partitions = state.worker.context().cache.partitions().await?;
    partitions.sort();
    let output = LifecycleOutput {
        phase: state.worker.phase().await.to_string(),
        partitions,
        host: state.host.snapshot().await,
    };
    json_result(&output)
}

/// Fire the install event: precache the static manifest.
pub async fn install_impl(state: &ToolState) -> Result<CallToolResult, McpError> {
    state.worker.dispatch(WorkerEvent::Install).await?;
    report(state).await
}

/// Fire the activate event: evict stale partitions and claim clients.
pub async fn activate_impl(state: &ToolState) -> Result<CallToolResult, McpError> {
    state.worker.dispatch(WorkerEvent::Activate).await?;
    report(state).await
}
