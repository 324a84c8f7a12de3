//! Side-channel event tools: sw_push, sw_notification_click, sw_message.

use bytes::Bytes;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use swcache_client::WorkerEvent;
use tokio::sync::oneshot;

use super::{ToolState, json_result};
use crate::host::HostSnapshot;

/// Parameters for the sw_push tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PushParams {
    /// Raw push payload. Usually a JSON object overriding notification
    /// fields; anything unparseable shows the default notification.
    pub payload: Option<String>,
}

/// Parameters for the sw_notification_click tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ClickParams {
    /// Action identifier of the clicked button; absent for the notification body.
    pub action: Option<String>,
}

/// Parameters for the sw_message tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MessageParams {
    /// Message data, e.g. `{"type": "GET_VERSION"}`.
    pub data: Value,
}

/// Output from the sw_message tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct MessageOutput {
    /// Reply posted on the message port, if any.
    pub reply: Option<Value>,
    pub host: HostSnapshot,
}

pub async fn push_impl(state: &ToolState, params: PushParams) -> Result<CallToolResult, McpError> {
    let payload = params.payload.map(Bytes::from);
    state.worker.dispatch(WorkerEvent::Push(payload)).await?;
    json_result(&state.host.snapshot().await)
}

pub async fn click_impl(state: &ToolState, params: ClickParams) -> Result<CallToolResult, McpError> {
    state
        .worker
        .dispatch(WorkerEvent::NotificationClick { action: params.action })
        .await?;
    json_result(&state.host.snapshot().await)
}

pub async fn message_impl(state: &ToolState, params: MessageParams) -> Result<CallToolResult, McpError> {
    let (tx, rx) = oneshot::channel();
    state
        .worker
        .dispatch(WorkerEvent::Message { data: params.data, reply: Some(tx) })
        .await?;

    // the reply, if any, is posted before dispatch returns
    let reply = rx.await.ok();
    let output = MessageOutput { reply, host: state.host.snapshot().await };
    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::parse_output;
    use crate::tools::test_support::{FixedNetwork, state};
    use serde_json::json;

    #[tokio::test]
    async fn test_push_shows_notification() {
        let state = state(FixedNetwork::offline()).await;
        let params = PushParams { payload: Some(r#"{"title":"Build finished"}"#.to_string()) };

        let output: Value = parse_output(&push_impl(&state, params).await.unwrap());

        assert_eq!(output["last_notification"]["title"], "Build finished");
        assert_eq!(output["last_notification"]["body"], "You have a new notification");
    }

    #[tokio::test]
    async fn test_malformed_push_uses_defaults() {
        let state = state(FixedNetwork::offline()).await;
        let params = PushParams { payload: Some("{oops".to_string()) };

        let output: Value = parse_output(&push_impl(&state, params).await.unwrap());
        assert_eq!(output["last_notification"]["title"], "swcache");
    }

    #[tokio::test]
    async fn test_click_explore_opens_window() {
        let state = state(FixedNetwork::offline()).await;

        let output: Value = parse_output(&click_impl(&state, ClickParams { action: Some("close".into()) }).await.unwrap());
        assert!(output["last_opened"].is_null());

        let output: Value =
            parse_output(&click_impl(&state, ClickParams { action: Some("explore".into()) }).await.unwrap());
        assert_eq!(output["last_opened"], "http://localhost:3000/");
    }

    #[tokio::test]
    async fn test_get_version_message() {
        let state = state(FixedNetwork::offline()).await;
        let params = MessageParams { data: json!({"type": "GET_VERSION"}) };

        let output: Value = parse_output(&message_impl(&state, params).await.unwrap());
        assert_eq!(output["reply"], json!({"version": "swcache-general-v1"}));
    }

    #[tokio::test]
    async fn test_unknown_message_has_no_reply() {
        let state = state(FixedNetwork::offline()).await;
        let params = MessageParams { data: json!({"type": "PING"}) };

        let output: Value = parse_output(&message_impl(&state, params).await.unwrap());
        assert!(output["reply"].is_null());
        assert_eq!(output["host"]["activation_requested"], false);
    }
}
