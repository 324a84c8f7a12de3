//! Cross-context messages from page contexts.

use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use super::context::WorkerContext;

/// Reply channel supplied with a message.
pub type ReplyPort = oneshot::Sender<Value>;

/// Recognised message types.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Activate now instead of waiting for old contexts to close.
    SkipWaiting,
    /// Ask for the current versioned cache name.
    GetVersion,
}

impl ClientMessage {
    /// Parse message data; anything unrecognised is `None`.
    pub fn parse(data: &Value) -> Option<Self> {
        ClientMessage::deserialize(data).ok()
    }
}

/// Handle one message. Unknown messages are ignored.
///
/// Returns the recognised message, if any.
pub async fn handle_message(ctx: &WorkerContext, data: &Value, reply: Option<ReplyPort>) -> Option<ClientMessage> {
    let Some(message) = ClientMessage::parse(data) else {
        tracing::debug!("ignoring unrecognised message: {data}");
        return None;
    };

    match &message {
        ClientMessage::SkipWaiting => ctx.host.skip_waiting().await,
        ClientMessage::GetVersion => match reply {
            Some(port) => {
                if port.send(json!({ "version": ctx.config.version_tag() })).is_err() {
                    tracing::debug!("version requester went away before the reply");
                }
            }
            None => tracing::debug!("GET_VERSION without a reply port"),
        },
    }

    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::test_support::{HostCall, ScriptedNetwork, test_context};

    #[test]
    fn test_parse() {
        assert_eq!(ClientMessage::parse(&json!({"type": "SKIP_WAITING"})), Some(ClientMessage::SkipWaiting));
        assert_eq!(
            ClientMessage::parse(&json!({"type": "GET_VERSION", "extra": 1})),
            Some(ClientMessage::GetVersion)
        );
        assert_eq!(ClientMessage::parse(&json!({"type": "CLEAR_ALL"})), None);
        assert_eq!(ClientMessage::parse(&json!("SKIP_WAITING")), None);
    }

    #[tokio::test]
    async fn test_get_version_replies() {
        let (ctx, _host) = test_context(ScriptedNetwork::new()).await;
        let (tx, rx) = oneshot::channel();

        handle_message(&ctx, &json!({"type": "GET_VERSION"}), Some(tx)).await;

        let reply = rx.await.unwrap();
        assert_eq!(reply, json!({"version": "swcache-general-v1"}));
    }

    #[tokio::test]
    async fn test_skip_waiting_signals_host() {
        let (ctx, host) = test_context(ScriptedNetwork::new()).await;
        handle_message(&ctx, &json!({"type": "SKIP_WAITING"}), None).await;
        assert_eq!(host.calls(), vec![HostCall::SkipWaiting]);
    }

    #[tokio::test]
    async fn test_unknown_ignored() {
        let (ctx, host) = test_context(ScriptedNetwork::new()).await;
        let result = handle_message(&ctx, &json!({"type": "SOMETHING"}), None).await;
        assert!(result.is_none());
        assert!(host.calls().is_empty());
    }
}
