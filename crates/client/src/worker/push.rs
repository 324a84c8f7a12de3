//! Push notification display and click handling.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{AppConfig, Error};
use url::Url;

use super::context::WorkerContext;
use crate::fetch::resolve;

/// Action that opens the application.
pub const PRIMARY_ACTION: &str = "explore";

const DEFAULT_TITLE: &str = "swcache";
const DEFAULT_BODY: &str = "You have a new notification";

/// A button shown on a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

/// Notification content handed to the host for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: Option<String>,
    /// Page associated with the notification.
    pub url: String,
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    pub fn defaults(config: &AppConfig) -> Self {
        Self {
            title: DEFAULT_TITLE.into(),
            body: DEFAULT_BODY.into(),
            icon: config.notification_icon.clone(),
            badge: config.notification_icon.clone(),
            tag: None,
            url: config.notification_url.clone(),
            actions: vec![
                NotificationAction { action: PRIMARY_ACTION.into(), title: "Open".into() },
                NotificationAction { action: "close".into(), title: "Close".into() },
            ],
        }
    }
}

/// Fields a push payload may override. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
struct PushPayload {
    title: Option<String>,
    body: Option<String>,
    icon: Option<String>,
    badge: Option<String>,
    tag: Option<String>,
    url: Option<String>,
    actions: Option<Vec<NotificationAction>>,
}

/// Merge an optional JSON payload over the default notification.
///
/// An absent, empty or malformed payload yields the defaults unchanged.
pub fn build_notification(config: &AppConfig, payload: Option<&[u8]>) -> Notification {
    let payload = match payload.filter(|bytes| !bytes.is_empty()) {
        Some(bytes) => serde_json::from_slice::<PushPayload>(bytes).unwrap_or_else(|e| {
            tracing::debug!("ignoring malformed push payload: {e}");
            PushPayload::default()
        }),
        None => PushPayload::default(),
    };

    let mut notification = Notification::defaults(config);
    if let Some(title) = payload.title {
        notification.title = title;
    }
    if let Some(body) = payload.body {
        notification.body = body;
    }
    if let Some(icon) = payload.icon {
        notification.icon = icon;
    }
    if let Some(badge) = payload.badge {
        notification.badge = badge;
    }
    if let Some(url) = payload.url {
        notification.url = url;
    }
    notification.tag = payload.tag;
    if let Some(actions) = payload.actions {
        notification.actions = actions;
    }
    notification
}

/// Build and display the notification for a push event.
pub async fn handle_push(ctx: &WorkerContext, payload: Option<&[u8]>) -> Notification {
    let notification = build_notification(&ctx.config, payload);
    tracing::debug!(title = %notification.title, "showing notification");
    ctx.host.show_notification(&notification).await;
    notification
}

/// What a notification click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Opened(Url),
    Dismissed,
}

/// Handle a click on a notification or one of its actions.
pub async fn handle_click(ctx: &WorkerContext, action: Option<&str>) -> Result<ClickOutcome, Error> {
    if action != Some(PRIMARY_ACTION) {
        return Ok(ClickOutcome::Dismissed);
    }

    let url = resolve(&ctx.config.notification_url, ctx.origin()).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    ctx.host.open_window(&url).await;
    Ok(ClickOutcome::Opened(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::test_support::{HostCall, ScriptedNetwork, test_context};

    #[test]
    fn test_defaults_without_payload() {
        let config = AppConfig::default();
        let notification = build_notification(&config, None);
        assert_eq!(notification, Notification::defaults(&config));
        assert_eq!(notification.body, "You have a new notification");
    }

    #[test]
    fn test_empty_and_malformed_payload() {
        let config = AppConfig::default();
        assert_eq!(build_notification(&config, Some(b"")), Notification::defaults(&config));
        assert_eq!(build_notification(&config, Some(b"not json {")), Notification::defaults(&config));
    }

    #[test]
    fn test_payload_overrides_fields() {
        let config = AppConfig::default();
        let payload = br#"{"title":"Order shipped","tag":"order-42","extra":true}"#;
        let notification = build_notification(&config, Some(payload));

        assert_eq!(notification.title, "Order shipped");
        assert_eq!(notification.tag.as_deref(), Some("order-42"));
        assert_eq!(notification.body, "You have a new notification");
        assert_eq!(notification.icon, "/icon-192.png");
        assert_eq!(notification.actions.len(), 2);
    }

    #[tokio::test]
    async fn test_push_shows_notification() {
        let (ctx, host) = test_context(ScriptedNetwork::new()).await;
        let notification = handle_push(&ctx, Some(br#"{"body":"hi"}"#)).await;

        assert_eq!(notification.body, "hi");
        assert_eq!(host.calls(), vec![HostCall::ShowNotification(notification)]);
    }

    #[tokio::test]
    async fn test_primary_click_opens_window() {
        let (ctx, host) = test_context(ScriptedNetwork::new()).await;
        let outcome = handle_click(&ctx, Some(PRIMARY_ACTION)).await.unwrap();

        let expected = Url::parse("http://localhost:3000/").unwrap();
        assert_eq!(outcome, ClickOutcome::Opened(expected.clone()));
        assert_eq!(host.calls(), vec![HostCall::OpenWindow(expected.to_string())]);
    }

    #[tokio::test]
    async fn test_other_clicks_dismiss() {
        let (ctx, host) = test_context(ScriptedNetwork::new()).await;
        assert_eq!(handle_click(&ctx, Some("close")).await.unwrap(), ClickOutcome::Dismissed);
        assert_eq!(handle_click(&ctx, None).await.unwrap(), ClickOutcome::Dismissed);
        assert!(host.calls().is_empty());
    }
}
