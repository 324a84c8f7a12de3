//! Host capabilities as seen from an MCP session.
//!
//! There are no real page contexts behind the server, so capability calls
//! are logged and remembered for the tools to report back.

use serde::Serialize;
use swcache_client::{Notification, WorkerHost};
use tokio::sync::Mutex;
use url::Url;

#[derive(Debug, Default)]
struct HostLog {
    activation_requested: bool,
    clients_claimed: bool,
    last_notification: Option<Notification>,
    last_opened: Option<String>,
}

/// What the worker asked of the host so far.
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct HostSnapshot {
    pub activation_requested: bool,
    pub clients_claimed: bool,
    pub last_notification: Option<Notification>,
    pub last_opened: Option<String>,
}

/// WorkerHost implementation for the MCP server.
#[derive(Debug, Default)]
pub struct McpHost {
    log: Mutex<HostLog>,
}

impl McpHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> HostSnapshot {
        let log = self.log.lock().await;
        HostSnapshot {
            activation_requested: log.activation_requested,
            clients_claimed: log.clients_claimed,
            last_notification: log.last_notification.clone(),
            last_opened: log.last_opened.clone(),
        }
    }
}

#[async_trait::async_trait]
impl WorkerHost for McpHost {
    async fn skip_waiting(&self) {
        tracing::info!("worker requested immediate activation");
        self.log.lock().await.activation_requested = true;
    }

    async fn claim_clients(&self) {
        tracing::info!("worker claimed clients");
        self.log.lock().await.clients_claimed = true;
    }

    async fn show_notification(&self, notification: &Notification) {
        tracing::info!(title = %notification.title, body = %notification.body, "notification");
        self.log.lock().await.last_notification = Some(notification.clone());
    }

    async fn open_window(&self, url: &Url) {
        tracing::info!(%url, "open window");
        self.log.lock().await.last_opened = Some(url.to_string());
    }
}
