//! Host capabilities for one-shot command runs.

use swcache_client::{Notification, WorkerHost};
use url::Url;

/// WorkerHost that reports capability calls on stderr through tracing.
#[derive(Debug, Default)]
pub struct CliHost;

#[async_trait::async_trait]
impl WorkerHost for CliHost {
    async fn skip_waiting(&self) {
        tracing::info!("worker requested immediate activation");
    }

    async fn claim_clients(&self) {
        tracing::info!("worker claimed clients");
    }

    async fn show_notification(&self, notification: &Notification) {
        tracing::info!(title = %notification.title, body = %notification.body, "notification");
    }

    async fn open_window(&self, url: &Url) {
        tracing::info!(%url, "open window");
    }
}
