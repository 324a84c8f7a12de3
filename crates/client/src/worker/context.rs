//! Explicit worker context and host capabilities.
//!
//! Everything a handler may touch is reachable from [`WorkerContext`]:
//! configuration, the partition manager, the network, the host, and the
//! background task tracker. There is no ambient global state.

use std::sync::Arc;

use swcache_core::{AppConfig, CacheDb, Error, Network, Partition, PartitionKind, Request, Response};
use url::Url;

use super::push::Notification;
use super::tasks::BackgroundTasks;

/// Capabilities the hosting runtime exposes to the worker.
#[async_trait::async_trait]
pub trait WorkerHost: Send + Sync {
    /// Activate this version without waiting for old page contexts to close.
    async fn skip_waiting(&self);

    /// Take control of every open page context.
    async fn claim_clients(&self);

    /// Display a notification to the user.
    async fn show_notification(&self, notification: &Notification);

    /// Open a window/tab at `url`.
    async fn open_window(&self, url: &Url);
}

/// Shared state handed to every handler.
///
/// Cloning is cheap; clones share storage, network, host and task tracker.
#[derive(Clone)]
pub struct WorkerContext {
    pub config: Arc<AppConfig>,
    pub cache: CacheDb,
    pub network: Arc<dyn Network>,
    pub host: Arc<dyn WorkerHost>,
    pub background: BackgroundTasks,
    origin: Url,
}

impl WorkerContext {
    /// Build a context from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the configured origin does not parse.
    pub fn new(
        config: AppConfig, cache: CacheDb, network: Arc<dyn Network>, host: Arc<dyn WorkerHost>,
    ) -> Result<Self, Error> {
        let origin = config.origin_url().map_err(|e| Error::InvalidInput(e.to_string()))?;
        Ok(Self { config: Arc::new(config), cache, network, host, background: BackgroundTasks::default(), origin })
    }

    /// Same storage, network and host under a different configuration,
    /// e.g. the next deployed version.
    pub fn with_config(&self, config: AppConfig) -> Result<Self, Error> {
        Self::new(config, self.cache.clone(), self.network.clone(), self.host.clone())
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Whether `url` belongs to the worker's own origin.
    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.origin.origin()
    }

    /// Open one of the current version's partitions.
    pub async fn partition(&self, kind: PartitionKind) -> Result<Partition, Error> {
        self.cache.open_partition(&self.config.partition_name(kind)).await
    }

    /// Network fetch bounded by the configured timeout.
    pub async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        fetch_with_timeout(self.network.as_ref(), request, self.config.network_timeout()).await
    }
}

async fn fetch_with_timeout(
    network: &dyn Network, request: &Request, timeout: std::time::Duration,
) -> Result<Response, Error> {
    match tokio::time::timeout(timeout, network.fetch(request)).await {
        Ok(result) => result,
        Err(_) => Err(Error::NetworkTimeout(format!("{} {} after {}ms", request.method, request.url, timeout.as_millis()))),
    }
}
