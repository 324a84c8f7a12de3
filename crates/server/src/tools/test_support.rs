//! Tool state backed by an in-memory cache and a fixed network.

use std::sync::Arc;

use swcache_client::{Worker, WorkerContext};
use swcache_core::{AppConfig, CacheDb, Error, Network, Request, Response};

use super::ToolState;
use crate::host::McpHost;

/// Network that answers every request the same way.
pub struct FixedNetwork {
    response: Option<Response>,
}

impl FixedNetwork {
    pub fn ok(body: &str) -> Self {
        Self { response: Some(Response::text(200, body)) }
    }

    pub fn offline() -> Self {
        Self { response: None }
    }
}

#[async_trait::async_trait]
impl Network for FixedNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        self.response
            .clone()
            .ok_or_else(|| Error::Network(format!("offline: {}", request.url)))
    }
}

pub async fn state(network: FixedNetwork) -> ToolState {
    let network: Arc<dyn Network> = Arc::new(network);
    let cache = CacheDb::open_in_memory().await.unwrap();
    let host = Arc::new(McpHost::new());
    let ctx = WorkerContext::new(AppConfig::default(), cache, network.clone(), host.clone()).unwrap();
    ToolState { worker: Arc::new(Worker::new(ctx)), passthrough: network, host }
}
