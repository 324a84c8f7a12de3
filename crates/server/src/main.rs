//! swcache MCP server entry point.
//!
//! Boots one worker version from configuration and exposes its events as
//! tools on stdio transport. Logging goes to stderr to avoid interfering
//! with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use swcache_client::{FetchConfig, HttpNetwork, Worker, WorkerContext};
use swcache_core::{AppConfig, CacheDb, Network};
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod host;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(version = %config.version, origin = %config.origin, "Starting swcache server on stdio transport");

    let cache = CacheDb::open(&config.db_path).await?;
    let network: Arc<dyn Network> = Arc::new(HttpNetwork::new(&FetchConfig::from(&config))?);
    let host = Arc::new(host::McpHost::new());
    let ctx = WorkerContext::new(config, cache, network.clone(), host.clone())?;
    let worker = Arc::new(Worker::new(ctx));

    let handler = handler::SwCacheServer::new(tools::ToolState { worker: worker.clone(), passthrough: network, host });
    let server = serve_server(handler, stdio()).await?;

    server.waiting().await?;

    worker.settle().await;
    worker.context().cache.clone().close().await?;
    Ok(())
}
