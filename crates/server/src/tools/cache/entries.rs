//! cache_keys / cache_delete tool implementations.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_client::{WorkerContext, resolve};
use swcache_core::Request;

use super::existing_partition;
use crate::error::ToolError;
use crate::tools::json_result;

/// Parameters for the cache_keys tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheKeysParams {
    /// Partition name, e.g. `swcache-static-v1`.
    pub partition: String,
}

/// Output from the cache_keys tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheKeysOutput {
    /// Cached request URLs, oldest first.
    pub urls: Vec<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Parameters for the cache_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheDeleteParams {
    pub partition: String,

    /// Absolute URL, or a path resolved against the configured origin.
    pub url: String,

    /// HTTP method of the cached request (default: GET).
    #[serde(default = "default_method")]
    pub method: String,
}

/// Output from the cache_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheDeleteOutput {
    /// Whether a record was removed.
    pub deleted: bool,
}

/// List the request URLs stored in one partition.
pub async fn keys_impl(ctx: &WorkerContext, params: CacheKeysParams) -> Result<CallToolResult, McpError> {
    let partition = existing_partition(&ctx.cache, &params.partition).await?;
    let urls = ctx.cache.keys(&partition).await?;
    json_result(&CacheKeysOutput { urls })
}

/// Remove one request's record from a partition.
pub async fn delete_impl(ctx: &WorkerContext, params: CacheDeleteParams) -> Result<CallToolResult, McpError> {
    let partition = existing_partition(&ctx.cache, &params.partition).await?;
    let url = resolve(&params.url, ctx.origin()).map_err(|e| ToolError::InvalidInput(format!("{}: {e}", params.url)))?;
    let request = Request::new(&params.method, url);

    let deleted = ctx.cache.delete_entry(&partition, &request).await?;
    if deleted {
        tracing::info!(partition = partition.name(), "deleted {} {}", request.method, request.url);
    }
    json_result(&CacheDeleteOutput { deleted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::parse_output;
    use crate::tools::test_support::{FixedNetwork, state};
    use swcache_core::Response;

    const PARTITION: &str = "swcache-general-v1";

    async fn seeded() -> WorkerContext {
        let state = state(FixedNetwork::offline()).await;
        let ctx = state.worker.context().clone();
        let partition = ctx.cache.open_partition(PARTITION).await.unwrap();
        for path in ["/about", "/pricing"] {
            let request = Request::parse("GET", &format!("http://localhost:3000{path}")).unwrap();
            ctx.cache.put(&partition, &request, &Response::text(200, path)).await.unwrap();
        }
        ctx
    }

    #[tokio::test]
    async fn test_keys_lists_urls() {
        let ctx = seeded().await;
        let params = CacheKeysParams { partition: PARTITION.into() };

        let output: CacheKeysOutput = parse_output(&keys_impl(&ctx, params).await.unwrap());
        assert_eq!(output.urls, vec!["http://localhost:3000/about", "http://localhost:3000/pricing"]);
    }

    #[tokio::test]
    async fn test_keys_unknown_partition_is_not_created() {
        let ctx = seeded().await;
        let params = CacheKeysParams { partition: "swcache-general-v0".into() };

        let err = keys_impl(&ctx, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
        assert!(!ctx.cache.has_partition("swcache-general-v0").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let ctx = seeded().await;
        let params =
            CacheDeleteParams { partition: PARTITION.into(), url: "/about".into(), method: default_method() };

        let output: CacheDeleteOutput = parse_output(&delete_impl(&ctx, params.clone()).await.unwrap());
        assert!(output.deleted);

        let output: CacheDeleteOutput = parse_output(&delete_impl(&ctx, params).await.unwrap());
        assert!(!output.deleted);

        let keys: CacheKeysOutput =
            parse_output(&keys_impl(&ctx, CacheKeysParams { partition: PARTITION.into() }).await.unwrap());
        assert_eq!(keys.urls, vec!["http://localhost:3000/pricing"]);
    }
}
