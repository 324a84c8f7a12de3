//! cache_purge tool implementation.
//!
//! Deletes one named partition, or runs activation's garbage collection on
//! demand.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_client::WorkerContext;
use swcache_client::worker::lifecycle::evict_stale_partitions;
use swcache_core::Error;

use crate::tools::json_result;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Delete this partition.
    pub partition: Option<String>,

    /// Delete every partition that does not belong to the current version,
    /// exactly as activation does.
    #[serde(default)]
    pub stale: bool,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Names of the deleted partitions.
    pub deleted: Vec<String>,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(ctx: &WorkerContext, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let deleted = match (params.partition, params.stale) {
        (Some(name), false) => {
            if ctx.cache.delete_partition(&name).await? {
                vec![name]
            } else {
                Vec::new()
            }
        }
        (None, true) => evict_stale_partitions(ctx).await?,
        _ => {
            return Err(Error::InvalidInput("Specify exactly one of partition or stale".to_string()).into());
        }
    };

    for name in &deleted {
        tracing::info!(partition = %name, "purged partition");
    }
    json_result(&CachePurgeOutput { deleted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::parse_output;
    use crate::tools::test_support::{FixedNetwork, state};

    async fn seeded() -> WorkerContext {
        let state = state(FixedNetwork::offline()).await;
        let ctx = state.worker.context().clone();
        for name in ["swcache-general-v0", "swcache-general-v1", "swcache-static-v1"] {
            ctx.cache.open_partition(name).await.unwrap();
        }
        ctx
    }

    #[tokio::test]
    async fn test_purge_named() {
        let ctx = seeded().await;
        let params = CachePurgeParams { partition: Some("swcache-general-v0".into()), stale: false };

        let output: CachePurgeOutput = parse_output(&purge_impl(&ctx, params).await.unwrap());

        assert_eq!(output.deleted, vec!["swcache-general-v0"]);
        assert!(!ctx.cache.has_partition("swcache-general-v0").await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_missing_is_noop() {
        let ctx = seeded().await;
        let params = CachePurgeParams { partition: Some("nope".into()), stale: false };

        let output: CachePurgeOutput = parse_output(&purge_impl(&ctx, params).await.unwrap());
        assert!(output.deleted.is_empty());
    }

    #[tokio::test]
    async fn test_purge_stale_matches_activation() {
        let ctx = seeded().await;
        let params = CachePurgeParams { partition: None, stale: true };

        let output: CachePurgeOutput = parse_output(&purge_impl(&ctx, params).await.unwrap());

        assert_eq!(output.deleted, vec!["swcache-general-v0"]);
        let mut remaining = ctx.cache.partitions().await.unwrap();
        remaining.sort();
        let mut expected = ctx.config.current_partitions();
        expected.sort();
        assert_eq!(remaining, expected);
    }

    #[tokio::test]
    async fn test_purge_requires_one_selector() {
        let ctx = seeded().await;
        assert!(purge_impl(&ctx, CachePurgeParams::default()).await.is_err());
        let both = CachePurgeParams { partition: Some("x".into()), stale: true };
        assert!(purge_impl(&ctx, both).await.is_err());
    }
}
