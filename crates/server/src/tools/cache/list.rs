//! cache_list tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{CacheDb, PartitionStats};

use crate::tools::json_result;

/// Output from the cache_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheListOutput {
    pub partitions: Vec<PartitionStats>,
}

/// List every partition with its entry count.
pub async fn list_impl(cache: &CacheDb) -> Result<CallToolResult, McpError> {
    let partitions = cache.partition_stats().await?;
    json_result(&CacheListOutput { partitions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::parse_output;
    use swcache_core::{Request, Response};

    #[tokio::test]
    async fn test_list_counts_entries() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let general = cache.open_partition("swcache-general-v1").await.unwrap();
        cache.open_partition("swcache-api-v1").await.unwrap();
        let request = Request::parse("GET", "http://localhost:3000/about").unwrap();
        cache.put(&general, &request, &Response::text(200, "about")).await.unwrap();

        let output: CacheListOutput = parse_output(&list_impl(&cache).await.unwrap());

        assert_eq!(output.partitions.len(), 2);
        let general = output
            .partitions
            .iter()
            .find(|p| p.name == "swcache-general-v1")
            .unwrap();
        assert_eq!(general.entries, 1);
    }
}
