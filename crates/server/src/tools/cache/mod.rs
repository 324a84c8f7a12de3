//! Cache inspection tools.

pub mod entries;
pub mod list;
pub mod purge;

pub use entries::{CacheDeleteParams, CacheKeysParams, delete_impl, keys_impl};
pub use list::list_impl;
pub use purge::{CachePurgeParams, purge_impl};

use rmcp::ErrorData as McpError;
use swcache_core::{CacheDb, Partition};

use crate::error::ToolError;

/// Open a partition only if it already exists; inspecting must not create one.
async fn existing_partition(cache: &CacheDb, name: &str) -> Result<Partition, McpError> {
    if !cache.has_partition(name).await? {
        return Err(ToolError::InvalidInput(format!("no such partition: {name}")).into());
    }
    Ok(cache.open_partition(name).await?)
}
