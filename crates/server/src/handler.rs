//! MCP server handler implementation.
//!
//! Each tool fires one event at the worker, standing in for the browser
//! that would normally drive it.
use crate::tools::{
    ClickParams, MessageParams, PushParams, SwFetchParams, ToolState,
    cache::{CacheDeleteParams, CacheKeysParams, CachePurgeParams, delete_impl, keys_impl, list_impl, purge_impl},
    events::{click_impl, message_impl, push_impl},
    fetch::fetch_impl,
    lifecycle::{activate_impl, install_impl},
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for swcache.
#[derive(Clone)]
pub struct SwCacheServer {
    state: ToolState,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SwCacheServer {
    pub fn new(state: ToolState) -> Self {
        Self { state, tool_router: Self::tool_router() }
    }

    #[tool(description = "Install the worker: precache the static asset manifest (all-or-nothing).")]
    async fn sw_install(&self) -> Result<CallToolResult, McpError> {
        install_impl(&self.state).await
    }

    #[tool(description = "Activate the installed worker: delete partitions from other versions and claim clients.")]
    async fn sw_activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(&self.state).await
    }

    /// Route a request through the interceptor.
    ///
    /// GET requests are answered with cache-first, network-first or
    /// stale-while-revalidate depending on the path. Everything else goes to
    /// the network untouched.
    #[tool(
        description = "Send a request through the worker. Returns status, headers, body and whether the worker intercepted it."
    )]
    async fn sw_fetch(&self, params: Parameters<SwFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.state, params.0).await
    }

    #[tool(description = "Deliver a push message. The payload may override notification title, body, icon, tag and url.")]
    async fn sw_push(&self, params: Parameters<PushParams>) -> Result<CallToolResult, McpError> {
        push_impl(&self.state, params.0).await
    }

    #[tool(description = "Click a notification. The 'explore' action opens the notification url; others dismiss it.")]
    async fn sw_notification_click(&self, params: Parameters<ClickParams>) -> Result<CallToolResult, McpError> {
        click_impl(&self.state, params.0).await
    }

    #[tool(description = "Post a message to the worker. Supports {\"type\":\"SKIP_WAITING\"} and {\"type\":\"GET_VERSION\"}.")]
    async fn sw_message(&self, params: Parameters<MessageParams>) -> Result<CallToolResult, McpError> {
        message_impl(&self.state, params.0).await
    }

    #[tool(description = "List cache partitions with their entry counts.")]
    async fn cache_list(&self) -> Result<CallToolResult, McpError> {
        list_impl(&self.state.worker.context().cache).await
    }

    #[tool(description = "List the request URLs cached in one partition, oldest first.")]
    async fn cache_keys(&self, params: Parameters<CacheKeysParams>) -> Result<CallToolResult, McpError> {
        keys_impl(self.state.worker.context(), params.0).await
    }

    #[tool(description = "Delete one cached request (method + url) from a partition.")]
    async fn cache_delete(&self, params: Parameters<CacheDeleteParams>) -> Result<CallToolResult, McpError> {
        delete_impl(self.state.worker.context(), params.0).await
    }

    #[tool(description = "Delete a named cache partition, or every partition not owned by the current version.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(self.state.worker.context(), params.0).await
    }
}

impl ServerHandler for SwCacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "swcache".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
