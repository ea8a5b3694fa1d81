//! MCP Server implementation.
//!
//! This module contains the server handler that implements the MCP protocol
//! surface: the `initialize` handshake, capability listing (`tools/list`) and
//! tool invocation (`tools/call`). Tool work is delegated to the tools domain.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool
//! and collected in a `ToolRegistry`. Listing and dispatch both read that
//! registry. **Adding a new tool does NOT require modifying this file!**

use std::sync::Arc;

use rmcp::model::{CallToolResult, ServerCapabilities, Tool};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use super::config::Config;
use super::error::Result;
use super::protocol::{JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse};
use crate::domains::tools::{
    InvocationRequest, InvocationResult, ToolDispatcher, ToolRegistry,
};

/// Protocol revisions this server speaks, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

const INSTRUCTIONS: &str = "This server provides sample tools: calculate, generate_uuid, reverse_string and current_time.";

/// The main MCP server handler.
///
/// Cheap to clone; the registry is shared and never mutated after startup.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Routes tool calls against the registry.
    dispatcher: ToolDispatcher,
}

impl McpServer {
    /// Create a new MCP server with the given configuration and tool catalog.
    pub fn new(config: Config, registry: ToolRegistry) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: ToolDispatcher::new(Arc::new(registry)),
        }
    }

    /// Create a server exposing the built-in tool catalog.
    pub fn with_standard_tools(config: Config) -> Result<Self> {
        Ok(Self::new(config, ToolRegistry::standard()?))
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    // ========================================================================
    // Protocol Operations
    // ========================================================================

    /// List all available tools, in registration order.
    pub fn list_tools(&self) -> &[Tool] {
        self.dispatcher.registry().list()
    }

    /// Call a tool. Never fails; failures are carried in the result.
    pub async fn call_tool(&self, request: InvocationRequest) -> InvocationResult {
        self.dispatcher.dispatch(request).await
    }

    /// Pick the protocol version to answer `initialize` with.
    pub fn negotiate_protocol_version(requested: Option<&str>) -> &'static str {
        requested
            .and_then(|v| SUPPORTED_PROTOCOL_VERSIONS.iter().find(|s| **s == v))
            .copied()
            .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0])
    }

    /// Route one inbound JSON-RPC message.
    ///
    /// Returns `None` for notifications, which never get a response.
    #[instrument(skip_all, fields(method = %request.method))]
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        if request.jsonrpc != JSONRPC_VERSION {
            warn!("Rejecting request with jsonrpc version {:?}", request.jsonrpc);
            return Some(JsonRpcResponse::invalid_request(request.id));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            _ => {
                warn!("Unknown method: {}", request.method);
                JsonRpcResponse::method_not_found(request.id, &request.method)
            }
        };

        Some(response)
    }

    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params = request.params.unwrap_or_else(|| json!({}));

        let requested = params.get("protocolVersion").and_then(|v| v.as_str());
        let protocol_version = Self::negotiate_protocol_version(requested);

        let client = params
            .pointer("/clientInfo/name")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        info!(
            "Initializing session for client '{}' (protocol {})",
            client, protocol_version
        );

        let capabilities = ServerCapabilities::builder().enable_tools().build();

        JsonRpcResponse::success(
            request.id,
            json!({
                "protocolVersion": protocol_version,
                "capabilities": capabilities,
                "serverInfo": {
                    "name": self.name(),
                    "version": self.version()
                },
                "instructions": INSTRUCTIONS
            }),
        )
    }

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("Listing tools");
        JsonRpcResponse::success(request.id, json!({ "tools": self.list_tools() }))
    }

    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let invocation = match parse_call_params(request.params) {
            Ok(invocation) => invocation,
            Err(message) => return JsonRpcResponse::invalid_params(request.id, message),
        };

        info!("Calling tool: {}", invocation.tool_name);
        let result = CallToolResult::from(self.call_tool(invocation).await);

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
        }
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => info!("Client sent initialized notification"),
            other => debug!("Ignoring notification: {}", other),
        }
    }
}

/// Lift `tools/call` params into an invocation request.
fn parse_call_params(
    params: Option<serde_json::Value>,
) -> std::result::Result<InvocationRequest, String> {
    let mut params = match params {
        Some(serde_json::Value::Object(map)) => map,
        Some(_) => return Err("Params must be an object".to_string()),
        None => return Err("Missing params".to_string()),
    };

    let name = match params.remove("name") {
        Some(serde_json::Value::String(name)) => name,
        _ => return Err("Missing tool name".to_string()),
    };

    let arguments = match params.remove("arguments") {
        None | Some(serde_json::Value::Null) => serde_json::Map::new(),
        Some(serde_json::Value::Object(map)) => map,
        Some(_) => return Err("Tool arguments must be an object".to_string()),
    };

    Ok(InvocationRequest::new(name, arguments))
}
