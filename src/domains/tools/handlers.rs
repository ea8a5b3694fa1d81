//! Tool handler contract and the invocation data model.
//!
//! Every tool implements [`ToolHandler`]: it describes itself once (the
//! descriptor advertised by `tools/list`) and executes a call against an
//! untyped JSON argument map, returning text or a [`ToolError`].

use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde::de::DeserializeOwned;

use super::ToolError;

/// A single `tools/call` request after it has been lifted off the wire.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    /// The name of the tool to execute.
    pub tool_name: String,

    /// The arguments to pass to the tool.
    pub arguments: JsonObject,
}

impl InvocationRequest {
    /// Create a request with the given arguments.
    pub fn new(tool_name: impl Into<String>, arguments: JsonObject) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Create a request with no arguments.
    pub fn without_arguments(tool_name: impl Into<String>) -> Self {
        Self::new(tool_name, JsonObject::new())
    }
}

/// Outcome of a dispatched invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    /// The tool produced text.
    Success(String),

    /// The tool (or routing) failed; the text is shown to the peer.
    Failure(String),
}

impl InvocationResult {
    /// Build a failure from a tool error, adding the `Error: ` prefix.
    pub fn failure(error: &ToolError) -> Self {
        Self::Failure(format!("Error: {}", error))
    }

    /// Whether this result is a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The text carried by the result.
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }
}

impl From<InvocationResult> for CallToolResult {
    fn from(result: InvocationResult) -> Self {
        match result {
            InvocationResult::Success(text) => CallToolResult::success(vec![Content::text(text)]),
            InvocationResult::Failure(text) => CallToolResult::error(vec![Content::text(text)]),
        }
    }
}

/// Trait implemented by every tool.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// The descriptor advertised to clients (name, description, input schema).
    fn descriptor(&self) -> Tool;

    /// Execute the tool with the given arguments.
    async fn call(&self, arguments: JsonObject) -> Result<String, ToolError>;
}

/// Deserialize a tool's typed parameters from the raw argument map.
pub fn parse_params<P: DeserializeOwned>(arguments: JsonObject) -> Result<P, ToolError> {
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}
