//! String reversal tool definition.

use rmcp::{
    handler::server::tool::schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::domains::tools::{ToolError, ToolHandler, parse_params};

/// Parameters for the reverse string tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReverseStringParams {
    /// Text to reverse.
    #[schemars(description = "Text to reverse")]
    pub text: String,
}

/// Reverse string tool - reverses the characters of a string.
#[derive(Debug, Clone, Default)]
pub struct ReverseStringTool;

impl ReverseStringTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "reverse_string";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Reverse a given string";

    /// Execute the tool logic.
    ///
    /// Reverses Unicode scalar values, so applying it twice always returns
    /// the input unchanged.
    pub fn execute(params: &ReverseStringParams) -> Result<String, ToolError> {
        Ok(params.text.chars().rev().collect())
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<ReverseStringParams>().into(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for ReverseStringTool {
    fn descriptor(&self) -> Tool {
        Self::to_tool()
    }

    async fn call(&self, arguments: JsonObject) -> Result<String, ToolError> {
        let params: ReverseStringParams = parse_params(arguments)
            .map_err(|_| ToolError::rejected("Text is required and must be a string"))?;
        Self::execute(&params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reverse(text: &str) -> String {
        ReverseStringTool::execute(&ReverseStringParams {
            text: text.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_reverse_basic() {
        assert_eq!(reverse("hello world"), "dlrow olleh");
    }

    #[test]
    fn test_reverse_is_involution() {
        for input in ["", "a", "hello world", "héllo wörld", "🦀 rust 🦀", "ab\ncd"] {
            assert_eq!(reverse(&reverse(input)), input);
        }
    }

    #[tokio::test]
    async fn test_call_missing_text() {
        let err = ReverseStringTool.call(JsonObject::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Text is required and must be a string");
    }

    #[tokio::test]
    async fn test_call_non_string_text() {
        let mut args = JsonObject::new();
        args.insert("text".to_string(), serde_json::json!(["a", "b"]));
        let err = ReverseStringTool.call(args).await.unwrap_err();
        assert_eq!(err.to_string(), "Text is required and must be a string");
    }
}
