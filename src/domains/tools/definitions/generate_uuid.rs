//! UUID generation tool definition.

use rmcp::{
    handler::server::tool::schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;

use crate::domains::tools::{ToolError, ToolHandler};

/// The only UUID version this tool generates.
const SUPPORTED_VERSION: f64 = 4.0;

fn default_version() -> f64 {
    SUPPORTED_VERSION
}

/// Parameters for the generate UUID tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GenerateUuidParams {
    /// UUID version to generate.
    #[schemars(description = "UUID version (4 for random)")]
    #[serde(default = "default_version")]
    pub version: f64,
}

impl Default for GenerateUuidParams {
    fn default() -> Self {
        Self {
            version: default_version(),
        }
    }
}

/// Generate UUID tool - returns a random (version 4) UUID.
#[derive(Debug, Clone, Default)]
pub struct GenerateUuidTool;

impl GenerateUuidTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "generate_uuid";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Generate a random UUID";

    /// Execute the tool logic.
    pub fn execute(params: &GenerateUuidParams) -> Result<String, ToolError> {
        if params.version != SUPPORTED_VERSION {
            return Err(unsupported_version());
        }
        Ok(Uuid::new_v4().to_string())
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<GenerateUuidParams>().into(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for GenerateUuidTool {
    fn descriptor(&self) -> Tool {
        Self::to_tool()
    }

    async fn call(&self, arguments: JsonObject) -> Result<String, ToolError> {
        // Only an absent version defaults; null, strings and the like are rejected.
        let params = match arguments.get("version") {
            None => GenerateUuidParams::default(),
            Some(version) => GenerateUuidParams {
                version: version.as_f64().ok_or_else(unsupported_version)?,
            },
        };
        Self::execute(&params)
    }
}

fn unsupported_version() -> ToolError {
    ToolError::rejected("Only UUID version 4 is supported")
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn v4_pattern() -> Regex {
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
            .unwrap()
    }

    #[test]
    fn test_generate_default_version() {
        let uuid = GenerateUuidTool::execute(&GenerateUuidParams::default()).unwrap();
        assert!(v4_pattern().is_match(&uuid), "not a v4 uuid: {}", uuid);
    }

    #[test]
    fn test_generate_is_random() {
        let a = GenerateUuidTool::execute(&GenerateUuidParams::default()).unwrap();
        let b = GenerateUuidTool::execute(&GenerateUuidParams::default()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unsupported_version() {
        let err = GenerateUuidTool::execute(&GenerateUuidParams { version: 1.0 }).unwrap_err();
        assert_eq!(err.to_string(), "Only UUID version 4 is supported");
    }

    #[tokio::test]
    async fn test_call_without_arguments_uses_default() {
        let uuid = GenerateUuidTool.call(JsonObject::new()).await.unwrap();
        assert!(v4_pattern().is_match(&uuid));
    }

    #[tokio::test]
    async fn test_call_with_explicit_version() {
        let mut args = JsonObject::new();
        args.insert("version".to_string(), serde_json::json!(4));
        assert!(GenerateUuidTool.call(args).await.is_ok());

        let mut args = JsonObject::new();
        args.insert("version".to_string(), serde_json::json!(4.0));
        assert!(GenerateUuidTool.call(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_call_rejects_anything_but_number_four() {
        for version in [
            serde_json::json!(7),
            serde_json::json!("4"),
            serde_json::json!(null),
            serde_json::json!([4]),
        ] {
            let mut args = JsonObject::new();
            args.insert("version".to_string(), version.clone());
            let err = GenerateUuidTool.call(args).await.unwrap_err();
            assert_eq!(
                err.to_string(),
                "Only UUID version 4 is supported",
                "version {}",
                version
            );
        }
    }
}
