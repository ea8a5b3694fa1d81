//! Invocation dispatcher - routes `tools/call` requests to handlers.
//!
//! Dispatch never fails: unknown names, handler errors and handler panics all
//! come back as [`InvocationResult::Failure`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{info, instrument, warn};

use super::{InvocationRequest, InvocationResult, ToolError, ToolRegistry};

/// Routes invocation requests against a shared, read-only registry.
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
}

impl ToolDispatcher {
    /// Create a dispatcher over the given registry.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this dispatcher routes against.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Dispatch a single invocation. Each call is one attempt; there are no retries.
    #[instrument(skip_all, fields(tool = %request.tool_name))]
    pub async fn dispatch(&self, request: InvocationRequest) -> InvocationResult {
        let handler = match self.registry.resolve(&request.tool_name) {
            Ok(handler) => handler,
            Err(e) => {
                warn!("Unknown tool requested: {}", request.tool_name);
                return InvocationResult::failure(&e);
            }
        };

        let outcome = AssertUnwindSafe(handler.call(request.arguments))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(ToolError::panicked(panic_message(payload.as_ref()))));

        match outcome {
            Ok(text) => {
                info!("Tool call succeeded");
                InvocationResult::Success(text)
            }
            Err(e) => {
                warn!("Tool call failed: {}", e);
                InvocationResult::failure(&e)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolHandler;
    use rmcp::model::{JsonObject, Tool};

    struct PanickingTool;

    #[async_trait::async_trait]
    impl ToolHandler for PanickingTool {
        fn descriptor(&self) -> Tool {
            Tool {
                name: "explode".into(),
                description: Some("Always panics".into()),
                input_schema: Arc::new(JsonObject::new()),
                annotations: None,
                output_schema: None,
                icons: None,
                meta: None,
                title: None,
            }
        }

        async fn call(&self, _arguments: JsonObject) -> Result<String, ToolError> {
            panic!("kaboom");
        }
    }

    fn dispatcher() -> ToolDispatcher {
        ToolDispatcher::new(Arc::new(ToolRegistry::standard().unwrap()))
    }

    fn args(value: serde_json::Value) -> JsonObject {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_a_failure() {
        let result = dispatcher()
            .dispatch(InvocationRequest::without_arguments("does_not_exist"))
            .await;
        assert_eq!(
            result,
            InvocationResult::Failure("Error: Unknown tool: does_not_exist".to_string())
        );
    }

    #[tokio::test]
    async fn test_success_is_wrapped() {
        let result = dispatcher()
            .dispatch(InvocationRequest::new(
                "reverse_string",
                args(serde_json::json!({ "text": "hello world" })),
            ))
            .await;
        assert_eq!(result, InvocationResult::Success("dlrow olleh".to_string()));
    }

    #[tokio::test]
    async fn test_handler_error_is_prefixed() {
        let result = dispatcher()
            .dispatch(InvocationRequest::new(
                "generate_uuid",
                args(serde_json::json!({ "version": 1 })),
            ))
            .await;
        assert_eq!(
            result,
            InvocationResult::Failure("Error: Only UUID version 4 is supported".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_argument_is_a_failure() {
        let result = dispatcher()
            .dispatch(InvocationRequest::without_arguments("calculate"))
            .await;
        assert_eq!(
            result,
            InvocationResult::Failure(
                "Error: Expression is required and must be a string".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_deeply_nested_expression_is_a_failure() {
        let expression = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        let result = dispatcher()
            .dispatch(InvocationRequest::new(
                "calculate",
                args(serde_json::json!({ "expression": expression })),
            ))
            .await;
        assert!(result.is_error());
        assert!(result.text().starts_with("Error: Invalid mathematical expression: "));
    }

    #[tokio::test]
    async fn test_panicking_handler_is_isolated() {
        let registry = ToolRegistry::builder()
            .register(PanickingTool)
            .build()
            .unwrap();
        let dispatcher = ToolDispatcher::new(Arc::new(registry));

        let result = dispatcher
            .dispatch(InvocationRequest::without_arguments("explode"))
            .await;
        assert_eq!(
            result,
            InvocationResult::Failure("Error: Tool execution panicked: kaboom".to_string())
        );

        // The dispatcher keeps working after a panic.
        let again = dispatcher
            .dispatch(InvocationRequest::without_arguments("explode"))
            .await;
        assert!(again.is_error());
    }

    #[tokio::test]
    async fn test_listed_names_are_routable() {
        let dispatcher = dispatcher();
        for name in dispatcher.registry().names() {
            let result = dispatcher
                .dispatch(InvocationRequest::without_arguments(name))
                .await;
            assert!(
                !result.text().contains("Unknown tool"),
                "{} should be routable",
                name
            );
        }
    }
}
