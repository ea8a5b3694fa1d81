//! Calculator tool definition.
//!
//! Evaluates `+ - * / ( )` over decimal literals and echoes the expression
//! alongside the result, e.g. `2 + 3 = 5`.

mod expression;

use rmcp::{
    handler::server::tool::schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, instrument};

use self::expression::{EvalError, evaluate, format_number};
use crate::domains::tools::{ToolError, ToolHandler, parse_params};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the calculate tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CalculateParams {
    /// Mathematical expression to evaluate.
    #[schemars(description = "Mathematical expression to evaluate (e.g., \"2 + 3 * 4\")")]
    pub expression: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Calculate tool - evaluates a basic arithmetic expression.
#[derive(Debug, Clone, Default)]
pub struct CalculateTool;

impl CalculateTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "calculate";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Perform basic mathematical calculations";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(expression = %params.expression))]
    pub fn execute(params: &CalculateParams) -> Result<String, ToolError> {
        let expression = params.expression.as_str();

        if expression.is_empty() {
            return Err(expression_required());
        }

        let invalid = invalid_characters(expression);
        if !invalid.is_empty() {
            let listed: Vec<String> = invalid.iter().map(|c| format!("'{}'", c)).collect();
            return Err(ToolError::rejected(format!(
                "Invalid characters in expression: {}. Only numbers and basic operators (+, -, *, /, parentheses) are allowed.",
                listed.join(", ")
            )));
        }

        let value = evaluate(expression).map_err(|e| {
            debug!("Evaluation failed: {}", e);
            match e {
                EvalError::Syntax(_) => {
                    ToolError::rejected(format!("Invalid mathematical expression: {}", expression))
                }
                EvalError::DivisionByZero => ToolError::rejected(format!(
                    "Division by zero in expression: {}",
                    expression
                )),
                EvalError::Overflow => ToolError::rejected(format!(
                    "Result out of range for expression: {}",
                    expression
                )),
            }
        })?;

        Ok(format!("{} = {}", expression, format_number(value)))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<CalculateParams>().into(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for CalculateTool {
    fn descriptor(&self) -> Tool {
        Self::to_tool()
    }

    async fn call(&self, arguments: JsonObject) -> Result<String, ToolError> {
        let params: CalculateParams =
            parse_params(arguments).map_err(|_| expression_required())?;
        Self::execute(&params)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn expression_required() -> ToolError {
    ToolError::rejected("Expression is required and must be a string")
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.') || c.is_whitespace()
}

/// Distinct disallowed characters, in order of first appearance.
fn invalid_characters(expression: &str) -> Vec<char> {
    let mut found = Vec::new();
    for c in expression.chars().filter(|c| !is_allowed(*c)) {
        if !found.contains(&c) {
            found.push(c);
        }
    }
    found
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(expression: &str) -> Result<String, ToolError> {
        CalculateTool::execute(&CalculateParams {
            expression: expression.to_string(),
        })
    }

    #[test]
    fn test_calculate_basic() {
        assert_eq!(calc("2 + 3").unwrap(), "2 + 3 = 5");
        assert_eq!(calc("(10 + 5) * 2 - 3").unwrap(), "(10 + 5) * 2 - 3 = 27");
        assert_eq!(calc("7 / 2").unwrap(), "7 / 2 = 3.5");
        assert_eq!(calc("0.1 + 0.2").unwrap(), "0.1 + 0.2 = 0.30000000000000004");
    }

    #[test]
    fn test_calculate_rejects_injection() {
        let err = calc("2 + 3; console.log(1)").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid characters in expression"));
        assert!(message.contains("';'"));
        assert!(message.contains("'c'"));
    }

    #[test]
    fn test_calculate_rejects_letters_even_if_harmless() {
        let err = calc("abc").unwrap_err();
        assert!(err.to_string().contains("Invalid characters"));
    }

    #[test]
    fn test_calculate_invalid_expression() {
        let err = calc("2 + * 3").unwrap_err();
        assert_eq!(err.to_string(), "Invalid mathematical expression: 2 + * 3");
    }

    #[test]
    fn test_calculate_empty_expression() {
        let err = calc("").unwrap_err();
        assert_eq!(err.to_string(), "Expression is required and must be a string");
    }

    #[test]
    fn test_calculate_division_by_zero() {
        let err = calc("1 / 0").unwrap_err();
        assert_eq!(err.to_string(), "Division by zero in expression: 1 / 0");
    }

    #[test]
    fn test_invalid_characters_are_deduplicated() {
        assert_eq!(invalid_characters("a + a + b"), vec!['a', 'b']);
        assert!(invalid_characters(" 1 + 2\t").is_empty());
    }

    #[tokio::test]
    async fn test_call_with_missing_or_non_string_expression() {
        for value in [None, Some(serde_json::json!(42)), Some(serde_json::json!(null))] {
            let mut args = JsonObject::new();
            if let Some(value) = value {
                args.insert("expression".to_string(), value);
            }
            let err = CalculateTool.call(args).await.unwrap_err();
            assert_eq!(err.to_string(), "Expression is required and must be a string");
        }
    }

    #[tokio::test]
    async fn test_call_with_deep_nesting_is_rejected() {
        let expression = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        let mut args = JsonObject::new();
        args.insert("expression".to_string(), serde_json::json!(expression));
        let err = CalculateTool.call(args).await.unwrap_err();
        assert!(err.to_string().starts_with("Invalid mathematical expression: "));
    }

    #[test]
    fn test_descriptor_requires_expression() {
        let tool = CalculateTool::to_tool();
        assert_eq!(tool.name, "calculate");
        let required = tool.input_schema.get("required").cloned().unwrap();
        assert_eq!(required, serde_json::json!(["expression"]));
    }
}
