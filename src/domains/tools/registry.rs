//! Tool Registry - central registration of all tools.
//!
//! Each entry pairs the descriptor advertised by `tools/list` with the handler
//! that `tools/call` routes to. Both come from the same registration, so the
//! listed names and the routable names cannot drift apart.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::Tool;
use tracing::debug;

use super::ToolError;
use super::ToolHandler;
use super::definitions::{CalculateTool, CurrentTimeTool, GenerateUuidTool, ReverseStringTool};

// ============================================================================
// Tool Registry
// ============================================================================

/// Immutable catalog of tools, in registration order.
pub struct ToolRegistry {
    descriptors: Vec<Tool>,
    handlers: Vec<Arc<dyn ToolHandler>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Start building a registry.
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// The registry with every built-in tool.
    pub fn standard() -> Result<Self, ToolError> {
        Self::builder()
            .register(CalculateTool)
            .register(GenerateUuidTool)
            .register(ReverseStringTool)
            .register(CurrentTimeTool)
            .build()
    }

    /// All tool descriptors, in registration order.
    pub fn list(&self) -> &[Tool] {
        &self.descriptors
    }

    /// All tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|t| t.name.as_ref()).collect()
    }

    /// Find the handler registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn ToolHandler>, ToolError> {
        self.index
            .get(name)
            .map(|&i| &self.handlers[i])
            .ok_or_else(|| ToolError::not_found(name))
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Builder collecting handlers before the registry is frozen.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    handlers: Vec<Arc<dyn ToolHandler>>,
}

impl ToolRegistryBuilder {
    /// Add a tool. Order of calls is the order tools are listed in.
    pub fn register(mut self, handler: impl ToolHandler + 'static) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Freeze the registry, rejecting duplicate tool names.
    pub fn build(self) -> Result<ToolRegistry, ToolError> {
        let mut descriptors = Vec::with_capacity(self.handlers.len());
        let mut index = HashMap::with_capacity(self.handlers.len());

        for (i, handler) in self.handlers.iter().enumerate() {
            let descriptor = handler.descriptor();
            let name = descriptor.name.to_string();
            if index.insert(name.clone(), i).is_some() {
                return Err(ToolError::duplicate(name));
            }
            debug!("Registered tool: {}", name);
            descriptors.push(descriptor);
        }

        Ok(ToolRegistry {
            descriptors,
            handlers: self.handlers,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_names_in_order() {
        let registry = ToolRegistry::standard().unwrap();
        assert_eq!(
            registry.names(),
            vec!["calculate", "generate_uuid", "reverse_string", "current_time"]
        );
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_list_is_stable() {
        let registry = ToolRegistry::standard().unwrap();
        let first: Vec<_> = registry.list().iter().map(|t| t.name.clone()).collect();
        let second: Vec<_> = registry.list().iter().map(|t| t.name.clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_listed_tool_resolves() {
        let registry = ToolRegistry::standard().unwrap();
        for name in registry.names() {
            assert!(registry.resolve(name).is_ok(), "{} should resolve", name);
        }
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = ToolRegistry::standard().unwrap();
        let err = registry.resolve("unknown").err().unwrap();
        assert_eq!(err.to_string(), "Unknown tool: unknown");
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let result = ToolRegistry::builder()
            .register(CalculateTool)
            .register(CalculateTool)
            .build();
        assert!(matches!(result, Err(ToolError::Duplicate(name)) if name == "calculate"));
    }

    #[test]
    fn test_descriptors_are_object_schemas() {
        let registry = ToolRegistry::standard().unwrap();
        for tool in registry.list() {
            assert_eq!(
                tool.input_schema.get("type"),
                Some(&serde_json::json!("object")),
                "{} schema should be an object",
                tool.name
            );
            assert!(tool.description.is_some());
        }
    }
}
