//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients to perform
//! specific actions or computations.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handlers.rs` - The `ToolHandler` trait and invocation request/result types
//! - `registry.rs` - Immutable catalog of descriptors and handlers
//! - `dispatcher.rs` - Routes calls to handlers and isolates their failures
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define params, `execute()`, `to_tool()` and implement `ToolHandler`
//! 3. Export in `definitions/mod.rs`
//! 4. Register it in `ToolRegistry::standard()`
//!
//! Listing and dispatch both read the registry, so nothing else changes.

pub mod definitions;
mod dispatcher;
mod error;
mod handlers;
mod registry;

pub use dispatcher::ToolDispatcher;
pub use error::ToolError;
pub use handlers::*;
pub use registry::{ToolRegistry, ToolRegistryBuilder};
