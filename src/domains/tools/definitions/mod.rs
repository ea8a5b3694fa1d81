//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod calculate;
pub mod current_time;
pub mod generate_uuid;
pub mod reverse_string;

pub use calculate::{CalculateParams, CalculateTool};
pub use current_time::{CurrentTimeParams, CurrentTimeTool, TimeFormat};
pub use generate_uuid::{GenerateUuidParams, GenerateUuidTool};
pub use reverse_string::{ReverseStringParams, ReverseStringTool};
