//! Current time tool definition.
//!
//! Formats the wall clock as an ISO-8601 timestamp, Unix seconds, or a
//! human-readable local time.

use std::str::FromStr;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use rmcp::{
    handler::server::tool::schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::domains::tools::{ToolError, ToolHandler, parse_params};

fn default_format() -> String {
    "iso".to_string()
}

/// Parameters for the current time tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CurrentTimeParams {
    /// Output format.
    #[schemars(description = "Format for the timestamp (iso, unix, readable)")]
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for CurrentTimeParams {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

/// Supported timestamp formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// `2024-01-15T15:04:05.123Z`
    Iso,
    /// `1705331045`
    Unix,
    /// `1/15/2024, 3:04:05 PM` in local time.
    Readable,
}

impl FromStr for TimeFormat {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "iso" => Ok(Self::Iso),
            "unix" => Ok(Self::Unix),
            "readable" => Ok(Self::Readable),
            other => Err(ToolError::rejected(format!(
                "Unsupported format: {}. Use 'iso', 'unix', or 'readable'.",
                other
            ))),
        }
    }
}

impl TimeFormat {
    /// Render `now` in this format.
    pub fn render(self, now: DateTime<Utc>) -> String {
        match self {
            Self::Iso => now.to_rfc3339_opts(SecondsFormat::Millis, true),
            Self::Unix => now.timestamp().to_string(),
            Self::Readable => now
                .with_timezone(&Local)
                .format("%-m/%-d/%Y, %-I:%M:%S %p")
                .to_string(),
        }
    }
}

/// Current time tool - returns the current date and time.
#[derive(Debug, Clone, Default)]
pub struct CurrentTimeTool;

impl CurrentTimeTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "current_time";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get current date and time";

    /// Execute the tool logic.
    pub fn execute(params: &CurrentTimeParams) -> Result<String, ToolError> {
        let format: TimeFormat = params.format.parse()?;
        Ok(format.render(Utc::now()))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<CurrentTimeParams>().into(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for CurrentTimeTool {
    fn descriptor(&self) -> Tool {
        Self::to_tool()
    }

    async fn call(&self, arguments: JsonObject) -> Result<String, ToolError> {
        let params: CurrentTimeParams = parse_params(arguments)?;
        Self::execute(&params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(format: &str) -> Result<String, ToolError> {
        CurrentTimeTool::execute(&CurrentTimeParams {
            format: format.to_string(),
        })
    }

    #[test]
    fn test_unix_is_close_to_now() {
        let text = at("unix").unwrap();
        assert!(text.chars().all(|c| c.is_ascii_digit()));
        let value: i64 = text.parse().unwrap();
        assert!((Utc::now().timestamp() - value).abs() <= 2);
    }

    #[test]
    fn test_iso_parses_back() {
        let text = CurrentTimeTool::execute(&CurrentTimeParams::default()).unwrap();
        assert!(text.ends_with('Z'));
        let parsed = DateTime::parse_from_rfc3339(&text).unwrap();
        assert!((Utc::now().timestamp() - parsed.timestamp()).abs() <= 2);
    }

    #[test]
    fn test_render_fixed_instant() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 15, 4, 5).unwrap();
        assert_eq!(TimeFormat::Iso.render(instant), "2024-01-15T15:04:05.000Z");
        assert_eq!(TimeFormat::Unix.render(instant), "1705331045");
    }

    #[test]
    fn test_readable_shape() {
        let text = at("readable").unwrap();
        assert!(text.contains(", "));
        assert!(text.ends_with("AM") || text.ends_with("PM"));
    }

    #[test]
    fn test_unsupported_format() {
        let err = at("bogus").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Unsupported format: bogus"));
        assert!(message.contains("'iso'"));
        assert!(message.contains("'unix'"));
        assert!(message.contains("'readable'"));
    }
}
