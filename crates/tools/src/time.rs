//! Time tool — reports the current local time.
//!
//! Useful as a sanity check that the tool loop works end-to-end: the
//! model cannot know the wall clock, so it has to call this.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use shrike_core::error::ToolError;
use shrike_core::tool::{Tool, ToolResult};

pub struct TimeTool;

impl TimeTool {
    fn format(now: DateTime<Local>) -> String {
        now.format("%-I:%M %p").to_string()
    }
}

#[async_trait]
impl Tool for TimeTool {
    fn name(&self) -> &str {
        "time"
    }

    fn description(&self) -> &str {
        "Get the current local time. Takes no arguments."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::ok(Self::format(Local::now())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_noon_without_leading_zero() {
        let noon = Local.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(TimeTool::format(noon), "12:00 PM");
    }

    #[test]
    fn formats_morning() {
        let morning = Local.with_ymd_and_hms(2025, 6, 1, 9, 5, 0).unwrap();
        assert_eq!(TimeTool::format(morning), "9:05 AM");
    }

    #[tokio::test]
    async fn execute_returns_a_time_string() {
        let tool = TimeTool;
        let result = tool.execute(serde_json::json!({})).await.unwrap();
        assert!(result.success);
        assert!(result.output.ends_with("AM") || result.output.ends_with("PM"));
    }

    #[test]
    fn tool_definition() {
        let tool = TimeTool;
        let def = tool.to_definition();
        assert_eq!(def.name, "time");
        assert!(!def.description.is_empty());
    }
}
