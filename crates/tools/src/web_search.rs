//! Web search tool backed by the DuckDuckGo Instant Answer API.
//!
//! The Instant Answer API returns an abstract plus related topics for a
//! query, without requiring an API key. Parsing is kept in a pure
//! function so it can be tested against captured fixtures.

use async_trait::async_trait;
use shrike_core::error::ToolError;
use shrike_core::tool::{Tool, ToolResult};
use tracing::debug;

pub struct WebSearchTool {
    client: reqwest::Client,
}

impl WebSearchTool {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web via DuckDuckGo. Returns a short answer or a list of related results."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        debug!(query, "Searching DuckDuckGo");

        let response = self
            .client
            .get("https://api.duckduckgo.com/")
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "web_search".into(),
                reason: e.to_string(),
            })?;

        let body: serde_json::Value =
            response.json().await.map_err(|e| ToolError::ExecutionFailed {
                tool_name: "web_search".into(),
                reason: format!("Failed to parse response: {e}"),
            })?;

        let summary = summarize_instant_answer(&body);
        if summary.is_empty() {
            Ok(ToolResult::ok(format!("No results found for '{query}'")))
        } else {
            Ok(ToolResult::ok(summary))
        }
    }
}

/// Flatten an Instant Answer payload into readable text: the abstract
/// first, then related topic snippets with their URLs.
fn summarize_instant_answer(body: &serde_json::Value) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(abstract_text) = body["AbstractText"].as_str() {
        if !abstract_text.is_empty() {
            let source = body["AbstractURL"].as_str().unwrap_or("");
            if source.is_empty() {
                parts.push(abstract_text.to_string());
            } else {
                parts.push(format!("{abstract_text} ({source})"));
            }
        }
    }

    if let Some(answer) = body["Answer"].as_str() {
        if !answer.is_empty() {
            parts.push(answer.to_string());
        }
    }

    if let Some(topics) = body["RelatedTopics"].as_array() {
        for topic in topics.iter().take(5) {
            // Category groupings nest their topics one level down
            if let Some(subtopics) = topic["Topics"].as_array() {
                for sub in subtopics.iter().take(2) {
                    if let Some(line) = topic_line(sub) {
                        parts.push(line);
                    }
                }
                continue;
            }
            if let Some(line) = topic_line(topic) {
                parts.push(line);
            }
        }
    }

    parts.join("\n")
}

fn topic_line(topic: &serde_json::Value) -> Option<String> {
    let text = topic["Text"].as_str().filter(|t| !t.is_empty())?;
    match topic["FirstURL"].as_str().filter(|u| !u.is_empty()) {
        Some(url) => Some(format!("- {text} ({url})")),
        None => Some(format!("- {text}")),
    }
}
