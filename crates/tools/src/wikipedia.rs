//! Wikipedia lookup tool using the MediaWiki extracts API.
//!
//! Fetches the plain-text intro of the best-matching article. Parsing
//! is factored out so it can be tested against captured fixtures.

use async_trait::async_trait;
use shrike_core::error::ToolError;
use shrike_core::tool::{Tool, ToolResult};
use tracing::debug;

const API_URL: &str = "https://en.wikipedia.org/w/api.php";

pub struct WikipediaTool {
    client: reqwest::Client,
}

impl WikipediaTool {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("shrike-agent/0.1")
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }
}

impl Default for WikipediaTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn description(&self) -> &str {
        "Look up a topic on Wikipedia. Returns the plain-text introduction of the best-matching article."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The topic to look up"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        debug!(query, "Querying Wikipedia");

        let response = self
            .client
            .get(API_URL)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("generator", "search"),
                ("gsrlimit", "1"),
                ("gsrsearch", query),
            ])
            .send()
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "wikipedia".into(),
                reason: e.to_string(),
            })?;

        let body: serde_json::Value =
            response.json().await.map_err(|e| ToolError::ExecutionFailed {
                tool_name: "wikipedia".into(),
                reason: format!("Failed to parse response: {e}"),
            })?;

        match extract_article(&body) {
            Some((title, extract)) => Ok(ToolResult::ok(format!("{title}\n\n{extract}"))),
            None => Ok(ToolResult::ok(format!("No Wikipedia article found for '{query}'"))),
        }
    }
}

/// Pull the first page's title and extract out of a `query.pages` map.
fn extract_article(body: &serde_json::Value) -> Option<(String, String)> {
    let pages = body["query"]["pages"].as_object()?;
    // Pages are keyed by page id; with gsrlimit=1 there is at most one
    let page = pages.values().next()?;
    let title = page["title"].as_str()?.to_string();
    let extract = page["extract"].as_str().filter(|e| !e.is_empty())?;
    Some((title, extract.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_and_intro() {
        let body = serde_json::json!({
            "query": {
                "pages": {
                    "25458": {
                        "pageid": 25458,
                        "title": "Rust (programming language)",
                        "extract": "Rust is a general-purpose programming language emphasizing performance and safety.\n"
                    }
                }
            }
        });
        let (title, extract) = extract_article(&body).unwrap();
        assert_eq!(title, "Rust (programming language)");
        assert!(extract.starts_with("Rust is a general-purpose"));
        assert!(!extract.ends_with('\n'));
    }

    #[test]
    fn no_pages_yields_none() {
        let body = serde_json::json!({ "batchcomplete": "" });
        assert!(extract_article(&body).is_none());
    }

    #[test]
    fn empty_extract_yields_none() {
        let body = serde_json::json!({
            "query": {
                "pages": {
                    "1": { "title": "Empty", "extract": "" }
                }
            }
        });
        assert!(extract_article(&body).is_none());
    }

    #[tokio::test]
    async fn missing_query_returns_error() {
        let tool = WikipediaTool::new();
        let result = tool.execute(serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn tool_definition() {
        let tool = WikipediaTool::new();
        let def = tool.to_definition();
        assert_eq!(def.name, "wikipedia");
        assert_eq!(def.parameters["required"], serde_json::json!(["query"]));
    }
}
