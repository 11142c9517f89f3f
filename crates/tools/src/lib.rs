//! Built-in tool implementations for Shrike.
//!
//! Tools give the agent abilities the model lacks: check the clock,
//! search the web, look up Wikipedia, pull a YouTube transcript.

pub mod time;
pub mod web_search;
pub mod wikipedia;
pub mod youtube_transcript;

use shrike_core::tool::ToolRegistry;

/// Create a default tool registry with all built-in tools.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(time::TimeTool));
    registry.register(Box::new(web_search::WebSearchTool::new()));
    registry.register(Box::new(wikipedia::WikipediaTool::new()));
    registry.register(Box::new(youtube_transcript::YoutubeTranscriptTool::new()));
    registry
}
