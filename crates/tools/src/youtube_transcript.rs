//! YouTube transcript tool.
//!
//! Fetches a video's watch page, finds the first caption track in the
//! embedded player config, then fetches and flattens the timedtext XML
//! into plain text. The HTML/XML scraping steps are pure functions so
//! they can be tested on captured fixtures.

use async_trait::async_trait;
use shrike_core::error::ToolError;
use shrike_core::tool::{Tool, ToolResult};
use tracing::debug;

pub struct YoutubeTranscriptTool {
    client: reqwest::Client,
}

impl YoutubeTranscriptTool {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    fn err(reason: impl Into<String>) -> ToolError {
        ToolError::ExecutionFailed {
            tool_name: "youtube_transcript".into(),
            reason: reason.into(),
        }
    }
}

impl Default for YoutubeTranscriptTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for YoutubeTranscriptTool {
    fn name(&self) -> &str {
        "youtube_transcript"
    }

    fn description(&self) -> &str {
        "Fetch the transcript (captions) of a YouTube video given its URL or video ID."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "YouTube video URL or bare video ID"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let url = arguments["url"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'url' argument".into()))?;

        let video_id = extract_video_id(url)
            .ok_or_else(|| ToolError::InvalidArguments(format!("Not a YouTube URL: {url}")))?;

        debug!(video_id, "Fetching YouTube watch page");

        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        let html = self
            .client
            .get(&watch_url)
            .send()
            .await
            .map_err(|e| Self::err(e.to_string()))?
            .text()
            .await
            .map_err(|e| Self::err(e.to_string()))?;

        let caption_url = extract_caption_url(&html)
            .ok_or_else(|| Self::err(format!("No captions available for video {video_id}")))?;

        let xml = self
            .client
            .get(&caption_url)
            .send()
            .await
            .map_err(|e| Self::err(e.to_string()))?
            .text()
            .await
            .map_err(|e| Self::err(e.to_string()))?;

        let transcript = flatten_transcript_xml(&xml);
        if transcript.is_empty() {
            return Err(Self::err(format!("Empty transcript for video {video_id}")));
        }

        Ok(ToolResult::ok(transcript))
    }
}

/// Accepts full watch URLs, youtu.be short links, or a bare 11-char ID.
fn extract_video_id(input: &str) -> Option<String> {
    if let Some(idx) = input.find("v=") {
        let id: String = input[idx + 2..]
            .chars()
            .take_while(|c| *c != '&' && *c != '#')
            .collect();
        return (!id.is_empty()).then_some(id);
    }
    if let Some(idx) = input.find("youtu.be/") {
        let id: String = input[idx + 9..]
            .chars()
            .take_while(|c| *c != '?' && *c != '&')
            .collect();
        return (!id.is_empty()).then_some(id);
    }
    // Bare video ID
    let looks_like_id = input.len() == 11
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    looks_like_id.then(|| input.to_string())
}

/// Find the first caption track's baseUrl inside the watch-page HTML.
///
/// The player config embeds `"captionTracks":[{"baseUrl":"..."},...]`
/// with JSON-escaped URLs.
fn extract_caption_url(html: &str) -> Option<String> {
    let start = html.find("\"captionTracks\":")?;
    let rest = &html[start..];
    let url_start = rest.find("\"baseUrl\":\"")? + "\"baseUrl\":\"".len();
    let rest = &rest[url_start..];
    let url_end = rest.find('"')?;
    let raw = &rest[..url_end];
    Some(raw.replace("\\u0026", "&").replace("\\/", "/"))
}

/// Strip timedtext XML down to plain text: drop tags, decode the
/// entities YouTube emits, join cue lines with spaces.
fn flatten_transcript_xml(xml: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;

    for c in xml.chars() {
        match c {
            '<' => {
                in_tag = true;
                if !out.ends_with(' ') && !out.is_empty() {
                    out.push(' ');
                }
            }
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    let decoded = out
        .replace("&amp;#39;", "'")
        .replace("&#39;", "'")
        .replace("&amp;quot;", "\"")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace('\n', " ");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
