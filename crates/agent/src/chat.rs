//! The chat agent: a conversation plus the turn-resolution loop.
//!
//! A turn starts with a user message and ends with an assistant message
//! that carries no tool calls. In between, each model response asking
//! for tools gets resolved — every requested call answered by a tool
//! result message — and the model is invoked again with the grown
//! conversation. Hops are capped; hitting the cap is an error, not a
//! silent truncation.

use std::sync::Arc;

use shrike_core::error::{Error, Result};
use shrike_core::message::{Conversation, ConversationId, Message};
use shrike_core::provider::{Provider, ProviderRequest, StreamChunk, ToolDefinition};
use shrike_core::tool::{ToolCall, ToolRegistry};
use tokio::sync::mpsc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

/// System prompt used when `start` is given none.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Default cap on tool-resolution hops per turn.
pub const DEFAULT_MAX_HOPS: u32 = 8;

/// A conversational agent mediating between an LLM provider and a set
/// of named tools.
///
/// The conversation lives behind a mutex held for the whole turn, so
/// concurrent `call`s serialize rather than interleave their messages.
pub struct ChatAgent {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Arc<ToolRegistry>,
    max_hops: u32,
    conversation: Arc<Mutex<Conversation>>,
}

impl ChatAgent {
    /// Create a new agent for a provider and model.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            tools: Arc::new(ToolRegistry::new()),
            max_hops: DEFAULT_MAX_HOPS,
            conversation: Arc::new(Mutex::new(Conversation::new())),
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the max tokens per model response.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Attach a tool registry.
    pub fn with_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the maximum tool-resolution hops per turn.
    pub fn with_max_hops(mut self, max_hops: u32) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Seed the conversation with a system prompt.
    ///
    /// Calling `start` on a running agent resets it: the log is cleared
    /// and re-seeded, so there is always exactly one system message and
    /// it is always first.
    pub async fn start(&self, system_prompt: Option<&str>) {
        let prompt = system_prompt.unwrap_or(DEFAULT_SYSTEM_PROMPT);
        let mut conv = self.conversation.lock().await;
        if !conv.is_empty() {
            debug!(conversation_id = %conv.id, "Restarting agent, clearing conversation");
            conv.clear();
        }
        conv.push(Message::system(prompt));
        info!(conversation_id = %conv.id, "Agent started");
    }

    /// Clear the conversation. Subsequent calls fail until `start`.
    pub async fn stop(&self) {
        let mut conv = self.conversation.lock().await;
        conv.clear();
        info!(conversation_id = %conv.id, "Agent stopped");
    }

    /// Whether `start` has seeded the conversation.
    pub async fn is_started(&self) -> bool {
        !self.conversation.lock().await.is_empty()
    }

    /// The conversation id.
    pub async fn conversation_id(&self) -> ConversationId {
        self.conversation.lock().await.id.clone()
    }

    /// A copy of the conversation log.
    pub async fn history(&self) -> Vec<Message> {
        self.conversation.lock().await.snapshot().to_vec()
    }

    /// Run one turn to completion and return the final assistant text.
    pub async fn call(&self, input: impl Into<String>) -> Result<String> {
        let mut conv = Arc::clone(&self.conversation).lock_owned().await;
        if conv.is_empty() {
            return Err(Error::NotStarted);
        }

        conv.push(Message::user(input));
        let tool_definitions = self.tool_definitions();

        info!(
            conversation_id = %conv.id,
            messages = conv.len(),
            "Resolving turn"
        );

        for hop in 1..=self.max_hops {
            debug!(conversation_id = %conv.id, hop, "Turn hop");

            let request = self.build_request(&conv, &tool_definitions, false);
            let response = self.provider.complete(request).await?;

            let tool_calls = response.message.tool_calls.clone();
            let content = response.message.content.clone();
            conv.push(response.message);

            if tool_calls.is_empty() {
                return Ok(content);
            }

            debug!(tool_count = tool_calls.len(), "Resolving tool calls");
            resolve_tool_calls(&mut conv, &self.tools, &tool_calls).await;
        }

        warn!(
            conversation_id = %conv.id,
            max_hops = self.max_hops,
            "Tool resolution loop exceeded hop cap"
        );
        Err(Error::ToolLoopExceeded {
            hops: self.max_hops,
        })
    }

    /// Run one turn, streaming assistant text deltas to the receiver.
    ///
    /// Each hop's deltas are buffered until the hop completes; a hop that
    /// ends in tool calls is resolved silently and nothing of it reaches
    /// the caller. Only the final hop's deltas are forwarded, in order,
    /// so the concatenated stream is byte-identical to what `call` would
    /// have returned. If the receiver is dropped the turn still runs to
    /// completion and commits.
    pub async fn call_stream(
        &self,
        input: impl Into<String>,
    ) -> Result<mpsc::Receiver<Result<String>>> {
        let mut conv = Arc::clone(&self.conversation).lock_owned().await;
        if conv.is_empty() {
            return Err(Error::NotStarted);
        }

        conv.push(Message::user(input));
        let tool_definitions = self.tool_definitions();

        let (tx, rx) = mpsc::channel(64);
        let provider = Arc::clone(&self.provider);
        let tools = Arc::clone(&self.tools);
        let model = self.model.clone();
        let temperature = self.temperature;
        let max_tokens = self.max_tokens;
        let max_hops = self.max_hops;

        tokio::spawn(async move {
            let result = run_stream_turn(
                &mut conv,
                provider.as_ref(),
                &tools,
                &model,
                temperature,
                max_tokens,
                &tool_definitions,
                max_hops,
                &tx,
            )
            .await;

            if let Err(e) = result {
                let _ = tx.send(Err(e)).await;
            }
        });

        Ok(rx)
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        if self.tools.is_empty() {
            return Vec::new();
        }
        if !self.provider.supports_tools() {
            warn!(
                provider = self.provider.name(),
                "Provider does not support tools, sending none"
            );
            return Vec::new();
        }
        self.tools.definitions()
    }

    fn build_request(
        &self,
        conv: &Conversation,
        tools: &[ToolDefinition],
        stream: bool,
    ) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages: conv.snapshot().to_vec(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: tools.to_vec(),
            stream,
        }
    }
}

/// Answer every tool call in request order with a tool result message.
///
/// Failures — unknown tool, bad arguments, execution error — become
/// error-text results so the model can see them and recover; they never
/// abort the turn.
async fn resolve_tool_calls(
    conv: &mut Conversation,
    tools: &ToolRegistry,
    tool_calls: &[shrike_core::message::MessageToolCall],
) {
    for tc in tool_calls {
        let arguments: serde_json::Value = match serde_json::from_str(&tc.arguments) {
            Ok(v) => v,
            Err(e) => {
                warn!(tool = %tc.name, error = %e, "Unparseable tool arguments");
                conv.push(Message::tool_result(
                    &tc.id,
                    format!("Error: invalid arguments for tool '{}': {e}", tc.name),
                ));
                continue;
            }
        };

        let call = ToolCall {
            id: tc.id.clone(),
            name: tc.name.clone(),
            arguments,
        };

        let start = std::time::Instant::now();
        match tools.execute(&call).await {
            Ok(result) => {
                debug!(
                    tool = %tc.name,
                    success = result.success,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Tool executed"
                );
                conv.push(Message::tool_result(&tc.id, result.output));
            }
            Err(e) => {
                warn!(tool = %tc.name, error = %e, "Tool execution failed");
                conv.push(Message::tool_result(&tc.id, format!("Error: {e}")));
            }
        }
    }
}

/// The streaming turn loop. Runs inside a spawned task holding the
/// conversation guard; errors are returned to be sent down the channel.
#[allow(clippy::too_many_arguments)]
async fn run_stream_turn(
    conv: &mut OwnedMutexGuard<Conversation>,
    provider: &dyn Provider,
    tools: &ToolRegistry,
    model: &str,
    temperature: f32,
    max_tokens: Option<u32>,
    tool_definitions: &[ToolDefinition],
    max_hops: u32,
    tx: &mpsc::Sender<Result<String>>,
) -> Result<()> {
    for hop in 1..=max_hops {
        debug!(conversation_id = %conv.id, hop, "Streaming turn hop");

        let request = ProviderRequest {
            model: model.to_string(),
            messages: conv.snapshot().to_vec(),
            temperature,
            max_tokens,
            tools: tool_definitions.to_vec(),
            stream: true,
        };

        let mut chunks = provider.stream(request).await?;
        let mut content = String::new();
        let mut deltas: Vec<String> = Vec::new();
        let mut tool_calls = Vec::new();

        while let Some(chunk) = chunks.recv().await {
            let StreamChunk {
                content: delta,
                tool_calls: chunk_tool_calls,
                done,
                ..
            } = chunk?;

            if !chunk_tool_calls.is_empty() {
                tool_calls = chunk_tool_calls;
            }

            if let Some(delta) = delta {
                content.push_str(&delta);
                deltas.push(delta);
            }

            if done {
                break;
            }
        }

        let mut message = Message::assistant(content);
        message.tool_calls = tool_calls.clone();
        conv.push(message);

        if tool_calls.is_empty() {
            // Final hop: forward its buffered deltas. A tool hop never
            // reaches this point, so none of its text is surfaced.
            for delta in deltas {
                // A dropped receiver does not abort the turn
                if tx.send(Ok(delta)).await.is_err() {
                    break;
                }
            }
            return Ok(());
        }

        debug!(tool_count = tool_calls.len(), "Resolving tool calls");
        resolve_tool_calls(conv, tools, &tool_calls).await;
    }

    warn!(
        conversation_id = %conv.id,
        max_hops,
        "Tool resolution loop exceeded hop cap"
    );
    Err(Error::ToolLoopExceeded { hops: max_hops })
}
