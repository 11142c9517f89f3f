//! # Shrike Core
//!
//! Domain types, traits, and error definitions for the Shrike chat agent.
//! This crate has no framework dependencies — it defines the domain model
//! that the provider, tool, and agent crates implement against.
//!
//! All other crates depend inward on this one, which keeps the dependency
//! graph clean and makes the agent loop testable with mock providers and
//! tools.

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, ToolError};
pub use message::{Conversation, ConversationId, Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StreamChunk, ToolDefinition, Usage};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
