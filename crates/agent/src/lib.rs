//! # Shrike Agent
//!
//! The chat agent that ties a provider to a tool registry and drives the
//! turn-resolution loop, in both blocking and streaming forms.

pub mod chat;

pub use chat::{ChatAgent, DEFAULT_MAX_HOPS, DEFAULT_SYSTEM_PROMPT};
