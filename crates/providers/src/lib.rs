//! LLM provider implementations for Shrike.
//!
//! All providers implement the `shrike_core::Provider` trait. The
//! registry constructs the right backend from configuration and fails
//! fast when a required API key is missing.

pub mod anthropic;
pub mod openai_compat;
pub mod registry;

pub use anthropic::AnthropicProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use registry::{build_from_config, build_provider, resolve_model, ProviderKind, ProviderRegistry};
