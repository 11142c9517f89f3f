//! Provider registry — selects the correct LLM backend based on config.
//!
//! Provider names form a closed set; an unknown name is a configuration
//! error, not a fallback to some default backend. Providers that need an
//! API key fail fast at construction when no key can be found.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use shrike_config::AppConfig;
use shrike_core::error::ProviderError;
use shrike_core::provider::Provider;

use crate::anthropic::AnthropicProvider;
use crate::openai_compat::OpenAiCompatProvider;

/// The closed set of supported provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Google,
    OpenRouter,
    Xai,
    Ollama,
    Gpt4Free,
}

impl ProviderKind {
    /// The canonical configuration name for this backend.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Xai => "xai",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Gpt4Free => "gpt4free",
        }
    }

    /// The model used when the config names none.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Anthropic => "claude-sonnet-4-20250514",
            ProviderKind::Google => "gemini-2.0-flash",
            ProviderKind::OpenRouter => "qwen/qwq-32b:free",
            ProviderKind::Xai => "grok-3-mini",
            ProviderKind::Ollama => "qwen2.5",
            ProviderKind::Gpt4Free => "gpt-4o-mini",
        }
    }

    /// The environment variable consulted for this backend's API key.
    /// Local backends need no key.
    pub fn env_key_var(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Google => Some("GOOGLE_API_KEY"),
            ProviderKind::OpenRouter => Some("OPENROUTER_API_KEY"),
            ProviderKind::Xai => Some("XAI_API_KEY"),
            ProviderKind::Ollama | ProviderKind::Gpt4Free => None,
        }
    }

    pub fn all() -> &'static [ProviderKind] {
        &[
            ProviderKind::OpenAi,
            ProviderKind::Anthropic,
            ProviderKind::Google,
            ProviderKind::OpenRouter,
            ProviderKind::Xai,
            ProviderKind::Ollama,
            ProviderKind::Gpt4Free,
        ]
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "google" | "gemini" => Ok(ProviderKind::Google),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "xai" | "grok" => Ok(ProviderKind::Xai),
            "ollama" => Ok(ProviderKind::Ollama),
            "gpt4free" | "g4f" => Ok(ProviderKind::Gpt4Free),
            other => Err(ProviderError::NotConfigured(format!(
                "unknown provider '{other}' (expected one of: openai, anthropic, google, openrouter, xai, ollama, gpt4free)"
            ))),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Build a provider for the given kind, resolving its API key from the
/// config (per-provider entry, then top-level key, then environment).
///
/// Fails with `ProviderError::NotConfigured` when a key-requiring
/// backend has no key available.
pub fn build_provider(
    kind: ProviderKind,
    config: &AppConfig,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let name = kind.name();
    let provider_config = config.providers.get(name);
    let api_url = provider_config.and_then(|p| p.api_url.as_deref());

    let api_key = config
        .api_key_for(name)
        .or_else(|| kind.env_key_var().and_then(|var| std::env::var(var).ok()));

    match kind {
        ProviderKind::Anthropic => {
            let key = api_key.ok_or_else(|| missing_key(kind))?;
            let mut p = AnthropicProvider::new(key);
            if let Some(url) = api_url {
                p = p.with_base_url(url);
            }
            Ok(Arc::new(p))
        }
        ProviderKind::Ollama => Ok(Arc::new(OpenAiCompatProvider::ollama(api_url))),
        ProviderKind::Gpt4Free => Ok(Arc::new(OpenAiCompatProvider::gpt4free(api_url))),
        ProviderKind::OpenAi | ProviderKind::Google | ProviderKind::OpenRouter | ProviderKind::Xai => {
            let key = api_key.ok_or_else(|| missing_key(kind))?;
            let provider = match (kind, api_url) {
                (_, Some(url)) => OpenAiCompatProvider::new(name, url, key),
                (ProviderKind::OpenAi, None) => OpenAiCompatProvider::openai(key),
                (ProviderKind::Google, None) => OpenAiCompatProvider::google(key),
                (ProviderKind::OpenRouter, None) => OpenAiCompatProvider::openrouter(key),
                _ => OpenAiCompatProvider::xai(key),
            };
            Ok(Arc::new(provider))
        }
    }
}

fn missing_key(kind: ProviderKind) -> ProviderError {
    let var = kind.env_key_var().unwrap_or("API key");
    ProviderError::NotConfigured(format!(
        "no API key for provider '{}': set {var} or add it to the config",
        kind.name()
    ))
}

/// Resolve the model to use for a backend: explicit config wins, then
/// the per-provider config entry, then the backend's default.
pub fn resolve_model(kind: ProviderKind, config: &AppConfig) -> String {
    config
        .default_model
        .clone()
        .or_else(|| {
            config
                .providers
                .get(kind.name())
                .and_then(|p| p.default_model.clone())
        })
        .unwrap_or_else(|| kind.default_model().to_string())
}

/// Holds constructed providers by name.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRegistry {
    /// Create a new registry with a default provider name.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default_provider(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// List all registered provider names.
    pub fn list(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }
}

/// Build a registry from configuration: the default provider plus any
/// explicitly configured ones. Fails fast if the default backend cannot
/// be constructed.
pub fn build_from_config(config: &AppConfig) -> Result<ProviderRegistry, ProviderError> {
    let default_kind = ProviderKind::from_str(&config.default_provider)?;
    let mut registry = ProviderRegistry::new(default_kind.name());

    registry.register(default_kind.name(), build_provider(default_kind, config)?);

    for name in config.providers.keys() {
        if registry.get(name).is_some() {
            continue;
        }
        let kind = ProviderKind::from_str(name)?;
        registry.register(kind.name(), build_provider(kind, config)?);
    }

    Ok(registry)
}
