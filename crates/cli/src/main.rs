//! Shrike CLI — the main entry point.
//!
//! One-shot mode when `--input` is given, interactive terminal otherwise.
//! Both `--input` and `--system-prompt` accept either inline text or a
//! path to a file whose contents are used instead.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use shrike_agent::ChatAgent;
use shrike_config::AppConfig;
use shrike_providers::{build_provider, resolve_model, ProviderKind};

mod terminal;

#[derive(Parser)]
#[command(
    name = "shrike",
    about = "Shrike — a tool-using conversational agent",
    version,
    author
)]
struct Cli {
    /// Provider to use (openai, anthropic, google, openrouter, xai, ollama, gpt4free)
    #[arg(short, long)]
    provider: Option<String>,

    /// Model name, overriding the provider default
    #[arg(short, long)]
    model: Option<String>,

    /// One-shot input: inline text or a file path
    #[arg(short, long)]
    input: Option<String>,

    /// System prompt: inline text or a file path
    #[arg(short = 's', long)]
    system_prompt: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let provider_name = cli
        .provider
        .as_deref()
        .unwrap_or(&config.default_provider);
    let kind = ProviderKind::from_str(provider_name)?;
    let provider = build_provider(kind, &config)?;
    let model = cli
        .model
        .clone()
        .unwrap_or_else(|| resolve_model(kind, &config));

    let tools = Arc::new(shrike_tools::default_registry());

    let agent = ChatAgent::new(provider, &model)
        .with_temperature(config.default_temperature)
        .with_max_tokens(config.default_max_tokens)
        .with_max_hops(config.max_hops)
        .with_tools(tools);

    let system_prompt = cli
        .system_prompt
        .as_deref()
        .map(file_or_string)
        .transpose()?
        .or_else(|| config.system_prompt.clone());

    agent.start(system_prompt.as_deref()).await;

    match cli.input {
        Some(input) => {
            let input = file_or_string(&input)?;
            terminal::stream_turn(&agent, &input).await?;
        }
        None => {
            terminal::run(&agent, kind.name(), &model).await?;
        }
    }

    Ok(())
}

/// Treat the value as a file path if one exists, otherwise as literal text.
fn file_or_string(value: &str) -> Result<String, std::io::Error> {
    let path = Path::new(value);
    if path.is_file() {
        std::fs::read_to_string(path)
    } else {
        Ok(value.to_string())
    }
}
