//! One-shot generation from the command line, sharing the session core and
//! the durable history file with the app.
//!
//! Usage:
//!   cargo run --bin ask -- "reverse a linked list"
//!   cargo run --bin ask -- --language cpp "binary search over a sorted vec"
//!
//! Required environment variables:
//! - OPENROUTER_API_KEY
//!
//! Optional:
//! - OPENROUTER_MODEL (defaults to google/gemini-2.5-flash)
//! - HISTORY_FILE (defaults to data/history.json)

use anyhow::{bail, Context, Result};
use code_copilot::config::Config;
use code_copilot::history::{FileStorage, HistoryStore};
use code_copilot::languages::LanguageRegistry;
use code_copilot::openrouter::OpenRouterGateway;
use code_copilot::session::Session;
use std::sync::Arc;

fn parse_args() -> Result<(String, String)> {
    let mut language = "python".to_string();
    let mut prompt_parts: Vec<String> = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--language" || arg == "-l" {
            language = args.next().context("--language needs a value")?;
        } else {
            prompt_parts.push(arg);
        }
    }

    if prompt_parts.is_empty() {
        bail!("usage: ask [--language <id>] <prompt>");
    }

    Ok((prompt_parts.join(" "), language))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (prompt, language) = parse_args()?;

    if !LanguageRegistry::get().is_supported(&language) {
        let supported: Vec<_> = LanguageRegistry::get()
            .list_all()
            .iter()
            .map(|lang| lang.code)
            .collect();
        bail!(
            "unsupported language '{}' (supported: {})",
            language,
            supported.join(", ")
        );
    }

    let config = Config::from_env()?;
    let gateway = Arc::new(OpenRouterGateway::from_config(&config));
    let history = HistoryStore::load(Arc::new(FileStorage::new(&config.history_file)));
    let mut session = Session::new(gateway, history);

    let response = session.generate(&prompt, &language).await?;
    println!("{}", response.code);

    // Don't rely on the debounce timer outliving the process
    session.history().flush();

    Ok(())
}
