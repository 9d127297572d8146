use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // OpenRouter
    pub openrouter_api_key: String,
    pub openrouter_base_url: String,
    pub openrouter_model: String,

    // Attribution
    pub site_url: String,

    // Local history
    pub history_file: String,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // OpenRouter
            openrouter_api_key: std::env::var("OPENROUTER_API_KEY")
                .context("OPENROUTER_API_KEY not set")?,
            openrouter_base_url: std::env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
            openrouter_model: std::env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| "google/gemini-2.5-flash".to_string()),

            // Attribution headers sent with every provider call
            site_url: std::env::var("SITE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),

            // Local history
            history_file: std::env::var("HISTORY_FILE")
                .unwrap_or_else(|_| "data/history.json".to_string()),

            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }
}
