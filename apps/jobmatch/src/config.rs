use anyhow::{Context, Result};

use crate::ranking::chunking::CHUNK_BUDGET;

/// Which page loader backs the scraper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScraperBackend {
    /// Headless Chrome; renders JavaScript.
    Chrome,
    /// Plain HTTP GET; static markup only.
    Http,
}

/// Application configuration loaded from environment variables.
/// Loaded once in `main` and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Only required by commands that call the generative API.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub data_dir: String,
    pub scraper_backend: ScraperBackend,
    pub headless: bool,
    pub max_pages: usize,
    pub batch_size: usize,
    /// Upper bound, in bytes, on each corpus chunk sent for scoring.
    pub chunk_budget: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash-lite".to_string()),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            data_dir: std::env::var("JOBMATCH_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            scraper_backend: parse_backend(
                &std::env::var("JOBMATCH_SCRAPER").unwrap_or_else(|_| "chrome".to_string()),
            )?,
            headless: std::env::var("JOBMATCH_HEADLESS")
                .map(|v| !matches!(v.as_str(), "0" | "false" | "no"))
                .unwrap_or(true),
            max_pages: parse_usize("JOBMATCH_MAX_PAGES", 50)?,
            batch_size: parse_usize("JOBMATCH_BATCH_SIZE", 5)?,
            chunk_budget: parse_usize("JOBMATCH_CHUNK_BUDGET", CHUNK_BUDGET)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the API key or a user-facing error naming the missing variable.
    pub fn require_api_key(&self) -> Result<&str> {
        self.gemini_api_key
            .as_deref()
            .context("Required environment variable 'GEMINI_API_KEY' is not set")
    }
}

fn parse_backend(value: &str) -> Result<ScraperBackend> {
    match value.trim().to_ascii_lowercase().as_str() {
        "chrome" => Ok(ScraperBackend::Chrome),
        "http" => Ok(ScraperBackend::Http),
        other => anyhow::bail!("JOBMATCH_SCRAPER must be 'chrome' or 'http', got '{other}'"),
    }
}

fn parse_usize(key: &str, default: usize) -> Result<usize> {
    match std::env::var(key) {
        Ok(v) => v
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .with_context(|| format!("{key} must be a positive integer")),
        Err(_) => Ok(default),
    }
}
