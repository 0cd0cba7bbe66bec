use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{LlmClientConfig, RetryPolicy, DEFAULT_BASE_URL};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub parser_model: String,
    pub optimizer_model: String,
    pub prompts_dir: Option<PathBuf>,
    /// Where parsed resumes are saved as JSON, if set.
    pub resume_output_dir: Option<PathBuf>,
    pub llm_max_attempts: u32,
    pub llm_retry_min_delay: Duration,
    pub llm_retry_max_delay: Duration,
    pub llm_timeout: Duration,
    pub pdf_render_dpi: u32,
    pub pdftoppm_path: PathBuf,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            parser_model: env_or("PARSER_MODEL", crate::parsing::parser::DEFAULT_MODEL),
            optimizer_model: env_or(
                "OPTIMIZER_MODEL",
                crate::optimization::optimizer::DEFAULT_MODEL,
            ),
            prompts_dir: std::env::var("PROMPTS_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            resume_output_dir: std::env::var("RESUME_OUTPUT_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", 5)?,
            llm_retry_min_delay: Duration::from_millis(parse_env("LLM_RETRY_MIN_DELAY_MS", 4000)?),
            llm_retry_max_delay: Duration::from_millis(parse_env("LLM_RETRY_MAX_DELAY_MS", 60000)?),
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 120)?),
            pdf_render_dpi: parse_env("PDF_RENDER_DPI", crate::parsing::rasterize::DEFAULT_DPI)?,
            pdftoppm_path: PathBuf::from(env_or("PDFTOPPM_PATH", "pdftoppm")),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        };

        if config.llm_max_attempts == 0 {
            anyhow::bail!("LLM_MAX_ATTEMPTS must be at least 1");
        }
        Ok(config)
    }

    pub fn llm_client_config(&self) -> LlmClientConfig {
        LlmClientConfig {
            api_key: self.openai_api_key.clone(),
            base_url: self.openai_base_url.clone(),
            timeout: self.llm_timeout,
            retry: RetryPolicy {
                max_attempts: self.llm_max_attempts,
                min_delay: self.llm_retry_min_delay,
                max_delay: self.llm_retry_max_delay,
                ..RetryPolicy::default()
            },
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
