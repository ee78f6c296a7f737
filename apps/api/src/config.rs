use anyhow::{anyhow, Context, Result};

use crate::structure::HeadingPolicy;

/// 5 MiB, the upload cap the web client enforces as well.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub heading_policy: HeadingPolicy,
    /// Tailoring is disabled when unset.
    pub anthropic_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let policy_name = std::env::var("HEADING_POLICY").unwrap_or_else(|_| "extended".to_string());
        let heading_policy = HeadingPolicy::from_name(&policy_name).ok_or_else(|| {
            anyhow!("HEADING_POLICY must be 'extended' or 'compact', got '{policy_name}'")
        })?;

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            heading_policy,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            heading_policy: HeadingPolicy::default(),
            anthropic_api_key: None,
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
