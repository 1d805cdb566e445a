use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::constants::{ARCHIVE_DIR_NAME, DEFAULT_LOG_FILTER, DEFAULT_MAIN_API_URL};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    /// Base URL of the billing service that performs the archive
    pub main_api_url: String,
    /// Directory the billing service writes `monthly_YYYY-MM.csv` files into
    pub archive_dir: PathBuf,
    /// Inbound request timeout in seconds
    pub request_timeout: u64,
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("Unsupported LOG_FORMAT: {}", other)),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let main_api_url = normalize_base_url(
            &lookup("MAIN_API_URL").unwrap_or_else(|| DEFAULT_MAIN_API_URL.to_string()),
        )?;

        let archive_dir = match lookup("ARCHIVE_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => env::current_dir()
                .map_err(|e| anyhow::anyhow!("Failed to resolve working directory: {}", e))?
                .join(ARCHIVE_DIR_NAME),
        };

        Ok(Config {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8001".to_string())
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT must be a valid port number: {}", e))?,
            main_api_url,
            archive_dir,
            request_timeout: lookup("REQUEST_TIMEOUT")
                .unwrap_or_else(|| "900".to_string())
                .parse()
                .map_err(|e| anyhow::anyhow!("REQUEST_TIMEOUT must be a number of seconds: {}", e))?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_format: lookup("LOG_FORMAT")
                .unwrap_or_else(|| "text".to_string())
                .parse()?,
        })
    }
}

/// Validate the downstream base URL and drop any trailing slash so that
/// endpoint paths can be appended directly.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    reqwest::Url::parse(trimmed)
        .map_err(|e| anyhow::anyhow!("MAIN_API_URL is not a valid URL ({}): {}", raw, e))?;
    Ok(trimmed.to_string())
}
