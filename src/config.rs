//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// API key gating the ingestion entry point
    pub write_api_key: String,
    /// API key gating the query endpoints (defaults to the write key)
    pub read_api_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// For local development, keys can be set via a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let write_api_key = env::var("WRITE_API_KEY")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("WRITE_API_KEY"))?;

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            read_api_key: env::var("READ_API_KEY")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|_| write_api_key.clone()),
            write_api_key,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            write_api_key: "test_write_key".to_string(),
            read_api_key: "test_read_key".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
