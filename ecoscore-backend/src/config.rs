use crate::error::{AppError, Result};
use std::env;

pub const DEFAULT_CLAUDE_API_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-5-20250929";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_address: String,
    pub claude_api_key: String,
    pub claude_api_url: String,
    pub claude_model: String,
    pub suggestion_max_tokens: u32,
    pub claude_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            server_address: env::var("SERVER_ADDRESS")
                .unwrap_or_else(|_| "127.0.0.1:5001".to_string()),

            claude_api_key: env::var("CLAUDE_API_KEY")
                .map_err(|_| AppError::ConfigError("CLAUDE_API_KEY is not set".to_string()))?,

            claude_api_url: env::var("CLAUDE_API_URL")
                .unwrap_or_else(|_| DEFAULT_CLAUDE_API_URL.to_string()),

            claude_model: env::var("CLAUDE_MODEL")
                .unwrap_or_else(|_| DEFAULT_CLAUDE_MODEL.to_string()),

            suggestion_max_tokens: env::var("SUGGESTION_MAX_TOKENS")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .map_err(|_| AppError::ConfigError("Invalid SUGGESTION_MAX_TOKENS".to_string()))?,

            claude_timeout_secs: env::var("CLAUDE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| AppError::ConfigError("Invalid CLAUDE_TIMEOUT_SECS".to_string()))?,
        })
    }
}
