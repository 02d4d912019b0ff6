//! Runtime configuration
//!
//! Loaded once at startup from environment variables (.env supported).
//! A missing LLM credential aborts initialization; the deterministic
//! fallback pipeline itself needs no configuration.

use std::env;

use crate::error::AssistantError;
use crate::Result;

#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the Gemini conversational collaborator
    pub gemini_api_key: String,
    /// Base URL for the advice-search service, if deployed
    pub advice_api_base_url: Option<String>,
    /// HTTP server port
    pub port: u16,
}

impl Config {
    /// Load configuration from the environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let gemini_api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AssistantError::ConfigError(
                    "GEMINI_API_KEY not set. See .env.example for setup instructions.".to_string(),
                )
            })?;

        let advice_api_base_url = env::var("ADVICE_API_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let port = env::var("PORT")
            .or_else(|_| env::var("API_PORT"))
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|e| AssistantError::ConfigError(format!("Invalid port: {}", e)))?;

        Ok(Self {
            gemini_api_key,
            advice_api_base_url,
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_fatal() {
        env::remove_var("GEMINI_API_KEY");
        env::remove_var("GOOGLE_API_KEY");

        let result = Config::from_env();

        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("GEMINI_API_KEY"));
    }
}
