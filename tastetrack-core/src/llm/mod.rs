//! Generative text provider abstraction.
//!
//! The core only ever needs `complete(prompt) -> raw text`; everything about
//! structure is recovered afterwards by [`crate::parse`].

mod fake;
mod groq;

pub use fake::FakeProvider;
pub use groq::GroqProvider;

use async_trait::async_trait;
use std::env;
use std::fmt;

use crate::error::{ConfigError, ExternalCallError, Service};

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Trait for generative text providers.
///
/// Implementations should be stateless and thread-safe. The response carries
/// no schema guarantee.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// Send a prompt and get the model's raw text back.
    async fn complete(&self, prompt: &str) -> Result<String, ExternalCallError>;

    /// Provider name (e.g., "groq", "fake").
    fn provider_name(&self) -> &'static str;

    /// Model name (e.g., "llama-3.3-70b-versatile").
    fn model_name(&self) -> &str;
}

/// Provider configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: String,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl LlmConfig {
    /// Load configuration from environment variables.
    ///
    /// - `TASTETRACK_LLM_PROVIDER`: "groq" (default) | "fake"
    /// - `GROQ_API_KEY`: required for groq
    /// - `TASTETRACK_LLM_MODEL`: model name (default: "llama-3.3-70b-versatile")
    /// - `TASTETRACK_LLM_BASE_URL`: API base URL (default: Groq's OpenAI-compatible endpoint)
    pub fn from_env() -> Self {
        Self {
            provider: env::var("TASTETRACK_LLM_PROVIDER").unwrap_or_else(|_| "groq".to_string()),
            api_key: env::var("GROQ_API_KEY").ok(),
            model: env::var("TASTETRACK_LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: env::var("TASTETRACK_LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// Build the configured provider.
pub fn create_provider(config: &LlmConfig) -> Result<Box<dyn LlmProvider>, ConfigError> {
    match config.provider.as_str() {
        "fake" => Ok(Box::new(FakeProvider::default())),
        "groq" => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| ConfigError::MissingEnvVar("GROQ_API_KEY".to_string()))?;
            Ok(Box::new(GroqProvider::new(
                api_key,
                config.model.clone(),
                config.base_url.clone(),
            )))
        }
        other => Err(ConfigError::InvalidValue {
            name: "TASTETRACK_LLM_PROVIDER".to_string(),
            value: other.to_string(),
        }),
    }
}

/// Build the provider selected by the environment.
pub fn create_provider_from_env() -> Result<Box<dyn LlmProvider>, ConfigError> {
    create_provider(&LlmConfig::from_env())
}

pub(crate) fn not_configured(message: &str) -> ExternalCallError {
    ExternalCallError::NotConfigured {
        service: Service::LanguageModel,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            api_key: api_key.map(str::to_string),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[test]
    fn test_create_fake() {
        let provider = create_provider(&config("fake", None)).unwrap();
        assert_eq!(provider.provider_name(), "fake");
    }

    #[test]
    fn test_groq_requires_key() {
        let result = create_provider(&config("groq", None));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));

        let provider = create_provider(&config("groq", Some("key"))).unwrap();
        assert_eq!(provider.model_name(), DEFAULT_MODEL);
    }

    #[test]
    fn test_unknown_provider() {
        let result = create_provider(&config("openai", None));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
