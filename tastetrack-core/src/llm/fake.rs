//! Fake provider for tests.
//!
//! Returns deterministic responses by prompt substring, so flows can be
//! exercised without network access.

use super::LlmProvider;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::error::{ExternalCallError, Service};

/// A fake provider for testing.
///
/// Responses are matched by checking whether the prompt contains a registered
/// substring (case-insensitive), in registration order. Without a match the
/// default response is used, or the call fails.
#[derive(Debug)]
pub struct FakeProvider {
    /// (prompt substring, response), checked in order
    responses: RwLock<Vec<(String, Reply)>>,
    default_response: Option<String>,
    calls: AtomicUsize,
}

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            responses: RwLock::new(Vec::new()),
            default_response: Some("[]".to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeProvider {
    /// A provider with no registered responses and no default.
    pub fn new() -> Self {
        Self {
            default_response: None,
            ..Self::default()
        }
    }

    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let provider = Self::new();
        provider.add_response(prompt_contains, response);
        provider
    }

    /// Respond with `response` to prompts containing `prompt_contains`.
    pub fn add_response(&self, prompt_contains: &str, response: &str) {
        self.push(prompt_contains, Reply::Text(response.to_string()));
    }

    /// Fail prompts containing `prompt_contains` with a request error.
    pub fn add_failure(&self, prompt_contains: &str, message: &str) {
        self.push(prompt_contains, Reply::Fail(message.to_string()));
    }

    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Number of completed or failed calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn push(&self, prompt_contains: &str, reply: Reply) {
        if let Ok(mut responses) = self.responses.write() {
            responses.push((prompt_contains.to_lowercase(), reply));
        }
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ExternalCallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let prompt_lower = prompt.to_lowercase();
        let matched = self.responses.read().ok().and_then(|responses| {
            responses
                .iter()
                .find(|(pattern, _)| prompt_lower.contains(pattern.as_str()))
                .map(|(_, reply)| reply.clone())
        });

        match matched {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(message)) => Err(ExternalCallError::Request {
                service: Service::LanguageModel,
                message,
            }),
            None => self
                .default_response
                .clone()
                .ok_or_else(|| ExternalCallError::Request {
                    service: Service::LanguageModel,
                    message: format!(
                        "FakeProvider: no response configured for prompt: {}",
                        prompt.chars().take(100).collect::<String>()
                    ),
                }),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_provider_matching() {
        let provider = FakeProvider::with_response("SUGGEST", "[]");
        let result = provider.complete("suggest 3 recipes").await.unwrap();
        assert_eq!(result, "[]");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_first_registered_match_wins() {
        let provider = FakeProvider::new();
        provider.add_response("enrich", "first");
        provider.add_response("recipe", "second");
        let result = provider.complete("enrich the following recipe").await.unwrap();
        assert_eq!(result, "first");
    }

    #[tokio::test]
    async fn test_failure_reply() {
        let provider = FakeProvider::new();
        provider.add_failure("enrich", "connection reset");
        let err = provider.complete("Enrich this").await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_no_match_without_default() {
        let provider = FakeProvider::new();
        assert!(provider.complete("anything").await.is_err());
    }

    #[tokio::test]
    async fn test_default_response() {
        let provider = FakeProvider::new().with_default_response("fallback");
        assert_eq!(provider.complete("anything").await.unwrap(), "fallback");
    }
}
