//! OpenAI-compatible chat completion provider (Groq by default).

use super::LlmProvider;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ExternalCallError, Service};

/// Chat-completions provider. No explicit timeout; the client default applies.
#[derive(Debug)]
pub struct GroqProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GroqProvider {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiErrorBody,
}

/// Pull the first choice's text out of a chat-completions body.
fn parse_completion(body: &str) -> Result<String, ExternalCallError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ExternalCallError::InvalidResponse {
            service: Service::LanguageModel,
            message: e.to_string(),
        })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ExternalCallError::InvalidResponse {
            service: Service::LanguageModel,
            message: "No text content in response".to_string(),
        })
}

#[async_trait]
impl LlmProvider for GroqProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ExternalCallError> {
        if self.api_key.is_empty() {
            return Err(super::not_configured("API key is empty"));
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExternalCallError::from_reqwest(Service::LanguageModel, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ExternalCallError::from_reqwest(Service::LanguageModel, e))?;

        if !(200..300).contains(&status) {
            // Prefer the API's own message when the body is the usual error shape
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ExternalCallError::from_status(
                Service::LanguageModel,
                status,
                message,
            ));
        }

        let text = parse_completion(&body)?;
        tracing::debug!(
            provider = self.provider_name(),
            model = %self.model,
            response_len = text.len(),
            "Model completion received"
        );
        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "groq"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
