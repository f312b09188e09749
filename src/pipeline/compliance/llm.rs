use std::collections::VecDeque;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::ComplianceError;
use crate::config;

/// Default request timeout. Compliance prompts carry full permit texts, so
/// generation can take a while.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Deterministic-ish output for regulatory comparisons.
const TEMPERATURE: f32 = 0.2;

/// Chat-completion client abstraction (allows mocking for tests).
pub trait LlmClient: Send + Sync {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, ComplianceError>;
}

/// Client for an OpenAI-compatible chat completions API.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Build a client from the environment: `OPENAI_API_KEY` (required),
    /// `OPENAI_BASE_URL` (optional override).
    pub fn from_env() -> Result<Self, ComplianceError> {
        let api_key = std::env::var(config::LLM_API_KEY_ENV)
            .map_err(|_| ComplianceError::MissingApiKey(config::LLM_API_KEY_ENV))?;
        let base_url = std::env::var(config::LLM_BASE_URL_ENV)
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        Ok(Self::new(
            &base_url,
            &api_key,
            config::DEFAULT_LLM_MODEL,
            DEFAULT_TIMEOUT_SECS,
        ))
    }

    /// Whether an API key is present in the environment (health endpoint).
    pub fn configured() -> bool {
        std::env::var(config::LLM_API_KEY_ENV).is_ok()
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl LlmClient for OpenAiClient {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, ComplianceError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ComplianceError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    ComplianceError::Timeout(self.timeout_secs)
                } else {
                    ComplianceError::ResponseDecoding(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ComplianceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| ComplianceError::ResponseDecoding(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ComplianceError::MalformedResponse("no choices in response".into()))
    }
}

/// Placeholder client used when no API key is configured: the server still
/// starts (health checks, report serving), but every compliance call fails
/// with a clear error.
pub struct UnconfiguredLlm;

impl LlmClient for UnconfiguredLlm {
    fn complete(&self, _system: &str, _prompt: &str) -> Result<String, ComplianceError> {
        Err(ComplianceError::MissingApiKey(config::LLM_API_KEY_ENV))
    }
}

/// Mock LLM client for testing — replays a queued sequence of outcomes,
/// then keeps returning the fallback response.
pub struct MockLlmClient {
    queue: Mutex<VecDeque<Result<String, String>>>,
    fallback: String,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: response.to_string(),
        }
    }

    pub fn with_sequence(responses: Vec<Result<String, String>>) -> Self {
        let fallback = responses
            .iter()
            .rev()
            .find_map(|r| r.as_ref().ok().cloned())
            .unwrap_or_default();
        Self {
            queue: Mutex::new(responses.into()),
            fallback,
        }
    }
}

impl LlmClient for MockLlmClient {
    fn complete(&self, _system: &str, _prompt: &str) -> Result<String, ComplianceError> {
        let next = self.queue.lock().expect("mock queue poisoned").pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(ComplianceError::Connection(message)),
            None => Ok(self.fallback.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockLlmClient::new("test response");
        let result = client.complete("system", "prompt").unwrap();
        assert_eq!(result, "test response");
    }

    #[test]
    fn mock_client_replays_sequence_then_fallback() {
        let client = MockLlmClient::with_sequence(vec![
            Ok("first".into()),
            Err("connection refused".into()),
            Ok("last".into()),
        ]);
        assert_eq!(client.complete("s", "p").unwrap(), "first");
        assert!(matches!(
            client.complete("s", "p"),
            Err(ComplianceError::Connection(_))
        ));
        assert_eq!(client.complete("s", "p").unwrap(), "last");
        // Queue exhausted — fallback is the last Ok response
        assert_eq!(client.complete("s", "p").unwrap(), "last");
    }

    #[test]
    fn openai_client_constructor_trims_trailing_slash() {
        let client = OpenAiClient::new("https://api.openai.com/", "key", "gpt-4o-mini", 60);
        assert_eq!(client.base_url, "https://api.openai.com");
        assert_eq!(client.timeout_secs, 60);
    }

    #[test]
    fn retryable_classification() {
        assert!(ComplianceError::JsonParsing("x".into()).is_retryable());
        assert!(ComplianceError::MalformedResponse("x".into()).is_retryable());
        assert!(!ComplianceError::Timeout(120).is_retryable());
        assert!(!ComplianceError::Connection("x".into()).is_retryable());
    }
}
