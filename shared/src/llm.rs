//! Generation provider client (OpenAI chat completions).
//!
//! One bounded, non-streaming call per request. Provider unavailability is
//! a normal outcome: callers map any [`ProviderError`] onto their
//! deterministic fallback.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1/chat/completions";

/// Hard ceiling on the wall-clock wait for one generation call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

/// Failure modes of the generation call.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No API key configured; detected before any network call
    #[error("no generation credential configured")]
    MissingCredential,

    /// Transport-level failure
    #[error("request failed: {0}")]
    Request(String),

    /// Provider responded with a non-success status
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Provider payload could not be decoded
    #[error("malformed response: {0}")]
    Parse(String),
}

/// Parameters for one generation call.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Persona the generator writes as
    pub system: String,
    /// Assembled instruction prompt
    pub prompt: String,
    /// Model identifier
    pub model: &'static str,
    /// Output length bound
    pub max_tokens: u32,
    /// Randomness; modest values keep tone varied but close to predictable
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
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
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Client for the generation provider.
///
/// Holds the optional credential so callers can check for it before
/// assembling a doomed request.
pub struct GenerationClient {
    api_key: Option<String>,
    http: reqwest::Client,
}

impl GenerationClient {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            http: reqwest::Client::new(),
        }
    }

    /// Whether a generation credential is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Run one completion and return the generated text.
    pub async fn complete(&self, completion: &Completion) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingCredential)?;

        let request = ChatRequest {
            model: completion.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &completion.system,
                },
                ChatMessage {
                    role: "user",
                    content: &completion.prompt,
                },
            ],
            max_tokens: completion.max_tokens,
            temperature: completion.temperature,
        };

        let response = self
            .http
            .post(OPENAI_API_BASE)
            .bearer_auth(api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }
}

/// Extract the first choice's text from a chat completions payload.
fn parse_completion(body: &str) -> Result<String, ProviderError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Parse("missing choices[0]".to_string()))?;
    let content = choice.message.content.unwrap_or_default();
    let content = content.trim();
    if content.is_empty() {
        return Err(ProviderError::Parse("empty completion".to_string()));
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_choice_content() {
        let body = r#"{
            "choices": [
                {"message": {"content": "  SUBJECT: Hi\nBODY: Hello  "}},
                {"message": {"content": "second"}}
            ]
        }"#;
        assert_eq!(parse_completion(body).expect("parses"), "SUBJECT: Hi\nBODY: Hello");
    }

    #[test]
    fn rejects_missing_or_empty_choices() {
        assert!(parse_completion(r#"{"choices": []}"#).is_err());
        assert!(parse_completion(r#"{"choices": [{"message": {"content": "   "}}]}"#).is_err());
        assert!(parse_completion("not json").is_err());
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_call() {
        let client = GenerationClient::new(&Config::test_default());
        assert!(!client.has_credential());

        let completion = Completion {
            system: "persona".to_string(),
            prompt: "prompt".to_string(),
            model: "gpt-4o-mini",
            max_tokens: 10,
            temperature: 0.0,
        };
        let result = client.complete(&completion).await;
        assert!(matches!(result, Err(ProviderError::MissingCredential)));
    }
}
