//! OpenRouter chat-completions client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use erpscan_core::models::config::StructuringConfig;
use erpscan_core::{StructuringError, TextStructurer};

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenRouterClient {
    client: reqwest::Client,
    completions_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

impl OpenRouterClient {
    pub fn new(config: &StructuringConfig, api_key: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(super::user_agent())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            completions_url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: config.model.clone(),
        })
    }
}

impl TextStructurer for OpenRouterClient {
    async fn structure(&self, prompt: &str) -> Result<String, StructuringError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!("Requesting completion from {}", self.model);

        let response = self
            .client
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| StructuringError::Request(e.to_string()))?;

        let status = response.status();
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| StructuringError::Request(format!("HTTP {}: {}", status, e)))?;

        first_content(body, status)
    }
}

fn first_content(body: ChatResponse, status: reqwest::StatusCode) -> Result<String, StructuringError> {
    if let Some(error) = body.error {
        return Err(StructuringError::Request(format!("HTTP {}: {}", status, error.message)));
    }
    if !status.is_success() {
        return Err(StructuringError::Request(format!("HTTP {}", status)));
    }

    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(StructuringError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "m",
            messages: [ChatMessage {
                role: "user",
                content: "hi",
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"model": "m", "messages": [{"role": "user", "content": "hi"}]})
        );
    }

    #[test]
    fn test_first_content() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"id": "x", "choices": [{"index": 0, "message": {"role": "assistant", "content": "Items:"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_content(body, StatusCode::OK).unwrap(), "Items:");
    }

    #[test]
    fn test_missing_content_is_empty_response() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            first_content(body, StatusCode::OK),
            Err(StructuringError::EmptyResponse)
        ));

        let body: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(matches!(
            first_content(body, StatusCode::OK),
            Err(StructuringError::EmptyResponse)
        ));
    }

    #[test]
    fn test_api_error() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"error": {"message": "rate limited", "code": 429}}"#).unwrap();
        let err = first_content(body, StatusCode::TOO_MANY_REQUESTS).unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }
}
