//! OpenAI chat-completions transport.
//!
//! Any server speaking the `/v1/chat/completions` dialect works; point
//! `api_url` at it.

use async_trait::async_trait;
use postwright_common::{PostwrightError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, Role, TokenUsage};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletion {
    model: String,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

pub struct OpenAiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(base_url: Option<String>, model: String, api_key: Option<String>) -> Self {
        let base_url = base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        Self {
            base_url,
            model,
            api_key,
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn body<'a>(&'a self, request: &'a LlmRequest) -> ChatCompletionBody<'a> {
        let system = request.system_prompt.as_deref().map(|content| WireMessage {
            role: Role::System,
            content,
        });
        let messages = system
            .into_iter()
            .chain(request.messages.iter().map(|m| WireMessage {
                role: m.role,
                content: &m.content,
            }))
            .collect();

        ChatCompletionBody {
            model: &self.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

/// Human-readable message from an error response body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.chars().take(500).collect())
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let mut http_request = self.http.post(self.endpoint()).json(&self.body(&request));
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| PostwrightError::Generation(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PostwrightError::Generation(format!(
                "{status}: {}",
                api_error_message(&body)
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| PostwrightError::Generation(format!("malformed completion: {e}")))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PostwrightError::Generation("completion had no choices".into()))?;

        let usage = completion.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        });
        debug!(
            model = %completion.model,
            prompt_tokens = usage.as_ref().map(|u| u.prompt_tokens),
            completion_tokens = usage.as_ref().map(|u| u.completion_tokens),
            "Completion received"
        );

        Ok(LlmResponse {
            content: choice.message.content,
            model: completion.model,
            usage,
            finish_reason: choice.finish_reason,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_request_maps_to_chat_completion_body() {
        let client = OpenAiClient::new(None, "gpt-4o".to_string(), Some("sk-test".to_string()));
        let request = LlmRequest::prompt("Write a LinkedIn post about AI tools", 0.8)
            .with_max_tokens(Some(512));

        let json = serde_json::to_value(client.body(&request)).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert!((json["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
        assert_eq!(json["max_tokens"], 512);

        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Write a LinkedIn post about AI tools");
    }

    #[test]
    fn system_prompt_is_sent_first() {
        let client = OpenAiClient::new(None, "gpt-4o".to_string(), None);
        let mut request =
            LlmRequest::prompt("Hello", 0.3).with_system("You are a social media strategist.");
        request.temperature = None;

        let json = serde_json::to_value(client.body(&request)).unwrap();

        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn endpoint_uses_trimmed_base_url() {
        let client = OpenAiClient::new(None, "gpt-4o".to_string(), None);
        assert_eq!(client.endpoint(), "https://api.openai.com/v1/chat/completions");

        let client = OpenAiClient::new(
            Some("http://localhost:11434/".to_string()),
            "llama3".to_string(),
            None,
        );
        assert_eq!(client.endpoint(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn api_error_message_prefers_structured_body() {
        let body = r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#;
        assert_eq!(api_error_message(body), "Rate limit reached");
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn completion_deserializes() {
        let json = r#"{
            "id": "chatcmpl-1",
            "model": "gpt-4o-2024-08-06",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 9, "completion_tokens": 1, "total_tokens": 10}
        }"#;
        let completion: ChatCompletion = serde_json::from_str(json).unwrap();
        assert_eq!(completion.choices[0].message.content, "Hi");
        assert_eq!(completion.usage.unwrap().prompt_tokens, 9);
    }
}
