//! Anthropic API client implementation
//!
//! This module implements the ChatClient trait for the Anthropic (Claude) API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::error::{PromptrError, Result};
use crate::llm::client::ChatClient;
use crate::llm::types::{ChatRequest, ChatResponse, Role, Usage};

/// Anthropic API base URL
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default model to use
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default max tokens
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Configuration for the Anthropic client
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(300),
        }
    }
}

impl AnthropicConfig {
    /// Create a new config with a specific model
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}

/// Anthropic API client
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    config: AnthropicConfig,
    usage: Arc<Mutex<Usage>>,
}

impl AnthropicClient {
    /// Create a new Anthropic client
    ///
    /// Reads ANTHROPIC_API_KEY from environment
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| PromptrError::Transport("ANTHROPIC_API_KEY not set".to_string()))?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: AnthropicConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PromptrError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            config,
            usage: Arc::new(Mutex::new(Usage::default())),
        })
    }

    /// Build the request body for the Anthropic API
    fn build_request(&self, request: &ChatRequest) -> Value {
        let model = request.model.as_ref().unwrap_or(&self.config.model).clone();

        let max_tokens = request.max_tokens.unwrap_or(self.config.max_tokens);

        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| {
                json!({
                    "role": match m.role {
                        Role::User => "user",
                        Role::Assistant => "assistant",
                    },
                    "content": m.content
                })
            })
            .collect();

        let mut body = json!({
            "model": model,
            "max_tokens": max_tokens,
            "messages": messages
        });

        // Add system prompt if present
        if !request.system.is_empty() {
            body["system"] = json!(request.system);
        }

        body
    }

    /// Parse the API response into a ChatResponse
    fn parse_response(&self, body: Value) -> Result<ChatResponse> {
        // Extract usage
        let usage = if let Some(u) = body.get("usage") {
            Usage::new(
                u["input_tokens"].as_u64().unwrap_or(0),
                u["output_tokens"].as_u64().unwrap_or(0),
            )
        } else {
            Usage::default()
        };

        // Track cumulative usage
        {
            let mut total = self
                .usage
                .lock()
                .map_err(|e| PromptrError::Transport(format!("Usage lock poisoned: {}", e)))?;
            total.add(&usage);
        }

        // Concatenate text content blocks
        let mut content = String::new();
        if let Some(blocks) = body["content"].as_array() {
            for block in blocks {
                if block["type"].as_str() == Some("text")
                    && let Some(text) = block["text"].as_str()
                {
                    if !content.is_empty() {
                        content.push('\n');
                    }
                    content.push_str(text);
                }
            }
        }

        Ok(ChatResponse { content, usage })
    }

    /// Send a request to the Anthropic API
    async fn send_request(&self, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| PromptrError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(PromptrError::Transport(format!(
                "Rate limited, retry after {} seconds",
                retry_after
            )));
        }

        // Handle other errors
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PromptrError::Transport(format!(
                "API error {}: {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PromptrError::Transport(format!("Failed to parse response: {}", e)))
    }

    /// Send a full chat request and return the parsed response
    pub async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let body = self.build_request(&request);
        let response = self.send_request(body).await?;
        self.parse_response(response)
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get cumulative token usage
    pub fn total_usage(&self) -> Usage {
        self.usage.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatClient for AnthropicClient {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        let response = self.complete(ChatRequest::from_prompt(prompt)).await?;
        Ok(response.content)
    }
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("model", &self.config.model)
            .field("max_tokens", &self.config.max_tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = AnthropicConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_config_with_model() {
        let config = AnthropicConfig::with_model("claude-3-haiku-20240307");
        assert_eq!(config.model, "claude-3-haiku-20240307");
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_client_with_api_key() {
        let result =
            AnthropicClient::with_api_key("test-key".to_string(), AnthropicConfig::default());
        assert!(result.is_ok());
        assert_eq!(result.unwrap().model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_build_request_basic() {
        let client =
            AnthropicClient::with_api_key("test-key".to_string(), AnthropicConfig::default())
                .unwrap();

        let request = ChatRequest::from_prompt("Describe: 5 years experience");

        let body = client.build_request(&request);

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Describe: 5 years experience");
        assert!(body.get("system").is_none());
    }

    #[test]
    fn test_build_request_with_system() {
        let client =
            AnthropicClient::with_api_key("test-key".to_string(), AnthropicConfig::default())
                .unwrap();

        let request = ChatRequest::from_prompt("Hello").with_system("You are a resume writer");

        let body = client.build_request(&request);

        assert_eq!(body["system"], "You are a resume writer");
    }

    #[test]
    fn test_build_request_custom_model() {
        let client =
            AnthropicClient::with_api_key("test-key".to_string(), AnthropicConfig::default())
                .unwrap();

        let request = ChatRequest::from_prompt("Hello").with_model("claude-opus-4-5-20250514");

        let body = client.build_request(&request);

        assert_eq!(body["model"], "claude-opus-4-5-20250514");
    }

    #[test]
    fn test_parse_response_text_only() {
        let client =
            AnthropicClient::with_api_key("test-key".to_string(), AnthropicConfig::default())
                .unwrap();

        let api_response = json!({
            "content": [
                { "type": "text", "text": "<think>ok</think>{\"summary\":\"ok\"}" }
            ],
            "stop_reason": "end_turn",
            "usage": {
                "input_tokens": 10,
                "output_tokens": 5
            }
        });

        let response = client.parse_response(api_response).unwrap();

        assert_eq!(response.content, "<think>ok</think>{\"summary\":\"ok\"}");
        assert_eq!(response.usage.input_tokens, 10);
        assert_eq!(response.usage.output_tokens, 5);
    }

    #[test]
    fn test_parse_response_multiple_text_blocks() {
        let client =
            AnthropicClient::with_api_key("test-key".to_string(), AnthropicConfig::default())
                .unwrap();

        let api_response = json!({
            "content": [
                { "type": "text", "text": "First part." },
                { "type": "text", "text": "Second part." }
            ],
            "usage": { "input_tokens": 5, "output_tokens": 10 }
        });

        let response = client.parse_response(api_response).unwrap();
        assert_eq!(response.content, "First part.\nSecond part.");
    }

    #[test]
    fn test_parse_response_skips_non_text_blocks() {
        let client =
            AnthropicClient::with_api_key("test-key".to_string(), AnthropicConfig::default())
                .unwrap();

        let api_response = json!({
            "content": [
                { "type": "text", "text": "Kept." },
                { "type": "tool_use", "id": "toolu_1", "name": "ignored", "input": {} }
            ],
            "usage": { "input_tokens": 5, "output_tokens": 3 }
        });

        let response = client.parse_response(api_response).unwrap();
        assert_eq!(response.content, "Kept.");
    }

    #[test]
    fn test_parse_response_missing_fields() {
        let client =
            AnthropicClient::with_api_key("test-key".to_string(), AnthropicConfig::default())
                .unwrap();

        let response = client.parse_response(json!({})).unwrap();
        assert!(response.content.is_empty());
        assert_eq!(response.usage.total(), 0);
    }

    #[test]
    fn test_total_usage_accumulation() {
        let client =
            AnthropicClient::with_api_key("test-key".to_string(), AnthropicConfig::default())
                .unwrap();

        let _ = client.parse_response(json!({
            "content": [],
            "usage": { "input_tokens": 100, "output_tokens": 50 }
        }));

        let _ = client.parse_response(json!({
            "content": [],
            "usage": { "input_tokens": 200, "output_tokens": 100 }
        }));

        let total = client.total_usage();
        assert_eq!(total.input_tokens, 300);
        assert_eq!(total.output_tokens, 150);
    }

    #[test]
    fn test_debug_impl() {
        let client =
            AnthropicClient::with_api_key("test-key".to_string(), AnthropicConfig::default())
                .unwrap();

        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("AnthropicClient"));
        assert!(debug_str.contains(DEFAULT_MODEL));
        // Should NOT contain the API key
        assert!(!debug_str.contains("test-key"));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AnthropicClient>();
    }
}
