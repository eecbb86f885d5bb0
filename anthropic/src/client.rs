//! Anthropic API client implementation

use crate::{
    error::ClaudeError,
    messages::{MessagesRequest, MessagesResponse},
};
use reqwest::{Client, StatusCode};

const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

/// Anthropic API client
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl AnthropicClient {
    /// Create a new client with API key from environment
    ///
    /// # Errors
    ///
    /// Returns `ClaudeError::MissingApiKey` if `ANTHROPIC_API_KEY` is not set
    pub fn from_env() -> Result<Self, ClaudeError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| ClaudeError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Create a new client with explicit API key
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Point the client at a different base URL (proxies, test servers)
    #[must_use]
    pub fn with_base_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Create a message (non-streaming)
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn messages(&self, request: MessagesRequest) -> Result<MessagesResponse, ClaudeError> {
        tracing::debug!(model = %request.model, "Sending messages request");

        let response = self
            .client
            .post(format!("{}/messages", self.api_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ClaudeError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<MessagesResponse>()
                .await
                .map_err(|e| ClaudeError::ResponseParseFailed(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(ClaudeError::RateLimited),
            StatusCode::UNAUTHORIZED => Err(ClaudeError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ClaudeError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        let client = AnthropicClient::new("test-key".to_string());
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.api_url, "https://api.anthropic.com/v1");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = AnthropicClient::new("k".to_string()).with_base_url("http://localhost:9/v1/");
        assert_eq!(client.api_url, "http://localhost:9/v1");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = AnthropicClient::new("secret-key".to_string());
        assert!(!format!("{client:?}").contains("secret-key"));
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)] // Test code
    async fn test_messages_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_1",
                "model": "claude-test",
                "role": "assistant",
                "content": [{"type": "text", "text": "Take the 21:30 Express."}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 12, "output_tokens": 7}
            })))
            .mount(&server)
            .await;

        let client = AnthropicClient::new("test-key".to_string()).with_base_url(server.uri());
        let response = client
            .messages(MessagesRequest::new(vec![Message::user("Pune?")]))
            .await
            .unwrap();

        assert_eq!(response.text(), "Take the 21:30 Express.");
    }

    #[tokio::test]
    async fn test_status_codes_map_to_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = AnthropicClient::new("k".to_string()).with_base_url(server.uri());
        let result = client
            .messages(MessagesRequest::new(vec![Message::user("hi")]))
            .await;

        assert!(matches!(result, Err(ClaudeError::RateLimited)));
    }

    #[tokio::test]
    async fn test_server_error_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = AnthropicClient::new("k".to_string()).with_base_url(server.uri());
        let result = client
            .messages(MessagesRequest::new(vec![Message::user("hi")]))
            .await;

        match result {
            Err(ClaudeError::ApiError { status, message }) => {
                assert_eq!(status, 529);
                assert_eq!(message, "overloaded");
            },
            other => unreachable!("expected ApiError, got {other:?}"),
        }
    }
}
