use std::fmt;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::types::{ChatRequest, ChatResponse};

/// Errors that can occur while talking to the chat endpoint.
///
/// The session does not distinguish between them; they all surface as the
/// same fallback reply. The variants exist for the log.
#[derive(Debug)]
pub enum ChatError {
    /// Transport failure (DNS, connection refused, reset).
    Network(String),
    /// The endpoint answered with a non-success status.
    Status { status: u16, body: String },
    /// The body was not JSON or had no `response` field.
    Parse(String),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Network(msg) => write!(f, "network error: {msg}"),
            ChatError::Status { status, body } => write!(f, "HTTP {status}: {body}"),
            ChatError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ChatError {}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Returns a short name for logging.
    fn name(&self) -> &str;

    /// Sends one message and returns the reply text.
    async fn send(&self, message: &str) -> Result<String, ChatError>;
}

/// JSON-over-HTTP client: `POST {"message": ...}` → `{"response": ...}`.
pub struct HttpChatClient {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpChatClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, message: &str) -> Result<String, ChatError> {
        let request = ChatRequest {
            message: message.to_string(),
        };

        info!(
            "POST {} ({} chars)",
            self.endpoint,
            request.message.chars().count()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Chat endpoint status: {}", status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Chat endpoint error: {} - {}", status.as_u16(), body);
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ChatError::Parse(e.to_string()))?;

        debug!("Reply received: {} chars", parsed.response.chars().count());
        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ChatError::Network("connection refused".into()).to_string(),
            "network error: connection refused"
        );
        assert_eq!(
            ChatError::Status {
                status: 502,
                body: "bad gateway".into()
            }
            .to_string(),
            "HTTP 502: bad gateway"
        );
        assert!(ChatError::Parse("eof".into()).to_string().starts_with("parse error"));
    }

    #[test]
    fn test_client_keeps_endpoint() {
        let client = HttpChatClient::new("http://localhost:1/chat");
        assert_eq!(client.endpoint(), "http://localhost:1/chat");
        assert_eq!(client.name(), "http");
    }
}
