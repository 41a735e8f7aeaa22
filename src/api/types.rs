use serde::{Deserialize, Serialize};

/// Request body sent to the chat endpoint.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

/// Success body. Any fields besides `response` are ignored.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub response: String,
}
