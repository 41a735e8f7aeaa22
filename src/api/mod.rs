//! # Chat endpoint
//!
//! The only network contract: one JSON POST per submitted message.
//! Callers hold a `dyn ChatClient` so tests can swap the transport.

pub mod client;
pub mod types;

pub use client::{ChatClient, ChatError, HttpChatClient};
pub use types::{ChatRequest, ChatResponse};
