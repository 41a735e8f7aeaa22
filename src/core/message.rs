//! # Messages
//!
//! A message is created once, appended to the session's display sequence,
//! and never edited afterwards, with one exception: a progressive message's
//! typewriter fills in its own `display` surface step by step.

use crate::core::surface::StyledText;
use crate::core::typewriter::Typewriter;

pub type MessageId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Fully visible on append.
    Instant,
    /// Revealed by a typewriter.
    Progressive,
}

/// Copy-to-clipboard affordance for assistant replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyState {
    /// Not offered (user messages, or render still running).
    Hidden,
    Ready,
    /// Brief confirmation after a successful copy.
    Copied,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub render_mode: RenderMode,
    /// Source text as received. Never changes.
    pub text: String,
    /// What is currently visible.
    pub display: StyledText,
    /// Present while a progressive render is still running.
    pub typewriter: Option<Typewriter>,
    pub copy: CopyState,
}

impl Message {
    /// A user message, visible immediately.
    pub fn user(id: MessageId, text: String) -> Self {
        Self {
            id,
            role: Role::User,
            render_mode: RenderMode::Instant,
            display: StyledText::plain(&text),
            text,
            typewriter: None,
            copy: CopyState::Hidden,
        }
    }

    /// An assistant message with an empty display and a typewriter ready to fill it.
    pub fn assistant(id: MessageId, text: String) -> Self {
        Self {
            id,
            role: Role::Assistant,
            render_mode: RenderMode::Progressive,
            display: StyledText::new(),
            typewriter: Some(Typewriter::new(&text)),
            text,
            copy: CopyState::Hidden,
        }
    }

    pub fn is_rendering(&self) -> bool {
        self.typewriter.is_some()
    }

    pub fn can_copy(&self) -> bool {
        self.copy != CopyState::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_is_instant() {
        let msg = Message::user(0, "hello\nthere".to_string());
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.render_mode, RenderMode::Instant);
        assert_eq!(msg.display.plain_text(), "hello\nthere");
        assert!(!msg.is_rendering());
        assert!(!msg.can_copy());
    }

    #[test]
    fn test_assistant_message_starts_empty() {
        let msg = Message::assistant(3, "hi".to_string());
        assert_eq!(msg.id, 3);
        assert_eq!(msg.render_mode, RenderMode::Progressive);
        assert!(msg.display.is_empty());
        assert!(msg.is_rendering());
        assert_eq!(msg.copy, CopyState::Hidden);
    }
}
