//! # Application State
//!
//! Core session state. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── phase: Phase                  // Idle | Sending | Rendering(id) | Fallback(id)
//! ├── has_shown_welcome: bool       // greeting rendered once per run
//! ├── pending: Option<String>       // outbound text while a request is open
//! ├── is_open: bool                 // widget visible
//! ├── composer: Composer            // disabled / focused
//! ├── thinking: bool                // "thinking" placeholder visible
//! ├── messages: Vec<Message>        // append-only display sequence
//! ├── timers: TimerQueue            // delayed work, fired by Tick
//! ├── now: Duration                 // last clock reading seen
//! ├── follow_latest: bool           // host should scroll to the newest content
//! ├── status_message: String        // title bar text
//! ├── timing / strings / …          // resolved settings
//! ```
//!
//! One `App` is built at startup and lives until exit; nothing resets it.
//! State changes only happen through `update(state, action)` in action.rs.

use std::time::Duration;

use crate::core::config::{FallbackRelease, ResolvedConfig, Strings, Timing};
use crate::core::message::{Message, MessageId};
use crate::core::timer::TimerQueue;

/// Where the session is in its request/render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Request in flight.
    Sending,
    /// A reply (or the greeting) is being typed out. Its completion releases the session.
    Rendering(MessageId),
    /// The fallback apology is being typed out after a failed request.
    Fallback(MessageId),
}

impl Phase {
    /// The message whose render currently owns the session, if any.
    pub fn owner(self) -> Option<MessageId> {
        match self {
            Phase::Rendering(id) | Phase::Fallback(id) => Some(id),
            Phase::Idle | Phase::Sending => None,
        }
    }
}

/// Input affordance state. Quick questions follow `disabled`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Composer {
    pub disabled: bool,
    pub focused: bool,
}

pub struct App {
    pub phase: Phase,
    pub has_shown_welcome: bool,
    pub pending: Option<String>,
    pub is_open: bool,
    pub composer: Composer,
    pub thinking: bool,
    pub messages: Vec<Message>,
    pub timers: TimerQueue,
    pub now: Duration,
    pub follow_latest: bool,
    pub status_message: String,
    pub timing: Timing,
    pub strings: Strings,
    pub fallback_release: FallbackRelease,
    pub cancel_render_on_close: bool,
    pub lock_during_greeting: bool,
    next_id: MessageId,
}

impl App {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            phase: Phase::Idle,
            has_shown_welcome: false,
            pending: None,
            is_open: false,
            composer: Composer::default(),
            thinking: false,
            messages: Vec::new(),
            timers: TimerQueue::new(),
            now: Duration::ZERO,
            follow_latest: false,
            status_message: String::new(),
            timing: config.timing,
            strings: config.strings.clone(),
            fallback_release: config.fallback_release,
            cancel_render_on_close: config.cancel_render_on_close,
            lock_during_greeting: config.lock_during_greeting,
            next_id: 0,
        }
    }

    /// The session's `isProcessing` flag.
    pub fn is_processing(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Composer placeholder for the current enabled/disabled state.
    pub fn placeholder(&self) -> &str {
        if self.composer.disabled {
            &self.strings.placeholder_disabled
        } else {
            &self.strings.placeholder_enabled
        }
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn message_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    /// Latest assistant message whose copy affordance is showing.
    pub fn last_copyable(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.can_copy())
    }

    pub(crate) fn next_message_id(&mut self) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
