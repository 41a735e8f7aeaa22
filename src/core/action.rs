//! # Actions
//!
//! Everything that can happen in the chat session becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The endpoint answers? That's `Action::ResponseReceived(text)`.
//! Time passes? That's `Action::Tick(now)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an [`Effect`] describing any I/O the host must
//! perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! ## Session cycle
//!
//! ```text
//!            Submit                 ResponseReceived            render done
//!   Idle ─────────────► Sending ─────────────────► Rendering(id) ───────────► Idle
//!                          │
//!                          │ RequestFailed                 render done or
//!                          └──────────────► Fallback(id) ─ release delay ──► Idle
//! ```
//!
//! Submits outside `Idle` are dropped, never queued. A render completion or
//! a release timer only moves the session back to `Idle` when it belongs to
//! the current phase.

use std::time::Duration;

use log::{debug, info, warn};

use crate::core::config::FallbackRelease;
use crate::core::message::{CopyState, Message, MessageId, Role};
use crate::core::state::{App, Phase};
use crate::core::timer::Timer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show the widget. The first open also types out the greeting.
    Open,
    /// Hide the widget. The conversation stays as it is.
    Close,
    Toggle,
    Submit(String),
    /// Submit the quick question at this index.
    QuickQuestion(usize),
    ResponseReceived(String),
    /// Any failure of the remote call. The reason is only logged.
    RequestFailed(String),
    /// The host clock now reads this offset.
    Tick(Duration),
    CopyMessage(MessageId),
    Copied(MessageId),
    CopyFailed { id: MessageId, reason: String },
    Quit,
}

/// I/O the host performs on behalf of the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Send this text to the chat endpoint; report back with
    /// `ResponseReceived` or `RequestFailed`.
    SpawnRequest(String),
    /// Put `text` on the clipboard; report back with `Copied` or `CopyFailed`.
    CopyToClipboard { id: MessageId, text: String },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    if !matches!(action, Action::Tick(_)) {
        debug!("Action: {:?} (phase={:?})", action, app.phase);
    }

    match action {
        Action::Open => {
            open(app);
            Effect::None
        }
        Action::Close => {
            close(app);
            Effect::None
        }
        Action::Toggle => {
            if app.is_open {
                close(app);
            } else {
                open(app);
            }
            Effect::None
        }
        Action::Submit(text) => submit(app, &text),
        Action::QuickQuestion(index) => quick_question(app, index),
        Action::ResponseReceived(text) => {
            response_received(app, text);
            Effect::None
        }
        Action::RequestFailed(reason) => {
            request_failed(app, &reason);
            Effect::None
        }
        Action::Tick(now) => {
            tick(app, now);
            Effect::None
        }
        Action::CopyMessage(id) => copy_message(app, id),
        Action::Copied(id) => {
            copied(app, id);
            Effect::None
        }
        Action::CopyFailed { id, reason } => {
            warn!("Copy of message {} failed: {}", id, reason);
            app.status_message = format!("Copy failed: {reason}");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

// ============================================================================
// Widget visibility
// ============================================================================

fn open(app: &mut App) {
    if app.is_open {
        return;
    }
    app.is_open = true;
    info!("Chat widget opened");

    if !app.has_shown_welcome {
        // Anything shown before the first open is placeholder content.
        app.messages.clear();
        let greeting = app.strings.greeting.clone();
        let id = append_progressive(app, greeting);
        // Unlocked, the greeting owns no phase, so its completion releases nothing.
        if app.lock_during_greeting && !app.is_processing() {
            lock(app, Phase::Rendering(id));
        }
        app.has_shown_welcome = true;
    }

    app.follow_latest = true;
    app.timers.cancel_where(|t| *t == Timer::FocusComposer);
    app.timers
        .schedule(app.now + app.timing.focus_settle, Timer::FocusComposer);
}

fn close(app: &mut App) {
    if !app.is_open {
        return;
    }
    app.is_open = false;
    app.composer.focused = false;
    app.timers.cancel_where(|t| *t == Timer::FocusComposer);
    info!("Chat widget closed");

    if app.cancel_render_on_close {
        let rendering: Vec<MessageId> = app
            .messages
            .iter()
            .filter(|m| m.is_rendering())
            .map(|m| m.id)
            .collect();
        for id in rendering {
            info!("Cancelling render of message {} on close", id);
            app.timers.cancel_where(|t| *t == Timer::TypewriterStep(id));
            if let Some(message) = app.message_mut(id) {
                message.typewriter = None;
            }
            finish_render(app, id);
        }
    }
}

// ============================================================================
// Request cycle
// ============================================================================

fn submit(app: &mut App, text: &str) -> Effect {
    let text = text.trim();
    if text.is_empty() {
        debug!("Ignoring empty submit");
        return Effect::None;
    }
    if app.is_processing() {
        debug!("Ignoring submit while {:?}", app.phase);
        return Effect::None;
    }

    let text = text.to_string();
    let id = app.next_message_id();
    app.messages.push(Message::user(id, text.clone()));
    app.pending = Some(text.clone());
    lock(app, Phase::Sending);
    app.thinking = true;
    app.follow_latest = true;
    app.status_message.clear();

    info!("Submitting message {} ({} chars)", id, text.chars().count());
    Effect::SpawnRequest(text)
}

fn quick_question(app: &mut App, index: usize) -> Effect {
    if app.composer.disabled {
        debug!("Quick question {} ignored: composer disabled", index);
        return Effect::None;
    }
    let Some(question) = app.strings.quick_questions.get(index).cloned() else {
        warn!("No quick question at index {}", index);
        return Effect::None;
    };
    submit(app, &question)
}

fn response_received(app: &mut App, text: String) {
    if app.phase != Phase::Sending {
        warn!("Dropping reply received while {:?}", app.phase);
        return;
    }
    info!("Reply received ({} chars)", text.chars().count());
    app.thinking = false;
    app.pending = None;
    let id = append_progressive(app, text);
    app.phase = Phase::Rendering(id);
}

fn request_failed(app: &mut App, reason: &str) {
    if app.phase != Phase::Sending {
        warn!("Dropping failure reported while {:?}: {}", app.phase, reason);
        return;
    }
    warn!("Chat request failed: {}", reason);
    app.thinking = false;
    app.pending = None;
    let fallback = app.strings.fallback.clone();
    let id = append_progressive(app, fallback);
    app.phase = Phase::Fallback(id);

    if app.fallback_release == FallbackRelease::Delay {
        app.timers.schedule(
            app.now + app.timing.fallback_release_delay,
            Timer::ReleaseAfterFallback(id),
        );
    }
}

/// Appends an assistant message and starts its typewriter on the next tick.
fn append_progressive(app: &mut App, text: String) -> MessageId {
    let id = app.next_message_id();
    app.messages.push(Message::assistant(id, text));
    app.timers.schedule(app.now, Timer::TypewriterStep(id));
    app.follow_latest = true;
    id
}

fn lock(app: &mut App, phase: Phase) {
    app.phase = phase;
    app.composer.disabled = true;
}

fn release(app: &mut App) {
    debug!("Session released from {:?}", app.phase);
    app.phase = Phase::Idle;
    app.composer.disabled = false;
}

// ============================================================================
// Timers
// ============================================================================

fn tick(app: &mut App, now: Duration) {
    if now > app.now {
        app.now = now;
    }
    while let Some((deadline, timer)) = app.timers.pop_due(app.now) {
        fire(app, deadline, timer);
    }
}

fn fire(app: &mut App, deadline: Duration, timer: Timer) {
    match timer {
        Timer::TypewriterStep(id) => step(app, id, deadline),
        Timer::ReleaseAfterFallback(id) => {
            if app.phase == Phase::Fallback(id) {
                info!("Releasing input {:?} after fallback message", app.timing.fallback_release_delay);
                release(app);
            }
        }
        Timer::FocusComposer => {
            if app.is_open {
                app.composer.focused = true;
            }
        }
        Timer::ResetCopyFeedback(id) => {
            if let Some(message) = app.message_mut(id)
                && message.copy == CopyState::Copied
            {
                message.copy = CopyState::Ready;
            }
        }
    }
}

/// Emits one unit of a progressive render, or completes it.
///
/// The next step is scheduled from this step's deadline rather than from
/// `now`, so a host that ticks late catches up within one tick.
fn step(app: &mut App, id: MessageId, deadline: Duration) {
    let interval = app.timing.typing_interval;
    let Some(message) = app.message_mut(id) else {
        return;
    };
    let Some(typewriter) = message.typewriter.as_mut() else {
        return;
    };

    match typewriter.next() {
        Some(emission) => {
            emission.apply_to(&mut message.display);
            app.follow_latest = true;
            app.timers
                .schedule(deadline + interval, Timer::TypewriterStep(id));
        }
        None => {
            message.typewriter = None;
            finish_render(app, id);
        }
    }
}

fn finish_render(app: &mut App, id: MessageId) {
    if let Some(message) = app.message_mut(id)
        && message.role == Role::Assistant
    {
        message.copy = CopyState::Ready;
    }
    app.follow_latest = true;
    if app.is_open {
        app.composer.focused = true;
    }
    if app.phase.owner() == Some(id) {
        release(app);
    }
    debug!("Render of message {} complete", id);
}

// ============================================================================
// Copy affordance
// ============================================================================

fn copy_message(app: &mut App, id: MessageId) -> Effect {
    match app.message(id) {
        Some(message) if message.can_copy() => Effect::CopyToClipboard {
            id,
            text: message.display.plain_text(),
        },
        _ => {
            debug!("Message {} has no copy affordance", id);
            Effect::None
        }
    }
}

fn copied(app: &mut App, id: MessageId) {
    let feedback = app.timing.copy_feedback;
    let Some(message) = app.message_mut(id) else {
        return;
    };
    if !message.can_copy() {
        return;
    }
    message.copy = CopyState::Copied;
    app.status_message = "Copied to clipboard".to_string();
    app.timers.cancel_where(|t| *t == Timer::ResetCopyFeedback(id));
    app.timers
        .schedule(app.now + feedback, Timer::ResetCopyFeedback(id));
}
