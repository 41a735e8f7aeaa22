//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates terminal events into core `Action`s and carries out the
//! `Effect`s the core returns.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Time
//!
//! The core has no clock. Each loop iteration reads a [`SystemClock`] and
//! sends `Action::Tick(now)` whenever a timer is due; the poll timeout is cut
//! short to wake up for the next deadline. A late wake-up is harmless:
//! the core fires every overdue step in one tick.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (landing page pulse, thinking dots): at least every ~80ms.
//! - **Typing out a reply**: on every tick, capped at one frame per ~16ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::api::{ChatClient, HttpChatClient};
use crate::clipboard;
use crate::core::action::{Action, Effect, update};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::ResolvedConfig;
use crate::core::message::MessageId;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::ClickTarget;

const ANIMATION_INTERVAL: Duration = Duration::from_millis(80);
const IDLE_INTERVAL: Duration = Duration::from_millis(500);
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// Landing badge pulse, 0.0 to 1.0.
    pub pulse_value: f32,
    pub thinking_frame: usize,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            pulse_value: 0.0,
            thinking_frame: 0,
        }
    }

    /// Copies what the presentation mirrors from the core, and consumes the
    /// core's scroll-to-latest request.
    fn sync(&mut self, app: &mut App) {
        self.input_box.disabled = app.composer.disabled;
        self.input_box.focused = app.composer.focused;
        if self.input_box.placeholder != app.placeholder() {
            self.input_box.placeholder = app.placeholder().to_string();
        }
        if app.follow_latest {
            self.message_list.stick_to_bottom = true;
            app.follow_latest = false;
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Carries out effects returned by `update`.
struct Runtime {
    client: Arc<dyn ChatClient>,
    tx: mpsc::Sender<Action>,
    clock: SystemClock,
}

impl Runtime {
    /// Applies `action` and performs its effect. Returns `true` on quit.
    ///
    /// The core's notion of "now" is brought up to date first, so anything
    /// the action schedules starts from the current time rather than from
    /// the last tick.
    fn dispatch(&self, app: &mut App, tui: &mut TuiState, action: Action) -> bool {
        if !matches!(action, Action::Tick(_)) {
            update(app, Action::Tick(self.clock.now()));
        }
        let effect = update(app, action);
        match effect {
            Effect::None => false,
            Effect::Quit => true,
            Effect::SpawnRequest(text) => {
                tui.input_box.clear();
                spawn_request(self.client.clone(), text, self.tx.clone());
                false
            }
            Effect::CopyToClipboard { id, text } => {
                spawn_copy(id, text, self.tx.clone());
                false
            }
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    info!("Chat endpoint: {}", config.endpoint);
    let client: Arc<dyn ChatClient> = Arc::new(HttpChatClient::new(config.endpoint.clone()));
    let mut app = App::from_config(&config);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let result = event_loop(&mut terminal, &mut app, client);

    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    client: Arc<dyn ChatClient>,
) -> std::io::Result<()> {
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let runtime = Runtime {
        client,
        tx,
        clock: SystemClock::new(),
    };

    let start_time = Instant::now();
    let mut last_draw: Option<Instant> = None;
    let mut needs_redraw = true;

    loop {
        // Fire whatever timers came due since the last iteration.
        let now = runtime.clock.now();
        if app.timers.next_deadline().is_some_and(|d| d <= now) {
            runtime.dispatch(app, &mut tui, Action::Tick(now));
            needs_redraw = true;
        }

        tui.sync(app);

        let animating = !app.is_open || app.thinking;
        if animating {
            needs_redraw = true;
        }

        let frame_due = last_draw.is_none_or(|t| t.elapsed() >= FRAME_INTERVAL);
        if needs_redraw && frame_due {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 3.0).sin() * 0.5 + 0.5;
            tui.thinking_frame = (elapsed * 3.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, app, &mut tui))?;
            last_draw = Some(Instant::now());
            needs_redraw = false;
        }

        let mut timeout = if animating {
            ANIMATION_INTERVAL
        } else {
            IDLE_INTERVAL
        };
        if needs_redraw {
            timeout = timeout.min(FRAME_INTERVAL);
        }
        if let Some(deadline) = app.timers.next_deadline() {
            timeout = timeout.min(deadline.saturating_sub(runtime.clock.now()));
        }
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let frame_area = terminal.get_frame().area();
            if handle_event(event, app, &mut tui, &runtime, frame_area) {
                should_quit = true;
                break;
            }
        }

        // Results from background tasks (chat replies, clipboard)
        while !should_quit && let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            should_quit = runtime.dispatch(app, &mut tui, action);
        }

        if should_quit {
            info!("Quitting");
            return Ok(());
        }
    }
}

/// Routes one terminal event. Returns `true` on quit.
fn handle_event(
    event: TuiEvent,
    app: &mut App,
    tui: &mut TuiState,
    runtime: &Runtime,
    frame_area: ratatui::layout::Rect,
) -> bool {
    match event {
        TuiEvent::Resize => false,
        TuiEvent::ForceQuit => runtime.dispatch(app, tui, Action::Quit),
        TuiEvent::ToggleChat => runtime.dispatch(app, tui, Action::Toggle),
        // Enter on the landing page opens the widget
        TuiEvent::Submit if !app.is_open => runtime.dispatch(app, tui, Action::Open),
        _ if !app.is_open => false,

        TuiEvent::Escape => runtime.dispatch(app, tui, Action::Close),
        TuiEvent::QuickQuestion(index) => runtime.dispatch(app, tui, Action::QuickQuestion(index)),
        TuiEvent::CopyLast => match app.last_copyable().map(|m| m.id) {
            Some(id) => runtime.dispatch(app, tui, Action::CopyMessage(id)),
            None => {
                app.status_message = "Nothing to copy yet".to_string();
                false
            }
        },
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            false
        }
        TuiEvent::CursorUp | TuiEvent::CursorDown => {
            if tui.input_box.handle_event(&event).is_none() {
                let scroll = if event == TuiEvent::CursorUp {
                    TuiEvent::ScrollUp
                } else {
                    TuiEvent::ScrollDown
                };
                tui.message_list.handle_event(&scroll);
            }
            false
        }
        TuiEvent::MouseClick(col, row) => {
            match ui::hit_test(col, row, frame_area, app, tui) {
                ClickTarget::CopyLabel(id) => runtime.dispatch(app, tui, Action::CopyMessage(id)),
                ClickTarget::QuickQuestion(index) => {
                    runtime.dispatch(app, tui, Action::QuickQuestion(index))
                }
                ClickTarget::Nothing => false,
            }
        }
        other => match tui.input_box.handle_event(&other) {
            Some(InputEvent::Submit(text)) => runtime.dispatch(app, tui, Action::Submit(text)),
            Some(InputEvent::ContentChanged) | None => false,
        },
    }
}

fn spawn_request(client: Arc<dyn ChatClient>, text: String, tx: mpsc::Sender<Action>) {
    info!("Spawning chat request via {} client", client.name());
    tokio::spawn(async move {
        let action = match client.send(&text).await {
            Ok(reply) => Action::ResponseReceived(reply),
            Err(e) => Action::RequestFailed(e.to_string()),
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver chat result: receiver dropped");
        }
    });
}

fn spawn_copy(id: MessageId, text: String, tx: mpsc::Sender<Action>) {
    // Clipboard commands block until they have read stdin.
    tokio::task::spawn_blocking(move || {
        let action = match clipboard::copy_to_clipboard(&text) {
            Ok(()) => Action::Copied(id),
            Err(reason) => Action::CopyFailed { id, reason },
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver clipboard result: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ChatError;
    use crate::test_support::{opened_app, test_app};
    use async_trait::async_trait;
    use ratatui::layout::Rect;

    struct NeverCalled;

    #[async_trait]
    impl ChatClient for NeverCalled {
        fn name(&self) -> &str {
            "never"
        }
        async fn send(&self, _message: &str) -> Result<String, ChatError> {
            Err(ChatError::Network("not under test".into()))
        }
    }

    fn runtime() -> (Runtime, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        (
            Runtime {
                client: Arc::new(NeverCalled),
                tx,
                clock: SystemClock::new(),
            },
            rx,
        )
    }

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 100,
        height: 30,
    };

    #[test]
    fn test_enter_on_landing_opens() {
        let (rt, _rx) = runtime();
        let mut app = test_app();
        let mut tui = TuiState::new();
        assert!(!handle_event(TuiEvent::Submit, &mut app, &mut tui, &rt, AREA));
        assert!(app.is_open);
    }

    #[test]
    fn test_typing_ignored_while_closed() {
        let (rt, _rx) = runtime();
        let mut app = test_app();
        let mut tui = TuiState::new();
        handle_event(TuiEvent::InputChar('a'), &mut app, &mut tui, &rt, AREA);
        assert!(tui.input_box.buffer.is_empty());
    }

    #[test]
    fn test_escape_closes_and_ctrl_c_quits() {
        let (rt, _rx) = runtime();
        let mut app = opened_app();
        let mut tui = TuiState::new();
        handle_event(TuiEvent::Escape, &mut app, &mut tui, &rt, AREA);
        assert!(!app.is_open);
        assert!(handle_event(TuiEvent::ForceQuit, &mut app, &mut tui, &rt, AREA));
    }

    #[test]
    fn test_sync_mirrors_composer_and_consumes_follow() {
        let mut app = opened_app();
        let mut tui = TuiState::new();
        app.composer.disabled = true;
        app.follow_latest = true;
        tui.message_list.stick_to_bottom = false;

        tui.sync(&mut app);

        assert!(tui.input_box.disabled);
        assert_eq!(tui.input_box.placeholder, app.strings.placeholder_disabled);
        assert!(tui.message_list.stick_to_bottom);
        assert!(!app.follow_latest);
    }

    #[test]
    fn test_arrows_move_within_draft_before_scrolling() {
        let (rt, _rx) = runtime();
        let mut app = opened_app();
        let mut tui = TuiState::new();
        tui.message_list.stick_to_bottom = true;

        handle_event(TuiEvent::Paste("ab\ncd".into()), &mut app, &mut tui, &rt, AREA);
        handle_event(TuiEvent::CursorUp, &mut app, &mut tui, &rt, AREA);
        assert!(tui.message_list.stick_to_bottom, "moved within the draft");

        handle_event(TuiEvent::CursorUp, &mut app, &mut tui, &rt, AREA);
        assert!(!tui.message_list.stick_to_bottom, "top row reached, list scrolled");
    }

    #[test]
    fn test_copy_last_without_reply_sets_status() {
        let (rt, _rx) = runtime();
        let mut app = test_app();
        app.is_open = true;
        let mut tui = TuiState::new();
        handle_event(TuiEvent::CopyLast, &mut app, &mut tui, &rt, AREA);
        assert_eq!(app.status_message, "Nothing to copy yet");
    }

    #[tokio::test]
    async fn test_submit_clears_input_and_spawns_request() {
        let (rt, rx) = runtime();
        let mut app = opened_app();
        let mut tui = TuiState::new();
        for c in "hi".chars() {
            handle_event(TuiEvent::InputChar(c), &mut app, &mut tui, &rt, AREA);
        }
        handle_event(TuiEvent::Submit, &mut app, &mut tui, &rt, AREA);

        assert!(tui.input_box.buffer.is_empty());
        assert!(app.is_processing());

        // The stub client fails, which comes back as RequestFailed.
        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(action, Action::RequestFailed("network error: not under test".into()));
    }
}
