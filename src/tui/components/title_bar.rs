//! # TitleBar Component
//!
//! Single-line header for the chat panel.
//!
//! ```text
//! AI x SDGs | Replying… | Copied to clipboard | ↓ New
//! ```
//!
//! Segments after the name appear only when non-empty. Props come from
//! different places: the name from the strings table, the phase label and
//! status message from the core, and the unseen-content flag from the
//! message list's scroll position.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::state::Phase;
use crate::tui::component::Component;

pub struct TitleBar {
    pub assistant_name: String,
    pub phase: Phase,
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        assistant_name: String,
        phase: Phase,
        status_message: String,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            assistant_name,
            phase,
            status_message,
            has_unseen_content,
        }
    }

    /// Short label for the session phase. Empty while idle.
    pub fn phase_label(phase: Phase) -> &'static str {
        match phase {
            Phase::Idle => "",
            Phase::Sending => "Sending…",
            Phase::Rendering(_) => "Replying…",
            Phase::Fallback(_) => "Unavailable",
        }
    }

    pub fn text(&self) -> String {
        let mut parts = vec![self.assistant_name.as_str()];
        let label = Self::phase_label(self.phase);
        if !label.is_empty() {
            parts.push(label);
        }
        if !self.status_message.is_empty() {
            parts.push(&self.status_message);
        }
        if self.has_unseen_content {
            parts.push("↓ New");
        }
        parts.join(" | ")
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(
            self.text(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(line, area);
    }
}
