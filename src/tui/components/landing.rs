//! # Landing Page Component
//!
//! Shown while the chat widget is closed: the assistant's name and how to
//! open it. The launcher badge pulses so the page doesn't look frozen.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

/// Pulse intensity above which the badge is drawn bold.
const PULSE_BOLD_THRESHOLD: f32 = 0.5;

pub struct LandingPage<'a> {
    pub assistant_name: &'a str,
    /// 0.0 to 1.0
    pub pulse: f32,
}

impl<'a> LandingPage<'a> {
    pub fn new(assistant_name: &'a str, pulse: f32) -> Self {
        Self {
            assistant_name,
            pulse,
        }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let badge_style = if self.pulse > PULSE_BOLD_THRESHOLD {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        vec![
            Line::from(Span::styled("╭──────╮", badge_style)),
            Line::from(Span::styled("│  💬  │", badge_style)),
            Line::from(Span::styled("╰──────╯", badge_style)),
            Line::from(""),
            Line::from(Span::styled(
                self.assistant_name,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Ctrl+T or Enter to open chat · Ctrl+C to quit",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(Color::DarkGray),
            )),
        ]
    }
}

impl<'a> Component for LandingPage<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = self.lines();
        let [content] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_landing_shows_name_and_hint() {
        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| LandingPage::new("AI x SDGs", 0.9).render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("AI x SDGs"));
        assert!(text.contains("Ctrl+T"));
    }
}
