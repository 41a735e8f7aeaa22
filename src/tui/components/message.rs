use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::message::{CopyState, Message as ChatMessage, Role};
use crate::core::surface::{StyledText, TextStyle};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

pub const COPY_LABEL: &str = "[copy]";
pub const COPIED_LABEL: &str = "[copied ✓]";

/// A stateless component that renders one chat message.
///
/// The body is the message's `display` surface, so a reply that is still
/// being typed shows only what the typewriter has emitted so far. Assistant
/// replies that finished rendering carry a copy label on the top border.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a ChatMessage,
    /// Border title for assistant messages.
    pub assistant_name: &'a str,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage, assistant_name: &'a str) -> Self {
        Self {
            message,
            assistant_name,
        }
    }

    /// Predicts rendered height without rendering.
    ///
    /// The wrapping options mirror `Paragraph`'s word wrapper so the
    /// predicted and drawn heights agree.
    pub fn calculate_height(message: &ChatMessage, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let content = message.display.plain_text();
        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(&content, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    /// Whether column `x` of the message's top row (relative to its left
    /// edge) falls on the copy label.
    pub fn copy_label_hit(message: &ChatMessage, width: u16, x: u16) -> bool {
        let Some(label) = copy_label(message.copy) else {
            return false;
        };
        let label_width = label.width() as u16;
        let end = width.saturating_sub(1);
        let start = end.saturating_sub(label_width);
        x >= start && x < end
    }
}

/// Label text for a copy state, or `None` when no affordance is shown.
pub fn copy_label(state: CopyState) -> Option<&'static str> {
    match state {
        CopyState::Hidden => None,
        CopyState::Ready => Some(COPY_LABEL),
        CopyState::Copied => Some(COPIED_LABEL),
    }
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Green),
        Role::Assistant => Style::default().fg(Color::Blue),
    }
}

/// Converts styled runs into ratatui lines on top of `base`.
pub fn to_text(display: &StyledText, base: Style) -> Text<'static> {
    let lines: Vec<Line<'static>> = display
        .lines()
        .iter()
        .map(|runs| {
            Line::from(
                runs.iter()
                    .map(|run| Span::styled(run.text.clone(), run_style(run.style, base)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    Text::from(lines)
}

fn run_style(style: TextStyle, base: Style) -> Style {
    let mut out = base;
    if style.bold {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.italic {
        out = out.add_modifier(Modifier::ITALIC);
    }
    out
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = role_style(self.message.role);
        let title = match self.message.role {
            Role::User => "you",
            Role::Assistant => self.assistant_name,
        };
        let border_style = if self.message.is_rendering() {
            style
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let mut block = Block::bordered()
            .title(title)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        if let Some(label) = copy_label(self.message.copy) {
            let label_style = match self.message.copy {
                CopyState::Copied => Style::default().fg(Color::Green),
                _ => Style::default().fg(Color::Cyan),
            };
            block = block.title_top(Line::styled(label, label_style).right_aligned());
        }

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(to_text(&self.message.display, style))
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
