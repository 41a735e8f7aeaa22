//! # InputBox Component
//!
//! Multi-line composer. Enter submits; Shift+Enter, Alt+Enter or Ctrl+J
//! insert a line break, and pasted text keeps its line breaks. The box grows
//! with its content up to `MAX_VISIBLE_LINES` rows, then scrolls internally
//! to keep the cursor in view.
//!
//! The box never clears itself on Enter. The host clears it once the core
//! has accepted the submission, so a submit that the session drops leaves
//! the typed text in place.

mod wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{
    Block, BorderType, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use wrap::{MAX_VISIBLE_LINES, Row, VERTICAL_OVERHEAD, locate, offset_at_column, rows, wrap_width};

/// Height of an empty (or single-row) composer.
pub const MIN_INPUT_HEIGHT: u16 = 1 + VERTICAL_OVERHEAD;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    /// Editing is refused while set. Mirrors the session's composer.
    pub disabled: bool,
    /// Whether the terminal cursor is shown in the box.
    pub focused: bool,
    pub placeholder: String,
    /// Cursor position as byte offset in buffer.
    cursor: usize,
    /// First visible row.
    scroll: usize,
    /// Box width at the last render; up/down movement wraps against it.
    last_width: u16,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            focused: false,
            placeholder: String::new(),
            cursor: 0,
            scroll: 0,
            last_width: Self::DEFAULT_WIDTH,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Height needed to show the buffer in a box `area_width` wide,
    /// between `MIN_INPUT_HEIGHT` and `MAX_VISIBLE_LINES` rows plus borders.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let count = rows(&self.buffer, wrap_width(area_width)).len();
        let visible = u16::try_from(count).unwrap_or(u16::MAX).min(MAX_VISIBLE_LINES);
        visible + VERTICAL_OVERHEAD
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Moves the cursor one visual row up (`-1`) or down (`1`), keeping the
    /// display column where possible. Returns `false` at the first/last row.
    fn move_vertically(&mut self, direction: isize) -> bool {
        let rs = rows(&self.buffer, wrap_width(self.last_width));
        let (row, col) = locate(&self.buffer, &rs, self.cursor);
        let Some(target) = row.checked_add_signed(direction).and_then(|t| rs.get(t)) else {
            return false;
        };
        self.cursor = offset_at_column(&self.buffer, *target, col);
        true
    }

    /// Keeps the cursor row inside the visible window.
    fn update_scroll(&mut self, cursor_row: usize, total_rows: usize) {
        let visible = usize::from(MAX_VISIBLE_LINES);
        if cursor_row < self.scroll {
            self.scroll = cursor_row;
        } else if cursor_row >= self.scroll + visible {
            self.scroll = cursor_row + 1 - visible;
        }
        self.scroll = self.scroll.min(total_rows.saturating_sub(visible));
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect, total_rows: usize) {
        let visible = usize::from(MAX_VISIBLE_LINES);
        if total_rows <= visible {
            return;
        }
        // content_length is the last scroll position, not the row count
        let mut state = ScrollbarState::default()
            .content_length(total_rows - visible)
            .position(self.scroll);
        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(VERTICAL_OVERHEAD),
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut state,
        );
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.last_width = area.width;
        let rs: Vec<Row> = rows(&self.buffer, wrap_width(area.width));
        let (cursor_row, cursor_col) = locate(&self.buffer, &rs, self.cursor);
        self.update_scroll(cursor_row, rs.len());

        let (text_style, border_style) = if self.disabled {
            let dim = Style::default().fg(Color::DarkGray);
            (dim, dim)
        } else if self.focused {
            (Style::default().fg(Color::Green), Style::default().fg(Color::Green))
        } else {
            (
                Style::default().fg(Color::Green),
                Style::default().fg(Color::Green).add_modifier(Modifier::DIM),
            )
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style);

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(self.placeholder.as_str()).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            let lines: Vec<Line> = rs
                .iter()
                .skip(self.scroll)
                .take(usize::from(MAX_VISIBLE_LINES))
                .map(|r| Line::raw(&self.buffer[r.start..r.end]))
                .collect();
            Paragraph::new(Text::from(lines)).style(text_style)
        };

        frame.render_widget(paragraph.block(block), area);
        self.render_scrollbar(frame, area, rs.len());

        if self.focused && !self.disabled {
            let x = area.x + 1 + u16::try_from(cursor_col).unwrap_or(0);
            let y = area.y + 1 + u16::try_from(cursor_row - self.scroll).unwrap_or(0);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut tmp));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Terminals may paste CRLF or bare CR line endings.
                let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
                self.insert_str(&normalized);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                let (prev, _) = self.buffer[..self.cursor].char_indices().next_back()?;
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                let ch = self.buffer[self.cursor..].chars().next()?;
                self.buffer
                    .drain(self.cursor..self.cursor + ch.len_utf8());
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => {
                let (prev, _) = self.buffer[..self.cursor].char_indices().next_back()?;
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorRight => {
                let ch = self.buffer[self.cursor..].chars().next()?;
                self.cursor += ch.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor != line_start).then(|| {
                    self.cursor = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor..]
                    .find('\n')
                    .map(|i| self.cursor + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor != line_end).then(|| {
                    self.cursor = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorUp => self.move_vertically(-1).then_some(InputEvent::ContentChanged),
            TuiEvent::CursorDown => self.move_vertically(1).then_some(InputEvent::ContentChanged),
            TuiEvent::Submit => {
                (!self.buffer.trim().is_empty()).then(|| InputEvent::Submit(self.buffer.clone()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn typed(text: &str) -> InputBox {
        let mut input = InputBox::new();
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
        input
    }

    fn draw(input: &mut InputBox, width: u16) -> Vec<String> {
        let height = input.calculate_height(width);
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = typed("ab");
        assert_eq!(input.buffer, "ab");
        assert_eq!(
            input.handle_event(&TuiEvent::Backspace),
            Some(InputEvent::ContentChanged)
        );
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = typed("綠牆");
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::InputChar('色'));
        assert_eq!(input.buffer, "綠色牆");
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "綠色");
        assert_eq!(input.handle_event(&TuiEvent::Delete), None);
    }

    #[test]
    fn test_submit_keeps_buffer() {
        let mut input = typed("hello");
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("hello".to_string()))
        );
        assert_eq!(input.buffer, "hello");
        input.clear();
        assert!(input.buffer.is_empty());
    }

    #[test]
    fn test_blank_submit_ignored() {
        let mut input = typed(" \n ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_disabled_refuses_edits() {
        let mut input = typed("a");
        input.disabled = true;
        assert_eq!(input.handle_event(&TuiEvent::InputChar('b')), None);
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn test_pasted_line_breaks_are_submitted() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("line one\nline two".into()));
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("line one\nline two".to_string()))
        );
    }

    #[test]
    fn test_paste_normalizes_carriage_returns() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("a\r\nb\rc".into()));
        assert_eq!(input.buffer, "a\nb\nc");
    }

    #[test]
    fn test_typed_newline_is_kept() {
        let mut input = typed("a");
        input.handle_event(&TuiEvent::InputChar('\n'));
        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("a\nb".to_string()))
        );
    }

    #[test]
    fn test_height_grows_then_caps() {
        let mut input = InputBox::new();
        assert_eq!(input.calculate_height(40), MIN_INPUT_HEIGHT);
        input.handle_event(&TuiEvent::Paste("1\n2\n3".into()));
        assert_eq!(input.calculate_height(40), 3 + VERTICAL_OVERHEAD);
        input.handle_event(&TuiEvent::Paste("\n4\n5\n6\n7".into()));
        assert_eq!(input.calculate_height(40), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_height_counts_wrapped_rows() {
        // 10 wide: 7 text columns per row.
        let input = typed("abcdefghij");
        assert_eq!(input.calculate_height(10), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_home_end_stay_on_current_line() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("ab\ncd".into()));
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::InputChar('x'));
        assert_eq!(input.buffer, "ab\nxcd");
        input.handle_event(&TuiEvent::CursorEnd);
        input.handle_event(&TuiEvent::InputChar('y'));
        assert_eq!(input.buffer, "ab\nxcdy");
    }

    #[test]
    fn test_vertical_movement_keeps_column() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("abcd\nxy".into()));
        assert_eq!(
            input.handle_event(&TuiEvent::CursorUp),
            Some(InputEvent::ContentChanged)
        );
        input.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(input.buffer, "ab!cd\nxy");

        input.handle_event(&TuiEvent::CursorDown);
        input.handle_event(&TuiEvent::InputChar('?'));
        assert_eq!(input.buffer, "ab!cd\nxy?");
        assert_eq!(input.handle_event(&TuiEvent::CursorDown), None);
    }

    #[test]
    fn test_vertical_movement_at_edges() {
        let mut input = typed("single");
        assert_eq!(input.handle_event(&TuiEvent::CursorUp), None);
        assert_eq!(input.handle_event(&TuiEvent::CursorDown), None);
    }

    #[test]
    fn test_placeholder_when_empty() {
        let mut input = InputBox::new();
        input.placeholder = "Type your question...".to_string();
        assert!(draw(&mut input, 40).concat().contains("Type your question..."));
    }

    #[test]
    fn test_renders_each_line() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("first\nsecond".into()));
        let rows = draw(&mut input, 20);
        assert_eq!(rows.len(), 4);
        assert!(rows[1].contains("first"));
        assert!(rows[2].contains("second"));
    }

    #[test]
    fn test_scrolls_to_keep_cursor_row_visible() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("l1\nl2\nl3\nl4\nl5\nl6\nl7".into()));
        let text = draw(&mut input, 20).concat();
        assert!(text.contains("l7"));
        assert!(!text.contains("l1"));

        for _ in 0..6 {
            input.handle_event(&TuiEvent::CursorUp);
        }
        let text = draw(&mut input, 20).concat();
        assert!(text.contains("l1"));
        assert!(!text.contains("l7"));
    }
}
