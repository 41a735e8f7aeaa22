//! # MessageList Component
//!
//! Scrollable conversation view. Heights are cached per message and only
//! recomputed for messages whose visible text can still change, which is
//! whatever a typewriter is still filling in.
//!
//! While the session waits for a reply a "thinking" bubble with animated
//! dots is drawn after the last message. It is not a message and never
//! enters the conversation.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::Message as ChatMessage;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

/// Height of the thinking bubble (one text row plus borders).
pub const THINKING_HEIGHT: u16 = 3;

pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// Keep the view pinned to the newest content.
    pub stick_to_bottom: bool,
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
        }
    }

    fn total_height(&self) -> u16 {
        self.layout.heights.iter().sum()
    }

    /// Whether messages extend below the current scroll position.
    pub fn has_unseen_content(&self) -> bool {
        let max_y = self.total_height().saturating_sub(self.viewport_height);
        self.scroll_state.offset().y < max_y
    }

    pub fn clamp_scroll(&mut self) {
        let max_y = self.total_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-attach to the bottom when a scroll-down lands there.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.total_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [ChatMessage],
    pub assistant_name: &'a str,
    pub thinking: bool,
    pub thinking_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [ChatMessage],
        assistant_name: &'a str,
        thinking: bool,
        thinking_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            assistant_name,
            thinking,
            thinking_frame,
        }
    }
}

/// Dots for the thinking bubble: one to three, cycling.
pub fn thinking_dots(frame: usize) -> &'static str {
    match frame % 3 {
        0 => "●",
        1 => "● ●",
        _ => "● ● ●",
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // scrollbar column
        let message_count = self.messages.len();
        let first_volatile = self.messages.iter().position(|m| m.is_rendering());

        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(message_count, content_width, first_volatile);
        layout.heights.truncate(reusable);
        for message in self.messages.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(Message::calculate_height(message, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(message_count, content_width, first_volatile);

        let messages_height = self.state.total_height();
        let thinking_height = if self.thinking { THINKING_HEIGHT } else { 0 };
        let canvas_height = messages_height + thinking_height;

        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(Message::new(&self.messages[i], self.assistant_name), rect);
            y_offset += height;
        }

        if self.thinking {
            let style = Style::default().fg(Color::Blue);
            let bubble = Paragraph::new(thinking_dots(self.thinking_frame))
                .style(style)
                .block(
                    Block::bordered()
                        .title(self.assistant_name)
                        .border_type(BorderType::Rounded)
                        .border_style(style.add_modifier(Modifier::DIM)),
                );
            let width = content_width.min(16);
            scroll_view.render_widget(bubble, Rect::new(0, messages_height, width, THINKING_HEIGHT));
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached per-message heights for one content width.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    /// Running totals: `prefix_heights[i]` is the bottom edge of message `i`.
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
    /// First message that was still rendering when the cache was filled.
    volatile_from: Option<usize>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
            volatile_from: None,
        }
    }

    /// How many leading cached heights are still valid.
    ///
    /// A message that was rendering last frame is recomputed even if it has
    /// finished since, because its final characters arrived after the cache
    /// was filled.
    pub fn reusable_count(
        &self,
        message_count: usize,
        content_width: u16,
        first_volatile: Option<usize>,
    ) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        // The conversation only shrinks when it is cleared.
        if message_count < self.message_count {
            return 0;
        }

        [Some(self.heights.len()), first_volatile, self.volatile_from]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(0)
    }

    pub fn update_metadata(
        &mut self,
        message_count: usize,
        content_width: u16,
        first_volatile: Option<usize>,
    ) {
        self.message_count = message_count;
        self.content_width = content_width;
        self.volatile_from = first_volatile;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc += h;
                Some(*acc)
            })
            .collect();
    }

    /// Indices of messages overlapping the viewport, plus half a screen of
    /// margin on each side.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }

    /// Message index at content row `content_y`, with the row offset inside it.
    pub fn message_at(&self, content_y: u16) -> Option<(usize, u16)> {
        let index = self.prefix_heights.partition_point(|&end| end <= content_y);
        if index >= self.prefix_heights.len() {
            return None;
        }
        let top = if index == 0 {
            0
        } else {
            self.prefix_heights[index - 1]
        };
        Some((index, content_y - top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn filled(heights: &[u16], width: u16, volatile: Option<usize>) -> LayoutCache {
        let mut cache = LayoutCache::new();
        cache.heights = heights.to_vec();
        cache.rebuild_prefix_heights();
        cache.update_metadata(heights.len(), width, volatile);
        cache
    }

    #[test]
    fn test_layout_cache_reusable() {
        let cache = filled(&[1; 5], 80, None);
        assert_eq!(cache.reusable_count(5, 80, None), 5);
        // New messages appended: the old ones stay valid
        assert_eq!(cache.reusable_count(6, 80, None), 5);
        // Width change invalidates everything
        assert_eq!(cache.reusable_count(5, 40, None), 0);
        // Conversation cleared
        assert_eq!(cache.reusable_count(1, 80, None), 0);
    }

    #[test]
    fn test_rendering_message_is_recomputed() {
        let cache = filled(&[3, 3, 3], 80, None);
        assert_eq!(cache.reusable_count(3, 80, Some(2)), 2);
    }

    #[test]
    fn test_message_finished_since_last_frame_is_recomputed() {
        let cache = filled(&[3, 3, 3], 80, Some(2));
        assert_eq!(cache.reusable_count(3, 80, None), 2);
    }

    #[test]
    fn test_message_at() {
        let cache = filled(&[3, 5, 2], 80, None);
        assert_eq!(cache.message_at(0), Some((0, 0)));
        assert_eq!(cache.message_at(2), Some((0, 2)));
        assert_eq!(cache.message_at(3), Some((1, 0)));
        assert_eq!(cache.message_at(9), Some((2, 1)));
        assert_eq!(cache.message_at(10), None);
    }

    #[test]
    fn test_visible_range_covers_viewport() {
        let cache = filled(&[10; 10], 80, None);
        let range = cache.visible_range(50, 10);
        assert!(range.start <= 5);
        assert!(range.end >= 6);
        assert!(range.end <= 10);
    }

    #[test]
    fn test_thinking_dots_cycle() {
        assert_eq!(thinking_dots(0), "●");
        assert_eq!(thinking_dots(2), "● ● ●");
        assert_eq!(thinking_dots(3), "●");
    }

    #[test]
    fn test_render_with_thinking_bubble() {
        let backend = TestBackend::new(40, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let messages = vec![ChatMessage::user(0, "hello".into())];
        let mut state = MessageListState::new();

        terminal
            .draw(|f| {
                MessageList::new(&mut state, &messages, "AI x SDGs", true, 2).render(f, f.area())
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("hello"));
        assert!(text.contains("●"));
        assert_eq!(state.layout.heights.len(), 1);
    }

    #[test]
    fn test_scroll_up_unpins() {
        let mut state = MessageListState::new();
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
    }
}
