//! # QuickQuestions Component
//!
//! A title row followed by one bubble per preset question, flowing left to
//! right and wrapping to new rows. Bubble `i` is labelled with the function
//! key that submits it (`F1` for the first).
//!
//! The same layout function drives drawing and click hit testing, so a
//! click always lands on the bubble that was drawn there.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;

/// Columns between neighbouring bubbles.
const BUBBLE_GAP: u16 = 1;

pub struct QuickQuestions<'a> {
    pub title: &'a str,
    pub questions: &'a [String],
    /// Dimmed and inert while the session is busy.
    pub disabled: bool,
}

impl<'a> QuickQuestions<'a> {
    pub fn new(title: &'a str, questions: &'a [String], disabled: bool) -> Self {
        Self {
            title,
            questions,
            disabled,
        }
    }

    pub fn bubble_label(index: usize, question: &str) -> String {
        format!(" F{} {} ", index + 1, question)
    }

    /// Bubble rectangles relative to the component's top-left corner.
    pub fn layout(questions: &[String], width: u16) -> Vec<Rect> {
        let mut rects = Vec::with_capacity(questions.len());
        let (mut x, mut y) = (0u16, 1u16);
        for (i, q) in questions.iter().enumerate() {
            let w = (Self::bubble_label(i, q).width() as u16).min(width);
            if x > 0 && x + w > width {
                x = 0;
                y += 1;
            }
            rects.push(Rect::new(x, y, w, 1));
            x = x.saturating_add(w + BUBBLE_GAP);
        }
        rects
    }

    /// Title row plus bubble rows; zero when there is nothing to show.
    pub fn calculate_height(questions: &[String], width: u16) -> u16 {
        Self::layout(questions, width)
            .last()
            .map(|r| r.y + 1)
            .unwrap_or(0)
    }

    /// Index of the bubble under screen position (`col`, `row`).
    pub fn hit_test(questions: &[String], area: Rect, col: u16, row: u16) -> Option<usize> {
        if col < area.x || row < area.y {
            return None;
        }
        let (x, y) = (col - area.x, row - area.y);
        Self::layout(questions, area.width)
            .iter()
            .position(|r| y == r.y && x >= r.x && x < r.x + r.width)
    }
}

impl<'a> Component for QuickQuestions<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.questions.is_empty() || area.height == 0 {
            return;
        }

        let title_style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        frame.render_widget(
            Span::styled(self.title, title_style),
            Rect::new(area.x, area.y, area.width, 1),
        );

        let bubble_style = if self.disabled {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::REVERSED)
        };

        for (i, rect) in Self::layout(self.questions, area.width).into_iter().enumerate() {
            if rect.y >= area.height {
                break;
            }
            let screen = Rect::new(area.x + rect.x, area.y + rect.y, rect.width, 1);
            let label = Self::bubble_label(i, &self.questions[i]);
            frame.render_widget(Paragraph::new(label).style(bubble_style), screen);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn questions() -> Vec<String> {
        vec!["Q one".into(), "Q two".into(), "綠牆".into()]
    }

    #[test]
    fn test_layout_single_row_when_wide() {
        let rects = QuickQuestions::layout(&questions(), 80);
        // " F1 Q one " is 10 columns
        assert_eq!(rects[0], Rect::new(0, 1, 10, 1));
        assert_eq!(rects[1], Rect::new(11, 1, 10, 1));
        // CJK characters are two columns each
        assert_eq!(rects[2], Rect::new(22, 1, 9, 1));
        assert_eq!(QuickQuestions::calculate_height(&questions(), 80), 2);
    }

    #[test]
    fn test_layout_wraps_when_narrow() {
        let rects = QuickQuestions::layout(&questions(), 20);
        assert_eq!(rects[0].y, 1);
        assert_eq!(rects[1].y, 2);
        assert_eq!(rects[2].y, 2);
        assert_eq!(QuickQuestions::calculate_height(&questions(), 20), 3);
    }

    #[test]
    fn test_no_questions_no_height() {
        assert_eq!(QuickQuestions::calculate_height(&[], 80), 0);
    }

    #[test]
    fn test_hit_test() {
        let area = Rect::new(2, 10, 80, 2);
        let qs = questions();
        assert_eq!(QuickQuestions::hit_test(&qs, area, 2, 11), Some(0));
        assert_eq!(QuickQuestions::hit_test(&qs, area, 13, 11), Some(1));
        // gap between bubbles
        assert_eq!(QuickQuestions::hit_test(&qs, area, 12, 11), None);
        // title row
        assert_eq!(QuickQuestions::hit_test(&qs, area, 3, 10), None);
        // left of area
        assert_eq!(QuickQuestions::hit_test(&qs, area, 0, 11), None);
    }

    #[test]
    fn test_render_shows_title_and_keys() {
        let backend = TestBackend::new(60, 2);
        let mut terminal = Terminal::new(backend).unwrap();
        let qs = questions();
        terminal
            .draw(|f| QuickQuestions::new("快速提問：", &qs, false).render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("F1"));
        assert!(text.contains("Q two"));
        assert!(text.contains("F3"));
    }
}
