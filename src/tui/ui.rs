use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::message::MessageId;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    LandingPage, Message, MessageList, QuickQuestions, TitleBar,
};

/// Screen regions of the open chat panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatAreas {
    pub title: Rect,
    pub messages: Rect,
    pub quick_questions: Rect,
    pub input: Rect,
}

/// Splits the frame into title, messages, quick questions and composer.
///
/// Shared by drawing and hit testing so both agree on where things are.
pub fn chat_layout(frame_area: Rect, questions: &[String], input_height: u16) -> ChatAreas {
    use Constraint::{Length, Min};
    let qq_height = QuickQuestions::calculate_height(questions, frame_area.width);
    let [title, messages, quick_questions, input] =
        Layout::vertical([Length(1), Min(0), Length(qq_height), Length(input_height)])
            .areas(frame_area);
    ChatAreas {
        title,
        messages,
        quick_questions,
        input,
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    if !app.is_open {
        LandingPage::new(&app.strings.assistant_name, tui.pulse_value).render(frame, frame.area());
        return;
    }

    let input_height = tui.input_box.calculate_height(frame.area().width);
    let areas = chat_layout(frame.area(), &app.strings.quick_questions, input_height);

    MessageList::new(
        &mut tui.message_list,
        &app.messages,
        &app.strings.assistant_name,
        app.thinking,
        tui.thinking_frame,
    )
    .render(frame, areas.messages);

    TitleBar::new(
        app.strings.assistant_name.clone(),
        app.phase,
        app.status_message.clone(),
        tui.message_list.has_unseen_content(),
    )
    .render(frame, areas.title);

    QuickQuestions::new(
        &app.strings.quick_questions_title,
        &app.strings.quick_questions,
        app.composer.disabled,
    )
    .render(frame, areas.quick_questions);

    tui.input_box.render(frame, areas.input);
}

/// What a left click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    CopyLabel(MessageId),
    QuickQuestion(usize),
    Nothing,
}

/// Maps a screen position to a clickable element of the open panel.
///
/// Message positions come from the layout cache filled by the last draw.
pub fn hit_test(
    col: u16,
    row: u16,
    frame_area: Rect,
    app: &App,
    tui: &TuiState,
) -> ClickTarget {
    if !app.is_open {
        return ClickTarget::Nothing;
    }
    let input_height = tui.input_box.calculate_height(frame_area.width);
    let areas = chat_layout(frame_area, &app.strings.quick_questions, input_height);
    let message_list = &tui.message_list;

    if contains(areas.quick_questions, col, row) {
        return QuickQuestions::hit_test(&app.strings.quick_questions, areas.quick_questions, col, row)
            .map(ClickTarget::QuickQuestion)
            .unwrap_or(ClickTarget::Nothing);
    }

    if contains(areas.messages, col, row) {
        let content_y = (row - areas.messages.y) + message_list.scroll_state.offset().y;
        let content_width = areas.messages.width.saturating_sub(1);
        if let Some((index, 0)) = message_list.layout.message_at(content_y)
            && let Some(message) = app.messages.get(index)
            && Message::copy_label_hit(message, content_width, col - areas.messages.x)
        {
            return ClickTarget::CopyLabel(message.id);
        }
    }

    ClickTarget::Nothing
}

fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x && col < area.x + area.width && row >= area.y && row < area.y + area.height
}
