use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// A piece of the chat panel that draws itself into a `Rect`.
///
/// Data comes in as struct fields (props). `render` takes `&mut self` so a
/// component can refresh caches it keeps between frames, such as message
/// heights or the composer's horizontal scroll.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that consumes terminal events and may emit a higher-level one.
pub trait EventHandler {
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
