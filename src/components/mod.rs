use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod conversation_list;
pub mod conversation_pane;
pub mod help_overlay;

pub use conversation_list::ConversationListComponent;
pub use conversation_pane::ConversationPaneComponent;
pub use help_overlay::HelpOverlayComponent;

/// A body drawn inside a dock window, or an overlay drawn above the dock.
pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool);

    fn handle_event(&mut self, _event: &Event) -> bool {
        false
    }
}
