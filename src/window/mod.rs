pub mod decorator;
pub mod dispatcher;
pub mod store;

use std::fmt;

use ratatui::prelude::Rect;

use crate::conversation::ConversationId;

pub use dispatcher::{Dispatcher, Intent, SubscriptionId, reduce};
pub use store::{DockSnapshot, InvariantViolation};

/// Signed floating rectangle origin with unsigned size.
///
/// Dragged windows may hang partially off the viewport, so the origin is
/// signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    /// Portion of the rect that lies inside `bounds`.
    pub fn visible_in(&self, bounds: Rect) -> Rect {
        let x0 = self.x.max(bounds.x as i32);
        let y0 = self.y.max(bounds.y as i32);
        let x1 = self.right().min(bounds.x as i32 + bounds.width as i32);
        let y1 = self.bottom().min(bounds.y as i32 + bounds.height as i32);
        if x1 <= x0 || y1 <= y0 {
            return Rect::default();
        }
        Rect {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    List,
    Conversation,
}

/// Identity of a dock window.
///
/// The chat list is a singleton; conversation windows are keyed by their
/// conversation so a thread can never be open twice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WindowId {
    List,
    Conversation(ConversationId),
}

impl WindowId {
    pub fn kind(&self) -> WindowKind {
        match self {
            WindowId::List => WindowKind::List,
            WindowId::Conversation(_) => WindowKind::Conversation,
        }
    }

    pub fn conversation(&self) -> Option<&ConversationId> {
        match self {
            WindowId::List => None,
            WindowId::Conversation(id) => Some(id),
        }
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowId::List => f.write_str("list"),
            WindowId::Conversation(id) => write!(f, "conversation:{id}"),
        }
    }
}

impl From<ConversationId> for WindowId {
    fn from(value: ConversationId) -> Self {
        WindowId::Conversation(value)
    }
}

/// One floating chat panel as tracked by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatWindow {
    id: WindowId,
    slot: usize,
    minimized: bool,
    /// Stamp taken from the snapshot each time the window goes on screen.
    appearance: u64,
}

impl ChatWindow {
    pub(crate) fn list() -> Self {
        Self {
            id: WindowId::List,
            slot: 0,
            minimized: false,
            appearance: 0,
        }
    }

    pub(crate) fn conversation(id: ConversationId, slot: usize) -> Self {
        Self {
            id: WindowId::Conversation(id),
            slot,
            minimized: false,
            appearance: 0,
        }
    }

    pub fn id(&self) -> &WindowId {
        &self.id
    }

    pub fn kind(&self) -> WindowKind {
        self.id.kind()
    }

    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.id.conversation()
    }

    /// Stacking position; only meaningful while the window is visible.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn minimized(&self) -> bool {
        self.minimized
    }

    pub fn visible(&self) -> bool {
        !self.minimized
    }

    /// Changes whenever the window is opened or restored, even if it was
    /// hidden and shown again between two reads of the dock.
    pub fn appearance(&self) -> u64 {
        self.appearance
    }

    pub(crate) fn set_slot(&mut self, slot: usize) {
        self.slot = slot;
    }

    pub(crate) fn set_minimized(&mut self, minimized: bool) {
        self.minimized = minimized;
    }

    pub(crate) fn set_appearance(&mut self, appearance: u64) {
        self.appearance = appearance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_id_kind_and_conversation() {
        let id = WindowId::from(ConversationId::from("c1"));
        assert_eq!(id.kind(), WindowKind::Conversation);
        assert_eq!(id.conversation().map(|c| c.as_str()), Some("c1"));
        assert_eq!(WindowId::List.kind(), WindowKind::List);
        assert!(WindowId::List.conversation().is_none());
        assert_eq!(id.to_string(), "conversation:c1");
    }

    #[test]
    fn float_rect_visible_clips_negative_offsets() {
        let bounds = Rect {
            x: 0,
            y: 0,
            width: 80,
            height: 24,
        };
        let rect = FloatRect {
            x: -5,
            y: 3,
            width: 20,
            height: 6,
        };
        let visible = rect.visible_in(bounds);
        assert_eq!(visible.x, 0);
        assert_eq!(visible.y, 3);
        assert_eq!(visible.width, 15);
        assert_eq!(visible.height, 6);
    }

    #[test]
    fn float_rect_fully_outside_is_empty() {
        let bounds = Rect {
            x: 0,
            y: 0,
            width: 10,
            height: 10,
        };
        let rect = FloatRect {
            x: 20,
            y: 0,
            width: 5,
            height: 5,
        };
        assert_eq!(rect.visible_in(bounds), Rect::default());
    }
}
