//! Free-form dragging of dock windows.
//!
//! A drag only moves the window on screen. The slot held in the store is left
//! alone, so once the window is minimized or reopened it snaps back to its
//! slot position.

use ratatui::prelude::Rect;

use crate::window::FloatRect;

/// Clamp `rect` so at least `margin` cells of it stay inside `viewport` on
/// every side. The header row is never pushed above the top edge.
pub fn clamp_to_viewport(rect: FloatRect, viewport: Rect, margin: u16) -> FloatRect {
    if viewport.width == 0 || viewport.height == 0 {
        return rect;
    }
    let keep_w = margin.min(rect.width.max(1)) as i32;
    let keep_h = margin.min(rect.height.max(1)) as i32;
    let left = viewport.x as i32;
    let top = viewport.y as i32;
    let right = left + viewport.width as i32;
    let bottom = top + viewport.height as i32;

    let min_x = left - (rect.width as i32 - keep_w);
    let max_x = (right - keep_w).max(min_x);
    let min_y = top;
    let max_y = (bottom - keep_h).max(min_y);

    FloatRect {
        x: rect.x.clamp(min_x, max_x),
        y: rect.y.clamp(min_y, max_y),
        ..rect
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragGesture {
    origin: FloatRect,
    start_col: u16,
    start_row: u16,
}

/// Per-window drag state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragController {
    margin: u16,
    position: Option<FloatRect>,
    gesture: Option<DragGesture>,
}

impl DragController {
    pub fn new(margin: u16) -> Self {
        Self {
            margin,
            position: None,
            gesture: None,
        }
    }

    /// Dragged position, if the window has been moved off its slot.
    pub fn position(&self) -> Option<FloatRect> {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Where the window should be drawn given its slot placement.
    pub fn resolve(&self, slot_rect: FloatRect) -> FloatRect {
        self.position.unwrap_or(slot_rect)
    }

    /// Start a gesture at the pointer position. `origin` is where the window
    /// currently sits on screen.
    pub fn begin(&mut self, column: u16, row: u16, origin: FloatRect) {
        self.gesture = Some(DragGesture {
            origin,
            start_col: column,
            start_row: row,
        });
    }

    /// Move with the pointer, clamped to `viewport`.
    pub fn drag_to(&mut self, column: u16, row: u16, viewport: Rect) -> Option<FloatRect> {
        let gesture = self.gesture?;
        let dx = column as i32 - gesture.start_col as i32;
        let dy = row as i32 - gesture.start_row as i32;
        let moved = FloatRect {
            x: gesture.origin.x.saturating_add(dx),
            y: gesture.origin.y.saturating_add(dy),
            ..gesture.origin
        };
        let clamped = clamp_to_viewport(moved, viewport, self.margin);
        self.position = Some(clamped);
        Some(clamped)
    }

    /// Pointer released. Returns whether a gesture was active.
    pub fn end(&mut self) -> bool {
        self.gesture.take().is_some()
    }

    /// Re-apply clamping after the viewport changed size.
    pub fn reclamp(&mut self, viewport: Rect) {
        if let Some(position) = self.position {
            self.position = Some(clamp_to_viewport(position, viewport, self.margin));
        }
    }

    /// Forget the dragged position and any active gesture.
    pub fn reset(&mut self) {
        self.position = None;
        self.gesture = None;
    }
}
