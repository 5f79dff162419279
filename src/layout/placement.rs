//! Slot based placement of dock windows.
//!
//! Windows stack leftwards from the right viewport edge and sit on the
//! bottom edge, leaving `bottom_offset` rows for the tray. Everything here is
//! pure so it can be tested without a terminal.

use ratatui::prelude::Rect;

use crate::constants::{
    DEFAULT_BASE_OFFSET, DEFAULT_BOTTOM_OFFSET, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_SPACING,
    DEFAULT_WINDOW_WIDTH,
};
use crate::window::FloatRect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementConfig {
    /// Columns between the right viewport edge and the slot 0 window.
    pub base_offset: u16,
    pub window_width: u16,
    pub window_height: u16,
    /// Columns between neighbouring windows.
    pub spacing: u16,
    /// Rows kept free under the windows.
    pub bottom_offset: u16,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            base_offset: DEFAULT_BASE_OFFSET,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            spacing: DEFAULT_WINDOW_SPACING,
            bottom_offset: DEFAULT_BOTTOM_OFFSET,
        }
    }
}

impl PlacementConfig {
    /// `base_offset + slot * (window_width + spacing)`.
    pub fn offset_from_anchor_edge(&self, slot: usize) -> u32 {
        let stride = self.window_width as u32 + self.spacing as u32;
        let slot = u32::try_from(slot).unwrap_or(u32::MAX);
        (self.base_offset as u32).saturating_add(slot.saturating_mul(stride))
    }

    /// Rect of the window in `slot`, anchored to the right and bottom edges of
    /// `viewport`. Slots that do not fit end up with a negative origin; the
    /// renderer clips them.
    pub fn slot_rect(&self, slot: usize, viewport: Rect) -> FloatRect {
        let offset = i64::from(self.offset_from_anchor_edge(slot));
        let right = viewport.x as i64 + viewport.width as i64 - offset;
        let x = right - self.window_width as i64;
        let height = self.window_height.min(
            viewport
                .height
                .saturating_sub(self.bottom_offset)
                .max(1),
        );
        let bottom = viewport.y as i64 + viewport.height as i64 - self.bottom_offset as i64;
        let y = (bottom - height as i64).max(viewport.y as i64);
        FloatRect {
            x: x.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            y: y.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            width: self.window_width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: 120,
            height: 40,
        }
    }

    #[test]
    fn offset_grows_by_width_plus_spacing() {
        let cfg = PlacementConfig {
            base_offset: 2,
            window_width: 30,
            window_height: 10,
            spacing: 1,
            bottom_offset: 1,
        };
        assert_eq!(cfg.offset_from_anchor_edge(0), 2);
        assert_eq!(cfg.offset_from_anchor_edge(1), 33);
        assert_eq!(cfg.offset_from_anchor_edge(3), 95);
    }

    #[test]
    fn slot_zero_hugs_right_and_bottom_edges() {
        let cfg = PlacementConfig {
            base_offset: 2,
            window_width: 30,
            window_height: 10,
            spacing: 1,
            bottom_offset: 1,
        };
        let rect = cfg.slot_rect(0, viewport());
        assert_eq!(rect.right(), 118);
        assert_eq!(rect.x, 88);
        assert_eq!(rect.bottom(), 39);
        assert_eq!(rect.y, 29);
    }

    #[test]
    fn slots_never_overlap() {
        let cfg = PlacementConfig::default();
        let rects: Vec<FloatRect> = (0..4).map(|slot| cfg.slot_rect(slot, viewport())).collect();
        for pair in rects.windows(2) {
            assert!(pair[1].right() <= pair[0].x);
            assert_eq!(pair[0].x - pair[1].right(), cfg.spacing as i32);
        }
    }

    #[test]
    fn slot_rect_is_deterministic() {
        let cfg = PlacementConfig::default();
        assert_eq!(cfg.slot_rect(2, viewport()), cfg.slot_rect(2, viewport()));
    }

    #[test]
    fn short_viewport_shrinks_height() {
        let cfg = PlacementConfig::default();
        let tiny = Rect {
            x: 0,
            y: 0,
            width: 40,
            height: 5,
        };
        let rect = cfg.slot_rect(0, tiny);
        assert_eq!(rect.height, 4);
        assert_eq!(rect.y, 0);
    }

    #[test]
    fn huge_slot_saturates() {
        let cfg = PlacementConfig::default();
        assert_eq!(cfg.offset_from_anchor_edge(usize::MAX), u32::MAX);
    }
}
