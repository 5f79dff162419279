//! Window chrome: header bar with title and buttons, plus the border.
//!
//! Geometry is in signed coordinates because dragged windows can hang off
//! the viewport; every cell write is clipped against the frame.

use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use super::FloatRect;
use crate::ui::{UiFrame, truncate_to_width};
use unicode_width::UnicodeWidthChar;

const CLOSE_GLYPH: &str = "x";
const MINIMIZE_GLYPH: &str = "_";

/// What a pointer press on the window chrome means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Minimize,
    Close,
    Drag,
    None,
}

pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(
        &self,
        frame: &mut UiFrame<'_>,
        rect: FloatRect,
        title: &str,
        focused: bool,
        minimizable: bool,
    );

    fn hit_test(&self, rect: FloatRect, minimizable: bool, column: u16, row: u16) -> HeaderAction;

    /// Area left for the window body once the chrome is drawn.
    fn content_rect(&self, rect: FloatRect) -> FloatRect;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDecorator;

impl DefaultDecorator {
    fn close_x(rect: FloatRect) -> i32 {
        rect.right() - 2
    }

    fn minimize_x(rect: FloatRect) -> i32 {
        rect.right() - 4
    }
}

fn put(buffer: &mut Buffer, bounds: Rect, x: i32, y: i32, symbol: &str, style: Style) {
    let inside_x = x >= bounds.x as i32 && x < bounds.x as i32 + bounds.width as i32;
    let inside_y = y >= bounds.y as i32 && y < bounds.y as i32 + bounds.height as i32;
    if !(inside_x && inside_y) {
        return;
    }
    if let Some(cell) = buffer.cell_mut((x as u16, y as u16)) {
        cell.set_symbol(symbol);
        cell.set_style(style);
    }
}

impl WindowDecorator for DefaultDecorator {
    fn render_window(
        &self,
        frame: &mut UiFrame<'_>,
        rect: FloatRect,
        title: &str,
        focused: bool,
        minimizable: bool,
    ) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let bounds = frame.area();
        let buffer = frame.buffer_mut();

        let header_style = if focused {
            Style::default()
                .bg(crate::theme::decorator_header_bg())
                .fg(crate::theme::decorator_header_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(crate::theme::decorator_inactive_header_bg())
                .fg(crate::theme::decorator_header_fg())
        };
        let border_style = Style::default().fg(crate::theme::decorator_border());

        let left = rect.x;
        let right = rect.right() - 1;
        let top = rect.y;
        let bottom = rect.bottom() - 1;

        // Header
        for x in left..=right {
            put(buffer, bounds, x, top, " ", header_style);
        }
        let reserved = if minimizable { 5 } else { 3 };
        let title_room = (rect.width as usize).saturating_sub(reserved + 1);
        let title = truncate_to_width(title, title_room);
        let mut x = left + 1;
        for ch in title.chars() {
            let width = ch.width().unwrap_or(0) as i32;
            if width == 0 {
                continue;
            }
            put(buffer, bounds, x, top, &ch.to_string(), header_style);
            x += width;
        }
        if minimizable && rect.width >= 6 {
            put(
                buffer,
                bounds,
                Self::minimize_x(rect),
                top,
                MINIMIZE_GLYPH,
                header_style,
            );
        }
        if rect.width >= 4 {
            put(
                buffer,
                bounds,
                Self::close_x(rect),
                top,
                CLOSE_GLYPH,
                header_style,
            );
        }

        // Borders
        for y in top + 1..bottom {
            put(buffer, bounds, left, y, "│", border_style);
            put(buffer, bounds, right, y, "│", border_style);
        }
        if bottom > top {
            for x in left..=right {
                let symbol = if x == left {
                    "└"
                } else if x == right {
                    "┘"
                } else {
                    "─"
                };
                put(buffer, bounds, x, bottom, symbol, border_style);
            }
        }
    }

    fn hit_test(&self, rect: FloatRect, minimizable: bool, column: u16, row: u16) -> HeaderAction {
        let column = column as i32;
        if row as i32 != rect.y || column < rect.x || column >= rect.right() {
            return HeaderAction::None;
        }
        if rect.width >= 4 && column == Self::close_x(rect) {
            return HeaderAction::Close;
        }
        if minimizable && rect.width >= 6 && column == Self::minimize_x(rect) {
            return HeaderAction::Minimize;
        }
        HeaderAction::Drag
    }

    fn content_rect(&self, rect: FloatRect) -> FloatRect {
        FloatRect {
            x: rect.x + 1,
            y: rect.y + 1,
            width: rect.width.saturating_sub(2),
            height: rect.height.saturating_sub(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> FloatRect {
        FloatRect {
            x: 10,
            y: 2,
            width: 20,
            height: 6,
        }
    }

    #[test]
    fn hit_test_buttons_and_header() {
        let d = DefaultDecorator;
        let rect = window();
        assert_eq!(d.hit_test(rect, true, 28, 2), HeaderAction::Close);
        assert_eq!(d.hit_test(rect, true, 26, 2), HeaderAction::Minimize);
        assert_eq!(d.hit_test(rect, true, 12, 2), HeaderAction::Drag);
        assert_eq!(d.hit_test(rect, true, 12, 3), HeaderAction::None);
        assert_eq!(d.hit_test(rect, true, 30, 2), HeaderAction::None);
    }

    #[test]
    fn list_window_has_no_minimize_button() {
        let d = DefaultDecorator;
        assert_eq!(d.hit_test(window(), false, 26, 2), HeaderAction::Drag);
    }

    #[test]
    fn render_draws_title_and_buttons() {
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        DefaultDecorator.render_window(&mut frame, window(), "Alice", true, true);
        assert_eq!(buf.cell((11, 2)).unwrap().symbol(), "A");
        assert_eq!(buf.cell((26, 2)).unwrap().symbol(), MINIMIZE_GLYPH);
        assert_eq!(buf.cell((28, 2)).unwrap().symbol(), CLOSE_GLYPH);
        assert_eq!(buf.cell((10, 7)).unwrap().symbol(), "└");
        assert_eq!(buf.cell((29, 4)).unwrap().symbol(), "│");
    }

    #[test]
    fn render_clips_offscreen_windows() {
        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        let rect = FloatRect {
            x: -15,
            y: 0,
            width: 20,
            height: 6,
        };
        DefaultDecorator.render_window(&mut frame, rect, "Offscreen", false, true);
        // right border sits at column 4
        assert_eq!(buf.cell((4, 1)).unwrap().symbol(), "│");
        assert_eq!(buf.cell((3, 0)).unwrap().symbol(), CLOSE_GLYPH);
    }

    #[test]
    fn content_rect_is_inside_chrome() {
        let inner = DefaultDecorator.content_rect(window());
        assert_eq!((inner.x, inner.y, inner.width, inner.height), (11, 3, 18, 4));
    }
}
