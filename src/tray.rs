//! One-row strip along the bottom edge listing minimized conversations.
//!
//! Hit rects are rebuilt every frame during `render`, so `hit_test` always
//! matches what is on screen.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::conversation::{ConversationDirectory, ConversationId};
use crate::layout::rect_contains;
use crate::notice::LimitNotice;
use crate::ui::{UiFrame, display_width, safe_set_string, truncate_to_width};
use crate::window::ChatWindow;

const MAX_CHIP_TITLE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayAction {
    Restore(ConversationId),
    Close(ConversationId),
    DismissNotice,
}

#[derive(Debug, Clone)]
struct ChipHit {
    id: ConversationId,
    body: Rect,
    close: Rect,
}

#[derive(Debug, Default)]
pub struct Tray {
    area: Rect,
    chips: Vec<ChipHit>,
    notice_rect: Option<Rect>,
}

impl Tray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bottom row of `area`, where the tray lives.
    pub fn area_for(area: Rect) -> Rect {
        let height = 1u16.min(area.height);
        Rect {
            x: area.x,
            y: area.y.saturating_add(area.height).saturating_sub(height),
            width: area.width,
            height,
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        area: Rect,
        minimized: &[&ChatWindow],
        directory: &dyn ConversationDirectory,
        notice: Option<LimitNotice>,
        status_line: Option<&str>,
    ) {
        self.chips.clear();
        self.notice_rect = None;
        self.area = area.intersection(frame.area());
        let bounds = self.area;
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let base = Style::default()
            .bg(crate::theme::tray_bg())
            .fg(crate::theme::tray_fg());
        frame.fill(bounds, base);

        let chip_style = Style::default()
            .bg(crate::theme::tray_chip_bg())
            .fg(crate::theme::tray_chip_fg());
        let close_style = chip_style.add_modifier(Modifier::BOLD);
        let buffer = frame.buffer_mut();
        let y = bounds.y;
        let max_x = bounds.x.saturating_add(bounds.width);
        let mut x = bounds.x;

        for window in minimized {
            let Some(id) = window.conversation_id() else {
                continue;
            };
            let title = truncate_to_width(&directory.title_or_id(id), MAX_CHIP_TITLE);
            let label = format!(" {title} ");
            let label_width = display_width(&label);
            // label, close glyph, trailing pad, gap
            if x.saturating_add(label_width + 3) > max_x {
                break;
            }
            safe_set_string(buffer, bounds, x, y, &label, chip_style);
            let close_x = x + label_width;
            safe_set_string(buffer, bounds, close_x, y, "x ", close_style);
            self.chips.push(ChipHit {
                id: id.clone(),
                body: Rect {
                    x,
                    y,
                    width: label_width,
                    height: 1,
                },
                close: Rect {
                    x: close_x,
                    y,
                    width: 1,
                    height: 1,
                },
            });
            x = close_x + 3;
        }

        let (text, style) = match (notice, status_line) {
            (Some(notice), _) => (
                format!(" {notice} "),
                Style::default()
                    .bg(crate::theme::notice_bg())
                    .fg(crate::theme::notice_fg())
                    .add_modifier(Modifier::BOLD),
            ),
            (None, Some(status)) => (
                status.to_string(),
                base.fg(crate::theme::tray_status_fg()),
            ),
            (None, None) => return,
        };
        let available = max_x.saturating_sub(x) as usize;
        if available == 0 {
            return;
        }
        let text = truncate_to_width(&text, available);
        let width = display_width(&text);
        let start_x = max_x.saturating_sub(width);
        safe_set_string(buffer, bounds, start_x, y, &text, style);
        if notice.is_some() {
            self.notice_rect = Some(Rect {
                x: start_x,
                y,
                width,
                height: 1,
            });
        }
    }

    pub fn hit_test(&self, mouse: &MouseEvent) -> Option<TrayAction> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        if let Some(rect) = self.notice_rect
            && rect_contains(rect, mouse.column, mouse.row)
        {
            return Some(TrayAction::DismissNotice);
        }
        self.chips.iter().find_map(|chip| {
            if rect_contains(chip.close, mouse.column, mouse.row) {
                Some(TrayAction::Close(chip.id.clone()))
            } else if rect_contains(chip.body, mouse.column, mouse.row) {
                Some(TrayAction::Restore(chip.id.clone()))
            } else {
                None
            }
        })
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        rect_contains(self.area, column, row)
    }
}
