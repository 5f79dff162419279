use crossterm::event::{Event, KeyCode, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::conversation::{ConversationId, ConversationSummary};
use crate::layout::rect_contains;
use crate::ui::{UiFrame, display_width, safe_set_string};

#[derive(Debug, Clone, Copy)]
struct RowHit {
    index: usize,
    rect: Rect,
}

/// Body of the chat list window: one row per conversation.
///
/// Activating a row (Enter or a click) queues the conversation id; the owner
/// drains it with [`take_activated`](Self::take_activated) and dispatches.
#[derive(Debug, Default)]
pub struct ConversationListComponent {
    items: Vec<ConversationSummary>,
    selected: usize,
    offset: usize,
    rows: Vec<RowHit>,
    activated: Option<ConversationId>,
}

impl ConversationListComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_items(&mut self, items: Vec<ConversationSummary>) {
        self.items = items;
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
    }

    pub fn items(&self) -> &[ConversationSummary] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.items.is_empty() {
            self.selected = 0;
            return;
        }
        if delta.is_negative() {
            self.selected = self.selected.saturating_sub(delta.unsigned_abs());
        } else {
            self.selected = (self.selected + delta as usize).min(self.items.len() - 1);
        }
    }

    /// Queue the selected conversation for opening.
    pub fn activate_selected(&mut self) {
        if let Some(item) = self.items.get(self.selected) {
            self.activated = Some(item.id.clone());
        }
    }

    pub fn take_activated(&mut self) -> Option<ConversationId> {
        self.activated.take()
    }

    fn keep_selected_in_view(&mut self, view: usize) {
        if view == 0 || self.items.is_empty() {
            self.offset = 0;
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + view {
            self.offset = self.selected + 1 - view;
        }
    }
}

impl super::Component for ConversationListComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool) {
        self.rows.clear();
        let area = area.intersection(frame.area());
        if area.width == 0 || area.height == 0 {
            return;
        }
        if self.items.is_empty() {
            let style = Style::default().fg(crate::theme::list_group_fg());
            safe_set_string(
                frame.buffer_mut(),
                area,
                area.x,
                area.y,
                "No conversations",
                style,
            );
            return;
        }
        let view = area.height as usize;
        self.keep_selected_in_view(view);

        let selected_style = Style::default()
            .bg(crate::theme::list_selected_bg())
            .fg(crate::theme::list_selected_fg())
            .add_modifier(Modifier::BOLD);
        let group_style = Style::default().fg(crate::theme::list_group_fg());
        for (row, (index, item)) in self
            .items
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(view)
            .enumerate()
        {
            let y = area.y + row as u16;
            let rect = Rect {
                x: area.x,
                y,
                width: area.width,
                height: 1,
            };
            let highlighted = focused && index == self.selected;
            if highlighted {
                frame.fill(rect, selected_style);
            }
            let title_style = if highlighted {
                selected_style
            } else {
                Style::default()
            };
            let buffer = frame.buffer_mut();
            safe_set_string(buffer, area, area.x, y, &item.title, title_style);
            if item.group {
                let title_len = display_width(&item.title);
                let label = " · group";
                let x = area.x.saturating_add(title_len);
                let style = if highlighted {
                    selected_style
                } else {
                    group_style
                };
                safe_set_string(buffer, area, x, y, label, style);
            }
            self.rows.push(RowHit { index, rect });
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => match key.code {
                KeyCode::Up => {
                    self.move_selection(-1);
                    true
                }
                KeyCode::Down => {
                    self.move_selection(1);
                    true
                }
                KeyCode::Enter => {
                    self.activate_selected();
                    self.activated.is_some()
                }
                _ => false,
            },
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let Some(hit) = self
                    .rows
                    .iter()
                    .find(|hit| rect_contains(hit.rect, mouse.column, mouse.row))
                    .copied()
                else {
                    return false;
                };
                self.selected = hit.index;
                self.activate_selected();
                true
            }
            _ => false,
        }
    }
}
