use crossterm::event::{Event, KeyCode};
use indoc::indoc;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::keybindings::KeyBindings;
use crate::ui::UiFrame;

const HELP_INTRO: &str = indoc! {"
    Chat windows stack from the right edge of the screen.
    Drag a window by its header; `_` parks it in the tray,
    `x` closes it. Click a tray chip to bring it back.
"};

const HELP_WIDTH: u16 = 60;

#[derive(Debug)]
pub struct HelpOverlayComponent {
    visible: bool,
    lines: Vec<String>,
}

impl HelpOverlayComponent {
    pub fn new(bindings: &KeyBindings) -> Self {
        let mut lines: Vec<String> = HELP_INTRO.lines().map(str::to_string).collect();
        lines.push(String::new());
        for (action, combos) in bindings.help_entries() {
            lines.push(format!("{:<12} {action}", combos.join(", ")));
        }
        Self {
            visible: false,
            lines,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Centered dialog rect, shrunk to fit small terminals.
    pub fn rect_for(&self, area: Rect) -> Rect {
        let width = area.width.min(HELP_WIDTH).max(1);
        let height = area
            .height
            .min(self.lines.len() as u16 + 2)
            .max(1);
        Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        }
    }
}

impl super::Component for HelpOverlayComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _focused: bool) {
        if !self.visible || area.width == 0 || area.height == 0 {
            return;
        }
        let rect = self.rect_for(area);
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .title(format!(" {} {} ", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")))
            .borders(Borders::ALL)
            .style(
                Style::default()
                    .bg(crate::theme::dialog_bg())
                    .fg(crate::theme::dialog_fg()),
            );
        let lines: Vec<Line> = self.lines.iter().map(|l| Line::from(l.as_str())).collect();
        frame.render_widget(Paragraph::new(lines).block(block), rect);
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        if !self.visible {
            return false;
        }
        match event {
            Event::Key(key) => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?')
                ) {
                    self.visible = false;
                }
                // Swallow everything else while open.
                true
            }
            Event::Mouse(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn lists_every_binding() {
        let bindings = KeyBindings::default();
        let help = HelpOverlayComponent::new(&bindings);
        assert!(help.lines().iter().any(|l| l.contains("Close all windows")));
        assert!(help.lines()[0].starts_with("Chat windows"));
    }

    #[test]
    fn hidden_overlay_ignores_input() {
        let mut help = HelpOverlayComponent::new(&KeyBindings::default());
        assert!(!help.handle_event(&key(KeyCode::Char('x'))));
    }

    #[test]
    fn open_overlay_swallows_keys_and_closes_on_esc() {
        let mut help = HelpOverlayComponent::new(&KeyBindings::default());
        help.toggle();
        assert!(help.handle_event(&key(KeyCode::Char('x'))));
        assert!(help.visible());
        assert!(help.handle_event(&key(KeyCode::Esc)));
        assert!(!help.visible());
    }

    #[test]
    fn rect_fits_small_area() {
        let help = HelpOverlayComponent::new(&KeyBindings::default());
        let rect = help.rect_for(Rect::new(0, 0, 30, 8));
        assert_eq!((rect.width, rect.height), (30, 8));
    }
}
