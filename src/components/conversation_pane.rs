use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

use crate::conversation::ConversationId;
use crate::ui::UiFrame;

/// Body of a conversation window.
///
/// Messages live in the host's chat store; the dock only knows which thread
/// a window belongs to, so the body shows the thread identity and where the
/// host would mount its message view.
#[derive(Debug, Clone)]
pub struct ConversationPaneComponent {
    id: ConversationId,
    title: String,
}

impl ConversationPaneComponent {
    pub fn new(id: ConversationId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

impl super::Component for ConversationPaneComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool) {
        let mut heading = Style::default().add_modifier(Modifier::BOLD);
        if focused {
            heading = heading.fg(crate::theme::accent());
        }
        let lines = vec![
            Line::styled(self.title.clone(), heading),
            Line::styled(
                format!("#{}", self.id),
                Style::default().fg(crate::theme::list_group_fg()),
            ),
            Line::default(),
            Line::from("No messages loaded."),
        ];
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}
