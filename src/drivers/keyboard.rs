use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// Smooths over terminal differences before key events reach the bindings:
/// Shift+Tab becomes BackTab and release/repeat events are dropped.
#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        match evt {
            Event::Key(mut key) => {
                if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
                    key.code = KeyCode::BackTab;
                    key.modifiers.remove(KeyModifiers::SHIFT);
                }
                match key.kind {
                    KeyEventKind::Release => {
                        if key.code == KeyCode::Esc {
                            self.esc_down = false;
                        }
                        return None;
                    }
                    KeyEventKind::Repeat if cfg!(windows) => return None,
                    _ => {}
                }
                // Windows reports a held Esc as a stream of presses.
                if cfg!(windows) && key.code == KeyCode::Esc {
                    if self.esc_down {
                        return None;
                    }
                    self.esc_down = true;
                } else {
                    self.esc_down = false;
                }
                Some(Event::Key(key))
            }
            other => Some(other),
        }
    }
}
