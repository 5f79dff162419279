use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keys `1`-`9` then `a`-`c` open directory entries by position.
pub const DIRECTORY_KEYS: [char; 12] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    OpenList,
    CloseList,
    /// Open the n-th conversation of the directory.
    OpenConversation(usize),
    MinimizeFocused,
    RestoreFirstMinimized,
    CloseFocused,
    CloseAll,
    FocusNext,
    FocusPrev,
    // List window navigation
    ListUp,
    ListDown,
    ListOpen,
    DismissNotice,
    ToggleHelp,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::OpenList => write!(f, "Open chat list"),
            Action::CloseList => write!(f, "Close chat list"),
            Action::OpenConversation(idx) => write!(f, "Open conversation #{}", idx + 1),
            Action::MinimizeFocused => write!(f, "Minimize focused window"),
            Action::RestoreFirstMinimized => write!(f, "Restore first minimized"),
            Action::CloseFocused => write!(f, "Close focused window"),
            Action::CloseAll => write!(f, "Close all windows"),
            Action::FocusNext => write!(f, "Focus next window"),
            Action::FocusPrev => write!(f, "Focus previous window"),
            Action::ListUp => write!(f, "Chat list up"),
            Action::ListDown => write!(f, "Chat list down"),
            Action::ListOpen => write!(f, "Open selected chat"),
            Action::DismissNotice => write!(f, "Dismiss notice"),
            Action::ToggleHelp => write!(f, "Toggle help"),
            Action::Quit => write!(f, "Quit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Character keys ignore SHIFT; terminals disagree on whether they report
    /// it alongside an uppercase letter.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.code != self.code {
            return false;
        }
        match key.code {
            KeyCode::Char(_) => {
                key.modifiers.difference(KeyModifiers::SHIFT)
                    == self.mods.difference(KeyModifiers::SHIFT)
            }
            _ => key.modifiers == self.mods,
        }
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(OpenList, KeyCombo::plain(KeyCode::Char('l')));
        kb.add(CloseList, KeyCombo::plain(KeyCode::Char('L')));
        for (idx, ch) in DIRECTORY_KEYS.iter().enumerate() {
            kb.add(OpenConversation(idx), KeyCombo::plain(KeyCode::Char(*ch)));
        }
        kb.add(MinimizeFocused, KeyCombo::plain(KeyCode::Char('m')));
        kb.add(RestoreFirstMinimized, KeyCombo::plain(KeyCode::Char('r')));
        kb.add(CloseFocused, KeyCombo::plain(KeyCode::Char('x')));
        kb.add(CloseAll, KeyCombo::plain(KeyCode::Char('X')));
        kb.add(FocusNext, KeyCombo::plain(KeyCode::Tab));
        kb.add(FocusPrev, KeyCombo::plain(KeyCode::BackTab));
        kb.add(ListUp, KeyCombo::plain(KeyCode::Up));
        kb.add(ListDown, KeyCombo::plain(KeyCode::Down));
        kb.add(ListOpen, KeyCombo::plain(KeyCode::Enter));
        kb.add(DismissNotice, KeyCombo::plain(KeyCode::Esc));
        kb.add(ToggleHelp, KeyCombo::plain(KeyCode::Char('?')));
        kb.add(Quit, KeyCombo::plain(KeyCode::Char('q')));
        kb.add(
            Quit,
            KeyCombo::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        self.map
            .iter()
            .find(|(_, list)| list.iter().any(|c| c.matches(key)))
            .map(|(action, _)| *action)
    }

    /// Bindings in a stable order for the help overlay.
    pub fn help_entries(&self) -> Vec<(Action, Vec<String>)> {
        let mut entries: Vec<(Action, Vec<String>)> = self
            .map
            .iter()
            .map(|(act, list)| (*act, list.iter().map(|c| c.display()).collect()))
            .collect();
        entries.sort_by_key(|(act, _)| *act);
        entries
    }

    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn defaults_match_quit() {
        let kb = KeyBindings::default();
        assert!(kb.matches(Action::Quit, &key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(kb.matches(
            Action::Quit,
            &key(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
        assert!(!kb.matches(Action::Quit, &key(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn uppercase_matches_with_or_without_shift() {
        let kb = KeyBindings::default();
        assert_eq!(
            kb.action_for_key(&key(KeyCode::Char('X'), KeyModifiers::SHIFT)),
            Some(Action::CloseAll)
        );
        assert_eq!(
            kb.action_for_key(&key(KeyCode::Char('L'), KeyModifiers::NONE)),
            Some(Action::CloseList)
        );
        assert_eq!(
            kb.action_for_key(&key(KeyCode::Char('x'), KeyModifiers::NONE)),
            Some(Action::CloseFocused)
        );
    }

    #[test]
    fn directory_keys_map_to_positions() {
        let kb = KeyBindings::default();
        assert_eq!(
            kb.action_for_key(&key(KeyCode::Char('1'), KeyModifiers::NONE)),
            Some(Action::OpenConversation(0))
        );
        assert_eq!(
            kb.action_for_key(&key(KeyCode::Char('c'), KeyModifiers::NONE)),
            Some(Action::OpenConversation(11))
        );
    }

    #[test]
    fn every_key_has_one_action() {
        let kb = KeyBindings::default();
        let mut seen = Vec::new();
        for (_, combos) in kb.help_entries() {
            for combo in combos {
                assert!(!seen.contains(&combo), "{combo} bound twice");
                seen.push(combo);
            }
        }
    }

    #[test]
    fn help_entries_are_sorted() {
        let entries = KeyBindings::default().help_entries();
        assert_eq!(entries.first().map(|(a, _)| *a), Some(Action::OpenList));
        assert_eq!(entries.last().map(|(a, _)| *a), Some(Action::Quit));
        assert_eq!(
            KeyBindings::default().combos_for(Action::FocusPrev),
            vec!["Shift+Tab"]
        );
    }
}
