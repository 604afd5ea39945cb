//! Key bindings

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub modifiers: KeyModifiers,
    pub code: KeyCode,
}

impl KeyBinding {
    pub const fn new(modifiers: KeyModifiers, code: KeyCode) -> Self {
        Self { modifiers, code }
    }

    pub const fn key(code: KeyCode) -> Self {
        Self::new(KeyModifiers::NONE, code)
    }

    pub const fn ctrl(code: KeyCode) -> Self {
        Self::new(KeyModifiers::CONTROL, code)
    }

    /// Whether `key` is this binding.
    ///
    /// SHIFT is ignored for characters and BackTab: terminals report it
    /// inconsistently, and the character itself already says `A` or `?`.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let modifiers = match key.code {
            KeyCode::Char(_) | KeyCode::BackTab => key.modifiers.difference(KeyModifiers::SHIFT),
            _ => key.modifiers,
        };
        modifiers == self.modifiers && key.code == self.code
    }
}

pub struct DefaultKeymap;

impl DefaultKeymap {
    // Global
    pub const QUIT: KeyBinding = KeyBinding::key(KeyCode::Char('q'));
    pub const FORCE_QUIT: KeyBinding = KeyBinding::ctrl(KeyCode::Char('c'));
    pub const HELP: KeyBinding = KeyBinding::key(KeyCode::Char('?'));
    pub const NEXT_PANEL: KeyBinding = KeyBinding::key(KeyCode::Tab);
    pub const PREV_PANEL: KeyBinding = KeyBinding::key(KeyCode::BackTab);

    // Lists
    pub const UP: KeyBinding = KeyBinding::key(KeyCode::Up);
    pub const UP_VIM: KeyBinding = KeyBinding::key(KeyCode::Char('k'));
    pub const DOWN: KeyBinding = KeyBinding::key(KeyCode::Down);
    pub const DOWN_VIM: KeyBinding = KeyBinding::key(KeyCode::Char('j'));
    pub const CONFIRM: KeyBinding = KeyBinding::key(KeyCode::Enter);
    pub const CANCEL: KeyBinding = KeyBinding::key(KeyCode::Esc);
    pub const FILTER: KeyBinding = KeyBinding::key(KeyCode::Char('/'));
    pub const CREATE: KeyBinding = KeyBinding::key(KeyCode::Char('n'));
    pub const DELETE: KeyBinding = KeyBinding::key(KeyCode::Char('d'));
    pub const REFRESH: KeyBinding = KeyBinding::key(KeyCode::Char('r'));
    pub const CLEAR_TOPIC: KeyBinding = KeyBinding::key(KeyCode::Char('c'));
    pub const YES: KeyBinding = KeyBinding::key(KeyCode::Char('y'));
    pub const NO: KeyBinding = KeyBinding::key(KeyCode::Char('n'));

    // Publisher
    pub const VARIABLES: KeyBinding = KeyBinding::key(KeyCode::Char('v'));
    pub const LOAD_FILE: KeyBinding = KeyBinding::key(KeyCode::Char(' '));

    // Subscriber
    pub const ACK: KeyBinding = KeyBinding::key(KeyCode::Char('a'));
    pub const REJECT: KeyBinding = KeyBinding::key(KeyCode::Char('x'));
    pub const AUTO_ACK: KeyBinding = KeyBinding::key(KeyCode::Char('A'));
    pub const SCROLL_UP: KeyBinding = KeyBinding::ctrl(KeyCode::Char('u'));
    pub const SCROLL_DOWN: KeyBinding = KeyBinding::ctrl(KeyCode::Char('d'));

    pub fn is_up(key: &KeyEvent) -> bool {
        Self::UP.matches(key) || Self::UP_VIM.matches(key)
    }

    pub fn is_down(key: &KeyEvent) -> bool {
        Self::DOWN.matches(key) || Self::DOWN_VIM.matches(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_is_ignored_for_characters() {
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert!(DefaultKeymap::AUTO_ACK.matches(&shifted));
        assert!(!DefaultKeymap::ACK.matches(&shifted));

        let backtab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert!(DefaultKeymap::PREV_PANEL.matches(&backtab));
    }

    #[test]
    fn control_is_not_ignored() {
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert!(DefaultKeymap::SCROLL_DOWN.matches(&ctrl_d));
        assert!(!DefaultKeymap::DELETE.matches(&ctrl_d));
    }
}
