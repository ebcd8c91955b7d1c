use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A single key press as the engine sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Left,
    Right,
    Up,
    Down,
}

impl Key {
    /// Name used for this key in keymaps, e.g. `x`, `Esc`, `Ctrl-s`
    pub fn name(&self) -> String {
        match self {
            Key::Char(c) => format!("{c}"),
            Key::Ctrl(c) => format!("Ctrl-{c}"),
            key => format!("{key:?}"),
        }
    }

    /// Converts a terminal event, ignoring releases and keys the editor has no use for
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }

        let key = match event.code {
            KeyCode::Char(c) if event.modifiers.contains(KeyModifiers::CONTROL) => Key::Ctrl(c),
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Esc,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Tab => Key::Tab,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            _ => return None,
        };
        Some(key)
    }
}
