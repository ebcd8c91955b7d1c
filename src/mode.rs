use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
    Command,
    #[default]
    TreeFocus,
}

impl Mode {
    /// Whether the cursor may sit one past the last character of a line
    pub fn allows_end_of_line(&self) -> bool {
        matches!(self, Mode::Insert)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Command => "COMMAND",
            Mode::TreeFocus => "TREE",
        }
    }
}

/// Current mode plus the input that is still being composed in it.
///
/// `pending` holds the keys of an unfinished multi-key sequence such as the
/// first `d` of `dd`, and is empty at every other moment. `command_line` is
/// the text typed after `:` and is empty outside Command mode.
#[derive(Debug, Default)]
pub struct ModeState {
    mode: Mode,
    pending: Vec<String>,
    command_line: String,
}

impl ModeState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches modes, dropping any pending keys. Entering or leaving Command
    /// mode starts from an empty command line.
    pub fn enter(&mut self, mode: Mode) {
        if mode == Mode::Command || self.mode == Mode::Command {
            self.command_line.clear();
        }
        self.pending.clear();
        self.mode = mode;
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    pub fn push_pending(&mut self, key: String) {
        self.pending.push(key);
    }

    pub fn take_pending(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    pub fn push_command_char(&mut self, c: char) {
        self.command_line.push(c);
    }

    /// Removes the last typed char, returning false if the line was already empty
    pub fn pop_command_char(&mut self) -> bool {
        self.command_line.pop().is_some()
    }
}
