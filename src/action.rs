use serde::{Deserialize, Serialize};

use crate::mode::Mode;

/// Everything a key press can ask of the editor.
///
/// Actions are produced by the dispatcher and by `:` commands, and are what
/// keymaps in the config file refer to by name.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Action {
    // buffer mutations
    InsertCharAtCursorPos(char),
    InsertNewLine,
    DeleteCharAtCursorPos,
    DeletePreviousChar,
    DeleteCurrentLine,
    InsertLineBelowCursor,
    InsertLineAtCursor,

    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,

    EnterMode(Mode),

    // buffer switching
    NextBuffer,
    PreviousBuffer,
    OpenFile(String),
    CloseBuffer(bool),

    Save,
    SaveAs(String),

    Tree(TreeOp),

    Quit(bool),
    Error(String),
    Noop,
    Multiple(Vec<Action>),
}

/// Requests aimed at the file tree pane
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TreeOp {
    Toggle,
    Focus,
    Up,
    Down,
    Select,
}

impl Action {
    /// Flattens nested `Multiple` actions into the order they run in
    pub fn flatten(self) -> Vec<Action> {
        match self {
            Action::Multiple(actions) => actions.into_iter().flat_map(Action::flatten).collect(),
            Action::Noop => vec![],
            action => vec![action],
        }
    }
}
