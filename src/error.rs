use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the editing engine.
///
/// Everything except `OutOfBounds` is reported to the user on the command line
/// and leaves the editor state untouched. `OutOfBounds` means a caller passed a
/// position the buffer does not have, which a correct dispatcher never does.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("position out of bounds: line {line}, col {col}")]
    OutOfBounds { line: usize, col: usize },

    #[error("No write since last change for: {} (add ! to override)", .0.join(", "))]
    UnsavedChanges(Vec<String>),

    #[error("No file name")]
    NoFileName,

    #[error("Argument required for :{0}")]
    MissingArgument(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not an editor command: {0}")]
    UnknownCommand(String),

    #[error("File is loaded in another buffer: {0}")]
    AlreadyOpen(String),
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
