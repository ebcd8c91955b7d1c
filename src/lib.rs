pub mod action;
pub mod buffer;
pub mod buffer_manager;
pub mod cli;
pub mod command;
pub mod config;
pub mod cursor;
pub mod dispatcher;
pub mod editor;
pub mod error;
pub mod fs;
pub mod key;
pub mod logger;
pub mod mode;
pub mod terminal;
pub mod tree;

pub use editor::Editor;
pub use error::EditorError;
pub use logger::Logger;
