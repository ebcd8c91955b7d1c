use std::path::PathBuf;

use grove::{
    buffer::TextBuffer,
    config::Config,
    cursor::Cursor,
    editor::{Editor, Message},
    key::Key,
    mode::Mode,
};

use super::memory_fs::MemoryFs;

/// Test harness for editor integration tests
///
/// Wraps an Editor running on an in-memory filesystem rooted at `/work` and
/// drives it with key sequences written like `"x"`, `"dd"` or `":wq<Enter>"`.
pub struct EditorHarness {
    pub editor: Editor,
    pub fs: MemoryFs,
}

impl EditorHarness {
    fn editor(fs: &MemoryFs) -> Editor {
        Editor::with_size(
            Box::new(fs.clone()),
            Config::default(),
            PathBuf::from("/work"),
            80,
            24,
        )
    }

    /// Starts on the file tree, with nothing open
    pub fn on_tree(fs: MemoryFs) -> Self {
        let mut editor = Self::editor(&fs);
        editor.start(None);
        Self { editor, fs }
    }

    /// Starts with `path` open in the editor view
    pub fn with_file(fs: MemoryFs, path: &str) -> Self {
        let mut editor = Self::editor(&fs);
        editor.start(Some(PathBuf::from(path)));
        Self { editor, fs }
    }

    /// Starts with an unnamed buffer holding `content`
    pub fn with_content(content: &str) -> Self {
        let mut harness = Self::on_tree(MemoryFs::new());
        harness.editor.open_buffer(TextBuffer::new(None, content));
        harness
    }

    /// Feeds keys to the editor. `<Name>` stands for a special key.
    pub fn press(&mut self, keys: &str) {
        let mut chars = keys.chars();
        while let Some(c) = chars.next() {
            let key = if c == '<' {
                let name: String = chars.by_ref().take_while(|&c| c != '>').collect();
                match name.as_str() {
                    "Esc" => Key::Esc,
                    "Enter" => Key::Enter,
                    "Tab" => Key::Tab,
                    "BS" => Key::Backspace,
                    "Left" => Key::Left,
                    "Right" => Key::Right,
                    "Up" => Key::Up,
                    "Down" => Key::Down,
                    "lt" => Key::Char('<'),
                    other => panic!("unknown key <{other}>"),
                }
            } else {
                Key::Char(c)
            };
            self.editor.handle_key(key);
        }
    }

    pub fn mode(&self) -> Mode {
        self.editor.mode()
    }

    pub fn cursor(&self) -> Cursor {
        self.editor.cursor().expect("a buffer is open")
    }

    pub fn lines(&self) -> Vec<String> {
        self.editor
            .current_document()
            .expect("a buffer is open")
            .buffer
            .lines()
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.editor
            .current_document()
            .expect("a buffer is open")
            .buffer
            .is_dirty()
    }

    pub fn buffer_name(&self) -> String {
        self.editor
            .current_document()
            .expect("a buffer is open")
            .buffer
            .name()
    }

    pub fn error(&self) -> Option<String> {
        match self.editor.message() {
            Some(Message::Error(message)) => Some(message.clone()),
            _ => None,
        }
    }

    pub fn info(&self) -> Option<String> {
        match self.editor.message() {
            Some(Message::Info(message)) => Some(message.clone()),
            _ => None,
        }
    }

    /// Assert cursor is at expected position
    pub fn assert_cursor_at(&self, line: usize, col: usize) {
        let cursor = self.cursor();
        assert_eq!(
            (cursor.line, cursor.col),
            (line, col),
            "Expected cursor at ({}, {}), but was at ({}, {})",
            line,
            col,
            cursor.line,
            cursor.col
        );
    }

    /// Assert editor is in expected mode
    pub fn assert_mode(&self, mode: Mode) {
        assert_eq!(
            self.mode(),
            mode,
            "Expected mode {:?}, but was {:?}",
            mode,
            self.mode()
        );
    }

    /// Assert buffer has expected lines
    pub fn assert_lines(&self, expected: &[&str]) {
        assert_eq!(self.lines(), expected, "Buffer contents mismatch");
    }

    /// Asserts what must hold after every key: at least one line, a cursor
    /// inside the buffer, and no command text outside Command mode
    pub fn assert_invariants(&self) {
        if self.mode() != Mode::Command {
            assert!(self.editor.command_line().is_empty());
        }
        let Some(doc) = self.editor.current_document() else {
            return;
        };
        assert!(doc.buffer.len() >= 1, "buffer has no lines");
        assert!(
            doc.cursor.is_valid(&doc.buffer, self.mode()),
            "cursor {:?} invalid in {:?} for {:?}",
            doc.cursor,
            self.mode(),
            self.lines()
        );
    }
}
