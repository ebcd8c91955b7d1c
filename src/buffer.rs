use std::path::{Path, PathBuf};

use ropey::Rope;

use crate::{
    cursor::Cursor,
    error::{EditorError, Result},
    fs::Filesystem,
};

/// TextBuffer represents an editable text buffer, which may be associated with a file.
///
/// Lines are stored in a rope joined by `\n` with no trailing newline, so an
/// empty rope is exactly one empty line and the buffer never has zero lines.
/// Every mutation reports where the cursor should land afterwards.
#[derive(Debug)]
pub struct TextBuffer {
    /// Optional path to the file this buffer represents
    file: Option<PathBuf>,

    /// The text content stored as a rope for efficient editing
    content: Rope,

    /// Whether the buffer has unsaved changes
    dirty: bool,

    /// Whether the file ended with a newline when it was read
    trailing_newline: bool,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new(None, "")
    }
}

impl TextBuffer {
    /// Creates a new buffer with the given file path and contents.
    ///
    /// A single trailing newline is treated as a line terminator, not as an
    /// extra empty line. An empty new buffer is written out with one.
    pub fn new(file: Option<PathBuf>, contents: &str) -> Self {
        Self::decode(file, contents, true)
    }

    /// Decodes raw file bytes into a buffer, replacing invalid UTF-8.
    ///
    /// Unlike `new`, an empty file stays empty when saved back.
    pub fn from_bytes(file: Option<PathBuf>, bytes: &[u8]) -> Self {
        Self::decode(file, &String::from_utf8_lossy(bytes), false)
    }

    // only `\n` separates lines; any other break char is ordinary text
    fn decode(file: Option<PathBuf>, contents: &str, empty_newline: bool) -> Self {
        let normalized = contents.replace("\r\n", "\n");
        let (text, trailing_newline) = match normalized.strip_suffix('\n') {
            Some(text) => (text, true),
            None => (normalized.as_str(), empty_newline && contents.is_empty()),
        };

        Self {
            file,
            content: Rope::from_str(text),
            dirty: false,
            trailing_newline,
        }
    }

    /// Reads a buffer from `path`, or creates an empty one bound to `path` if
    /// the file does not exist yet.
    pub fn from_file(fs: &dyn Filesystem, path: &Path) -> Result<(Self, bool)> {
        match fs.read_file(path) {
            Ok(bytes) => Ok((Self::from_bytes(Some(path.to_path_buf()), &bytes), true)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok((Self::new(Some(path.to_path_buf()), ""), false))
            }
            Err(err) => Err(EditorError::io(path, err)),
        }
    }

    /// Encodes the buffer for writing to disk
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut contents = self.contents();
        if self.trailing_newline {
            contents.push('\n');
        }
        contents.into_bytes()
    }

    /// Saves the buffer contents to its associated file
    pub fn save(&mut self, fs: &dyn Filesystem) -> Result<String> {
        let Some(file) = self.file.clone() else {
            return Err(EditorError::NoFileName);
        };
        self.write_to(fs, &file)
    }

    /// Saves the buffer contents to a new file path and rebinds the buffer to it
    pub fn save_as(&mut self, fs: &dyn Filesystem, path: &Path) -> Result<String> {
        let message = self.write_to(fs, path)?;
        self.file = Some(path.to_path_buf());
        Ok(message)
    }

    fn write_to(&mut self, fs: &dyn Filesystem, path: &Path) -> Result<String> {
        let bytes = self.to_bytes();
        fs.write_file(path, &bytes)
            .map_err(|err| EditorError::io(path, err))?;
        self.dirty = false;
        Ok(format!(
            "{:?} {}L, {}B written",
            path.display().to_string(),
            self.len(),
            bytes.len()
        ))
    }

    pub fn name(&self) -> String {
        self.file
            .as_ref()
            .map(|f| f.display().to_string())
            .unwrap_or_else(|| "[No Name]".to_string())
    }

    pub fn path(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Returns whether the buffer has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Gets the full contents of the buffer, lines joined by `\n`
    pub fn contents(&self) -> String {
        self.content.to_string()
    }

    /// Gets the number of lines in the buffer, always at least one
    pub fn len(&self) -> usize {
        self.content.len_lines()
    }

    /// A buffer is empty when it is a single empty line
    pub fn is_empty(&self) -> bool {
        self.content.len_chars() == 0
    }

    /// Gets a line from the buffer by line number, without its line break
    pub fn line(&self, line: usize) -> Option<String> {
        if line >= self.len() {
            return None;
        }
        let mut text = self.content.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        Some(text)
    }

    /// Length of a line in chars, excluding the line break
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.len() {
            return 0;
        }
        let slice = self.content.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.len()).filter_map(|n| self.line(n))
    }

    /// Inserts a character at the given position
    pub fn insert_char(&mut self, line: usize, col: usize, c: char) -> Result<Cursor> {
        if c == '\n' {
            return self.insert_newline(line, col);
        }
        let idx = self.char_idx(line, col)?;
        self.content.insert_char(idx, c);
        self.dirty = true;
        Ok(Cursor::new(line, col + 1))
    }

    /// Splits the line at `col`, moving the tail onto a new line below
    pub fn insert_newline(&mut self, line: usize, col: usize) -> Result<Cursor> {
        let idx = self.char_idx(line, col)?;
        self.content.insert_char(idx, '\n');
        self.dirty = true;
        Ok(Cursor::new(line + 1, 0))
    }

    /// Removes the character under the cursor; a no-op at end of line
    pub fn delete_char(&mut self, line: usize, col: usize) -> Result<Cursor> {
        let idx = self.char_idx(line, col)?;
        if col < self.line_len(line) {
            self.content.remove(idx..idx + 1);
            self.dirty = true;
        }
        Ok(Cursor::new(line, col))
    }

    /// Removes an entire line. The only line of a buffer is emptied instead.
    pub fn delete_line(&mut self, line: usize) -> Result<Cursor> {
        let len = self.len();
        if line >= len {
            return Err(EditorError::OutOfBounds { line, col: 0 });
        }

        let range = if len == 1 {
            0..self.content.len_chars()
        } else if line + 1 == len {
            // last line: take the break that precedes it
            self.content.line_to_char(line) - 1..self.content.len_chars()
        } else {
            self.content.line_to_char(line)..self.content.line_to_char(line + 1)
        };
        self.content.remove(range);
        self.dirty = true;

        Ok(Cursor::new(line.min(self.len() - 1), 0))
    }

    /// Inserts a new line with `text` above `line`
    pub fn insert_line_above(&mut self, line: usize, text: &str) -> Result<Cursor> {
        if line >= self.len() {
            return Err(EditorError::OutOfBounds { line, col: 0 });
        }
        let idx = self.content.line_to_char(line);
        self.content.insert(idx, &format!("{text}\n"));
        self.dirty = true;
        Ok(Cursor::new(line, 0))
    }

    /// Inserts a new line with `text` below `line`
    pub fn insert_line_below(&mut self, line: usize, text: &str) -> Result<Cursor> {
        if line >= self.len() {
            return Err(EditorError::OutOfBounds { line, col: 0 });
        }
        if line + 1 == self.len() {
            let idx = self.content.len_chars();
            self.content.insert(idx, &format!("\n{text}"));
        } else {
            let idx = self.content.line_to_char(line + 1);
            self.content.insert(idx, &format!("{text}\n"));
        }
        self.dirty = true;
        Ok(Cursor::new(line + 1, 0))
    }

    /// Deletes the char before the cursor, joining with the previous line at
    /// column zero. A no-op at the start of the buffer.
    pub fn backspace(&mut self, line: usize, col: usize) -> Result<Cursor> {
        let idx = self.char_idx(line, col)?;
        if col > 0 {
            self.content.remove(idx - 1..idx);
            self.dirty = true;
            return Ok(Cursor::new(line, col - 1));
        }
        if line == 0 {
            return Ok(Cursor::new(0, 0));
        }

        let join_col = self.line_len(line - 1);
        self.content.remove(idx - 1..idx);
        self.dirty = true;
        Ok(Cursor::new(line - 1, join_col))
    }

    // converts (line, col) into a char index, rejecting positions past end of line
    fn char_idx(&self, line: usize, col: usize) -> Result<usize> {
        if line >= self.len() || col > self.line_len(line) {
            return Err(EditorError::OutOfBounds { line, col });
        }
        Ok(self.content.line_to_char(line) + col)
    }
}
