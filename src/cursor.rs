use std::ops::Range;

use crate::{buffer::TextBuffer, mode::Mode};

/// Logical cursor position in a buffer, both coordinates 0-based.
///
/// The column may equal the line length only in Insert mode, where the cursor
/// sits between characters instead of on one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
}

impl Cursor {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    pub fn move_left(&mut self) {
        self.col = self.col.saturating_sub(1);
    }

    pub fn move_right(&mut self, buffer: &TextBuffer, mode: Mode) {
        self.col = (self.col + 1).min(max_col(buffer, self.line, mode));
    }

    pub fn move_up(&mut self, buffer: &TextBuffer, mode: Mode) {
        self.line = self.line.saturating_sub(1);
        self.clamp(buffer, mode);
    }

    pub fn move_down(&mut self, buffer: &TextBuffer, mode: Mode) {
        self.line += 1;
        self.clamp(buffer, mode);
    }

    /// Pulls the cursor back inside the buffer after its shape changed
    pub fn clamp(&mut self, buffer: &TextBuffer, mode: Mode) {
        self.line = self.line.min(buffer.len() - 1);
        self.col = self.col.min(max_col(buffer, self.line, mode));
    }

    pub fn is_valid(&self, buffer: &TextBuffer, mode: Mode) -> bool {
        self.line < buffer.len() && self.col <= max_col(buffer, self.line, mode)
    }
}

fn max_col(buffer: &TextBuffer, line: usize, mode: Mode) -> usize {
    let len = buffer.line_len(line);
    if mode.allows_end_of_line() {
        len
    } else {
        len.saturating_sub(1)
    }
}

/// The window of buffer rows currently visible on screen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub top: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self { top: 0, height }
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
    }

    /// Scrolls just enough to bring the cursor row into view
    pub fn scroll_to(&mut self, cursor: &Cursor) {
        if cursor.line < self.top {
            self.top = cursor.line;
        }
        let height = self.height.max(1);
        if cursor.line >= self.top + height {
            self.top = cursor.line + 1 - height;
        }
    }

    /// Buffer rows that fit in the window
    pub fn visible_range(&self, buffer: &TextBuffer) -> Range<usize> {
        let start = self.top.min(buffer.len());
        let end = (self.top + self.height).min(buffer.len());
        start..end
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_move_down_clamps_to_shorter_line() {
        let buffer = TextBuffer::new(None, "long line\nab\n");
        let mut cursor = Cursor::new(0, 7);
        cursor.move_down(&buffer, Mode::Normal);
        assert_eq!(cursor, Cursor::new(1, 1));

        let mut cursor = Cursor::new(0, 7);
        cursor.move_down(&buffer, Mode::Insert);
        assert_eq!(cursor, Cursor::new(1, 2));
    }

    #[test]
    fn test_moves_stop_at_buffer_edges() {
        let buffer = TextBuffer::new(None, "ab\ncd");
        let mut cursor = Cursor::new(0, 0);
        cursor.move_up(&buffer, Mode::Normal);
        cursor.move_left();
        assert_eq!(cursor, Cursor::new(0, 0));

        cursor.move_down(&buffer, Mode::Normal);
        cursor.move_down(&buffer, Mode::Normal);
        cursor.move_right(&buffer, Mode::Normal);
        cursor.move_right(&buffer, Mode::Normal);
        assert_eq!(cursor, Cursor::new(1, 1));
    }

    #[test]
    fn test_right_in_insert_reaches_end_of_line() {
        let buffer = TextBuffer::new(None, "ab");
        let mut cursor = Cursor::new(0, 1);
        cursor.move_right(&buffer, Mode::Insert);
        assert_eq!(cursor.col, 2);
        cursor.move_right(&buffer, Mode::Insert);
        assert_eq!(cursor.col, 2);
    }

    #[test]
    fn test_clamp_after_lines_removed() {
        let buffer = TextBuffer::new(None, "abc");
        let mut cursor = Cursor::new(4, 9);
        cursor.clamp(&buffer, Mode::Normal);
        assert_eq!(cursor, Cursor::new(0, 2));
        assert!(cursor.is_valid(&buffer, Mode::Normal));
    }

    #[test]
    fn test_clamp_on_empty_line() {
        let buffer = TextBuffer::new(None, "");
        let mut cursor = Cursor::new(0, 1);
        cursor.clamp(&buffer, Mode::Normal);
        assert_eq!(cursor, Cursor::new(0, 0));
    }

    #[test]
    fn test_viewport_follows_cursor() {
        let mut viewport = Viewport::new(3);
        viewport.scroll_to(&Cursor::new(5, 0));
        assert_eq!(viewport.top, 3);

        viewport.scroll_to(&Cursor::new(4, 0));
        assert_eq!(viewport.top, 3);

        viewport.scroll_to(&Cursor::new(1, 0));
        assert_eq!(viewport.top, 1);
    }

    #[test]
    fn test_visible_range() {
        let buffer = TextBuffer::new(None, "a\nb\nc\nd\n\ne\n\nf");
        let viewport = Viewport { top: 0, height: 2 };
        assert_eq!(viewport.visible_range(&buffer), 0..2);

        let viewport = Viewport { top: 6, height: 5 };
        assert_eq!(viewport.visible_range(&buffer), 6..8);
    }
}
