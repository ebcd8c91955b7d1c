use std::io::{stdout, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{self, Event},
    style::{self, Attribute, Color},
    terminal::{self, Clear, ClearType},
    ExecutableCommand, QueueableCommand,
};
use unicode_width::UnicodeWidthChar;

use crate::{
    editor::{Editor, Message},
    key::Key,
    log,
    mode::Mode,
    tree::TreeItem,
};

/// Paints editor state onto the terminal and feeds it key presses.
pub struct Terminal {
    stdout: Stdout,
}

impl Terminal {
    pub fn new() -> Self {
        Self { stdout: stdout() }
    }

    pub fn size() -> anyhow::Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    pub fn enter(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout
            .execute(terminal::EnterAlternateScreen)?
            .execute(Clear(ClearType::All))?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        self.stdout
            .execute(cursor::SetCursorStyle::DefaultUserShape)?
            .execute(cursor::Show)?
            .execute(terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Blocks on input and redraws after every event until the editor quits
    pub fn run(&mut self, editor: &mut Editor) -> anyhow::Result<()> {
        while !editor.should_quit() {
            self.draw(editor)?;
            match event::read()? {
                Event::Key(ev) => {
                    if let Some(key) = Key::from_event(&ev) {
                        editor.handle_key(key);
                    }
                }
                Event::Resize(width, height) => editor.resize(width, height),
                ev => log!("ignored event {ev:?}"),
            }
        }
        Ok(())
    }

    pub fn draw(&mut self, editor: &Editor) -> anyhow::Result<()> {
        self.stdout
            .queue(cursor::Hide)?
            .queue(Clear(ClearType::All))?;

        let left = if editor.tree().visible {
            self.draw_tree(editor)?;
            editor.tree_width() as usize + 1
        } else {
            0
        };
        let cursor_pos = self.draw_text(editor, left)?;
        self.draw_statusline(editor, left)?;
        self.draw_commandline(editor)?;

        let (_, height) = editor.size();
        let cursor_pos = match editor.mode() {
            Mode::Command => Some((
                1 + editor.command_line().chars().count() as u16,
                height.saturating_sub(1),
            )),
            Mode::TreeFocus => None,
            _ => cursor_pos,
        };

        self.stdout.queue(match editor.mode() {
            Mode::Insert => cursor::SetCursorStyle::SteadyBar,
            _ => cursor::SetCursorStyle::DefaultUserShape,
        })?;
        if let Some((x, y)) = cursor_pos {
            self.stdout.queue(MoveTo(x, y))?.queue(cursor::Show)?;
        }
        self.stdout.flush()?;
        Ok(())
    }

    fn draw_tree(&mut self, editor: &Editor) -> anyhow::Result<()> {
        let width = editor.tree_width() as usize;
        let rows = editor.vheight();
        let tree = editor.tree();
        let top = (tree.selected_index() + 1).saturating_sub(rows);
        let focused = editor.mode() == Mode::TreeFocus;

        for y in 0..rows {
            self.stdout.queue(MoveTo(0, y as u16))?;
            if let Some(item) = tree.items().get(top + y) {
                let selected = top + y == tree.selected_index();
                if selected && focused {
                    self.stdout.queue(style::SetAttribute(Attribute::Reverse))?;
                }
                self.stdout
                    .queue(style::Print(fit(&tree_row(item), 0, width)))?
                    .queue(style::SetAttribute(Attribute::Reset))?;
            }
            self.stdout
                .queue(MoveTo(width as u16, y as u16))?
                .queue(style::Print('│'))?;
        }
        Ok(())
    }

    // returns where the text cursor lands on screen
    fn draw_text(&mut self, editor: &Editor, left: usize) -> anyhow::Result<Option<(u16, u16)>> {
        let (width, _) = editor.size();
        let rows = editor.vheight();
        let Some(doc) = editor.current_document() else {
            return Ok(None);
        };

        let gutter = doc.buffer.len().to_string().len() + 2;
        let text_width = (width as usize).saturating_sub(left + gutter);
        let cursor_line = doc.buffer.line(doc.cursor.line).unwrap_or_default();
        let cursor_x = display_width(&cursor_line, doc.cursor.col);
        let hscroll = (cursor_x + 1).saturating_sub(text_width);

        let lines = editor.visible_lines();
        for y in 0..rows {
            self.stdout.queue(MoveTo(left as u16, y as u16))?;
            match lines.get(y) {
                Some((n, line)) => {
                    self.stdout
                        .queue(style::SetForegroundColor(Color::DarkGrey))?
                        .queue(style::Print(format!(" {:>w$} ", n + 1, w = gutter - 2)))?
                        .queue(style::ResetColor)?
                        .queue(style::Print(fit(line, hscroll, text_width)))?;
                }
                None => {
                    self.stdout
                        .queue(style::SetForegroundColor(Color::DarkBlue))?
                        .queue(style::Print("~"))?
                        .queue(style::ResetColor)?;
                }
            }
        }

        let y = doc.cursor.line.saturating_sub(doc.viewport.top);
        Ok(Some(((left + gutter + cursor_x - hscroll) as u16, y as u16)))
    }

    fn draw_statusline(&mut self, editor: &Editor, left: usize) -> anyhow::Result<()> {
        let (width, height) = editor.size();
        let width = (width as usize).saturating_sub(left);
        let mode = format!(" {} ", editor.mode().name());
        let (file, pos) = match editor.current_document() {
            Some(doc) => {
                let dirty = if doc.buffer.is_dirty() { " [+]" } else { "" };
                (
                    format!(" {}{}", doc.buffer.name(), dirty),
                    format!(" {}:{} ", doc.cursor.line + 1, doc.cursor.col + 1),
                )
            }
            None => (String::new(), String::new()),
        };
        let fill = width.saturating_sub(mode.chars().count() + pos.chars().count());

        self.stdout
            .queue(MoveTo(left as u16, height.saturating_sub(2)))?
            .queue(style::SetAttribute(Attribute::Reverse))?
            .queue(style::Print(fit(&format!("{mode}{file:<fill$}{pos}"), 0, width)))?
            .queue(style::SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    fn draw_commandline(&mut self, editor: &Editor) -> anyhow::Result<()> {
        let (width, height) = editor.size();
        let width = width as usize;
        self.stdout.queue(MoveTo(0, height.saturating_sub(1)))?;

        if editor.mode() == Mode::Command {
            self.stdout
                .queue(style::Print(fit(&format!(":{}", editor.command_line()), 0, width)))?;
            return Ok(());
        }

        match editor.message() {
            Some(Message::Error(message)) => {
                self.stdout
                    .queue(style::SetForegroundColor(Color::Red))?
                    .queue(style::Print(fit(message, 0, width)))?
                    .queue(style::ResetColor)?;
            }
            Some(Message::Info(message)) => {
                self.stdout.queue(style::Print(fit(message, 0, width)))?;
            }
            None => {}
        }

        let pending = editor.mode_state().pending().concat();
        if !pending.is_empty() {
            self.stdout
                .queue(MoveTo(width.saturating_sub(10) as u16, height.saturating_sub(1)))?
                .queue(style::Print(fit(&pending, 0, 10)))?;
        }
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

fn tree_row(item: &TreeItem) -> String {
    let indicator = match (item.is_dir, item.expanded) {
        (true, true) => "[-]",
        (true, false) => "[+]",
        (false, _) => "   ",
    };
    format!("{}{}{}", "  ".repeat(item.depth), indicator, item.name())
}

/// Screen width of the first `col` chars of `line`
fn display_width(line: &str, col: usize) -> usize {
    line.chars()
        .take(col)
        .map(|c| c.width().unwrap_or(0))
        .sum()
}

/// Cuts `text` to the screen columns `[skip, skip + width)`
fn fit(text: &str, skip: usize, width: usize) -> String {
    let mut result = String::new();
    let mut x = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if x >= skip {
            if x + w > skip + width {
                break;
            }
            result.push(c);
        }
        x += w;
    }
    result
}
