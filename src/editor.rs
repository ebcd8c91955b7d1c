use std::path::{Path, PathBuf};

use crate::{
    action::{Action, TreeOp},
    buffer::TextBuffer,
    buffer_manager::{BufferManager, Document, Opened},
    config::Config,
    cursor::Cursor,
    dispatcher::Dispatcher,
    error::{EditorError, Result},
    fs::Filesystem,
    key::Key,
    log,
    mode::{Mode, ModeState},
    tree::{FileTree, Selection},
};

/// A line shown in the command-line area until the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Info(String),
    Error(String),
}

/// Editor owns all editing state for one session:
/// - the open buffers and their cursors
/// - the current mode, pending keys and command line
/// - the file tree
///
/// Input comes in through `handle_key`, one key at a time. Each key is fully
/// applied before the call returns. A renderer reads the result through the
/// getters and never mutates anything.
pub struct Editor {
    fs: Box<dyn Filesystem>,
    dispatcher: Dispatcher,
    state: ModeState,
    buffers: BufferManager,
    tree: FileTree,
    tree_width: u16,
    size: (u16, u16),
    message: Option<Message>,
    should_quit: bool,
}

impl Editor {
    pub fn with_size(
        fs: Box<dyn Filesystem>,
        config: Config,
        root: PathBuf,
        width: u16,
        height: u16,
    ) -> Self {
        let mut tree = FileTree::new(root);
        tree.visible = config.show_tree;

        Editor {
            fs,
            dispatcher: Dispatcher::new(config.keys),
            state: ModeState::default(),
            buffers: BufferManager::new(),
            tree,
            tree_width: config.tree_width,
            size: (width, height),
            message: None,
            should_quit: false,
        }
    }

    /// Opens `file` straight into the editor view, or starts on the tree.
    /// A file that cannot be opened leaves the editor on the tree.
    pub fn start(&mut self, file: Option<PathBuf>) {
        let Some(file) = file else {
            self.apply(Action::Tree(TreeOp::Focus));
            return;
        };

        if self.tree.visible {
            if let Err(err) = self.tree.refresh(self.fs.as_ref()) {
                log!("WARN: {err}");
            }
        }
        self.apply(Action::Multiple(vec![
            Action::OpenFile(file.display().to_string()),
            Action::EnterMode(Mode::Normal),
        ]));
        if self.buffers.is_empty() {
            self.focus_tree();
        }
    }

    /// Makes an already built buffer the active one and switches to the editor view
    pub fn open_buffer(&mut self, buffer: TextBuffer) {
        self.buffers.push(buffer);
        self.state.enter(Mode::Normal);
        self.fix_cursor();
    }

    pub fn handle_key(&mut self, key: Key) {
        if self.state.mode() != Mode::Command {
            self.message = None;
        }
        let action = self.dispatcher.handle_key(&mut self.state, key);
        self.apply(action);
    }

    /// Runs an action, stopping a sequence at the first failure and reporting
    /// it on the command line
    pub fn apply(&mut self, action: Action) {
        for action in action.flatten() {
            if let Err(err) = self.execute(&action) {
                debug_assert!(
                    !matches!(err, EditorError::OutOfBounds { .. }),
                    "{action:?} produced {err}"
                );
                log!("ERROR: {action:?}: {err}");
                self.message = Some(Message::Error(err.to_string()));
                break;
            }
            if self.should_quit {
                break;
            }
        }
        self.fix_cursor();
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.fix_cursor();
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Rows available for buffer text, below which sit the status and command lines
    pub fn vheight(&self) -> usize {
        (self.size.1 as usize).saturating_sub(2)
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn mode_state(&self) -> &ModeState {
        &self.state
    }

    pub fn command_line(&self) -> &str {
        self.state.command_line()
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn buffers(&self) -> &BufferManager {
        &self.buffers
    }

    pub fn current_document(&self) -> Option<&Document> {
        self.buffers.active()
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.current_document().map(|doc| doc.cursor)
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn tree_width(&self) -> u16 {
        self.tree_width
    }

    /// Lines of the active buffer inside the viewport, with their line numbers
    pub fn visible_lines(&self) -> Vec<(usize, String)> {
        let Some(doc) = self.current_document() else {
            return vec![];
        };
        doc.viewport
            .visible_range(&doc.buffer)
            .filter_map(|n| doc.buffer.line(n).map(|line| (n, line)))
            .collect()
    }

    fn execute(&mut self, action: &Action) -> Result<()> {
        let mode = self.state.mode();

        match action {
            Action::InsertCharAtCursorPos(c) => {
                self.edit(|buffer, cursor| buffer.insert_char(cursor.line, cursor.col, *c))?
            }
            Action::InsertNewLine => {
                self.edit(|buffer, cursor| buffer.insert_newline(cursor.line, cursor.col))?
            }
            Action::DeleteCharAtCursorPos => {
                self.edit(|buffer, cursor| buffer.delete_char(cursor.line, cursor.col))?
            }
            Action::DeletePreviousChar => {
                self.edit(|buffer, cursor| buffer.backspace(cursor.line, cursor.col))?
            }
            Action::DeleteCurrentLine => {
                self.edit(|buffer, cursor| buffer.delete_line(cursor.line))?
            }
            Action::InsertLineBelowCursor => {
                self.edit(|buffer, cursor| buffer.insert_line_below(cursor.line, ""))?
            }
            Action::InsertLineAtCursor => {
                self.edit(|buffer, cursor| buffer.insert_line_above(cursor.line, ""))?
            }
            Action::MoveUp => self.move_cursor(|cursor, buffer| cursor.move_up(buffer, mode)),
            Action::MoveDown => self.move_cursor(|cursor, buffer| cursor.move_down(buffer, mode)),
            Action::MoveLeft => self.move_cursor(|cursor, _| cursor.move_left()),
            Action::MoveRight => self.move_cursor(|cursor, buffer| cursor.move_right(buffer, mode)),
            Action::EnterMode(new_mode) => self.enter_mode(*new_mode),
            Action::NextBuffer => self.buffers.next(),
            Action::PreviousBuffer => self.buffers.previous(),
            Action::OpenFile(file) => self.open(Path::new(file))?,
            Action::CloseBuffer(force) => {
                self.buffers.close(self.buffers.active_index(), *force)?;
                if self.buffers.is_empty() {
                    self.focus_tree();
                }
            }
            Action::Save => {
                let doc = self.buffers.active_mut().ok_or(EditorError::NoFileName)?;
                let message = doc.buffer.save(self.fs.as_ref())?;
                self.info(message);
            }
            Action::SaveAs(file) => {
                let path = Path::new(file);
                if self
                    .buffers
                    .find(path)
                    .is_some_and(|index| index != self.buffers.active_index())
                {
                    return Err(EditorError::AlreadyOpen(file.clone()));
                }
                let doc = self.buffers.active_mut().ok_or(EditorError::NoFileName)?;
                let message = doc.buffer.save_as(self.fs.as_ref(), path)?;
                self.info(message);
            }
            Action::Tree(op) => self.tree_op(*op)?,
            Action::Quit(force) => {
                if !force {
                    let modified = self.buffers.modified_buffers();
                    if !modified.is_empty() {
                        return Err(EditorError::UnsavedChanges(modified));
                    }
                }
                log!("quit");
                self.should_quit = true;
            }
            Action::Error(message) => self.message = Some(Message::Error(message.clone())),
            Action::Noop => {}
            Action::Multiple(actions) => {
                for action in actions {
                    self.execute(action)?;
                }
            }
        }

        Ok(())
    }

    fn edit(
        &mut self,
        f: impl FnOnce(&mut TextBuffer, Cursor) -> Result<Cursor>,
    ) -> Result<()> {
        if let Some(doc) = self.buffers.active_mut() {
            doc.cursor = f(&mut doc.buffer, doc.cursor)?;
        }
        Ok(())
    }

    fn move_cursor(&mut self, f: impl FnOnce(&mut Cursor, &TextBuffer)) {
        if let Some(doc) = self.buffers.active_mut() {
            f(&mut doc.cursor, &doc.buffer);
        }
    }

    fn enter_mode(&mut self, mode: Mode) {
        match mode {
            Mode::Normal if self.buffers.is_empty() => {
                self.buffers.push(TextBuffer::default());
            }
            Mode::Insert | Mode::Command if self.buffers.is_empty() => return,
            _ => {}
        }
        self.state.enter(mode);
    }

    fn focus_tree(&mut self) {
        self.tree.visible = true;
        if let Err(err) = self.tree.refresh(self.fs.as_ref()) {
            self.message = Some(Message::Error(err.to_string()));
        }
        self.state.enter(Mode::TreeFocus);
    }

    fn tree_op(&mut self, op: TreeOp) -> Result<()> {
        match op {
            TreeOp::Toggle if self.tree.visible => {
                self.tree.visible = false;
                if self.state.mode() == Mode::TreeFocus {
                    self.enter_mode(Mode::Normal);
                }
            }
            TreeOp::Toggle => {
                self.tree.refresh(self.fs.as_ref())?;
                self.tree.visible = true;
            }
            TreeOp::Focus => self.focus_tree(),
            TreeOp::Up => self.tree.move_up(),
            TreeOp::Down => self.tree.move_down(),
            TreeOp::Select => match self.tree.select() {
                Some(Selection::File(path)) => {
                    self.open(&path)?;
                    self.state.enter(Mode::Normal);
                }
                Some(Selection::Directory(path)) => {
                    if let Err(err) = self.tree.refresh(self.fs.as_ref()) {
                        self.tree.toggle_expanded(&path);
                        return Err(err);
                    }
                }
                None => {}
            },
        }
        Ok(())
    }

    fn open(&mut self, path: &Path) -> Result<()> {
        let opened = self.buffers.open(self.fs.as_ref(), path)?;
        let name = format!("{:?}", path.display().to_string());
        let message = match opened {
            Opened::Loaded => {
                let lines = self.buffers.active().map(|doc| doc.buffer.len()).unwrap_or(0);
                format!("{name} {lines}L")
            }
            Opened::New => format!("{name} [New]"),
            Opened::Switched => name,
        };
        self.info(message);
        Ok(())
    }

    fn info(&mut self, message: String) {
        log!("{message}");
        self.message = Some(Message::Info(message));
    }

    // re-validates the cursor against the buffer and mode, then scrolls to it
    fn fix_cursor(&mut self) {
        let mode = self.state.mode();
        let height = self.vheight();
        if let Some(doc) = self.buffers.active_mut() {
            doc.cursor.clamp(&doc.buffer, mode);
            doc.viewport.set_height(height);
            doc.viewport.scroll_to(&doc.cursor);
        }
    }
}
