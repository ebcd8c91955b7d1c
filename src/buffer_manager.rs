use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;

use crate::{
    buffer::TextBuffer,
    cursor::{Cursor, Viewport},
    error::{EditorError, Result},
    fs::Filesystem,
    log,
};

/// An open buffer together with the cursor and scroll position used to edit it
#[derive(Debug, Default)]
pub struct Document {
    pub buffer: TextBuffer,
    pub cursor: Cursor,
    pub viewport: Viewport,
}

impl Document {
    pub fn new(buffer: TextBuffer) -> Self {
        Self {
            buffer,
            ..Default::default()
        }
    }
}

/// Outcome of `BufferManager::open`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened {
    /// The file was read from disk
    Loaded,
    /// The file does not exist yet; it is created on the first write
    New,
    /// The file was already open and became active
    Switched,
}

/// The ordered set of open buffers and which one is active.
///
/// Empty only before the first file is opened or after the last one is
/// closed; otherwise `active` always indexes an open document.
#[derive(Debug, Default)]
pub struct BufferManager {
    documents: Vec<Document>,
    active: usize,
}

impl BufferManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&Document> {
        self.documents.get(self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut Document> {
        self.documents.get_mut(self.active)
    }

    /// Adds a document and makes it active
    pub fn push(&mut self, buffer: TextBuffer) {
        self.documents.push(Document::new(buffer));
        self.active = self.documents.len() - 1;
    }

    /// Opens `path` as the active buffer, reusing an existing buffer for the
    /// same file and starting an empty one when the file is absent.
    pub fn open(&mut self, fs: &dyn Filesystem, path: &Path) -> Result<Opened> {
        if let Some(index) = self.find(path) {
            self.active = index;
            return Ok(Opened::Switched);
        }

        let (buffer, exists) = TextBuffer::from_file(fs, path)?;
        log!("opened {} ({} lines)", path.display(), buffer.len());
        self.push(buffer);
        Ok(if exists { Opened::Loaded } else { Opened::New })
    }

    /// Index of the buffer bound to `path`, compared as absolute paths
    pub fn find(&self, path: &Path) -> Option<usize> {
        let target = absolute(path);
        self.documents
            .iter()
            .position(|doc| doc.buffer.path().map(absolute).as_ref() == Some(&target))
    }

    /// Closes the buffer at `index`. A dirty buffer needs `force`.
    pub fn close(&mut self, index: usize, force: bool) -> Result<()> {
        let Some(doc) = self.documents.get(index) else {
            return Err(EditorError::OutOfBounds {
                line: index,
                col: 0,
            });
        };
        if doc.buffer.is_dirty() && !force {
            return Err(EditorError::UnsavedChanges(vec![doc.buffer.name()]));
        }

        self.documents.remove(index);
        if self.active > index || self.active >= self.documents.len() {
            self.active = self.active.saturating_sub(1);
        }
        Ok(())
    }

    pub fn next(&mut self) {
        if self.documents.len() > 1 {
            self.active = (self.active + 1) % self.documents.len();
        }
    }

    pub fn previous(&mut self) {
        if self.documents.len() > 1 {
            self.active = (self.active + self.documents.len() - 1) % self.documents.len();
        }
    }

    /// Names of all buffers with unsaved changes
    pub fn modified_buffers(&self) -> Vec<String> {
        self.documents
            .iter()
            .filter(|doc| doc.buffer.is_dirty())
            .map(|doc| doc.buffer.name())
            .collect()
    }
}

fn absolute(path: &Path) -> PathBuf {
    path.absolutize()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fs::LocalFs;

    fn manager_with(names: &[&str]) -> BufferManager {
        let mut manager = BufferManager::new();
        for name in names {
            manager.push(TextBuffer::new(Some(PathBuf::from(name)), name));
        }
        manager
    }

    fn active_name(manager: &BufferManager) -> String {
        manager.active().unwrap().buffer.name()
    }

    #[test]
    fn test_next_and_previous_cycle() {
        let mut manager = manager_with(&["a", "b", "c"]);
        assert_eq!(active_name(&manager), "c");

        manager.next();
        assert_eq!(active_name(&manager), "a");
        manager.previous();
        manager.previous();
        assert_eq!(active_name(&manager), "b");
    }

    #[test]
    fn test_switching_with_one_buffer_is_noop() {
        let mut manager = manager_with(&["a"]);
        manager.next();
        manager.previous();
        assert_eq!(manager.active_index(), 0);

        let mut manager = BufferManager::new();
        manager.next();
        assert!(manager.active().is_none());
    }

    #[test]
    fn test_switching_keeps_dirty_state() {
        let mut manager = manager_with(&["a", "b"]);
        manager.active_mut().unwrap().buffer.insert_char(0, 0, 'x').unwrap();
        manager.next();
        manager.next();
        assert!(manager.active().unwrap().buffer.is_dirty());
        assert_eq!(manager.modified_buffers(), vec!["b".to_string()]);
    }

    #[test]
    fn test_close_dirty_requires_force() {
        let mut manager = manager_with(&["a", "b"]);
        manager.active_mut().unwrap().buffer.delete_line(0).unwrap();

        assert!(matches!(
            manager.close(1, false),
            Err(EditorError::UnsavedChanges(names)) if names == vec!["b".to_string()]
        ));
        assert_eq!(manager.len(), 2);

        manager.close(1, true).unwrap();
        assert_eq!(manager.len(), 1);
        assert_eq!(active_name(&manager), "a");
    }

    #[test]
    fn test_close_keeps_active_valid() {
        let mut manager = manager_with(&["a", "b", "c"]);
        manager.next();
        manager.next();
        assert_eq!(active_name(&manager), "b");

        manager.close(0, false).unwrap();
        assert_eq!(active_name(&manager), "b");

        manager.close(1, false).unwrap();
        manager.close(0, false).unwrap();
        assert!(manager.is_empty());
        assert!(manager.active().is_none());
    }

    #[test]
    fn test_open_existing_missing_and_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("existing.txt");
        std::fs::write(&existing, "one\ntwo\n").unwrap();
        let missing = dir.path().join("missing.txt");

        let mut manager = BufferManager::new();
        assert_eq!(manager.open(&LocalFs, &existing).unwrap(), Opened::Loaded);
        assert_eq!(manager.active().unwrap().buffer.len(), 2);

        assert_eq!(manager.open(&LocalFs, &missing).unwrap(), Opened::New);
        assert!(manager.active().unwrap().buffer.is_empty());
        assert!(!missing.exists());

        assert_eq!(manager.open(&LocalFs, &existing).unwrap(), Opened::Switched);
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.active_index(), 0);
    }

    #[test]
    fn test_find_compares_absolute_paths() {
        let mut manager = BufferManager::new();
        manager.push(TextBuffer::new(Some(PathBuf::from("/p/a.txt")), ""));
        manager.push(TextBuffer::new(None, ""));
        manager.push(TextBuffer::new(Some(PathBuf::from("/p/b.txt")), ""));

        assert_eq!(manager.find(Path::new("/p/a.txt")), Some(0));
        assert_eq!(manager.find(Path::new("/p/src/../b.txt")), Some(2));
        assert_eq!(manager.find(Path::new("/p/c.txt")), None);
    }
}
