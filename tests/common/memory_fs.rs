use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
    io,
    path::{Path, PathBuf},
    rc::Rc,
};

use grove::fs::{DirEntry, Filesystem};

/// In-memory filesystem shared between a test and the editor under test.
#[derive(Clone, Default)]
pub struct MemoryFs {
    files: Rc<RefCell<HashMap<PathBuf, Vec<u8>>>>,
    read_only: Rc<RefCell<HashSet<PathBuf>>>,
    listing_broken: Rc<Cell<bool>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, contents: &str) -> Self {
        self.files
            .borrow_mut()
            .insert(PathBuf::from(path), contents.as_bytes().to_vec());
        self
    }

    /// Makes writes to `path` fail with PermissionDenied
    pub fn read_only(self, path: &str) -> Self {
        self.read_only.borrow_mut().insert(PathBuf::from(path));
        self
    }

    /// Makes every later `list_directory` call fail
    pub fn break_listing(&self) {
        self.listing_broken.set(true);
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .borrow()
            .keys()
            .any(|file| file != path && file.starts_with(path))
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        self.files
            .borrow()
            .get(Path::new(path))
            .map(|bytes| String::from_utf8_lossy(bytes).to_string())
    }
}

impl Filesystem for MemoryFs {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        if self.is_dir(path) {
            return Err(io::Error::new(io::ErrorKind::Other, "Is a directory"));
        }
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "not found"))
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if self.read_only.borrow().contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    // directories exist implicitly as prefixes of file paths
    fn list_directory(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        if self.listing_broken.get() {
            return Err(io::Error::new(io::ErrorKind::Other, "listing failed"));
        }
        let mut entries: Vec<DirEntry> = Vec::new();
        for file in self.files.borrow().keys() {
            let Ok(rest) = file.strip_prefix(path) else {
                continue;
            };
            let Some(first) = rest.components().next() else {
                continue;
            };
            let child = path.join(first);
            let is_dir = child != *file;
            if !entries.iter().any(|e| e.path == child) {
                entries.push(DirEntry {
                    path: child,
                    is_dir,
                });
            }
        }
        Ok(entries)
    }
}
