use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// The editor's only access to the disk.
pub trait Filesystem {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    fn list_directory(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
}

/// Filesystem backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn list_directory(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            entries.push(DirEntry {
                is_dir: path.is_dir(),
                path,
            });
        }
        Ok(entries)
    }
}
