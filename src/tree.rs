use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use crate::{
    error::{EditorError, Result},
    fs::Filesystem,
    log,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub path: PathBuf,
    pub depth: usize,
    pub is_dir: bool,
    pub expanded: bool,
}

impl TreeItem {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// What choosing the selected tree row means for the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    File(PathBuf),
    Directory(PathBuf),
}

/// Flattened view of the directory tree under `root`, with expand state and a
/// selected row.
#[derive(Debug)]
pub struct FileTree {
    root: PathBuf,
    expanded: HashSet<PathBuf>,
    items: Vec<TreeItem>,
    selected: usize,
    pub visible: bool,
}

impl FileTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            expanded: HashSet::new(),
            items: Vec::new(),
            selected: 0,
            visible: true,
        }
    }

    pub fn items(&self) -> &[TreeItem] {
        &self.items
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&TreeItem> {
        self.items.get(self.selected)
    }

    /// Re-reads the listing, keeping the selection inside the new item list
    pub fn refresh(&mut self, fs: &dyn Filesystem) -> Result<()> {
        let mut items = Vec::new();
        self.collect(fs, &self.root, 0, &mut items)
            .map_err(|err| EditorError::io(&self.root, err))?;
        self.items = items;
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
        Ok(())
    }

    fn collect(
        &self,
        fs: &dyn Filesystem,
        dir: &Path,
        depth: usize,
        items: &mut Vec<TreeItem>,
    ) -> std::io::Result<()> {
        let mut entries = fs.list_directory(dir)?;
        entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.path.cmp(&b.path)));

        for entry in entries {
            let expanded = entry.is_dir && self.expanded.contains(&entry.path);
            items.push(TreeItem {
                path: entry.path.clone(),
                depth,
                is_dir: entry.is_dir,
                expanded,
            });
            if expanded {
                if let Err(err) = self.collect(fs, &entry.path, depth + 1, items) {
                    log!("WARN: cannot list {}: {err}", entry.path.display());
                }
            }
        }
        Ok(())
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1).min(self.items.len().saturating_sub(1));
    }

    /// Chooses the selected row. Directories flip their expand state.
    pub fn select(&mut self) -> Option<Selection> {
        let item = self.selected()?;
        let path = item.path.clone();
        if !item.is_dir {
            return Some(Selection::File(path));
        }

        self.toggle_expanded(&path);
        Some(Selection::Directory(path))
    }

    pub fn toggle_expanded(&mut self, path: &Path) {
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_path_buf());
        }
    }

    pub fn is_expanded(&self, path: &Path) -> bool {
        self.expanded.contains(path)
    }
}
