use std::path::PathBuf;

use clap::Parser;

/// Modal terminal text editor with a file tree
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// File to open directly in the editor view
    pub file: Option<PathBuf>,
}
