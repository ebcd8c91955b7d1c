#![allow(dead_code)]

mod editor_harness;
mod memory_fs;

pub use editor_harness::EditorHarness;
pub use memory_fs::MemoryFs;
