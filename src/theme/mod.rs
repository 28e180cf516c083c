//! # Theme Module
//!
//! Dark mode preference: read from storage or the OS signal at startup,
//! toggled at runtime, written back on every change.

pub mod storage;
pub mod store;


pub use storage::{FileStorage, MemoryStorage, PreferenceStorage, StorageError};
pub use store::{ThemeStore, THEME_KEY};
