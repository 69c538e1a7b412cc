//! 数据模型层

pub mod document;
pub mod file_catalog;
pub mod recency;
pub mod stats;

pub use document::{
    display_name_for, ConfirmPort, DocumentError, DocumentIntent, DocumentSession, Proposal,
    CONFIRM_LOAD_MESSAGE, CONFIRM_NEW_MESSAGE, UNTITLED_FILE_NAME, UNTITLED_NAME,
};
pub use file_catalog::{FileCatalog, FileEntry, FilterMode};
pub use recency::{now_millis, RecencyEntry, RecencyStore, DEFAULT_RECENT_CAPACITY};
pub use stats::{cursor_position, format_size, DocumentStats};
