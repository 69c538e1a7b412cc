//! Service ports: traits + data contracts.

pub mod config;
pub mod file;
pub mod prompt;
pub mod render;
pub mod storage;

pub use config::SessionConfig;
pub use file::{
    Backend, DocumentWriter, DownloadSink, FileAccess, FileError, Result as FileResult,
    UploadedFile,
};
pub use prompt::Prompt;
pub use render::{Highlighter, MarkdownRenderer, RenderError};
pub use storage::KeyValueStore;
