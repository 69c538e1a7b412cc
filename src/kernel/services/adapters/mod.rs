//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod file;
pub mod paths;
#[cfg(feature = "desktop")]
pub mod runtime;
pub mod settings;
pub mod storage;

pub use file::BrowserFileAccess;
#[cfg(feature = "desktop")]
pub use file::LocalFileSystem;
pub use paths::{
    ensure_log_dir, get_app_data_dir, get_config_dir, get_log_dir, get_session_file_path,
};
#[cfg(feature = "desktop")]
pub use runtime::AsyncRuntime;
pub use settings::{
    ensure_settings_file, ensure_settings_file_at, get_settings_path, load_settings,
    load_settings_from,
};
pub use storage::{JsonFileStore, MemoryStore};
