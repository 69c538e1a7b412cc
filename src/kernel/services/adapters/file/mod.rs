//! 文件访问适配器
//!
//! - `local`: 桌面版本地文件系统
//! - `browser`: 浏览器版上传 / 下载

pub mod browser;
#[cfg(feature = "desktop")]
pub mod local;

pub use browser::BrowserFileAccess;
#[cfg(feature = "desktop")]
pub use local::LocalFileSystem;
