//! 文件访问能力
//!
//! 桌面版（本地文件系统）和浏览器版（上传 / 下载）共用同一套请求式接口，
//! 完成结果通过 host bus 作为后续事件回传。

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, FileError>;

#[derive(Debug)]
pub enum FileError {
    Io(io::Error),
    NotFound(PathBuf),
    NotAFile(PathBuf),
    NotADirectory(PathBuf),
    InvalidPath(String),
    Unsupported(&'static str),
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::Io(e) => write!(f, "IO error: {}", e),
            FileError::NotFound(p) => write!(f, "Not found: {}", p.display()),
            FileError::NotAFile(p) => write!(f, "Not a file: {}", p.display()),
            FileError::NotADirectory(p) => write!(f, "Not a directory: {}", p.display()),
            FileError::InvalidPath(s) => write!(f, "Invalid path: {}", s),
            FileError::Unsupported(op) => write!(f, "Unsupported operation: {}", op),
        }
    }
}

impl std::error::Error for FileError {}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        FileError::Io(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Desktop,
    Browser,
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Desktop => "desktop",
            Backend::Browser => "browser",
        }
    }
}

/// 浏览器文件选择得到的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content: String,
    pub size: u64,
    /// Unix 毫秒
    pub modified_at: Option<i64>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len() as u64,
            content,
            modified_at: None,
        }
    }
}

/// 同步写入文档内容
pub trait DocumentWriter {
    fn write_document(&mut self, identity: &str, content: &str) -> Result<()>;
}

pub trait FileAccess: Send {
    fn backend(&self) -> Backend;

    /// 递归扫描 markdown 文件，结果带上请求的 token
    fn scan(&mut self, token: u64, root: PathBuf);

    fn read(&mut self, token: u64, identity: String);

    fn write(&mut self, token: u64, identity: String, content: String);

    /// 导出 HTML；桌面版写到 target，浏览器版按文件名下载
    fn export(&mut self, target: String, html: String);
}

/// 浏览器端字节下载
pub trait DownloadSink: Send {
    fn download(&mut self, file_name: &str, mime: &str, bytes: &[u8]) -> Result<()>;
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/file.rs"]
mod tests;
