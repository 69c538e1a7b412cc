//! 本地文件系统
//!
//! 递归扫描 markdown 文件（遵守 .gitignore，跳过隐藏文件），读写文档内容。

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::kernel::services::ports::file::{DocumentWriter, FileError, Result};
use crate::kernel::services::ports::SessionConfig;
use crate::models::FileEntry;

#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    extensions: Vec<String>,
}

impl LocalFileSystem {
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.markdown_extensions.clone())
    }

    fn is_markdown(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// 结果按路径排序，顺序稳定
    pub fn scan(&self, root: &Path) -> Result<Vec<FileEntry>> {
        if !root.exists() {
            return Err(FileError::NotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(FileError::NotADirectory(root.to_path_buf()));
        }

        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_exclude(true)
            .build();

        let mut entries = Vec::new();
        for item in walker {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    tracing::debug!(root = %root.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !item.file_type().is_some_and(|t| t.is_file()) || !self.is_markdown(item.path()) {
                continue;
            }
            let entry = FileEntry::from_path(item.path());
            let entry = match item.metadata() {
                Ok(meta) => entry.with_metadata(meta.len(), meta.modified().ok()),
                Err(_) => entry,
            };
            entries.push(entry);
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    pub fn read_file(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(FileError::NotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        Ok(fs::read_to_string(path)?)
    }

    pub fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(FileError::InvalidPath(String::new()));
        }
        if path.is_dir() {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(fs::write(path, content)?)
    }
}

impl DocumentWriter for LocalFileSystem {
    fn write_document(&mut self, identity: &str, content: &str) -> Result<()> {
        self.write_file(&PathBuf::from(identity), content)
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/file/local.rs"]
mod tests;
