//! 文件目录：完整的发现集合 + 按查询派生的过滤视图
//!
//! 过滤结果每次都从完整集合重新计算，不在上一次的过滤结果上叠加。

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::SystemTime;

use super::recency::system_time_millis;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub name: String,
    pub directory: String,
    pub size: Option<u64>,
    /// Unix 毫秒
    pub modified_at: Option<i64>,
}

impl FileEntry {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let directory = path
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            path: path.to_string_lossy().to_string(),
            name,
            directory,
            size: None,
            modified_at: None,
        }
    }

    pub fn with_metadata(mut self, size: u64, modified: Option<SystemTime>) -> Self {
        self.size = Some(size);
        self.modified_at = modified.and_then(system_time_millis);
        self
    }

    /// 浏览器上传的文件没有路径，身份就是文件名
    pub fn uploaded(name: &str, size: u64, modified_at: Option<i64>) -> Self {
        Self {
            path: name.to_string(),
            name: name.to_string(),
            directory: String::new(),
            size: Some(size),
            modified_at,
        }
    }

    pub fn key(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Substring,
    Regex,
}

#[derive(Debug, Clone, Default)]
pub struct FileCatalog {
    entries: Vec<FileEntry>,
    mode: FilterMode,
    last_query: String,
}

impl FileCatalog {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            entries: Vec::new(),
            mode,
            last_query: String::new(),
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn set_full_set(&mut self, entries: Vec<FileEntry>) {
        self.entries = entries;
    }

    /// 按 key 合并：已存在的原位替换，新的追加到末尾。返回新增数量
    pub fn upsert(&mut self, entries: Vec<FileEntry>) -> usize {
        let mut added = 0;
        for entry in entries {
            match self.entries.iter_mut().find(|e| e.key() == entry.key()) {
                Some(existing) => *existing = entry,
                None => {
                    self.entries.push(entry);
                    added += 1;
                }
            }
        }
        added
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, key: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.key() == key)
    }

    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    pub fn filter(&mut self, query: &str) -> Vec<FileEntry> {
        self.last_query = query.to_string();
        self.visible()
    }

    /// 用缓存的最后一次查询重新计算视图（例如重新扫描之后）
    pub fn visible(&self) -> Vec<FileEntry> {
        let query = self.last_query.as_str();
        if query.is_empty() {
            return self.entries.clone();
        }

        match self.mode {
            FilterMode::Substring => self.filter_substring(query),
            FilterMode::Regex => {
                match RegexBuilder::new(query).case_insensitive(true).build() {
                    Ok(re) => self
                        .entries
                        .iter()
                        .filter(|e| {
                            re.is_match(&e.name)
                                || re.is_match(&e.directory)
                                || re.is_match(&e.path)
                        })
                        .cloned()
                        .collect(),
                    Err(e) => {
                        tracing::debug!(error = %e, query, "invalid filter regex, using substring");
                        self.filter_substring(query)
                    }
                }
            }
        }
    }

    fn filter_substring(&self, query: &str) -> Vec<FileEntry> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&needle)
                    || e.directory.to_lowercase().contains(&needle)
                    || e.path.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_catalog.rs"]
mod tests;
