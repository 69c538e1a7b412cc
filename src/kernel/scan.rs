//! 目录扫描协调
//!
//! 每次请求分配一个单调递增的 token，只有最新 token 的结果会被应用。
//! 慢的旧扫描晚到时直接丢弃，不会覆盖新扫描已经写入的目录。

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub token: u64,
    pub root: PathBuf,
    /// 扫描完成后自动打开第一个文件（桌面版的“打开”流程）
    pub open_first: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ScanCoordinator {
    last_token: u64,
    current: Option<ScanRequest>,
}

impl ScanCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, root: &Path, open_first: bool) -> u64 {
        self.last_token += 1;
        self.current = Some(ScanRequest {
            token: self.last_token,
            root: root.to_path_buf(),
            open_first,
        });
        self.last_token
    }

    pub fn latest_token(&self) -> u64 {
        self.last_token
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.current.as_ref().is_some_and(|r| r.token == token)
    }

    pub fn is_scanning(&self) -> bool {
        self.current.is_some()
    }

    /// 完成一个请求：是最新请求则返回它，否则返回 None（过期结果）
    pub fn complete(&mut self, token: u64) -> Option<ScanRequest> {
        if !self.is_current(token) {
            return None;
        }
        self.current.take()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/scan.rs"]
mod tests;
