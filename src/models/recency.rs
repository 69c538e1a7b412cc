//! 最近使用（MRU）列表
//!
//! - 按 key 去重
//! - 头部为最近一次 touch 的条目
//! - 长度不超过构造时给定的容量

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_RECENT_CAPACITY: usize = 10;

/// 当前时间（Unix 毫秒）
pub fn now_millis() -> i64 {
    system_time_millis(SystemTime::now()).unwrap_or(0)
}

pub fn system_time_millis(time: SystemTime) -> Option<i64> {
    time.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_millis()).ok())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecencyEntry {
    pub key: String,
    pub display_name: String,
    pub timestamp: i64,
    /// 浏览器版本没有真实文件系统，用它携带文件内容
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RecencyStore {
    entries: Vec<RecencyEntry>,
    capacity: usize,
}

impl RecencyStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RECENT_CAPACITY)
    }

    /// 容量为 0 时按 1 处理，否则 touch 之后条目会立刻被截掉
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// 从持久化的条目恢复。重复 key 只保留第一次出现（即最近的一条）
    pub fn from_entries(capacity: usize, entries: Vec<RecencyEntry>) -> Self {
        let mut store = Self::with_capacity(capacity);
        for entry in entries {
            if entry.key.is_empty() || store.contains(&entry.key) {
                continue;
            }
            if store.entries.len() == store.capacity {
                break;
            }
            store.entries.push(entry);
        }
        store
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&RecencyEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn touch(&mut self, key: &str, display_name: &str, payload: Option<String>) {
        self.touch_at(key, display_name, payload, now_millis());
    }

    /// touch = 移除旧条目 -> 插入头部 -> 截断尾部
    pub fn touch_at(
        &mut self,
        key: &str,
        display_name: &str,
        payload: Option<String>,
        timestamp: i64,
    ) {
        if key.is_empty() {
            return;
        }

        self.entries.retain(|e| e.key != key);
        self.entries.insert(
            0,
            RecencyEntry {
                key: key.to_string(),
                display_name: display_name.to_string(),
                timestamp,
                payload,
            },
        );
        self.entries.truncate(self.capacity);
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.retain(|e| e.key != key);
    }

    pub fn list(&self) -> &[RecencyEntry] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }
}

impl Default for RecencyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/recency.rs"]
mod tests;
