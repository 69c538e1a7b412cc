use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::{FilterMode, DEFAULT_RECENT_CAPACITY};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 最近目录 / 最近文件列表的容量
    #[serde(alias = "recentCapacity")]
    pub recent_capacity: usize,
    /// 自动保存会话快照的间隔；文档干净时跳过
    #[serde(alias = "autosaveIntervalMs")]
    pub autosave_interval_ms: u64,
    /// 会话写入的合并窗口
    #[serde(alias = "persistDebounceMs")]
    pub persist_debounce_ms: u64,
    #[serde(alias = "filterMode")]
    pub filter_mode: FilterMode,
    #[serde(alias = "markdownExtensions")]
    pub markdown_extensions: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            recent_capacity: DEFAULT_RECENT_CAPACITY,
            autosave_interval_ms: 30_000,
            persist_debounce_ms: 500,
            filter_mode: FilterMode::Substring,
            markdown_extensions: vec!["md".to_string(), "markdown".to_string()],
        }
    }
}

impl SessionConfig {
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_millis(self.autosave_interval_ms)
    }

    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }

    /// 扩展名比较不区分大小写
    pub fn is_markdown_name(&self, name: &str) -> bool {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return false;
        };
        self.markdown_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/config.rs"]
mod tests;
