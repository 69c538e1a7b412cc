//! 会话持久化
//!
//! 整个 `SessionState` 作为一条带版本号的记录读写。写入带去抖：
//! 窗口内的多次保存只保留最后一个快照，最终只写一次。
//! 读取永远不会失败：缺失、损坏或版本不匹配都返回默认值，损坏的记录会被删除。

use std::io;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::kernel::services::ports::{Backend, KeyValueStore};

use super::state::{SessionState, SESSION_VERSION};

#[derive(Debug)]
pub enum PersistError {
    Io(io::Error),
    Malformed(serde_json::Error),
    VersionMismatch { found: u32, expected: u32 },
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "IO error: {}", e),
            PersistError::Malformed(e) => write!(f, "Malformed session record: {}", e),
            PersistError::VersionMismatch { found, expected } => write!(
                f,
                "Session record version {} does not match expected {}",
                found, expected
            ),
        }
    }
}

impl std::error::Error for PersistError {}

impl From<io::Error> for PersistError {
    fn from(e: io::Error) -> Self {
        PersistError::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::Malformed(e)
    }
}

/// 每个变体一条记录
pub fn session_key(backend: Backend) -> String {
    format!("mdpad.{}.session.v{}", backend.name(), SESSION_VERSION)
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

struct PendingWrite {
    snapshot: SessionState,
    deadline: Instant,
}

pub struct PersistenceGateway {
    store: Box<dyn KeyValueStore>,
    key: String,
    debounce: Duration,
    pending: Option<PendingWrite>,
}

impl PersistenceGateway {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>, debounce: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            debounce,
            pending: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// 截止时间从第一次挂起开始计算，持续的编辑不会无限推迟写入
    pub fn save(&mut self, snapshot: SessionState, now: Instant) {
        match self.pending.as_mut() {
            Some(pending) => pending.snapshot = snapshot,
            None => {
                self.pending = Some(PendingWrite {
                    snapshot,
                    deadline: now + self.debounce,
                })
            }
        }
    }

    /// 到期则写入，返回是否执行了写入
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = self.pending.as_ref().is_some_and(|p| p.deadline <= now);
        if !due {
            return false;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        match self.write(&pending.snapshot) {
            Ok(()) => {
                tracing::debug!(key = %self.key, "session persisted");
                true
            }
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "failed to persist session");
                false
            }
        }
    }

    fn write(&mut self, snapshot: &SessionState) -> Result<(), PersistError> {
        let json = serde_json::to_string(snapshot)?;
        self.store.set(&self.key, &json)?;
        Ok(())
    }

    pub fn load(&mut self) -> SessionState {
        match self.try_load() {
            Ok(Some(session)) => session,
            Ok(None) => SessionState::default(),
            Err(PersistError::Io(e)) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read session record");
                SessionState::default()
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding corrupt session record");
                if let Err(e) = self.store.remove(&self.key) {
                    tracing::error!(key = %self.key, error = %e, "failed to remove session record");
                }
                SessionState::default()
            }
        }
    }

    fn try_load(&self) -> Result<Option<SessionState>, PersistError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        let probe: VersionProbe = serde_json::from_str(&raw)?;
        if probe.version != SESSION_VERSION {
            return Err(PersistError::VersionMismatch {
                found: probe.version,
                expected: SESSION_VERSION,
            });
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/persistence.rs"]
mod tests;
