//! 当前活动文档
//!
//! 状态机：
//! - Empty: 没有身份，内容为空
//! - Bound: 有身份（路径或文件名）
//!
//! dirty 永远由 `content != baseline` 推导，不单独存储。
//! `new_document` / `load` 会丢弃未保存内容，文档 dirty 时需要先确认。
//!
//! 两套入口共用同一个提交点：
//! - `propose` / `commit` / `commit_save`: kernel 的异步流程，确认和写入结果作为后续事件到达
//! - `new_document` / `load` / `save` / `save_as`: 同步宿主（确认和写入都能立即返回），
//!   写入成功后同样经过 `commit_save`

use std::path::Path;

use crate::kernel::services::ports::{DocumentWriter, FileError};

pub const UNTITLED_NAME: &str = "Untitled";
pub const UNTITLED_FILE_NAME: &str = "untitled.md";

pub const CONFIRM_NEW_MESSAGE: &str =
    "The current document has unsaved changes. Create a new document anyway?";
pub const CONFIRM_LOAD_MESSAGE: &str =
    "The current document has unsaved changes. Open another document anyway?";

#[derive(Debug)]
pub enum DocumentError {
    /// 没有绑定身份，调用方应该走另存为
    Unbound,
    Write(FileError),
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::Unbound => write!(f, "Document has no identity"),
            DocumentError::Write(e) => write!(f, "Save failed: {}", e),
        }
    }
}

impl std::error::Error for DocumentError {}

impl From<FileError> for DocumentError {
    fn from(e: FileError) -> Self {
        DocumentError::Write(e)
    }
}

/// 会丢弃当前内容的操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentIntent {
    New,
    Load { identity: String, content: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposal {
    /// 文档是干净的，可以直接提交
    Commit(DocumentIntent),
    /// 需要用户确认，拒绝时不做任何修改
    Confirm {
        message: String,
        intent: DocumentIntent,
    },
}

/// 确认端口：返回 true 表示同意继续
pub trait ConfirmPort {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> ConfirmPort for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSession {
    identity: Option<String>,
    content: String,
    baseline: String,
}

impl DocumentSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn is_bound(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.content != self.baseline
    }

    /// 身份的文件名部分；未绑定时为 `Untitled`
    pub fn display_name(&self) -> String {
        self.identity
            .as_deref()
            .map(display_name_for)
            .unwrap_or_else(|| UNTITLED_NAME.to_string())
    }

    /// 状态栏标题，dirty 时追加 ` *`
    pub fn status_title(&self) -> String {
        let mut title = self.display_name();
        if self.is_dirty() {
            title.push_str(" *");
        }
        title
    }

    pub fn propose(&self, intent: DocumentIntent) -> Proposal {
        if !self.is_dirty() {
            return Proposal::Commit(intent);
        }
        let message = match intent {
            DocumentIntent::New => CONFIRM_NEW_MESSAGE,
            DocumentIntent::Load { .. } => CONFIRM_LOAD_MESSAGE,
        };
        Proposal::Confirm {
            message: message.to_string(),
            intent,
        }
    }

    pub fn commit(&mut self, intent: DocumentIntent) {
        match intent {
            DocumentIntent::New => {
                self.identity = None;
                self.content.clear();
                self.baseline.clear();
            }
            DocumentIntent::Load { identity, content } => {
                self.identity = Some(identity);
                self.baseline = content.clone();
                self.content = content;
            }
        }
    }

    /// 同步确认版本，返回是否已提交
    pub fn new_document<C: ConfirmPort + ?Sized>(&mut self, confirm: &mut C) -> bool {
        self.gate(DocumentIntent::New, confirm)
    }

    pub fn load<C: ConfirmPort + ?Sized>(
        &mut self,
        identity: &str,
        content: &str,
        confirm: &mut C,
    ) -> bool {
        self.gate(
            DocumentIntent::Load {
                identity: identity.to_string(),
                content: content.to_string(),
            },
            confirm,
        )
    }

    fn gate<C: ConfirmPort + ?Sized>(&mut self, intent: DocumentIntent, confirm: &mut C) -> bool {
        match self.propose(intent) {
            Proposal::Commit(intent) => {
                self.commit(intent);
                true
            }
            Proposal::Confirm { message, intent } => {
                if !confirm.confirm(&message) {
                    return false;
                }
                self.commit(intent);
                true
            }
        }
    }

    pub fn update_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// 恢复会话时使用：未命名但有内容的文档保持 dirty
    pub fn restore(&mut self, identity: Option<String>, content: Option<String>) {
        match identity {
            Some(identity) => self.commit(DocumentIntent::Load {
                identity,
                content: content.unwrap_or_default(),
            }),
            None => {
                self.commit(DocumentIntent::New);
                self.content = content.unwrap_or_default();
            }
        }
    }

    pub fn save<W: DocumentWriter + ?Sized>(&mut self, writer: &mut W) -> Result<(), DocumentError> {
        let identity = self.identity.clone().ok_or(DocumentError::Unbound)?;
        writer.write_document(&identity, &self.content)?;
        self.commit_save(&identity, self.content.clone());
        Ok(())
    }

    /// 另存为：写入成功后才绑定新身份
    pub fn save_as<W: DocumentWriter + ?Sized>(
        &mut self,
        identity: &str,
        writer: &mut W,
    ) -> Result<(), DocumentError> {
        writer.write_document(identity, &self.content)?;
        self.commit_save(identity, self.content.clone());
        Ok(())
    }

    /// 异步写入完成后提交。基线是当时写出的内容，写入期间的新编辑仍然是 dirty
    pub fn commit_save(&mut self, identity: &str, written: String) {
        self.identity = Some(identity.to_string());
        self.baseline = written;
    }
}

pub fn display_name_for(identity: &str) -> String {
    Path::new(identity)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| identity.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/models/document.rs"]
mod tests;
