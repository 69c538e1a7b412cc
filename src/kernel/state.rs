use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::kernel::services::ports::{Backend, SessionConfig};
use crate::models::{
    DocumentIntent, DocumentSession, FileCatalog, RecencyEntry, RecencyStore,
};

use super::scan::ScanCoordinator;
use super::view_mode::{ViewMode, ViewModeController};

/// 持久化记录的 schema 版本
pub const SESSION_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SidebarTab {
    #[default]
    Files,
    Recent,
}

impl SidebarTab {
    pub fn name(&self) -> &'static str {
        match self {
            SidebarTab::Files => "files",
            SidebarTab::Recent => "recent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "files" => Some(SidebarTab::Files),
            "recent" => Some(SidebarTab::Recent),
            _ => None,
        }
    }
}

/// 持久化的会话快照，总是整体读写
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub version: u32,
    pub theme: Theme,
    pub mode: ViewMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_scanned_directory: Option<String>,
    #[serde(default)]
    pub recent_directories: Vec<RecencyEntry>,
    #[serde(default)]
    pub recent_files: Vec<RecencyEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_document_identity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_document_content: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            version: SESSION_VERSION,
            theme: Theme::Light,
            mode: ViewMode::Split,
            last_scanned_directory: None,
            recent_directories: Vec::new(),
            recent_files: Vec::new(),
            current_document_identity: None,
            current_document_content: None,
        }
    }
}

/// 用户确认之后才执行的操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Document(DocumentIntent),
    /// 放弃未保存内容后再弹出目录 / 文件选择
    Open,
    ClearFiles,
}

#[derive(Debug, Clone, Default)]
pub struct ConfirmDialogState {
    pub visible: bool,
    pub message: String,
    pub on_confirm: Option<PendingAction>,
}

/// 读 / 写请求的 token。文档被替换后，晚到的完成事件会被丢弃
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    last_token: u64,
    pub pending_read: Option<u64>,
    pub pending_write: Option<u64>,
    /// `open` 已经确认过放弃未保存内容，随后的自动打开不再询问
    pub open_confirmed: bool,
    /// 由已确认的 `open` 发起的读取
    pub confirmed_read: Option<u64>,
}

impl RequestTracker {
    pub fn next_token(&mut self) -> u64 {
        self.last_token += 1;
        self.last_token
    }
}

pub struct AppState {
    pub backend: Backend,
    pub config: SessionConfig,
    pub document: DocumentSession,
    pub recent_directories: RecencyStore,
    pub recent_files: RecencyStore,
    pub catalog: FileCatalog,
    pub view: ViewModeController,
    pub theme: Theme,
    pub sidebar_tab: SidebarTab,
    pub last_scanned_directory: Option<String>,
    pub scan: ScanCoordinator,
    /// 浏览器版上传文件的内容缓存，key 为文件名
    pub uploads: FxHashMap<String, String>,
    pub confirm_dialog: ConfirmDialogState,
    pub requests: RequestTracker,
    pub last_error: Option<String>,
}

impl AppState {
    pub fn new(backend: Backend, config: SessionConfig) -> Self {
        Self {
            backend,
            document: DocumentSession::new(),
            recent_directories: RecencyStore::with_capacity(config.recent_capacity),
            recent_files: RecencyStore::with_capacity(config.recent_capacity),
            catalog: FileCatalog::new(config.filter_mode),
            view: ViewModeController::default(),
            theme: Theme::default(),
            sidebar_tab: SidebarTab::default(),
            last_scanned_directory: None,
            scan: ScanCoordinator::new(),
            uploads: FxHashMap::default(),
            confirm_dialog: ConfirmDialogState::default(),
            requests: RequestTracker::default(),
            last_error: None,
            config,
        }
    }

    pub fn snapshot(&self) -> SessionState {
        let content = self.document.content();
        SessionState {
            version: SESSION_VERSION,
            theme: self.theme,
            mode: self.view.current(),
            last_scanned_directory: self.last_scanned_directory.clone(),
            recent_directories: self.recent_directories.list().to_vec(),
            recent_files: self.recent_files.list().to_vec(),
            current_document_identity: self.document.identity().map(str::to_string),
            current_document_content: if self.document.is_bound() || !content.is_empty() {
                Some(content.to_string())
            } else {
                None
            },
        }
    }

    pub fn restore(&mut self, session: SessionState) {
        let capacity = self.config.recent_capacity;
        self.theme = session.theme;
        self.view.set(session.mode);
        self.last_scanned_directory = session.last_scanned_directory;
        self.recent_directories = RecencyStore::from_entries(capacity, session.recent_directories);
        self.recent_files = RecencyStore::from_entries(capacity, session.recent_files);
        self.document.restore(
            session.current_document_identity,
            session.current_document_content,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
