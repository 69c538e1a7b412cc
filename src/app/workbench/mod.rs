//! 工作台：会话的唯一控制器
//!
//! 职责：
//! - 构造时一次性绑定全部协作者，缺失即失败
//! - 把 kernel 产生的 Effect 交给 Prompt / FileAccess 执行
//! - 把 host bus 上的完成事件转换为 Action
//! - 驱动自动保存与会话持久化的去抖

use std::collections::VecDeque;
use std::time::Instant;

use crate::kernel::preview::render_preview;
use crate::kernel::services::ports::{
    Backend, FileAccess, KeyValueStore, MarkdownRenderer, Prompt, SessionConfig,
};
use crate::kernel::services::HostBusReceiver;
use crate::kernel::{
    session_key, Action, AppState, PersistenceGateway, SidebarTab, Store, ViewMode,
};
use crate::models::{DocumentStats, FileEntry, RecencyEntry};

mod bridge;
mod tick;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    MissingFileAccess,
    MissingPrompt,
    MissingStorage,
    MissingHostBus,
    BackendMismatch { expected: Backend, found: Backend },
}

impl std::fmt::Display for BindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindError::MissingFileAccess => write!(f, "No file access collaborator bound"),
            BindError::MissingPrompt => write!(f, "No prompt collaborator bound"),
            BindError::MissingStorage => write!(f, "No session storage bound"),
            BindError::MissingHostBus => write!(f, "No host bus receiver bound"),
            BindError::BackendMismatch { expected, found } => write!(
                f,
                "File access backend {} does not match workbench backend {}",
                found.name(),
                expected.name()
            ),
        }
    }
}

impl std::error::Error for BindError {}

pub struct WorkbenchBuilder {
    backend: Backend,
    config: SessionConfig,
    file: Option<Box<dyn FileAccess>>,
    prompt: Option<Box<dyn Prompt>>,
    storage: Option<Box<dyn KeyValueStore>>,
    renderer: Option<Box<dyn MarkdownRenderer>>,
    host_rx: Option<HostBusReceiver>,
}

impl WorkbenchBuilder {
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn file_access(mut self, file: Box<dyn FileAccess>) -> Self {
        self.file = Some(file);
        self
    }

    pub fn prompt(mut self, prompt: Box<dyn Prompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn storage(mut self, storage: Box<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// 可选；未绑定时预览和导出使用转义后的原文
    pub fn renderer(mut self, renderer: Box<dyn MarkdownRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn host_bus(mut self, rx: HostBusReceiver) -> Self {
        self.host_rx = Some(rx);
        self
    }

    /// 校验协作者并恢复上一次会话
    pub fn build(self) -> Result<Workbench, BindError> {
        let file = self.file.ok_or(BindError::MissingFileAccess)?;
        let prompt = self.prompt.ok_or(BindError::MissingPrompt)?;
        let storage = self.storage.ok_or(BindError::MissingStorage)?;
        let host_rx = self.host_rx.ok_or(BindError::MissingHostBus)?;
        if file.backend() != self.backend {
            return Err(BindError::BackendMismatch {
                expected: self.backend,
                found: file.backend(),
            });
        }

        let mut gateway = PersistenceGateway::new(
            storage,
            session_key(self.backend),
            self.config.persist_debounce(),
        );
        let session = gateway.load();
        let mut store = Store::new(AppState::new(self.backend, self.config));
        store.restore(session);

        let state = store.state();
        tracing::info!(
            backend = self.backend.name(),
            recent_files = state.recent_files.len(),
            recent_directories = state.recent_directories.len(),
            document = ?state.document.identity(),
            "session restored"
        );

        Ok(Workbench {
            store,
            file,
            prompt,
            renderer: self.renderer,
            gateway,
            host_rx,
            last_autosave: Instant::now(),
        })
    }
}

pub struct Workbench {
    store: Store,
    file: Box<dyn FileAccess>,
    prompt: Box<dyn Prompt>,
    renderer: Option<Box<dyn MarkdownRenderer>>,
    gateway: PersistenceGateway,
    host_rx: HostBusReceiver,
    last_autosave: Instant,
}

impl Workbench {
    pub fn builder(backend: Backend) -> WorkbenchBuilder {
        WorkbenchBuilder {
            backend,
            config: SessionConfig::default(),
            file: None,
            prompt: None,
            storage: None,
            renderer: None,
            host_rx: None,
        }
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    /// 分发一个 Action，并执行它产生的全部 Effect。返回状态是否变化
    pub fn dispatch(&mut self, action: Action) -> bool {
        let mut queue = VecDeque::from([action]);
        let mut changed = false;
        let mut persist = false;

        while let Some(action) = queue.pop_front() {
            let result = self.store.dispatch(action);
            changed |= result.state_changed;
            for effect in result.effects {
                if let Some(next) = self.execute_effect(effect, &mut persist) {
                    queue.push_back(next);
                }
            }
        }

        if persist {
            self.gateway.save(self.store.snapshot(), Instant::now());
        }
        changed
    }

    /// UI 对挂起确认的答复
    pub fn resolve_confirm(&mut self, accepted: bool) -> bool {
        self.dispatch(Action::ConfirmResolved(accepted))
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.state().document.is_dirty()
    }

    pub fn status_title(&self) -> String {
        self.state().document.status_title()
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats::of(self.state().document.content())
    }

    pub fn preview_html(&self) -> String {
        render_preview(self.renderer.as_deref(), self.state().document.content())
    }

    pub fn mode(&self) -> ViewMode {
        self.state().view.current()
    }

    pub fn sidebar_tab(&self) -> SidebarTab {
        self.state().sidebar_tab
    }

    pub fn visible_files(&self) -> Vec<FileEntry> {
        self.state().catalog.visible()
    }

    pub fn recent_files(&self) -> &[RecencyEntry] {
        self.state().recent_files.list()
    }

    pub fn recent_directories(&self) -> &[RecencyEntry] {
        self.state().recent_directories.list()
    }

    /// 桌面版启动后重新扫描上次的目录
    pub fn rescan_last_directory(&mut self) -> bool {
        if self.state().backend != Backend::Desktop {
            return false;
        }
        match self.state().last_scanned_directory.clone() {
            Some(dir) => self.dispatch(Action::OpenRecentDirectory(dir)),
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/app/workbench.rs"]
mod tests;
