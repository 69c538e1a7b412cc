use std::path::{Path, PathBuf};

use crate::core::Command;
use crate::kernel::services::ports::{Backend, UploadedFile};
use crate::models::{
    display_name_for, DocumentIntent, FileEntry, Proposal, CONFIRM_LOAD_MESSAGE,
    CONFIRM_NEW_MESSAGE, UNTITLED_FILE_NAME,
};

use super::preview::export_file_name;
use super::state::SessionState;
use super::{Action, AppState, ConfirmDialogState, Effect, PendingAction};

const CONFIRM_CLEAR_FILES_MESSAGE: &str = "Remove all files from the list?";

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    fn changed() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: true,
        }
    }

    fn effect(effect: Effect) -> Self {
        Self {
            effects: vec![effect],
            state_changed: false,
        }
    }

    /// 修改了会持久化的字段
    fn persisted() -> Self {
        Self {
            effects: vec![Effect::PersistSession],
            state_changed: true,
        }
    }

    fn merge(mut self, other: DispatchResult) -> Self {
        self.effects.extend(other.effects);
        self.state_changed |= other.state_changed;
        self
    }
}

pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn restore(&mut self, session: SessionState) {
        self.state.restore(session);
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.snapshot()
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::RunCommand(cmd) => self.dispatch_command(cmd),
            Action::UpdateContent(content) => {
                if content == self.state.document.content() {
                    return DispatchResult::unchanged();
                }
                self.state.document.update_content(content);
                DispatchResult::persisted()
            }
            Action::SetFilter(query) => {
                let changed = query != self.state.catalog.last_query();
                self.state.catalog.filter(&query);
                DispatchResult {
                    effects: Vec::new(),
                    state_changed: changed,
                }
            }
            Action::OpenFile(key) => self.open_file(key),
            Action::OpenRecentFile(key) => self.open_recent_file(key),
            Action::OpenRecentDirectory(dir) => match self.state.backend {
                Backend::Desktop => self.request_scan(PathBuf::from(dir), false),
                Backend::Browser => {
                    self.report_error("Directories are not available in the browser".to_string())
                }
            },
            Action::DirectoryChosen { path, open_first } => self.request_scan(path, open_first),
            Action::ScanCompleted {
                token,
                root,
                result,
            } => self.scan_completed(token, root, result),
            Action::FileRead {
                token,
                identity,
                result,
            } => {
                if self.state.requests.pending_read != Some(token) {
                    tracing::debug!(token, identity = %identity, "stale read result discarded");
                    return DispatchResult::unchanged();
                }
                self.state.requests.pending_read = None;
                let confirmed = self.state.requests.confirmed_read.take() == Some(token);
                match result {
                    Ok(content) => {
                        let intent = DocumentIntent::Load { identity, content };
                        if confirmed {
                            self.commit_document(intent)
                        } else {
                            self.propose(intent)
                        }
                    }
                    Err(e) => self.report_error(format!("Failed to open {}: {}", identity, e)),
                }
            }
            Action::SaveAsChosen(path) => {
                let identity = path.to_string_lossy().to_string();
                if identity.is_empty() {
                    return DispatchResult::unchanged();
                }
                self.request_write(identity)
            }
            Action::FileWritten {
                token,
                identity,
                content,
                result,
            } => self.file_written(token, identity, content, result),
            Action::FilesSelected(files) => self.files_selected(files),
            Action::ConfirmResolved(accepted) => self.confirm_resolved(accepted),
            Action::Exported { target, result } => match result {
                Ok(()) => {
                    tracing::info!(target = %target, "exported html");
                    DispatchResult::unchanged()
                }
                Err(e) => self.report_error(format!("Export failed: {}", e)),
            },
            Action::DismissError => {
                let changed = self.state.last_error.take().is_some();
                DispatchResult {
                    effects: Vec::new(),
                    state_changed: changed,
                }
            }
        }
    }

    fn dispatch_command(&mut self, command: Command) -> DispatchResult {
        // 先确认再产生任何副作用；拒绝时状态保持原样
        if command.is_destructive() && self.state.document.is_dirty() {
            return match command {
                Command::Open => {
                    self.request_confirm(CONFIRM_LOAD_MESSAGE.to_string(), PendingAction::Open)
                }
                _ => self.request_confirm(
                    CONFIRM_NEW_MESSAGE.to_string(),
                    PendingAction::Document(DocumentIntent::New),
                ),
            };
        }

        match command {
            Command::New => self.commit_document(DocumentIntent::New),
            Command::Open => self.open(false),
            Command::Scan => {
                self.state.requests.open_confirmed = false;
                match self.state.backend {
                    Backend::Desktop => {
                        DispatchResult::effect(Effect::ChooseDirectory { open_first: false })
                    }
                    Backend::Browser => DispatchResult::effect(Effect::ChooseFiles),
                }
            }
            Command::Save => match self.state.document.identity().map(str::to_string) {
                Some(identity) => self.request_write(identity),
                None => self.dispatch_command(Command::SaveAs),
            },
            Command::SaveAs => match self.state.backend {
                Backend::Desktop => {
                    let suggested = if self.state.document.is_bound() {
                        self.state.document.display_name()
                    } else {
                        UNTITLED_FILE_NAME.to_string()
                    };
                    DispatchResult::effect(Effect::ShowSaveDialog { suggested })
                }
                // 浏览器没有路径，直接按文件名下载
                Backend::Browser => {
                    let identity = self
                        .state
                        .document
                        .identity()
                        .unwrap_or(UNTITLED_FILE_NAME)
                        .to_string();
                    self.request_write(identity)
                }
            },
            Command::ExportHtml => {
                let document = &self.state.document;
                let mut target = export_file_name(document.identity());
                if self.state.backend == Backend::Desktop && !document.is_bound() {
                    if let Some(dir) = self.state.last_scanned_directory.as_deref() {
                        target = Path::new(dir).join(&target).to_string_lossy().to_string();
                    }
                }
                DispatchResult::effect(Effect::Export {
                    target,
                    title: document.display_name(),
                    markdown: document.content().to_string(),
                })
            }
            Command::ClearFiles => self.request_confirm(
                CONFIRM_CLEAR_FILES_MESSAGE.to_string(),
                PendingAction::ClearFiles,
            ),
            Command::SwitchTab(tab) => {
                if self.state.sidebar_tab == tab {
                    return DispatchResult::unchanged();
                }
                self.state.sidebar_tab = tab;
                DispatchResult::changed()
            }
            Command::ToggleMode => {
                self.state.view.next();
                DispatchResult::persisted()
            }
            Command::SetMode(mode) => {
                if self.state.view.current() == mode {
                    return DispatchResult::unchanged();
                }
                self.state.view.set(mode);
                DispatchResult::persisted()
            }
            Command::ToggleTheme => {
                self.state.theme = self.state.theme.toggled();
                DispatchResult::persisted()
            }
        }
    }

    /// 会丢弃当前文档的操作：干净时直接提交，dirty 时挂起等待确认
    fn propose(&mut self, intent: DocumentIntent) -> DispatchResult {
        match self.state.document.propose(intent) {
            Proposal::Commit(intent) => self.commit_document(intent),
            Proposal::Confirm { message, intent } => {
                self.request_confirm(message, PendingAction::Document(intent))
            }
        }
    }

    fn request_confirm(&mut self, message: String, pending: PendingAction) -> DispatchResult {
        self.state.confirm_dialog = ConfirmDialogState {
            visible: true,
            message: message.clone(),
            on_confirm: Some(pending),
        };
        DispatchResult {
            effects: vec![Effect::RequestConfirm { message }],
            state_changed: true,
        }
    }

    /// `confirmed` 为 true 时，选择完成后自动打开的文件直接替换当前文档
    fn open(&mut self, confirmed: bool) -> DispatchResult {
        self.state.requests.open_confirmed = confirmed;
        let effect = match self.state.backend {
            Backend::Desktop => Effect::ChooseDirectory { open_first: true },
            Backend::Browser => Effect::ChooseFiles,
        };
        DispatchResult {
            effects: vec![effect],
            state_changed: confirmed,
        }
    }

    fn commit_document(&mut self, intent: DocumentIntent) -> DispatchResult {
        if let DocumentIntent::Load { identity, content } = &intent {
            let payload = self.recent_payload(content);
            self.state
                .recent_files
                .touch(identity, &display_name_for(identity), payload);
        }
        self.state.document.commit(intent);
        // 旧文档的写入晚到时不再推进新文档的基线
        self.state.requests.pending_write = None;
        DispatchResult::persisted()
    }

    fn confirm_resolved(&mut self, accepted: bool) -> DispatchResult {
        if !self.state.confirm_dialog.visible {
            return DispatchResult::unchanged();
        }
        let pending = self.state.confirm_dialog.on_confirm.take();
        self.state.confirm_dialog = ConfirmDialogState::default();

        let Some(pending) = pending.filter(|_| accepted) else {
            return DispatchResult::changed();
        };
        match pending {
            PendingAction::Document(intent) => self.commit_document(intent),
            PendingAction::Open => self.open(true),
            PendingAction::ClearFiles => {
                self.state.catalog.clear();
                self.state.uploads.clear();
                DispatchResult::changed()
            }
        }
    }

    fn open_file(&mut self, key: String) -> DispatchResult {
        match self.state.backend {
            Backend::Desktop => self.request_read(key),
            Backend::Browser => match self.state.uploads.get(&key).cloned() {
                Some(content) => self.propose(DocumentIntent::Load {
                    identity: key,
                    content,
                }),
                None => self.report_error(format!("File is no longer available: {}", key)),
            },
        }
    }

    fn open_recent_file(&mut self, key: String) -> DispatchResult {
        match self.state.backend {
            Backend::Desktop => self.request_read(key),
            Backend::Browser => {
                let content = self
                    .state
                    .recent_files
                    .get(&key)
                    .and_then(|entry| entry.payload.clone())
                    .or_else(|| self.state.uploads.get(&key).cloned());
                match content {
                    Some(content) => self.propose(DocumentIntent::Load {
                        identity: key,
                        content,
                    }),
                    None => self.report_error(format!("File is no longer available: {}", key)),
                }
            }
        }
    }

    fn request_read(&mut self, identity: String) -> DispatchResult {
        let token = self.state.requests.next_token();
        self.state.requests.pending_read = Some(token);
        self.state.requests.confirmed_read = None;
        DispatchResult::effect(Effect::ReadFile { token, identity })
    }

    fn request_write(&mut self, identity: String) -> DispatchResult {
        let token = self.state.requests.next_token();
        self.state.requests.pending_write = Some(token);
        DispatchResult::effect(Effect::WriteFile {
            token,
            identity,
            content: self.state.document.content().to_string(),
        })
    }

    fn request_scan(&mut self, root: PathBuf, open_first: bool) -> DispatchResult {
        let token = self.state.scan.request(&root, open_first);
        tracing::debug!(token, root = %root.display(), "scan requested");
        DispatchResult {
            effects: vec![Effect::ScanDirectory { token, root }],
            state_changed: true,
        }
    }

    fn scan_completed(
        &mut self,
        token: u64,
        root: PathBuf,
        result: Result<Vec<FileEntry>, String>,
    ) -> DispatchResult {
        let Some(request) = self.state.scan.complete(token) else {
            tracing::debug!(
                token,
                latest = self.state.scan.latest_token(),
                root = %root.display(),
                "stale scan result discarded"
            );
            return DispatchResult::unchanged();
        };

        let entries = match result {
            Ok(entries) => entries,
            Err(e) => {
                return self.report_error(format!("Failed to scan {}: {}", root.display(), e));
            }
        };

        tracing::info!(token, root = %root.display(), files = entries.len(), "scan applied");
        let root_key = root.to_string_lossy().to_string();
        let first = entries.first().map(|e| e.key().to_string());
        self.state.catalog.set_full_set(entries);
        self.state
            .recent_directories
            .touch(&root_key, &display_name_for(&root_key), None);
        self.state.last_scanned_directory = Some(root_key);

        let result = DispatchResult::persisted();
        if !request.open_first {
            return result;
        }
        let confirmed = std::mem::take(&mut self.state.requests.open_confirmed);
        match first {
            Some(first) => {
                let read = self.request_read(first);
                if confirmed {
                    self.state.requests.confirmed_read = self.state.requests.pending_read;
                }
                result.merge(read)
            }
            None => result.merge(self.report_error(format!(
                "No markdown files found in {}",
                root.display()
            ))),
        }
    }

    fn file_written(
        &mut self,
        token: u64,
        identity: String,
        content: String,
        result: Result<(), String>,
    ) -> DispatchResult {
        if self.state.requests.pending_write != Some(token) {
            tracing::debug!(token, identity = %identity, "stale write result discarded");
            return DispatchResult::unchanged();
        }
        self.state.requests.pending_write = None;

        if let Err(e) = result {
            return self.report_error(format!("Failed to save {}: {}", identity, e));
        }

        let payload = self.recent_payload(&content);
        self.state
            .recent_files
            .touch(&identity, &display_name_for(&identity), payload);
        if self.state.backend == Backend::Browser {
            self.state.uploads.insert(identity.clone(), content.clone());
        }
        self.state.document.commit_save(&identity, content);
        DispatchResult::persisted()
    }

    fn files_selected(&mut self, files: Vec<UploadedFile>) -> DispatchResult {
        let accepted: Vec<_> = files
            .into_iter()
            .filter(|f| self.state.config.is_markdown_name(&f.name))
            .collect();
        if accepted.is_empty() {
            return self.report_error("Please select markdown files (.md, .markdown)".to_string());
        }

        let confirmed = std::mem::take(&mut self.state.requests.open_confirmed);
        let was_empty = self.state.catalog.is_empty();
        let first = accepted
            .first()
            .map(|f| (f.name.clone(), f.content.clone()));
        let entries = accepted
            .into_iter()
            .map(|f| {
                let entry = FileEntry::uploaded(&f.name, f.size, f.modified_at);
                self.state.uploads.insert(f.name, f.content);
                entry
            })
            .collect();
        let added = self.state.catalog.upsert(entries);
        tracing::debug!(added, total = self.state.catalog.len(), "files selected");

        let result = DispatchResult::changed();
        match first.filter(|_| was_empty) {
            Some((identity, content)) => {
                let intent = DocumentIntent::Load { identity, content };
                if confirmed {
                    result.merge(self.commit_document(intent))
                } else {
                    result.merge(self.propose(intent))
                }
            }
            None => result,
        }
    }

    fn recent_payload(&self, content: &str) -> Option<String> {
        match self.state.backend {
            Backend::Browser => Some(content.to_string()),
            Backend::Desktop => None,
        }
    }

    fn report_error(&mut self, message: String) -> DispatchResult {
        tracing::warn!(error = %message, "operation failed");
        self.state.last_error = Some(message.clone());
        DispatchResult {
            effects: vec![Effect::ReportError(message)],
            state_changed: true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
