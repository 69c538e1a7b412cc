use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::time::Duration;

use super::Workbench;
use crate::kernel::preview::export_html;
use crate::kernel::services::HostMessage;
use crate::kernel::{Action, Effect};

const MAX_HOST_DRAIN_PER_TICK: usize = 256;

impl Workbench {
    pub(super) fn execute_effect(&mut self, effect: Effect, persist: &mut bool) -> Option<Action> {
        match effect {
            Effect::ChooseDirectory { open_first } => {
                let path = self.prompt.choose_directory();
                if path.is_none() {
                    tracing::debug!("directory selection cancelled");
                }
                path.map(|path| Action::DirectoryChosen { path, open_first })
            }
            Effect::ChooseFiles => self.prompt.choose_files().map(Action::FilesSelected),
            Effect::ScanDirectory { token, root } => {
                self.file.scan(token, root);
                None
            }
            Effect::ReadFile { token, identity } => {
                self.file.read(token, identity);
                None
            }
            Effect::WriteFile {
                token,
                identity,
                content,
            } => {
                self.file.write(token, identity, content);
                None
            }
            Effect::ShowSaveDialog { suggested } => {
                let path = self.prompt.save_path(&suggested);
                if path.is_none() {
                    tracing::debug!("save dialog cancelled");
                }
                path.map(Action::SaveAsChosen)
            }
            Effect::RequestConfirm { message } => {
                self.prompt.confirm(&message).map(Action::ConfirmResolved)
            }
            Effect::ReportError(message) => {
                self.prompt.alert(&message);
                None
            }
            Effect::Export {
                target,
                title,
                markdown,
            } => {
                let html = export_html(self.renderer.as_deref(), &title, &markdown);
                self.file.export(target, html);
                None
            }
            Effect::PersistSession => {
                *persist = true;
                None
            }
        }
    }

    /// 处理所有已到达的主机完成事件
    pub fn process_host_messages(&mut self) -> bool {
        let mut changed = false;
        for _ in 0..MAX_HOST_DRAIN_PER_TICK {
            match self.host_rx.try_recv() {
                Ok(msg) => changed |= self.handle_host_message(msg),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::debug!("host bus disconnected");
                    break;
                }
            }
        }
        changed
    }

    /// 阻塞等待下一个主机事件，超时返回 false
    pub fn wait_host_message(&mut self, timeout: Duration) -> bool {
        match self.host_rx.recv_timeout(timeout) {
            Ok(msg) => {
                self.handle_host_message(msg);
                self.process_host_messages();
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    pub fn handle_host_message(&mut self, msg: HostMessage) -> bool {
        self.dispatch(host_message_to_action(msg))
    }
}

fn host_message_to_action(msg: HostMessage) -> Action {
    match msg {
        HostMessage::ScanFinished {
            token,
            root,
            result,
        } => Action::ScanCompleted {
            token,
            root,
            result: result.map_err(|e| e.to_string()),
        },
        HostMessage::FileRead {
            token,
            identity,
            result,
        } => Action::FileRead {
            token,
            identity,
            result: result.map_err(|e| e.to_string()),
        },
        HostMessage::FileWritten {
            token,
            identity,
            content,
            result,
        } => Action::FileWritten {
            token,
            identity,
            content,
            result: result.map_err(|e| e.to_string()),
        },
        HostMessage::Exported { target, result } => Action::Exported {
            target,
            result: result.map_err(|e| e.to_string()),
        },
    }
}
