use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::kernel::services::adapters::file::LocalFileSystem;
use crate::kernel::services::bus::{HostBusSender, HostMessage};
use crate::kernel::services::ports::{Backend, FileAccess, FileError};

/// 桌面版的异步主机：文件操作放到阻塞线程池，完成后通过 host bus 回传
pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    fs: Arc<LocalFileSystem>,
    bus: HostBusSender,
}

fn join_error(e: tokio::task::JoinError) -> FileError {
    FileError::Io(io::Error::new(io::ErrorKind::Other, e.to_string()))
}

impl AsyncRuntime {
    pub fn new(fs: LocalFileSystem, bus: HostBusSender) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self {
            runtime,
            fs: Arc::new(fs),
            bus,
        })
    }

    pub fn tokio_handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }
}

impl FileAccess for AsyncRuntime {
    fn backend(&self) -> Backend {
        Backend::Desktop
    }

    fn scan(&mut self, token: u64, root: PathBuf) {
        let fs = Arc::clone(&self.fs);
        let bus = self.bus.clone();
        self.runtime.spawn(async move {
            let scan_root = root.clone();
            let result = tokio::task::spawn_blocking(move || fs.scan(&scan_root))
                .await
                .map_err(join_error)
                .and_then(|r| r);
            bus.send(HostMessage::ScanFinished {
                token,
                root,
                result,
            });
        });
    }

    fn read(&mut self, token: u64, identity: String) {
        let fs = Arc::clone(&self.fs);
        let bus = self.bus.clone();
        self.runtime.spawn(async move {
            let path = PathBuf::from(&identity);
            let result = tokio::task::spawn_blocking(move || fs.read_file(&path))
                .await
                .map_err(join_error)
                .and_then(|r| r);
            bus.send(HostMessage::FileRead {
                token,
                identity,
                result,
            });
        });
    }

    fn write(&mut self, token: u64, identity: String, content: String) {
        let fs = Arc::clone(&self.fs);
        let bus = self.bus.clone();
        self.runtime.spawn(async move {
            let path = PathBuf::from(&identity);
            let written = content.clone();
            let result = tokio::task::spawn_blocking(move || fs.write_file(&path, &written))
                .await
                .map_err(join_error)
                .and_then(|r| r);
            bus.send(HostMessage::FileWritten {
                token,
                identity,
                content,
                result,
            });
        });
    }

    fn export(&mut self, target: String, html: String) {
        let fs = Arc::clone(&self.fs);
        let bus = self.bus.clone();
        self.runtime.spawn(async move {
            let path = PathBuf::from(&target);
            let result = tokio::task::spawn_blocking(move || fs.write_file(&path, &html))
                .await
                .map_err(join_error)
                .and_then(|r| r);
            bus.send(HostMessage::Exported { target, result });
        });
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/async_runtime.rs"]
mod tests;
