//! 浏览器版文件访问
//!
//! 没有真实文件系统：文件内容来自上传缓存，保存和导出都变成按文件名下载。
//! 完成事件同步发回 host bus，和桌面版走同一条处理路径。

use std::path::PathBuf;

use crate::kernel::services::bus::{HostBusSender, HostMessage};
use crate::kernel::services::ports::{Backend, DownloadSink, FileAccess, FileError};
use crate::models::display_name_for;

const MARKDOWN_MIME: &str = "text/markdown";
const HTML_MIME: &str = "text/html";

pub struct BrowserFileAccess {
    sink: Box<dyn DownloadSink>,
    bus: HostBusSender,
}

impl BrowserFileAccess {
    pub fn new(sink: Box<dyn DownloadSink>, bus: HostBusSender) -> Self {
        Self { sink, bus }
    }
}

impl FileAccess for BrowserFileAccess {
    fn backend(&self) -> Backend {
        Backend::Browser
    }

    fn scan(&mut self, token: u64, root: PathBuf) {
        self.bus.send(HostMessage::ScanFinished {
            token,
            root,
            result: Err(FileError::Unsupported("directory scan")),
        });
    }

    fn read(&mut self, token: u64, identity: String) {
        self.bus.send(HostMessage::FileRead {
            token,
            identity,
            result: Err(FileError::Unsupported("file read")),
        });
    }

    fn write(&mut self, token: u64, identity: String, content: String) {
        let file_name = display_name_for(&identity);
        let result = self
            .sink
            .download(&file_name, MARKDOWN_MIME, content.as_bytes());
        self.bus.send(HostMessage::FileWritten {
            token,
            identity: file_name,
            content,
            result,
        });
    }

    fn export(&mut self, target: String, html: String) {
        let file_name = display_name_for(&target);
        let result = self.sink.download(&file_name, HTML_MIME, html.as_bytes());
        self.bus.send(HostMessage::Exported {
            target: file_name,
            result,
        });
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/file/browser.rs"]
mod tests;
