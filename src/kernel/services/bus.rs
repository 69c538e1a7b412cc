use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use super::ports::FileError;
use crate::models::FileEntry;

/// 主机请求的完成事件。每个请求都带着发起时的 token，由 kernel 判断是否过期
#[derive(Debug)]
pub enum HostMessage {
    ScanFinished {
        token: u64,
        root: PathBuf,
        result: Result<Vec<FileEntry>, FileError>,
    },
    FileRead {
        token: u64,
        identity: String,
        result: Result<String, FileError>,
    },
    FileWritten {
        token: u64,
        identity: String,
        content: String,
        result: Result<(), FileError>,
    },
    Exported {
        target: String,
        result: Result<(), FileError>,
    },
}

#[derive(Clone)]
pub struct HostBusSender {
    tx: Sender<HostMessage>,
}

pub struct HostBusReceiver {
    rx: Receiver<HostMessage>,
}

pub fn host_bus() -> (HostBusSender, HostBusReceiver) {
    let (tx, rx) = mpsc::channel();
    (HostBusSender { tx }, HostBusReceiver { rx })
}

impl HostBusSender {
    pub fn send(&self, msg: HostMessage) {
        if self.tx.send(msg).is_err() {
            tracing::debug!("host bus receiver dropped");
        }
    }
}

impl HostBusReceiver {
    pub fn try_recv(&mut self) -> Result<HostMessage, TryRecvError> {
        self.rx.try_recv()
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<HostMessage, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}
