use std::path::PathBuf;

use crate::core::Command;
use crate::kernel::services::ports::UploadedFile;
use crate::models::FileEntry;

#[derive(Debug, Clone)]
pub enum Action {
    RunCommand(Command),
    UpdateContent(String),
    SetFilter(String),
    /// 打开文件列表中的一项（桌面版为路径，浏览器版为文件名）
    OpenFile(String),
    OpenRecentFile(String),
    OpenRecentDirectory(String),
    DirectoryChosen {
        path: PathBuf,
        open_first: bool,
    },
    ScanCompleted {
        token: u64,
        root: PathBuf,
        result: Result<Vec<FileEntry>, String>,
    },
    FileRead {
        token: u64,
        identity: String,
        result: Result<String, String>,
    },
    SaveAsChosen(PathBuf),
    FileWritten {
        token: u64,
        identity: String,
        content: String,
        result: Result<(), String>,
    },
    FilesSelected(Vec<UploadedFile>),
    ConfirmResolved(bool),
    Exported {
        target: String,
        result: Result<(), String>,
    },
    DismissError,
}
