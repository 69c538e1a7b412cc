use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ChooseDirectory {
        open_first: bool,
    },
    ChooseFiles,
    ScanDirectory {
        token: u64,
        root: PathBuf,
    },
    ReadFile {
        token: u64,
        identity: String,
    },
    WriteFile {
        token: u64,
        identity: String,
        content: String,
    },
    ShowSaveDialog {
        suggested: String,
    },
    RequestConfirm {
        message: String,
    },
    ReportError(String),
    /// 由宿主渲染后写出 / 下载
    Export {
        target: String,
        title: String,
        markdown: String,
    },
    PersistSession,
}
