use std::path::PathBuf;

use super::file::UploadedFile;

/// 用户交互端口：对话框、确认、错误提示
///
/// 对话框返回 `None` 表示用户取消。
pub trait Prompt: Send {
    fn choose_directory(&mut self) -> Option<PathBuf>;

    fn save_path(&mut self, suggested_name: &str) -> Option<PathBuf>;

    /// 浏览器版的文件选择。`None` 表示取消，或者稍后通过 `FilesSelected` 送达
    fn choose_files(&mut self) -> Option<Vec<UploadedFile>> {
        None
    }

    /// `None` 表示稍后由 UI 通过 `Workbench::resolve_confirm` 给出答复
    fn confirm(&mut self, message: &str) -> Option<bool>;

    fn alert(&mut self, message: &str);
}
