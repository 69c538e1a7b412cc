//! 命令系统：语义命令定义
//!
//! 命令与快捷键、菜单一一对应，不关心具体由谁触发。

use crate::kernel::{SidebarTab, ViewMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // ==================== 文档 ====================
    New,
    Open,
    Save,
    SaveAs,
    ExportHtml,

    // ==================== 文件列表 ====================
    Scan,
    ClearFiles,
    SwitchTab(SidebarTab),

    // ==================== 视图 ====================
    ToggleMode,
    SetMode(ViewMode),
    ToggleTheme,
}

impl Command {
    pub const ALL: [Command; 14] = [
        Command::New,
        Command::Open,
        Command::Save,
        Command::SaveAs,
        Command::ExportHtml,
        Command::Scan,
        Command::ClearFiles,
        Command::SwitchTab(SidebarTab::Files),
        Command::SwitchTab(SidebarTab::Recent),
        Command::ToggleMode,
        Command::SetMode(ViewMode::Edit),
        Command::SetMode(ViewMode::Split),
        Command::SetMode(ViewMode::Preview),
        Command::ToggleTheme,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::New => "new",
            Command::Open => "open",
            Command::Save => "save",
            Command::SaveAs => "save-as",
            Command::ExportHtml => "export-html",
            Command::Scan => "scan",
            Command::ClearFiles => "clear-files",
            Command::SwitchTab(SidebarTab::Files) => "switch-tab:files",
            Command::SwitchTab(SidebarTab::Recent) => "switch-tab:recent",
            Command::ToggleMode => "toggle-mode",
            Command::SetMode(ViewMode::Edit) => "set-mode:edit",
            Command::SetMode(ViewMode::Split) => "set-mode:split",
            Command::SetMode(ViewMode::Preview) => "set-mode:preview",
            Command::ToggleTheme => "toggle-theme",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }

    /// 会替换当前文档的命令：文档 dirty 时先确认，拒绝则没有任何副作用
    pub fn is_destructive(&self) -> bool {
        matches!(self, Command::New | Command::Open)
    }
}

/// 快捷键：Ctrl/Cmd + 字母
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    pub key: char,
    pub ctrl: bool,
    pub shift: bool,
}

impl Chord {
    pub fn ctrl(key: char) -> Self {
        Self {
            key: key.to_ascii_lowercase(),
            ctrl: true,
            shift: false,
        }
    }

    pub fn ctrl_shift(key: char) -> Self {
        Self {
            key: key.to_ascii_lowercase(),
            ctrl: true,
            shift: true,
        }
    }
}

pub fn command_for_chord(chord: Chord) -> Option<Command> {
    if !chord.ctrl {
        return None;
    }
    let cmd = match (chord.key.to_ascii_lowercase(), chord.shift) {
        ('n', false) => Command::New,
        ('o', false) => Command::Open,
        ('s', false) => Command::Save,
        ('s', true) => Command::SaveAs,
        ('e', false) => Command::ToggleMode,
        _ => return None,
    };
    Some(cmd)
}

#[cfg(test)]
#[path = "../../tests/unit/core/command.rs"]
mod tests;
