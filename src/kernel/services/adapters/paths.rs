//! 应用目录
//!
//! 跨平台的数据 / 配置目录：
//! - macOS: ~/Library/Application Support/mdpad
//! - Linux: $XDG_DATA_HOME/mdpad 或 ~/.local/share/mdpad（配置在 $XDG_CONFIG_HOME/mdpad 或 ~/.config/mdpad）
//! - Windows: %APPDATA%\mdpad

use std::io;
use std::path::PathBuf;

const APP_NAME: &str = "mdpad";
const LOG_DIR: &str = "logs";
const SESSION_FILE: &str = "session.json";

/// 获取应用数据目录
pub fn get_app_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        home_dir().map(|home| home.join("Library/Application Support").join(APP_NAME))
    }

    #[cfg(target_os = "linux")]
    {
        xdg_dir("XDG_DATA_HOME", ".local/share")
    }

    #[cfg(target_os = "windows")]
    {
        appdata_dir()
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

/// 获取配置目录（settings.json 所在位置）
pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        xdg_dir("XDG_CONFIG_HOME", ".config")
    }

    #[cfg(not(target_os = "linux"))]
    {
        get_app_data_dir()
    }
}

#[cfg(any(target_os = "macos", target_os = "linux"))]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(target_os = "linux")]
fn xdg_dir(var: &str, fallback: &str) -> Option<PathBuf> {
    match std::env::var_os(var).filter(|v| !v.is_empty()) {
        Some(xdg) => Some(PathBuf::from(xdg).join(APP_NAME)),
        None => home_dir().map(|home| home.join(fallback).join(APP_NAME)),
    }
}

#[cfg(target_os = "windows")]
fn appdata_dir() -> Option<PathBuf> {
    std::env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(APP_NAME))
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(LOG_DIR))
}

/// 桌面版会话记录文件
pub fn get_session_file_path() -> Option<PathBuf> {
    get_app_data_dir().map(|p| p.join(SESSION_FILE))
}

/// 确保日志目录存在
pub fn ensure_log_dir() -> io::Result<PathBuf> {
    let dir = get_log_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Cannot determine log directory")
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/paths.rs"]
mod tests;
