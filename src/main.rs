//! mdpad 命令行入口：扫描目录，列出 markdown 文件与最近记录

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use mdpad::app::Workbench;
use mdpad::core::Command;
use mdpad::kernel::services::adapters::{
    get_session_file_path, load_settings, AsyncRuntime, JsonFileStore, LocalFileSystem,
};
use mdpad::kernel::services::host_bus;
use mdpad::kernel::services::ports::{Backend, Prompt};
use mdpad::kernel::Action;
use mdpad::models::format_size;

mod logging;

const SCAN_TIMEOUT: Duration = Duration::from_secs(30);

/// 非交互的 Prompt：目录来自命令行，拒绝任何会丢弃内容的确认
struct HeadlessPrompt {
    directory: Option<PathBuf>,
}

impl Prompt for HeadlessPrompt {
    fn choose_directory(&mut self) -> Option<PathBuf> {
        self.directory.take()
    }

    fn save_path(&mut self, _suggested_name: &str) -> Option<PathBuf> {
        None
    }

    fn confirm(&mut self, message: &str) -> Option<bool> {
        tracing::info!(message, "confirmation declined");
        Some(false)
    }

    fn alert(&mut self, message: &str) {
        eprintln!("mdpad: {}", message);
    }
}

struct CliArgs {
    directory: Option<PathBuf>,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let mut args = CliArgs {
        directory: None,
        filter: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if let Some(value) = arg.strip_prefix("--filter=") {
            args.filter = Some(value.to_string());
        } else if arg == "--filter" {
            args.filter = iter.next();
        } else {
            args.directory = Some(PathBuf::from(arg));
        }
    }
    args
}

fn main() -> io::Result<()> {
    let _logging = logging::init();
    let args = parse_args();

    let config = load_settings();
    let session_path = get_session_file_path()
        .unwrap_or_else(|| std::env::temp_dir().join("mdpad").join("session.json"));
    let (bus, host_rx) = host_bus();
    let runtime = AsyncRuntime::new(LocalFileSystem::from_config(&config), bus)?;

    let scan_requested = args.directory.is_some();
    let mut workbench = Workbench::builder(Backend::Desktop)
        .config(config)
        .file_access(Box::new(runtime))
        .prompt(Box::new(HeadlessPrompt {
            directory: args.directory,
        }))
        .storage(Box::new(JsonFileStore::new(session_path)))
        .host_bus(host_rx)
        .build()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    if scan_requested {
        workbench.dispatch(Action::RunCommand(Command::Scan));
    } else {
        workbench.rescan_last_directory();
    }

    let deadline = Instant::now() + SCAN_TIMEOUT;
    while workbench.state().scan.is_scanning() && Instant::now() < deadline {
        workbench.wait_host_message(Duration::from_millis(100));
    }

    if let Some(query) = args.filter {
        workbench.dispatch(Action::SetFilter(query));
    }

    let files = workbench.visible_files();
    if let Some(dir) = workbench.state().last_scanned_directory.as_deref() {
        println!("{} ({} files)", dir, files.len());
    }
    for entry in &files {
        let size = entry.size.map(|s| format_size(s as usize)).unwrap_or_default();
        println!("  {:<60} {:>10}", entry.path, size);
    }

    if !workbench.recent_directories().is_empty() {
        println!("\nRecent directories:");
        for entry in workbench.recent_directories() {
            println!("  {}", entry.key);
        }
    }
    if !workbench.recent_files().is_empty() {
        println!("\nRecent files:");
        for entry in workbench.recent_files() {
            println!("  {}", entry.key);
        }
    }

    workbench.shutdown();
    Ok(())
}
