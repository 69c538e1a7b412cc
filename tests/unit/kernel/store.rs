use super::*;
use crate::kernel::services::ports::SessionConfig;
use crate::kernel::state::Theme;
use crate::kernel::{SidebarTab, ViewMode};

fn desktop_store() -> Store {
    Store::new(AppState::new(Backend::Desktop, SessionConfig::default()))
}

fn browser_store() -> Store {
    Store::new(AppState::new(Backend::Browser, SessionConfig::default()))
}

fn entries(paths: &[&str]) -> Vec<FileEntry> {
    paths
        .iter()
        .map(|p| FileEntry::from_path(Path::new(p)))
        .collect()
}

fn read_token(result: &DispatchResult) -> u64 {
    result
        .effects
        .iter()
        .find_map(|e| match e {
            Effect::ReadFile { token, .. } => Some(*token),
            _ => None,
        })
        .unwrap()
}

fn write_effect(result: &DispatchResult) -> (u64, String, String) {
    result
        .effects
        .iter()
        .find_map(|e| match e {
            Effect::WriteFile {
                token,
                identity,
                content,
            } => Some((*token, identity.clone(), content.clone())),
            _ => None,
        })
        .unwrap()
}

/// 桌面版：扫描 -> 打开一个文件
fn open_desktop_file(store: &mut Store, path: &str, content: &str) {
    let result = store.dispatch(Action::OpenFile(path.to_string()));
    let token = read_token(&result);
    store.dispatch(Action::FileRead {
        token,
        identity: path.to_string(),
        result: Ok(content.to_string()),
    });
}

#[test]
fn test_stale_scan_does_not_clobber_newer_result() {
    let mut store = desktop_store();
    store.dispatch(Action::DirectoryChosen {
        path: PathBuf::from("/x"),
        open_first: false,
    });
    store.dispatch(Action::DirectoryChosen {
        path: PathBuf::from("/y"),
        open_first: false,
    });

    let applied = store.dispatch(Action::ScanCompleted {
        token: 2,
        root: PathBuf::from("/y"),
        result: Ok(entries(&["/y/new.md"])),
    });
    assert!(applied.state_changed);
    assert!(applied.effects.contains(&Effect::PersistSession));

    let stale = store.dispatch(Action::ScanCompleted {
        token: 1,
        root: PathBuf::from("/x"),
        result: Ok(entries(&["/x/old.md"])),
    });
    assert!(!stale.state_changed);
    assert!(stale.effects.is_empty());

    let state = store.state();
    assert_eq!(state.catalog.entries()[0].path, "/y/new.md");
    assert_eq!(state.last_scanned_directory.as_deref(), Some("/y"));
    let dirs: Vec<_> = state.recent_directories.keys().collect();
    assert_eq!(dirs, vec!["/y"]);
}

#[test]
fn test_open_command_scans_and_opens_first_file() {
    let mut store = desktop_store();
    let result = store.dispatch(Action::RunCommand(Command::Open));
    assert_eq!(result.effects, vec![Effect::ChooseDirectory { open_first: true }]);

    let result = store.dispatch(Action::DirectoryChosen {
        path: PathBuf::from("/docs"),
        open_first: true,
    });
    let token = match &result.effects[..] {
        [Effect::ScanDirectory { token, root }] => {
            assert_eq!(root, &PathBuf::from("/docs"));
            *token
        }
        other => panic!("unexpected effects: {:?}", other),
    };

    let result = store.dispatch(Action::ScanCompleted {
        token,
        root: PathBuf::from("/docs"),
        result: Ok(entries(&["/docs/a.md", "/docs/b.md"])),
    });
    assert!(result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::ReadFile { identity, .. } if identity == "/docs/a.md")));

    let token = read_token(&result);
    store.dispatch(Action::FileRead {
        token,
        identity: "/docs/a.md".to_string(),
        result: Ok("# A".to_string()),
    });
    let doc = &store.state().document;
    assert_eq!(doc.identity(), Some("/docs/a.md"));
    assert_eq!(doc.content(), "# A");
    assert!(!doc.is_dirty());
    assert_eq!(store.state().recent_files.list()[0].key, "/docs/a.md");
}

fn scan_and_read_first(store: &mut Store, root: &str, files: &[&str]) -> DispatchResult {
    let result = store.dispatch(Action::DirectoryChosen {
        path: PathBuf::from(root),
        open_first: true,
    });
    let token = match &result.effects[..] {
        [Effect::ScanDirectory { token, .. }] => *token,
        other => panic!("unexpected effects: {:?}", other),
    };
    let result = store.dispatch(Action::ScanCompleted {
        token,
        root: PathBuf::from(root),
        result: Ok(entries(files)),
    });
    let token = read_token(&result);
    store.dispatch(Action::FileRead {
        token,
        identity: files[0].to_string(),
        result: Ok("new".to_string()),
    })
}

#[test]
fn test_declined_open_on_dirty_document_has_no_side_effects() {
    let mut store = desktop_store();
    open_desktop_file(&mut store, "/old/a.md", "saved");
    store.dispatch(Action::UpdateContent("draft".to_string()));
    let before = store.snapshot();

    let result = store.dispatch(Action::RunCommand(Command::Open));
    assert!(matches!(&result.effects[..], [Effect::RequestConfirm { .. }]));
    assert_eq!(
        store.state().confirm_dialog.on_confirm,
        Some(PendingAction::Open)
    );

    let result = store.dispatch(Action::ConfirmResolved(false));
    assert!(result.effects.is_empty());
    assert_eq!(store.snapshot(), before);
    assert!(store.state().catalog.is_empty());
    assert!(store.state().last_scanned_directory.is_none());
    assert_eq!(store.state().document.content(), "draft");
}

#[test]
fn test_accepted_open_replaces_dirty_document_without_asking_again() {
    let mut store = desktop_store();
    open_desktop_file(&mut store, "/old/a.md", "saved");
    store.dispatch(Action::UpdateContent("draft".to_string()));

    store.dispatch(Action::RunCommand(Command::Open));
    let result = store.dispatch(Action::ConfirmResolved(true));
    assert_eq!(result.effects, vec![Effect::ChooseDirectory { open_first: true }]);
    assert_eq!(store.state().document.content(), "draft");

    let result = scan_and_read_first(&mut store, "/new", &["/new/x.md"]);
    assert!(!result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::RequestConfirm { .. })));
    let doc = &store.state().document;
    assert_eq!(doc.identity(), Some("/new/x.md"));
    assert!(!doc.is_dirty());

    // 确认只对这一次打开有效
    store.dispatch(Action::UpdateContent("edited again".to_string()));
    let result = store.dispatch(Action::OpenFile("/new/y.md".to_string()));
    let token = read_token(&result);
    let result = store.dispatch(Action::FileRead {
        token,
        identity: "/new/y.md".to_string(),
        result: Ok("why".to_string()),
    });
    assert!(matches!(&result.effects[..], [Effect::RequestConfirm { .. }]));
}

#[test]
fn test_clean_open_still_gates_a_document_edited_during_scan() {
    let mut store = desktop_store();
    open_desktop_file(&mut store, "/old/a.md", "saved");

    let result = store.dispatch(Action::RunCommand(Command::Open));
    assert_eq!(result.effects, vec![Effect::ChooseDirectory { open_first: true }]);
    store.dispatch(Action::UpdateContent("typed meanwhile".to_string()));

    let result = scan_and_read_first(&mut store, "/new", &["/new/x.md"]);
    assert!(matches!(&result.effects[..], [Effect::RequestConfirm { .. }]));
    assert_eq!(store.state().document.content(), "typed meanwhile");
}

#[test]
fn test_open_first_on_empty_directory_reports() {
    let mut store = desktop_store();
    store.dispatch(Action::DirectoryChosen {
        path: PathBuf::from("/empty"),
        open_first: true,
    });
    let result = store.dispatch(Action::ScanCompleted {
        token: 1,
        root: PathBuf::from("/empty"),
        result: Ok(Vec::new()),
    });
    assert!(result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::ReportError(_))));
    assert_eq!(store.state().last_scanned_directory.as_deref(), Some("/empty"));
}

#[test]
fn test_scan_failure_is_surfaced_once_and_keeps_catalog() {
    let mut store = desktop_store();
    store.dispatch(Action::DirectoryChosen {
        path: PathBuf::from("/a"),
        open_first: false,
    });
    store.dispatch(Action::ScanCompleted {
        token: 1,
        root: PathBuf::from("/a"),
        result: Ok(entries(&["/a/x.md"])),
    });

    store.dispatch(Action::DirectoryChosen {
        path: PathBuf::from("/gone"),
        open_first: false,
    });
    let result = store.dispatch(Action::ScanCompleted {
        token: 2,
        root: PathBuf::from("/gone"),
        result: Err("Not found: /gone".to_string()),
    });
    let errors = result
        .effects
        .iter()
        .filter(|e| matches!(e, Effect::ReportError(_)))
        .count();
    assert_eq!(errors, 1);
    assert!(!result.effects.contains(&Effect::PersistSession));
    assert_eq!(store.state().catalog.len(), 1);
    assert_eq!(store.state().last_scanned_directory.as_deref(), Some("/a"));
    assert!(store.state().last_error.is_some());

    store.dispatch(Action::DismissError);
    assert!(store.state().last_error.is_none());
}

#[test]
fn test_save_success_advances_baseline() {
    let mut store = desktop_store();
    open_desktop_file(&mut store, "/d/a.md", "X");
    store.dispatch(Action::UpdateContent("XY".to_string()));
    assert!(store.state().document.is_dirty());

    let result = store.dispatch(Action::RunCommand(Command::Save));
    let (token, identity, content) = write_effect(&result);
    assert_eq!(identity, "/d/a.md");
    assert_eq!(content, "XY");

    let result = store.dispatch(Action::FileWritten {
        token,
        identity,
        content,
        result: Ok(()),
    });
    assert!(result.effects.contains(&Effect::PersistSession));
    assert!(!store.state().document.is_dirty());
    assert_eq!(store.state().document.baseline(), "XY");
}

#[test]
fn test_save_failure_keeps_dirty() {
    let mut store = desktop_store();
    open_desktop_file(&mut store, "/d/a.md", "X");
    store.dispatch(Action::UpdateContent("XYZ".to_string()));

    let result = store.dispatch(Action::RunCommand(Command::Save));
    let (token, identity, content) = write_effect(&result);
    let result = store.dispatch(Action::FileWritten {
        token,
        identity,
        content,
        result: Err("permission denied".to_string()),
    });
    assert!(matches!(&result.effects[..], [Effect::ReportError(_)]));
    let doc = &store.state().document;
    assert!(doc.is_dirty());
    assert_eq!(doc.content(), "XYZ");
    assert_eq!(doc.baseline(), "X");
}

#[test]
fn test_save_without_identity_redirects_to_save_as() {
    let mut store = desktop_store();
    store.dispatch(Action::UpdateContent("draft".to_string()));
    let result = store.dispatch(Action::RunCommand(Command::Save));
    assert_eq!(
        result.effects,
        vec![Effect::ShowSaveDialog {
            suggested: "untitled.md".to_string()
        }]
    );

    let result = store.dispatch(Action::SaveAsChosen(PathBuf::from("/d/draft.md")));
    let (token, identity, content) = write_effect(&result);
    store.dispatch(Action::FileWritten {
        token,
        identity,
        content,
        result: Ok(()),
    });
    assert_eq!(store.state().document.identity(), Some("/d/draft.md"));
    assert!(!store.state().document.is_dirty());
    assert_eq!(store.state().recent_files.list()[0].key, "/d/draft.md");
}

#[test]
fn test_edits_during_write_stay_dirty() {
    let mut store = desktop_store();
    open_desktop_file(&mut store, "/d/a.md", "v0");
    store.dispatch(Action::UpdateContent("v1".to_string()));
    let result = store.dispatch(Action::RunCommand(Command::Save));
    let (token, identity, content) = write_effect(&result);

    store.dispatch(Action::UpdateContent("v2".to_string()));
    store.dispatch(Action::FileWritten {
        token,
        identity,
        content,
        result: Ok(()),
    });
    assert_eq!(store.state().document.baseline(), "v1");
    assert!(store.state().document.is_dirty());
}

#[test]
fn test_late_write_after_new_document_is_ignored() {
    let mut store = desktop_store();
    open_desktop_file(&mut store, "/d/a.md", "v0");
    let result = store.dispatch(Action::RunCommand(Command::Save));
    let (token, identity, content) = write_effect(&result);

    store.dispatch(Action::RunCommand(Command::New));
    let late = store.dispatch(Action::FileWritten {
        token,
        identity,
        content,
        result: Ok(()),
    });
    assert!(!late.state_changed);
    assert!(!store.state().document.is_bound());
}

#[test]
fn test_new_on_dirty_document_waits_for_confirmation() {
    let mut store = desktop_store();
    open_desktop_file(&mut store, "/d/a.md", "one");
    store.dispatch(Action::UpdateContent("one two".to_string()));

    let result = store.dispatch(Action::RunCommand(Command::New));
    assert!(matches!(&result.effects[..], [Effect::RequestConfirm { .. }]));
    assert!(store.state().confirm_dialog.visible);
    assert_eq!(store.state().document.content(), "one two");

    let result = store.dispatch(Action::ConfirmResolved(false));
    assert!(result.effects.is_empty());
    assert!(!store.state().confirm_dialog.visible);
    assert_eq!(store.state().document.content(), "one two");
    assert_eq!(store.state().document.identity(), Some("/d/a.md"));

    store.dispatch(Action::RunCommand(Command::New));
    let result = store.dispatch(Action::ConfirmResolved(true));
    assert!(result.effects.contains(&Effect::PersistSession));
    assert!(!store.state().document.is_bound());
    assert_eq!(store.state().document.content(), "");
}

#[test]
fn test_confirm_without_pending_is_noop() {
    let mut store = desktop_store();
    let result = store.dispatch(Action::ConfirmResolved(true));
    assert!(!result.state_changed);
}

#[test]
fn test_load_over_dirty_document_requires_confirmation() {
    let mut store = desktop_store();
    open_desktop_file(&mut store, "/d/a.md", "one");
    store.dispatch(Action::UpdateContent("edited".to_string()));

    let result = store.dispatch(Action::OpenFile("/d/b.md".to_string()));
    let token = read_token(&result);
    let result = store.dispatch(Action::FileRead {
        token,
        identity: "/d/b.md".to_string(),
        result: Ok("bee".to_string()),
    });
    assert!(matches!(&result.effects[..], [Effect::RequestConfirm { .. }]));
    assert_eq!(store.state().document.identity(), Some("/d/a.md"));

    store.dispatch(Action::ConfirmResolved(true));
    assert_eq!(store.state().document.identity(), Some("/d/b.md"));
    assert_eq!(store.state().document.content(), "bee");
}

#[test]
fn test_read_failure_leaves_document_untouched() {
    let mut store = desktop_store();
    open_desktop_file(&mut store, "/d/a.md", "one");
    let result = store.dispatch(Action::OpenRecentFile("/d/missing.md".to_string()));
    let token = read_token(&result);
    let result = store.dispatch(Action::FileRead {
        token,
        identity: "/d/missing.md".to_string(),
        result: Err("Not found".to_string()),
    });
    assert!(matches!(&result.effects[..], [Effect::ReportError(_)]));
    assert_eq!(store.state().document.identity(), Some("/d/a.md"));
}

#[test]
fn test_stale_read_is_ignored() {
    let mut store = desktop_store();
    let first = read_token(&store.dispatch(Action::OpenFile("/d/a.md".to_string())));
    let second = read_token(&store.dispatch(Action::OpenFile("/d/b.md".to_string())));
    assert_ne!(first, second);

    let stale = store.dispatch(Action::FileRead {
        token: first,
        identity: "/d/a.md".to_string(),
        result: Ok("a".to_string()),
    });
    assert!(!stale.state_changed);
    assert!(!store.state().document.is_bound());
}

#[test]
fn test_view_and_theme_commands_persist() {
    let mut store = desktop_store();
    let result = store.dispatch(Action::RunCommand(Command::ToggleMode));
    assert!(result.effects.contains(&Effect::PersistSession));
    assert_eq!(store.state().view.current(), ViewMode::Preview);

    let result = store.dispatch(Action::RunCommand(Command::SetMode(ViewMode::Preview)));
    assert!(!result.state_changed);

    store.dispatch(Action::RunCommand(Command::ToggleTheme));
    assert_eq!(store.state().theme, Theme::Dark);

    let result = store.dispatch(Action::RunCommand(Command::SwitchTab(SidebarTab::Recent)));
    assert!(result.state_changed);
    assert!(result.effects.is_empty());
    assert_eq!(store.state().sidebar_tab, SidebarTab::Recent);
}

#[test]
fn test_filter_action_caches_query() {
    let mut store = desktop_store();
    store.dispatch(Action::DirectoryChosen {
        path: PathBuf::from("/d"),
        open_first: false,
    });
    store.dispatch(Action::ScanCompleted {
        token: 1,
        root: PathBuf::from("/d"),
        result: Ok(entries(&["/d/Report.md", "/d/a.md"])),
    });
    assert!(store.dispatch(Action::SetFilter("report".to_string())).state_changed);
    assert!(!store.dispatch(Action::SetFilter("report".to_string())).state_changed);
    let visible = store.state().catalog.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Report.md");
}

#[test]
fn test_update_content_same_text_is_unchanged() {
    let mut store = desktop_store();
    assert!(!store.dispatch(Action::UpdateContent(String::new())).state_changed);
    assert!(store.dispatch(Action::UpdateContent("x".to_string())).state_changed);
}

#[test]
fn test_export_targets_html_next_to_document() {
    let mut store = desktop_store();
    open_desktop_file(&mut store, "/d/a.md", "# A");
    let result = store.dispatch(Action::RunCommand(Command::ExportHtml));
    assert_eq!(
        result.effects,
        vec![Effect::Export {
            target: "/d/a.html".to_string(),
            title: "a.md".to_string(),
            markdown: "# A".to_string(),
        }]
    );
}

#[test]
fn test_browser_intake_filters_and_auto_opens_first() {
    let mut store = browser_store();
    let result = store.dispatch(Action::FilesSelected(vec![
        UploadedFile::new("notes.txt", "skip"),
        UploadedFile::new("a.md", "# A"),
        UploadedFile::new("B.MARKDOWN", "# B"),
    ]));
    assert!(result.effects.contains(&Effect::PersistSession));

    let state = store.state();
    let names: Vec<_> = state.catalog.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a.md", "B.MARKDOWN"]);
    assert_eq!(state.document.identity(), Some("a.md"));
    assert_eq!(state.document.content(), "# A");
    assert_eq!(
        state.recent_files.get("a.md").and_then(|e| e.payload.as_deref()),
        Some("# A")
    );
}

#[test]
fn test_browser_intake_upserts_without_reopening() {
    let mut store = browser_store();
    store.dispatch(Action::FilesSelected(vec![UploadedFile::new("a.md", "1")]));
    store.dispatch(Action::FilesSelected(vec![
        UploadedFile::new("a.md", "2"),
        UploadedFile::new("b.md", "b"),
    ]));
    let state = store.state();
    assert_eq!(state.catalog.len(), 2);
    assert_eq!(state.uploads.get("a.md").map(String::as_str), Some("2"));
    assert_eq!(state.document.content(), "1");

    store.dispatch(Action::OpenFile("b.md".to_string()));
    assert_eq!(store.state().document.identity(), Some("b.md"));
}

#[test]
fn test_browser_intake_without_markdown_reports() {
    let mut store = browser_store();
    let result = store.dispatch(Action::FilesSelected(vec![UploadedFile::new("x.png", "")]));
    assert!(matches!(&result.effects[..], [Effect::ReportError(_)]));
    assert!(store.state().catalog.is_empty());
}

#[test]
fn test_browser_save_downloads_under_file_name() {
    let mut store = browser_store();
    store.dispatch(Action::UpdateContent("fresh".to_string()));
    let result = store.dispatch(Action::RunCommand(Command::Save));
    let (token, identity, content) = write_effect(&result);
    assert_eq!(identity, "untitled.md");

    store.dispatch(Action::FileWritten {
        token,
        identity,
        content,
        result: Ok(()),
    });
    let state = store.state();
    assert!(!state.document.is_dirty());
    assert_eq!(state.uploads.get("untitled.md").map(String::as_str), Some("fresh"));
    assert_eq!(
        state.recent_files.get("untitled.md").and_then(|e| e.payload.as_deref()),
        Some("fresh")
    );
}

#[test]
fn test_browser_open_recent_uses_payload() {
    let mut store = browser_store();
    store
        .state
        .recent_files
        .touch("old.md", "old.md", Some("# Old".to_string()));
    store.dispatch(Action::OpenRecentFile("old.md".to_string()));
    assert_eq!(store.state().document.content(), "# Old");

    let result = store.dispatch(Action::OpenRecentFile("none.md".to_string()));
    assert!(matches!(&result.effects[..], [Effect::ReportError(_)]));
}

#[test]
fn test_clear_files_always_confirms() {
    let mut store = browser_store();
    store.dispatch(Action::FilesSelected(vec![UploadedFile::new("a.md", "a")]));

    let result = store.dispatch(Action::RunCommand(Command::ClearFiles));
    assert!(matches!(&result.effects[..], [Effect::RequestConfirm { .. }]));
    store.dispatch(Action::ConfirmResolved(false));
    assert_eq!(store.state().catalog.len(), 1);

    store.dispatch(Action::RunCommand(Command::ClearFiles));
    store.dispatch(Action::ConfirmResolved(true));
    assert!(store.state().catalog.is_empty());
    assert!(store.state().uploads.is_empty());
    assert_eq!(store.state().document.identity(), Some("a.md"));
}

#[test]
fn test_browser_dirty_open_confirms_before_file_picker() {
    let mut store = browser_store();
    store.dispatch(Action::UpdateContent("draft".to_string()));

    let result = store.dispatch(Action::RunCommand(Command::Open));
    assert!(matches!(&result.effects[..], [Effect::RequestConfirm { .. }]));
    store.dispatch(Action::ConfirmResolved(false));
    assert!(store.state().catalog.is_empty());

    store.dispatch(Action::RunCommand(Command::Open));
    let result = store.dispatch(Action::ConfirmResolved(true));
    assert_eq!(result.effects, vec![Effect::ChooseFiles]);

    let result = store.dispatch(Action::FilesSelected(vec![UploadedFile::new("a.md", "# A")]));
    assert!(!result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::RequestConfirm { .. })));
    assert_eq!(store.state().document.identity(), Some("a.md"));
    assert_eq!(store.state().document.content(), "# A");
}

#[test]
fn test_browser_open_command_requests_files() {
    let mut store = browser_store();
    let result = store.dispatch(Action::RunCommand(Command::Open));
    assert_eq!(result.effects, vec![Effect::ChooseFiles]);
}
