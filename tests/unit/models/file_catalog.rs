use super::*;
use std::path::PathBuf;

fn entry(path: &str) -> FileEntry {
    FileEntry::from_path(&PathBuf::from(path))
}

fn names(entries: &[FileEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn test_from_path_splits_name_and_directory() {
    let e = entry("/docs/notes/today.md");
    assert_eq!(e.name, "today.md");
    assert_eq!(e.directory, "/docs/notes");
    assert_eq!(e.key(), "/docs/notes/today.md");
}

#[test]
fn test_empty_query_returns_full_set_in_order() {
    let mut catalog = FileCatalog::default();
    catalog.set_full_set(vec![entry("/b/z.md"), entry("/a/a.md"), entry("/c/m.md")]);
    assert_eq!(names(&catalog.filter("")), vec!["z.md", "a.md", "m.md"]);
}

#[test]
fn test_filter_is_case_insensitive() {
    let mut catalog = FileCatalog::default();
    catalog.set_full_set(vec![
        FileEntry::uploaded("Report.md", 1, None),
        FileEntry::uploaded("a.md", 1, None),
    ]);
    assert_eq!(names(&catalog.filter("report")), vec!["Report.md"]);
    assert_eq!(catalog.last_query(), "report");
}

#[test]
fn test_filter_matches_directory() {
    let mut catalog = FileCatalog::default();
    catalog.set_full_set(vec![entry("/work/Drafts/one.md"), entry("/home/two.md")]);
    assert_eq!(names(&catalog.filter("drafts")), vec!["one.md"]);
}

#[test]
fn test_filter_never_compounds() {
    let mut catalog = FileCatalog::default();
    catalog.set_full_set(vec![entry("/x/alpha.md"), entry("/x/beta.md")]);
    assert_eq!(catalog.filter("alpha").len(), 1);
    assert_eq!(names(&catalog.filter("beta")), vec!["beta.md"]);
    assert_eq!(catalog.filter("").len(), 2);
    assert_eq!(catalog.len(), 2);
}

#[test]
fn test_visible_reapplies_last_query_after_rescan() {
    let mut catalog = FileCatalog::default();
    catalog.set_full_set(vec![entry("/x/alpha.md")]);
    catalog.filter("beta");
    assert!(catalog.visible().is_empty());
    catalog.set_full_set(vec![entry("/y/beta.md"), entry("/y/gamma.md")]);
    assert_eq!(names(&catalog.visible()), vec!["beta.md"]);
}

#[test]
fn test_regex_mode_and_invalid_pattern_fallback() {
    let mut catalog = FileCatalog::new(FilterMode::Regex);
    catalog.set_full_set(vec![entry("/x/2024-01.md"), entry("/x/notes.md"), entry("/x/a(b.md")]);
    assert_eq!(names(&catalog.filter(r"^\d{4}-")), vec!["2024-01.md"]);
    assert_eq!(names(&catalog.filter("a(b")), vec!["a(b.md"]);
}

#[test]
fn test_upsert_replaces_in_place_and_appends() {
    let mut catalog = FileCatalog::default();
    catalog.upsert(vec![
        FileEntry::uploaded("a.md", 1, None),
        FileEntry::uploaded("b.md", 1, None),
    ]);
    let added = catalog.upsert(vec![
        FileEntry::uploaded("a.md", 5, None),
        FileEntry::uploaded("c.md", 1, None),
    ]);
    assert_eq!(added, 1);
    assert_eq!(names(catalog.entries()), vec!["a.md", "b.md", "c.md"]);
    assert_eq!(catalog.find("a.md").and_then(|e| e.size), Some(5));

    catalog.clear();
    assert!(catalog.is_empty());
}
