//! Lexical helpers shared by both scan targets.
//!
//! Links are found with regular expressions, not an HTML parser: generated
//! pages and templates are scanned as plain text.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use jwalk::WalkDir;
use regex::Regex;

use crate::config::ScanScope;
use crate::log;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules"];

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href=["']([^"']+)["']"#).unwrap());

static NAV_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<nav.*?</nav>").unwrap());

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<header.*?</header>").unwrap());

/// An `href` value and the byte offset of its attribute in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Href<'a> {
    pub value: &'a str,
    pub offset: usize,
}

/// Extract `href` values from `content`, in document order.
///
/// With [`ScanScope::Nav`] only `<nav>` and `<header>` sections are read;
/// offsets still refer to the full document.
pub fn extract_hrefs(content: &str, scope: ScanScope) -> Vec<Href<'_>> {
    match scope {
        ScanScope::Page => hrefs_in(content, 0..content.len()),
        ScanScope::Nav => {
            let mut sections: Vec<Range<usize>> = NAV_RE
                .find_iter(content)
                .chain(HEADER_RE.find_iter(content))
                .map(|m| m.range())
                .collect();
            sections.sort_by_key(|r| r.start);

            let mut hrefs: Vec<Href<'_>> = sections
                .into_iter()
                .flat_map(|range| hrefs_in(content, range))
                .collect();
            hrefs.sort_by_key(|h| h.offset);
            // A <nav> inside a <header> is read twice
            hrefs.dedup_by_key(|h| h.offset);
            hrefs
        }
    }
}

fn hrefs_in(content: &str, range: Range<usize>) -> Vec<Href<'_>> {
    let base = range.start;
    HREF_RE
        .captures_iter(&content[range])
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let value = caps.get(1)?;
            Some(Href {
                value: &content[base + value.start()..base + value.end()],
                offset: base + whole.start(),
            })
        })
        .collect()
}

// ============================================================================
// Positions
// ============================================================================

/// Byte offsets of line starts, for offset to line lookups.
#[derive(Debug)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// 1-based line containing byte `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }

    /// Text of a 1-based line, without its terminator.
    pub fn line_text<'a>(&self, content: &'a str, line: usize) -> &'a str {
        let Some(&start) = self.starts.get(line.saturating_sub(1)) else {
            return "";
        };
        let end = self
            .starts
            .get(line)
            .map_or(content.len(), |next| next - 1);
        content[start..end].trim_end_matches('\r')
    }
}

/// Largest char boundary `<= idx`.
pub fn floor_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Smallest char boundary `>= idx`.
pub fn ceil_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// Bytes `before..after` around `offset`, snapped to char boundaries.
pub fn window(content: &str, offset: usize, before: usize, after: usize) -> &str {
    let start = floor_boundary(content, offset.saturating_sub(before));
    let end = ceil_boundary(content, offset.saturating_add(after));
    &content[start..end]
}

/// Collapse whitespace runs and cut to `max` chars, followed by `...`.
///
/// The marker is always present: the text is a window into a larger page.
pub fn snippet(text: &str, max: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let cut = collapsed
        .char_indices()
        .nth(max)
        .map_or(collapsed.len(), |(idx, _)| idx);
    format!("{}...", &collapsed[..cut])
}

// ============================================================================
// File walk
// ============================================================================

/// Files found by [`collect_files`], plus the entries the walk could not read.
#[derive(Debug, Default)]
pub struct FileWalk {
    pub files: Vec<PathBuf>,
    pub unreadable: usize,
}

/// Collect files with `extension` under `dir`, in lexicographic depth-first order.
///
/// Hidden entries and dependency directories below `dir` are skipped; `dir`
/// itself is always walked, even when its own name is hidden. Entries that
/// cannot be read are logged and counted, never dropped silently.
pub fn collect_files(dir: &Path, extension: &str) -> FileWalk {
    let extension = extension.trim_start_matches('.');
    let mut walk = FileWalk::default();

    let entries = WalkDir::new(dir)
        .sort(true)
        .skip_hidden(false)
        .process_read_dir(|_, _, _, children| {
            children.retain(|entry| entry.as_ref().map_or(true, |e| !is_skipped(e)));
        });

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log!("warning"; "skipping unreadable entry: {}", err);
                walk.unreadable += 1;
                continue;
            }
        };
        let path = entry.path();
        if let Some(err) = &entry.read_children_error {
            log!("warning"; "skipping {}: {}", path.display(), err);
            walk.unreadable += 1;
            continue;
        }
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == extension) {
            walk.files.push(path);
        }
    }
    walk
}

/// Hidden entries and dependency directories below the walk root.
fn is_skipped(entry: &jwalk::DirEntry<((), ())>) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.')
        || (entry.file_type().is_dir() && SKIPPED_DIRS.contains(&&*name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_extract_hrefs_page() {
        let html = r#"<a href="/fr/events">x</a><link href='/style.css'><a href="">e</a>"#;
        let hrefs = extract_hrefs(html, ScanScope::Page);
        let values: Vec<_> = hrefs.iter().map(|h| h.value).collect();
        assert_eq!(values, ["/fr/events", "/style.css"]);
        assert_eq!(hrefs[0].offset, 3);
    }

    #[test]
    fn test_extract_hrefs_nav_scope() {
        let html = "<header><a href=\"/fr/\">home</a>\n<nav><a href=\"/fr/a\">a</a></nav></header>\n\
                    <main><a href=\"/fr/body\">b</a></main>\n\
                    <NAV><a href=\"/en/b\">b</a></NAV>";
        let values: Vec<_> = extract_hrefs(html, ScanScope::Nav)
            .iter()
            .map(|h| h.value)
            .collect();
        assert_eq!(values, ["/fr/", "/fr/a", "/en/b"]);
    }

    #[test]
    fn test_nav_offsets_refer_to_document() {
        let html = "line one\n<nav>\n<a href=\"/fr/a\">a</a></nav>";
        let hrefs = extract_hrefs(html, ScanScope::Nav);
        let index = LineIndex::new(html);
        assert_eq!(index.line_of(hrefs[0].offset), 3);
    }

    #[test]
    fn test_line_index() {
        let content = "a\nbb\r\nccc";
        let index = LineIndex::new(content);
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(1), 1);
        assert_eq!(index.line_of(2), 2);
        assert_eq!(index.line_of(7), 3);
        assert_eq!(index.line_text(content, 2), "bb");
        assert_eq!(index.line_text(content, 3), "ccc");
        assert_eq!(index.line_text(content, 9), "");
    }

    #[test]
    fn test_window_respects_char_boundaries() {
        let content = "ééééé<a href=\"/fr/x\">";
        let offset = content.find("<a").unwrap();
        let w = window(content, offset, 3, 4);
        assert!(w.ends_with("<a h"));
        assert!(w.starts_with('é'));
    }

    #[test]
    fn test_snippet_collapses_and_truncates() {
        assert_eq!(snippet("  <a\n\t href=x>  ", 80), "<a href=x>...");
        let long = "x".repeat(100);
        let cut = snippet(&long, 80);
        assert_eq!(cut.len(), 83);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_collect_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("fr/events")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("index.html"), "").unwrap();
        fs::write(root.join("fr/index.html"), "").unwrap();
        fs::write(root.join("fr/events/index.html"), "").unwrap();
        fs::write(root.join("fr/app.js"), "").unwrap();
        fs::write(root.join("node_modules/pkg/readme.html"), "").unwrap();

        let walk = collect_files(root, "html");
        assert_eq!(walk.unreadable, 0);
        let files: Vec<_> = walk
            .files
            .iter()
            .map(|p| crate::utils::path::relative_display(p, root))
            .collect();
        assert_eq!(files, ["fr/events/index.html", "fr/index.html", "index.html"]);
    }

    #[test]
    fn test_collect_files_hidden_root_is_walked() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join(".output");
        fs::create_dir_all(root.join("fr/.cache")).unwrap();
        fs::write(root.join("index.html"), "").unwrap();
        fs::write(root.join("fr/index.html"), "").unwrap();
        fs::write(root.join("fr/.cache/stale.html"), "").unwrap();
        fs::write(root.join(".draft.html"), "").unwrap();

        let files: Vec<_> = collect_files(&root, "html")
            .files
            .iter()
            .map(|p| crate::utils::path::relative_display(p, &root))
            .collect();
        assert_eq!(files, ["fr/index.html", "index.html"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_files_counts_unreadable_dirs() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path().join("dist");
        let locked = root.join("fr");
        fs::create_dir_all(&locked).unwrap();
        fs::write(root.join("index.html"), "").unwrap();
        fs::write(locked.join("index.html"), "").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply to a privileged user
        let readable = fs::read_dir(&locked).is_ok();
        let walk = collect_files(&root, "html");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            return;
        }

        assert_eq!(walk.files.len(), 1);
        assert_eq!(walk.unreadable, 1);
    }
}
