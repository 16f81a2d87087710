//! Build output scanning.
//!
//! Every generated page is read once. Two rules run per `href`:
//! - hardcoded: locale-rooted link without the base path
//! - broken: internal link whose target file does not exist

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use super::extract::{Href, LineIndex, collect_files, extract_hrefs, snippet, window};
use super::report::{LinkRecord, Rule, ScanReport};
use super::AuditError;
use crate::config::{BuildValidateConfig, ScanTarget, SiteConfig};
use crate::core::{BasePath, LinkKind, is_locale_rooted, normalize_pathname, strip_query_fragment};
use crate::logger::ProgressLine;
use crate::utils::path::relative_display;
use crate::{debug, log};

/// Context kept around a link in build pages.
const CONTEXT_BEFORE: usize = 50;
const CONTEXT_AFTER: usize = 100;
const CONTEXT_MAX_CHARS: usize = 80;

/// Scan generated pages under the configured build output.
pub fn scan_build(config: &SiteConfig) -> Result<ScanReport, AuditError> {
    let root = &config.validate.build.output;
    AuditError::check_dir(root, ScanTarget::Build)?;

    let scanner = BuildScanner {
        root,
        build: &config.validate.build,
        locales: &config.site.locales,
        base: config.base_path(),
    };

    let walk = collect_files(root, &scanner.build.extension);
    let files = walk.files;
    debug!("scan"; "{} pages under {}", files.len(), root.display());

    let mut report = ScanReport::default();
    report.files_skipped = walk.unreadable;
    let mut progress = ProgressLine::new("scan", files.len());
    for file in &files {
        match fs::read_to_string(file) {
            Ok(content) => {
                scanner.scan_page(file, &content, &mut report);
                report.files_scanned += 1;
            }
            Err(err) => {
                log!("warning"; "skipping {}: {}", file.display(), err);
                report.files_skipped += 1;
            }
        }
        progress.inc();
    }
    progress.finish();

    Ok(report)
}

struct BuildScanner<'a> {
    root: &'a Path,
    build: &'a BuildValidateConfig,
    locales: &'a [String],
    base: BasePath,
}

impl BuildScanner<'_> {
    fn scan_page(&self, file: &Path, content: &str, report: &mut ScanReport) {
        let rel = relative_display(file, self.root);
        let lines = LineIndex::new(content);
        let page_dir = file.parent().unwrap_or(self.root);
        let mut checked: HashSet<&str> = HashSet::new();

        for href in extract_hrefs(content, self.build.scope) {
            let record = || self.record(&rel, content, &lines, href);

            if is_locale_rooted(href.value, self.locales) && !self.build.is_ignored(href.value) {
                report.add(Rule::HardcodedWithoutBasepath, self.build.hardcoded, record());
            }

            let target = match LinkKind::parse(href.value) {
                LinkKind::SiteRoot(link) => {
                    let path = strip_query_fragment(link);
                    let logical = normalize_pathname(path, Some(self.base.as_str()));
                    if self.build.is_ignored(path) || self.build.is_ignored(&logical) {
                        continue;
                    }
                    Target::SiteRoot(logical)
                }
                LinkKind::Relative(link) => match strip_query_fragment(link) {
                    // `?page=2` points back at this page
                    "" => continue,
                    path => Target::Relative(path),
                },
                LinkKind::External(_) | LinkKind::Fragment(_) => continue,
            };

            // Each distinct link is resolved once per page
            if !checked.insert(href.value) {
                continue;
            }
            report.links_checked += 1;

            let candidates = match &target {
                Target::SiteRoot(logical) => target_candidates(self.root, logical),
                Target::Relative(link) => target_candidates(page_dir, link),
            };
            if !candidates.iter().any(|c| c.exists()) {
                report.broken_links += 1;
                report.add(Rule::BrokenTarget, self.build.broken, record());
            }
        }
    }

    fn record(&self, rel: &str, content: &str, lines: &LineIndex, href: Href<'_>) -> LinkRecord {
        let around = window(content, href.offset, CONTEXT_BEFORE, CONTEXT_AFTER);
        LinkRecord {
            file: rel.to_owned(),
            link: href.value.to_owned(),
            context: snippet(around, CONTEXT_MAX_CHARS),
            line: Some(lines.line_of(href.offset)),
        }
    }
}

enum Target<'a> {
    SiteRoot(String),
    Relative(&'a str),
}

/// Paths that would serve `link` below `dir`, in lookup order:
/// `dir/link`, `dir/link/index.html`, `dir/link.html`.
///
/// Any existing path counts, directories included.
fn target_candidates(dir: &Path, link: &str) -> Vec<PathBuf> {
    let decoded = percent_decode_str(link).decode_utf8_lossy();
    let rel = decoded.trim_start_matches('/').trim_end_matches('/');

    if rel.is_empty() {
        return vec![dir.join("index.html")];
    }

    let path = dir.join(rel);
    vec![
        path.clone(),
        path.join("index.html"),
        dir.join(format!("{rel}.html")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScanScope, ValidateLevel, test_parse_config};
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config_for(dir: &TempDir, toml: &str) -> SiteConfig {
        let mut config = test_parse_config(toml);
        config.validate.build.output = dir.path().to_path_buf();
        config
    }

    #[test]
    fn test_broken_target_reported_once() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "fr/index.html",
            r#"<a href="/website_template/fr/events">Événements</a>
<a href="/website_template/fr/events">again</a>"#,
        );
        let config = config_for(&dir, "[site]\nbase = \"/website_template\"");

        let report = scan_build(&config).unwrap();
        assert_eq!(report.count(Rule::BrokenTarget), 1);
        assert_eq!(report.count(Rule::HardcodedWithoutBasepath), 0);
        let v = &report.violations()[0];
        assert_eq!(v.record.file, "fr/index.html");
        assert_eq!(v.record.link, "/website_template/fr/events");
        assert_eq!(v.record.line, Some(1));
        assert!(v.record.context.contains("Événements"));
        assert_eq!(report.links_checked, 1);
        assert_eq!(report.broken_links, 1);
    }

    #[test]
    fn test_hardcoded_despite_existing_target() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "fr/events/index.html", "<p>events</p>");
        write(dir.path(), "fr/index.html", r#"<a href="/fr/events">e</a>"#);
        let config = config_for(&dir, "[site]\nbase = \"/\"");

        let report = scan_build(&config).unwrap();
        assert_eq!(report.count(Rule::HardcodedWithoutBasepath), 1);
        assert_eq!(report.count(Rule::BrokenTarget), 0);
        assert!(report.has_errors());
    }

    #[test]
    fn test_candidates_resolve() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.html", "");
        write(dir.path(), "en/about.html", "");
        write(dir.path(), "fr/library/index.html", "");
        write(dir.path(), "robots.txt", "");
        write(dir.path(), "fr/événements/index.html", "");
        write(
            dir.path(),
            "fr/page/index.html",
            r##"<a href="/my-repo/">home</a>
<a href="/my-repo/en/about">about</a>
<a href="/my-repo/fr/library/?tab=2#top">lib</a>
<a href="/my-repo/robots.txt">robots</a>
<a href="/my-repo/fr/%C3%A9v%C3%A9nements">events</a>
<a href="../library/">relative</a>
<a href="https://example.com/fr/x">ext</a>
<a href="#top">frag</a>
<a href="/my-repo/assets/logo.svg">logo</a>"##,
        );
        let config = config_for(&dir, "[site]\nbase = \"/my-repo\"");

        let report = scan_build(&config).unwrap();
        assert!(report.is_empty(), "{:?}", report.violations());
        assert_eq!(report.links_checked, 6);
    }

    #[test]
    fn test_existing_directory_is_a_target() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "fr/events/2024/index.html", "");
        write(dir.path(), "index.html", r#"<a href="/x/fr/events/">e</a>"#);
        let config = config_for(&dir, "[site]\nbase = \"/x\"");

        let report = scan_build(&config).unwrap();
        assert!(report.is_empty(), "{:?}", report.violations());
        assert_eq!(report.links_checked, 1);
    }

    #[test]
    fn test_query_only_link_targets_current_page() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "fr/about.html",
            r##"<a href="?page=2">next</a><a href="?page=2#list">list</a>"##,
        );
        let config = config_for(&dir, "");

        let report = scan_build(&config).unwrap();
        assert!(report.is_empty(), "{:?}", report.violations());
        assert_eq!(report.broken_links, 0);
    }

    #[test]
    fn test_locale_link_with_fragment_not_hardcoded() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "fr/events/index.html", "");
        write(dir.path(), "index.html", r##"<a href="/fr/events#top">e</a>"##);
        let config = config_for(&dir, "");

        let report = scan_build(&config).unwrap();
        assert_eq!(report.count(Rule::HardcodedWithoutBasepath), 0);
        assert_eq!(report.count(Rule::BrokenTarget), 0);
    }

    #[test]
    fn test_hidden_build_dir_is_scanned() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join(".output");
        write(&output, "fr/index.html", r#"<a href="/fr/missing">m</a>"#);
        let mut config = config_for(&dir, "");
        config.validate.build.output = output;

        let report = scan_build(&config).unwrap();
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.files_skipped, 0);
        assert_eq!(report.count(Rule::HardcodedWithoutBasepath), 1);
        assert_eq!(report.count(Rule::BrokenTarget), 1);
    }

    #[test]
    fn test_locale_root_and_fragment_not_hardcoded() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "fr/index.html", "");
        write(
            dir.path(),
            "index.html",
            r##"<a href="/fr/">fr</a><a href="/fr/#top">top</a>"##,
        );
        let config = config_for(&dir, "");

        let report = scan_build(&config).unwrap();
        assert!(report.is_empty(), "{:?}", report.violations());
    }

    #[test]
    fn test_nav_scope_ignores_body() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "index.html",
            "<nav><a href=\"/repo/fr/missing\">m</a></nav>\n<main><a href=\"/repo/en/gone\">g</a></main>",
        );
        let mut config = config_for(&dir, "[site]\nbase = \"/repo\"");
        config.validate.build.scope = ScanScope::Nav;

        let report = scan_build(&config).unwrap();
        assert_eq!(report.violations().len(), 1);
        assert_eq!(report.violations()[0].record.link, "/repo/fr/missing");
    }

    #[test]
    fn test_violation_order_follows_walk() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.html", r#"<a href="/fr/z">z</a>"#);
        write(dir.path(), "en/index.html", r#"<a href="/en/a">a</a>"#);
        let mut config = config_for(&dir, "");
        config.validate.build.broken = ValidateLevel::Warn;

        let report = scan_build(&config).unwrap();
        let files: Vec<_> = report.grouped().iter().map(|g| g.file.to_owned()).collect();
        assert_eq!(files, ["en/index.html", "index.html"]);
    }

    #[test]
    fn test_empty_build_dir_passes() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir, "");

        let report = scan_build(&config).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.files_scanned, 0);
    }

    #[test]
    fn test_missing_build_dir_is_error() {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.validate.build.output = dir.path().join("dist");

        let err = scan_build(&config).unwrap_err();
        assert!(matches!(err, AuditError::MissingRoot { .. }));
    }

    #[test]
    fn test_target_candidates_order() {
        let root = Path::new("/dist");
        assert_eq!(
            target_candidates(root, "/fr/events/"),
            [
                PathBuf::from("/dist/fr/events"),
                PathBuf::from("/dist/fr/events/index.html"),
                PathBuf::from("/dist/fr/events.html"),
            ]
        );
        assert_eq!(target_candidates(root, "/"), [PathBuf::from("/dist/index.html")]);
    }
}
