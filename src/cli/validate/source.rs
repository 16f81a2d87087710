//! Source template scanning.
//!
//! Templates are checked before the build: an internal anchor must go
//! through the url helper (`entry_point`), either by calling it near the
//! link or at least by referencing it somewhere in the file.

use std::fs;
use std::path::PathBuf;

use regex::Regex;

use super::AuditError;
use super::extract::{LineIndex, collect_files, window};
use super::report::{LinkRecord, Rule, ScanReport};
use crate::config::{ScanTarget, SiteConfig, SourceValidateConfig};
use crate::logger::ProgressLine;
use crate::utils::path::relative_display;
use crate::{debug, log};

/// Max chars of the offending line kept as context.
const LINE_MAX_CHARS: usize = 80;

/// Scan critical templates, or every template when no page list is set.
pub fn scan_sources(config: &SiteConfig) -> Result<ScanReport, AuditError> {
    let source = &config.validate.source;
    AuditError::check_dir(&source.root, ScanTarget::Source)?;

    let scanner = SourceScanner::new(source, &config.site.locales)?;
    let mut report = ScanReport::default();

    let files: Vec<PathBuf> = if source.pages.is_empty() {
        let walk = collect_files(&source.root, &source.extension);
        report.files_skipped += walk.unreadable;
        walk.files
    } else {
        let mut present = Vec::with_capacity(source.pages.len());
        for page in &source.pages {
            let path = source.root.join(page);
            if path.is_file() {
                present.push(path);
            } else {
                let rel = relative_display(&path, &source.root);
                report.add(
                    Rule::MissingSource,
                    source.level,
                    LinkRecord {
                        file: rel,
                        link: String::new(),
                        context: String::new(),
                        line: None,
                    },
                );
            }
        }
        present
    };
    debug!("scan"; "{} templates under {}", files.len(), source.root.display());

    let mut progress = ProgressLine::new("scan", files.len());
    for file in &files {
        match fs::read_to_string(file) {
            Ok(content) => {
                let rel = relative_display(file, &source.root);
                scanner.scan_template(&rel, &content, &mut report);
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

/// Patterns built from the configured locales.
struct SourceScanner<'a> {
    config: &'a SourceValidateConfig,
    /// Any `<a ... href=` in the file.
    anchor: Regex,
    /// Any quoted locale-rooted href, used to blame a missing helper.
    internal_href: Regex,
    /// `<a ... href="/fr/...">` with a literal value.
    literal_anchor: Regex,
    /// ``href={`/fr/...`}`` template literal.
    template_href: Regex,
}

impl<'a> SourceScanner<'a> {
    fn new(config: &'a SourceValidateConfig, locales: &[String]) -> Result<Self, regex::Error> {
        let locales = locales
            .iter()
            .map(|l| regex::escape(l))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            config,
            anchor: Regex::new(r"<a\s[^>]*href=")?,
            internal_href: Regex::new(&format!(r#"href=["'](/(?:{locales})/[^"']*)["']"#))?,
            literal_anchor: Regex::new(&format!(
                r#"<a\s[^>]*href=["'](/(?:{locales})/[^"'#]+)["']"#
            ))?,
            template_href: Regex::new(&format!(r"href=\{{`(/(?:{locales})/[^`#]+)`\}}"))?,
        })
    }

    fn scan_template(&self, rel: &str, content: &str, report: &mut ScanReport) {
        let lines = LineIndex::new(content);
        let entry_point = self.config.entry_point.as_str();
        let level = self.config.level;

        let record = |link: &str, offset: usize| {
            let line = lines.line_of(offset);
            LinkRecord {
                file: rel.to_owned(),
                link: link.to_owned(),
                context: truncate_chars(lines.line_text(content, line).trim(), LINE_MAX_CHARS),
                line: Some(line),
            }
        };

        if self.anchor.is_match(content)
            && !content.contains(entry_point)
            && let Some(caps) = self.internal_href.captures(content)
            && let (Some(whole), Some(link)) = (caps.get(0), caps.get(1))
        {
            report.add(
                Rule::MissingBuildUrlImport,
                level,
                record(link.as_str(), whole.start()),
            );
        }

        for caps in self
            .literal_anchor
            .captures_iter(content)
            .chain(self.template_href.captures_iter(content))
        {
            let (Some(whole), Some(link)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let nearby = window(
                content,
                whole.start(),
                self.config.window_before,
                self.config.window_after,
            );
            if !nearby.contains(entry_point) {
                report.add(
                    Rule::HardcodedWithoutBasepath,
                    level,
                    record(link.as_str(), whole.start()),
                );
            }
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}
