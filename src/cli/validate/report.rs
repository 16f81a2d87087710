//! Validation report types and formatting.

use std::collections::HashSet;
use std::fmt;

use owo_colors::OwoColorize;

use crate::config::ValidateLevel;
use crate::utils::plural_s;

/// Which check a violation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Locale-rooted link emitted without the base path.
    HardcodedWithoutBasepath,
    /// Internal link whose target file does not exist.
    BrokenTarget,
    /// Template with internal anchors that never mentions the url helper.
    MissingBuildUrlImport,
    /// Critical template missing from disk.
    MissingSource,
}

impl Rule {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HardcodedWithoutBasepath => "hardcoded-without-basepath",
            Self::BrokenTarget => "broken-target",
            Self::MissingBuildUrlImport => "missing-buildUrl-import",
            Self::MissingSource => "missing-source",
        }
    }

    /// Short human reason printed next to the link.
    pub const fn reason(self) -> &'static str {
        match self {
            Self::HardcodedWithoutBasepath => "missing base path",
            Self::BrokenTarget => "target not found",
            Self::MissingBuildUrlImport => "url helper never referenced",
            Self::MissingSource => "file not found",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a link was seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    /// File path relative to the scanned root, `/`-separated.
    pub file: String,
    /// Raw link value as written.
    pub link: String,
    /// Whitespace-collapsed snippet around the link.
    pub context: String,
    /// 1-based line, when known.
    pub line: Option<usize>,
}

/// A link that failed a rule.
#[derive(Debug, Clone)]
pub struct Violation {
    pub record: LinkRecord,
    pub rule: Rule,
    pub level: ValidateLevel,
}

impl Violation {
    #[inline]
    pub fn is_error(&self) -> bool {
        self.level == ValidateLevel::Error
    }
}

/// Violations of one file, grouped by link.
#[derive(Debug)]
pub struct FileGroup<'a> {
    pub file: &'a str,
    pub links: Vec<LinkGroup<'a>>,
}

/// Violations sharing the same raw link within a file.
#[derive(Debug)]
pub struct LinkGroup<'a> {
    pub link: &'a str,
    pub violations: Vec<&'a Violation>,
}

/// Outcome of one scan.
///
/// Violations keep discovery order. Duplicates on (file, link, line, rule)
/// are dropped on insertion.
#[derive(Debug, Default)]
pub struct ScanReport {
    violations: Vec<Violation>,
    seen: HashSet<(String, String, Option<usize>, Rule)>,
    /// Files read and inspected.
    pub files_scanned: usize,
    /// Files or directories that could not be read.
    pub files_skipped: usize,
    /// Distinct internal links checked for existence.
    pub links_checked: usize,
    /// Internal links whose target is missing.
    pub broken_links: usize,
}

impl ScanReport {
    /// Record a violation. Returns `false` if it was already present.
    pub fn add(&mut self, rule: Rule, level: ValidateLevel, record: LinkRecord) -> bool {
        let key = (record.file.clone(), record.link.clone(), record.line, rule);
        if !self.seen.insert(key) {
            return false;
        }
        self.violations.push(Violation {
            record,
            rule,
            level,
        });
        true
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations for one rule.
    pub fn count(&self, rule: Rule) -> usize {
        self.violations.iter().filter(|v| v.rule == rule).count()
    }

    pub fn error_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.violations.len() - self.error_count()
    }

    /// Whether any violation should fail the run.
    #[inline]
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(Violation::is_error)
    }

    /// Group violations by file, then by link, in first-encountered order.
    pub fn grouped(&self) -> Vec<FileGroup<'_>> {
        let mut files: Vec<FileGroup<'_>> = Vec::new();

        for violation in &self.violations {
            let record = &violation.record;
            let file_idx = match files.iter().position(|g| g.file == record.file) {
                Some(idx) => idx,
                None => {
                    files.push(FileGroup {
                        file: &record.file,
                        links: Vec::new(),
                    });
                    files.len() - 1
                }
            };

            let links = &mut files[file_idx].links;
            match links.iter_mut().find(|g| g.link == record.link) {
                Some(group) => group.violations.push(violation),
                None => links.push(LinkGroup {
                    link: &record.link,
                    violations: vec![violation],
                }),
            }
        }

        files
    }

    /// Print the grouped report to stderr.
    pub fn print(&self) {
        if self.is_empty() {
            return;
        }

        for group in self.grouped() {
            eprintln!();
            eprintln!("{}{}{}", "[".dimmed(), group.file.cyan(), "]".dimmed());

            for link in &group.links {
                let display = if link.link.is_empty() { "-" } else { link.link };
                let has_error = link.violations.iter().any(|v| v.is_error());
                if has_error {
                    eprintln!("{} {}", "→".red(), display);
                } else {
                    eprintln!("{} {}", "→".yellow(), display);
                }

                for v in &link.violations {
                    let rule = if v.is_error() {
                        v.rule.as_str().red().to_string()
                    } else {
                        v.rule.as_str().yellow().to_string()
                    };
                    match v.record.line {
                        Some(line) => eprintln!(
                            "  {} {} {}",
                            rule,
                            v.rule.reason(),
                            format!("(line {line})").dimmed()
                        ),
                        None => eprintln!("  {} {}", rule, v.rule.reason()),
                    }
                    if !v.record.context.is_empty() {
                        eprintln!("  {} {}", "│".dimmed(), v.record.context.dimmed());
                    }
                }
            }
        }
        eprintln!();
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{}", "all checks passed".green());
        }

        let errors = self.error_count();
        let warnings = self.warning_count();
        let files = self.grouped().len();

        write!(f, "{}", "found".dimmed())?;
        if errors > 0 {
            write!(
                f,
                " {} {}",
                errors.to_string().red().bold(),
                format!("error{}", plural_s(errors)).dimmed()
            )?;
        }
        if warnings > 0 {
            if errors > 0 {
                write!(f, "{}", ",".dimmed())?;
            }
            write!(
                f,
                " {} {}",
                warnings.to_string().yellow().bold(),
                format!("warning{}", plural_s(warnings)).dimmed()
            )?;
        }
        write!(
            f,
            " {}",
            format!("in {files} file{}", plural_s(files)).dimmed()
        )
    }
}
