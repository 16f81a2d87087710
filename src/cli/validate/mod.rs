//! Site validation command.
//!
//! Audits either the generated site (`--target build`) or the page
//! templates (`--target source`) for internal links that bypass the base
//! path, and for links whose target does not exist.

mod extract;
mod report;
mod scan;
mod source;

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use thiserror::Error;

use crate::config::{ScanScope, ScanTarget, SiteConfig};
use crate::log;
use crate::utils::{plural_count, plural_s};

use report::{Rule, ScanReport};
use scan::scan_build;
use source::scan_sources;

/// Conditions that prevent a scan from running at all.
///
/// Distinct from violations: nothing was audited.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("nothing to scan: {target} directory `{}` not found{hint}", .path.display())]
    MissingRoot {
        path: PathBuf,
        target: &'static str,
        hint: &'static str,
    },

    #[error("nothing to scan: `{}` is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("invalid locale pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl AuditError {
    /// Require `root` to be an existing directory.
    pub fn check_dir(root: &Path, target: ScanTarget) -> Result<(), Self> {
        if !root.exists() {
            let (target, hint) = match target {
                ScanTarget::Build => ("build output", ", run the site build first"),
                ScanTarget::Source => ("source", ""),
            };
            return Err(Self::MissingRoot {
                path: root.to_path_buf(),
                target,
                hint,
            });
        }
        if !root.is_dir() {
            return Err(Self::NotADirectory(root.to_path_buf()));
        }
        Ok(())
    }
}

/// Run the audit and fail if any error-level violation was found.
pub fn validate_site(config: &SiteConfig, target: ScanTarget) -> Result<()> {
    let report = match target {
        ScanTarget::Build => {
            let build = &config.validate.build;
            log!(
                "validate";
                "scanning {} for {} links (base `{}`)",
                build.output.display(),
                match build.scope {
                    ScanScope::Page => "page",
                    ScanScope::Nav => "navigation",
                },
                config.base_path()
            );
            scan_build(config)?
        }
        ScanTarget::Source => {
            let source = &config.validate.source;
            let what = if source.pages.is_empty() {
                format!("all .{} templates", source.extension)
            } else {
                plural_count(source.pages.len(), "critical page")
            };
            log!("validate"; "scanning {} in {}", what, source.root.display());
            scan_sources(config)?
        }
    };

    if report.files_scanned == 0 && report.files_skipped == 0 && report.is_empty() {
        log!("validate"; "no files found, nothing to check");
        return Ok(());
    }

    log_counts(&report, target);
    report.print();

    if let Some(hint) = fix_hint(&report, &config.validate.source.entry_point) {
        eprintln!("{} {}", "hint:".yellow().bold(), hint);
    }

    if report.has_errors() {
        let errors = report.error_count();
        let files = report.grouped().len();
        bail!(
            "found {} in {}",
            plural_count(errors, "violation"),
            plural_count(files, "file")
        );
    }

    log!("validate"; "{}", report);
    Ok(())
}

fn log_counts(report: &ScanReport, target: ScanTarget) {
    let noun = match target {
        ScanTarget::Build => "page",
        ScanTarget::Source => "template",
    };
    match target {
        ScanTarget::Build => log!(
            "validate";
            "checked {}, {} internal link{} ({} broken)",
            plural_count(report.files_scanned, noun),
            report.links_checked,
            plural_s(report.links_checked),
            report.broken_links
        ),
        ScanTarget::Source => {
            log!("validate"; "checked {}", plural_count(report.files_scanned, noun))
        }
    }
    if report.files_skipped > 0 {
        log!("warning"; "{} skipped", plural_count(report.files_skipped, "unreadable path"));
    }
}

/// Suggested rewrite of the first hardcoded link, if any.
fn fix_hint(report: &ScanReport, entry_point: &str) -> Option<String> {
    let first = report
        .violations()
        .iter()
        .find(|v| v.rule == Rule::HardcodedWithoutBasepath)?;
    Some(format!(
        "route internal links through the url helper, e.g. {}",
        format!("href={{{entry_point}('{}')}}", first.record.link).cyan()
    ))
}
