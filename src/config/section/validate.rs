//! `[validate]` section configuration.
//!
//! Configuration for the `baselink validate` command.
//!
//! # Example
//!
//! ```toml
//! [validate.build]
//! output = "dist"                 # Build output to scan
//! extension = "html"
//! scope = "page"                  # page | nav (only <nav> and <header>)
//! ignore = ["/favicon.svg", "/assets/", "/_astro/"]
//! broken = "error"                # Failure level: error | warn
//! hardcoded = "error"
//!
//! [validate.source]
//! root = "."                      # Project root for template paths
//! extension = "astro"
//! entry_point = "buildUrl"        # Token proving a link goes through the resolver
//! pages = ["src/pages/fr/404.astro"]
//! level = "error"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::config::types::FieldPath;

// ============================================================================
// Main ValidateConfig
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateConfig {
    /// Scan of the generated site.
    pub build: BuildValidateConfig,

    /// Scan of the critical source templates.
    pub source: SourceValidateConfig,
}

impl ValidateConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.build.extension.is_empty() {
            diag.error(BuildValidateConfig::EXTENSION, "extension must not be empty");
        }
        if self.source.extension.is_empty() {
            diag.error(SourceValidateConfig::EXTENSION, "extension must not be empty");
        }
        if self.source.entry_point.trim().is_empty() {
            diag.error_with_hint(
                SourceValidateConfig::ENTRY_POINT,
                "entry point must not be empty",
                "set it to the name of the url helper, e.g. \"buildUrl\"",
            );
        }
        for prefix in &self.build.ignore {
            if !prefix.starts_with('/') {
                diag.error(
                    BuildValidateConfig::IGNORE,
                    format!("`{prefix}` must start with `/`"),
                );
            }
        }
    }

    /// Downgrade every rule to a warning.
    pub fn set_warn_only(&mut self) {
        self.build.broken = ValidateLevel::Warn;
        self.build.hardcoded = ValidateLevel::Warn;
        self.source.level = ValidateLevel::Warn;
    }
}

// ============================================================================
// Build output scan
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildValidateConfig {
    /// Build output directory (relative to project root).
    pub output: PathBuf,

    /// Extension of generated pages.
    pub extension: String,

    /// Which part of each page to scan.
    pub scope: ScanScope,

    /// Link prefixes skipped entirely (assets, bundler output).
    pub ignore: Vec<String>,

    /// How to treat links whose target does not exist.
    pub broken: ValidateLevel,

    /// How to treat locale-rooted links missing the base path.
    pub hardcoded: ValidateLevel,
}

impl Default for BuildValidateConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dist"),
            extension: "html".into(),
            scope: ScanScope::default(),
            ignore: vec!["/favicon.svg".into(), "/assets/".into(), "/_astro/".into()],
            broken: ValidateLevel::default(),
            hardcoded: ValidateLevel::default(),
        }
    }
}

impl BuildValidateConfig {
    pub const EXTENSION: FieldPath = FieldPath::new("validate.build.extension");
    pub const IGNORE: FieldPath = FieldPath::new("validate.build.ignore");

    /// Check if a link falls under an ignored prefix.
    #[inline]
    pub fn is_ignored(&self, link: &str) -> bool {
        self.ignore.iter().any(|prefix| link.starts_with(prefix.as_str()))
    }
}

// ============================================================================
// Source template scan
// ============================================================================

/// Critical pages checked when no explicit list is configured.
pub const DEFAULT_CRITICAL_PAGES: [&str; 8] = [
    "src/pages/en/library/index.astro",
    "src/pages/fr/library/index.astro",
    "src/pages/en/page/index.astro",
    "src/pages/fr/page/index.astro",
    "src/pages/en/demo/index.astro",
    "src/pages/fr/demo/index.astro",
    "src/pages/en/404.astro",
    "src/pages/fr/404.astro",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceValidateConfig {
    /// Project root that template paths are relative to.
    pub root: PathBuf,

    /// Template extension, used when `pages` is empty.
    pub extension: String,

    /// Token that marks a link as resolved through the url helper.
    pub entry_point: String,

    /// Bytes inspected before a hardcoded link for the entry point.
    pub window_before: usize,

    /// Bytes inspected after the start of a hardcoded link.
    pub window_after: usize,

    /// Critical templates to check. Empty scans every template under `root`.
    pub pages: Vec<PathBuf>,

    /// How to treat source violations.
    pub level: ValidateLevel,
}

impl Default for SourceValidateConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extension: "astro".into(),
            entry_point: "buildUrl".into(),
            window_before: 30,
            window_after: 50,
            pages: DEFAULT_CRITICAL_PAGES.iter().map(PathBuf::from).collect(),
            level: ValidateLevel::default(),
        }
    }
}

impl SourceValidateConfig {
    pub const EXTENSION: FieldPath = FieldPath::new("validate.source.extension");
    pub const ENTRY_POINT: FieldPath = FieldPath::new("validate.source.entry_point");
}

// ============================================================================
// Shared enums
// ============================================================================

/// Validation error level.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidateLevel {
    /// Treat validation failures as errors (run fails).
    #[default]
    Error,
    /// Treat validation failures as warnings (run succeeds).
    Warn,
}

/// What the auditor scans.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScanTarget {
    /// Generated HTML in the build output.
    #[default]
    Build,
    /// Pre-build page templates.
    Source,
}

/// Which part of a generated page is scanned.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScanScope {
    /// The whole document.
    #[default]
    Page,
    /// Only `<nav>` and `<header>` sections.
    Nav,
}

// ============================================================================
// Tests
// ============================================================================
