//! `[site]` section configuration.
//!
//! Deployment location of the site and its locales.
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://example.github.io/my-repo"  # path doubles as base when `base` is unset
//! base = "/my-repo"
//! locales = ["fr", "en"]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::config::types::FieldPath;
use crate::config::util::extract_url_path;
use crate::core::{BasePath, normalize_base_path};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Public site URL (scheme + host, optional path).
    pub url: Option<String>,

    /// Deployment base path (`/` for root, `/my-repo` for a project site).
    pub base: Option<String>,

    /// Locale segments that root internal pages (`/fr/...`, `/en/...`).
    pub locales: Vec<String>,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            url: None,
            base: None,
            locales: vec!["fr".into(), "en".into()],
        }
    }
}

impl SiteSectionConfig {
    pub const URL: FieldPath = FieldPath::new("site.url");
    pub const LOCALES: FieldPath = FieldPath::new("site.locales");

    /// Effective base path.
    ///
    /// An explicit `base` wins; otherwise the path component of `url` is used,
    /// so `https://example.github.io/my-repo` deploys under `/my-repo`.
    pub fn base_path(&self) -> BasePath {
        if let Some(base) = &self.base {
            return normalize_base_path(base);
        }

        match self.url.as_deref().and_then(extract_url_path) {
            Some(path) if !path.is_empty() => normalize_base_path(&format!("/{path}")),
            _ => BasePath::root(),
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(url) = &self.url
            && url::Url::parse(url).is_err()
        {
            diag.error_with_hint(
                Self::URL,
                format!("`{url}` is not a valid URL"),
                "use a full URL with scheme, e.g. https://example.com",
            );
        }

        if self.locales.is_empty() {
            diag.error(Self::LOCALES, "at least one locale is required");
        }

        for locale in &self.locales {
            if locale.is_empty() || locale.contains('/') {
                diag.error(
                    Self::LOCALES,
                    format!("`{locale}` is not a valid locale segment"),
                );
            }
        }
    }
}
