//! Base-path aware URL resolution.
//!
//! A site can be deployed at the root of a host (`https://example.com/`)
//! or under a subfolder (`https://example.github.io/my-repo/`). Every
//! internal link must then be prefixed with the deployment base path.
//!
//! - [`build_url`]: logical path -> deployable URL
//! - [`normalize_pathname`]: deployed pathname -> logical path (for comparison)
//! - [`is_active_path`]: navigation highlighting independent of base path
//!
//! All functions are pure. Passing `None` as base uses the process-wide
//! default set once at startup via [`set_default_base`].

use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

/// Locale-root pages that only match exactly in [`is_active_path`].
pub const HOME_PAGES: [&str; 3] = ["/", "/fr", "/en"];

/// Process-wide default base path.
static DEFAULT_BASE: LazyLock<ArcSwap<BasePath>> =
    LazyLock::new(|| ArcSwap::from_pointee(BasePath::root()));

/// Replace the default base path used when callers pass `None`.
pub fn set_default_base(base: BasePath) {
    DEFAULT_BASE.store(Arc::new(base));
}

/// Current default base path.
#[inline]
pub fn default_base() -> BasePath {
    (**DEFAULT_BASE.load()).clone()
}

/// Normalized deployment base path.
///
/// Invariants:
/// - Empty for root deployment
/// - Never ends with `/` otherwise
///
/// A missing leading slash is not corrected: base paths come from trusted
/// configuration and are passed through as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BasePath(Arc<str>);

impl BasePath {
    /// Normalize a raw base path (`"/"` and `""` become root).
    pub fn new(raw: &str) -> Self {
        if raw.is_empty() || raw == "/" {
            return Self::root();
        }
        Self(Arc::from(raw.strip_suffix('/').unwrap_or(raw)))
    }

    /// Root deployment (empty base path).
    pub fn root() -> Self {
        Self(Arc::from(""))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the site is deployed at the host root.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for BasePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BasePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BasePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Serialize for BasePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BasePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

#[inline]
fn resolve_base(base: Option<&str>) -> BasePath {
    base.map_or_else(default_base, BasePath::new)
}

/// Normalize base path by removing one trailing slash (`"/"` -> `""`).
#[inline]
pub fn normalize_base_path(raw: &str) -> BasePath {
    BasePath::new(raw)
}

/// Check if a URL is external (URI scheme prefix or protocol-relative `//`).
///
/// A scheme is an ASCII letter followed by letters, digits, `+`, `-` or `.`
/// and terminated by `:`. Letters match case-insensitively.
///
/// # Examples
/// ```ignore
/// assert!(is_external_url("https://example.com"));
/// assert!(is_external_url("mailto:user@example.com"));
/// assert!(is_external_url("//cdn.example.com/lib.js"));
/// assert!(!is_external_url("/fr/events"));
/// ```
pub fn is_external_url(path: &str) -> bool {
    if path.starts_with("//") {
        return true;
    }

    let mut chars = path.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    for (_, c) in chars {
        match c {
            ':' => return true,
            c if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') => {}
            _ => return false,
        }
    }
    false
}

/// Check if a URL is site-root absolute (`/fr/events`, not `//host`).
#[inline]
pub fn is_absolute_url(path: &str) -> bool {
    path.starts_with('/') && !is_external_url(path)
}

/// Build a deployable URL for `path` under `base`.
///
/// - External URLs are returned unchanged
/// - Absolute paths are prefixed with the base path
/// - Relative paths are prefixed with the base path and `/`
///
/// # Examples
/// ```ignore
/// assert_eq!(build_url("/fr/", Some("/my-repo/")), "/my-repo/fr/");
/// assert_eq!(build_url("events", Some("/")), "/events");
/// assert_eq!(build_url("https://example.com", Some("/my-repo")), "https://example.com");
/// ```
pub fn build_url(path: &str, base: Option<&str>) -> String {
    if is_external_url(path) {
        return path.to_string();
    }

    let base = resolve_base(base);

    if is_absolute_url(path) {
        return format!("{base}{path}");
    }

    let relative = path.strip_prefix('/').unwrap_or(path);
    format!("{base}/{relative}")
}

/// Normalize a pathname for comparison: strip base path, ensure a leading
/// slash, drop one trailing slash (except for `/`).
///
/// # Examples
/// ```ignore
/// assert_eq!(normalize_pathname("/my-repo/fr/", Some("/my-repo/")), "/fr");
/// assert_eq!(normalize_pathname("/", Some("")), "/");
/// ```
pub fn normalize_pathname(pathname: &str, base: Option<&str>) -> String {
    let base = resolve_base(base);

    let stripped = if base.is_root() {
        pathname
    } else {
        pathname.strip_prefix(base.as_str()).unwrap_or(pathname)
    };

    let mut normalized = if stripped.starts_with('/') {
        stripped.to_string()
    } else {
        format!("/{stripped}")
    };

    if normalized != "/" && normalized.ends_with('/') {
        normalized.pop();
    }

    normalized
}

/// Check if `link` should be highlighted while `current` is displayed.
///
/// Locale home pages ([`HOME_PAGES`]) match exactly; any other link
/// matches by prefix so nested routes stay highlighted.
pub fn is_active_path(current: &str, link: &str, base: Option<&str>) -> bool {
    let current = normalize_pathname(current, base);
    let link = normalize_pathname(link, base);

    if HOME_PAGES.contains(&link.as_str()) {
        return current == link;
    }

    current.starts_with(&link)
}

/// Site origin (scheme + host + port) joined with the normalized base.
///
/// Any path in `site` is discarded. Without a site URL only the base
/// path is returned.
pub fn get_base_url(site: Option<&str>, base: Option<&str>) -> Result<String, url::ParseError> {
    let origin = match site {
        Some(site) => url::Url::parse(site)?.origin().ascii_serialization(),
        None => String::new(),
    };
    Ok(format!("{origin}{}", resolve_base(base)))
}

/// Drop query string and fragment from a link.
///
/// `/fr/events?page=2#list` -> `/fr/events`
#[inline]
pub fn strip_query_fragment(link: &str) -> &str {
    link.split(['?', '#']).next().unwrap_or(link)
}
