//! Link classification utilities.

use super::url::{is_absolute_url, is_external_url};

/// Syntactic classification of links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// External link with URL scheme (https://, mailto:, tel:) or protocol-relative (//host).
    External(&'a str),
    /// Pure fragment/anchor link (#section). Value is anchor without `#`.
    Fragment(&'a str),
    /// Site-root-relative path (/fr/events, /assets/logo.svg).
    SiteRoot(&'a str),
    /// Page-relative path (events, ./about.html, ../other).
    Relative(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a link string into its syntactic kind.
    ///
    /// External detection runs first, so `//host/path` is never site-root.
    #[inline]
    pub fn parse(link: &'a str) -> Self {
        if is_external_url(link) {
            Self::External(link)
        } else if link.is_empty() {
            // href="" points at the current document
            Self::Fragment("")
        } else if let Some(anchor) = link.strip_prefix('#') {
            Self::Fragment(anchor)
        } else if let Some(anchor) = link.strip_prefix("./#") {
            Self::Fragment(anchor)
        } else if is_absolute_url(link) {
            Self::SiteRoot(link)
        } else {
            Self::Relative(link)
        }
    }
}

/// Check if `link` is a locale-rooted absolute path (`/fr/...`, `/en/...`)
/// with a non-empty tail after the locale segment.
///
/// Bare locale roots (`/fr/`) and any tail carrying a fragment
/// (`/fr/#top`, `/fr/events#top`) do not count.
pub fn is_locale_rooted<S: AsRef<str>>(link: &str, locales: &[S]) -> bool {
    let Some(rest) = link.strip_prefix('/') else {
        return false;
    };
    locales.iter().any(|locale| {
        rest.strip_prefix(locale.as_ref())
            .and_then(|tail| tail.strip_prefix('/'))
            .is_some_and(|tail| !tail.is_empty() && !tail.contains('#'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCALES: [&str; 2] = ["fr", "en"];

    #[test]
    fn test_parse_external() {
        assert!(matches!(
            LinkKind::parse("https://example.com"),
            LinkKind::External("https://example.com")
        ));
        assert!(matches!(
            LinkKind::parse("mailto:user@example.com"),
            LinkKind::External(_)
        ));
        assert!(matches!(
            LinkKind::parse("tel:+1234567890"),
            LinkKind::External(_)
        ));
        assert!(matches!(
            LinkKind::parse("//cdn.example.com/app.js"),
            LinkKind::External(_)
        ));
    }

    #[test]
    fn test_parse_fragment() {
        assert!(matches!(
            LinkKind::parse("#section"),
            LinkKind::Fragment("section")
        ));
        assert!(matches!(LinkKind::parse("#"), LinkKind::Fragment("")));
        assert!(matches!(
            LinkKind::parse("./#section"),
            LinkKind::Fragment("section")
        ));
        assert!(matches!(LinkKind::parse(""), LinkKind::Fragment("")));
    }

    #[test]
    fn test_parse_site_root() {
        assert!(matches!(
            LinkKind::parse("/fr/events"),
            LinkKind::SiteRoot("/fr/events")
        ));
        assert!(matches!(
            LinkKind::parse("/about#team"),
            LinkKind::SiteRoot("/about#team")
        ));
        assert!(matches!(LinkKind::parse("/"), LinkKind::SiteRoot("/")));
    }

    #[test]
    fn test_parse_relative() {
        assert!(matches!(
            LinkKind::parse("./image.png"),
            LinkKind::Relative("./image.png")
        ));
        assert!(matches!(
            LinkKind::parse("../other"),
            LinkKind::Relative("../other")
        ));
        assert!(matches!(
            LinkKind::parse("events"),
            LinkKind::Relative("events")
        ));
    }

    #[test]
    fn test_is_locale_rooted() {
        assert!(is_locale_rooted("/fr/events", &LOCALES));
        assert!(is_locale_rooted("/en/events/123", &LOCALES));
        assert!(is_locale_rooted("/fr/a", &LOCALES));
    }

    #[test]
    fn test_is_locale_rooted_rejects() {
        // Locale root itself
        assert!(!is_locale_rooted("/fr/", &LOCALES));
        assert!(!is_locale_rooted("/fr", &LOCALES));
        assert!(!is_locale_rooted("/fr/#top", &LOCALES));
        // Fragment anywhere in the tail
        assert!(!is_locale_rooted("/fr/events#top", &LOCALES));
        assert!(!is_locale_rooted("/en/events/123#details", &LOCALES));
        // Other locales or prefixes
        assert!(!is_locale_rooted("/de/events", &LOCALES));
        assert!(!is_locale_rooted("/french/events", &LOCALES));
        assert!(!is_locale_rooted("/my-repo/fr/events", &LOCALES));
        assert!(!is_locale_rooted("fr/events", &LOCALES));
    }
}
