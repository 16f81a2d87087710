//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Extract the path component of a site URL, without surrounding slashes.
///
/// Port, credentials, query and fragment are ignored. Returns `None` if
/// the URL does not parse.
///
/// # Examples
/// ```ignore
/// extract_url_path("https://example.github.io/my-repo/")    -> Some("my-repo")
/// extract_url_path("https://example.com")                   -> Some("")
/// extract_url_path("https://example.com:8080/docs?x=1")     -> Some("docs")
/// extract_url_path("example.com")                           -> None
/// ```
pub fn extract_url_path(url_str: &str) -> Option<String> {
    let parsed = url::Url::parse(url_str).ok()?;
    Some(parsed.path().trim_matches('/').to_string())
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`.
/// Absolute paths are checked as-is.
///
/// # Example
/// ```text
/// /home/user/site/src/pages/      ← cwd
/// /home/user/site/baselink.toml   ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// tests
// ============================================================================
