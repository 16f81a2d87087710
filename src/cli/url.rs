//! `url` command: resolve links the way site templates do.
//!
//! Uses the process-wide base path installed at startup, so the output
//! matches what the deployed site emits for the same configuration.

use anyhow::{Context, Result, bail};

use super::UrlCommand;
use crate::config::SiteConfig;
use crate::core::{build_url, get_base_url, is_active_path, normalize_pathname};
use crate::debug;

/// Run a url operation and print its result to stdout.
pub fn run_url(op: &UrlCommand, config: &SiteConfig) -> Result<()> {
    debug!("url"; "base path `{}`", config.base_path());

    let output = resolve(op, config.site.url.as_deref(), None)?;
    println!("{output}");

    if let UrlCommand::Active { current, link } = op
        && output == "false"
    {
        bail!("`{link}` is not active on `{current}`");
    }
    Ok(())
}

/// Evaluate `op`. `None` base means the process default.
fn resolve(op: &UrlCommand, site_url: Option<&str>, base: Option<&str>) -> Result<String> {
    let output = match op {
        UrlCommand::Build { path } => build_url(path, base),
        UrlCommand::Normalize { pathname } => normalize_pathname(pathname, base),
        UrlCommand::Active { current, link } => is_active_path(current, link, base).to_string(),
        UrlCommand::BaseUrl => get_base_url(site_url, base)
            .with_context(|| format!("invalid site url `{}`", site_url.unwrap_or_default()))?,
    };
    Ok(output)
}
