//! baselink - base-path aware link resolution and auditing for multilingual static sites.

mod cli;
mod config;
mod core;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli)?;
    if let Some(path) = &config.config_path {
        debug!("config"; "loaded {}", path.display());
    }

    // Every resolver call without an explicit base uses this one
    core::set_default_base(config.base_path());

    match &cli.command {
        Commands::Validate { args } => cli::validate::validate_site(&config, args.target),
        Commands::Url { op } => cli::url::run_url(op, &config),
    }
}
