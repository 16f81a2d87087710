//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ScanScope, ScanTarget};

/// Base-path aware link auditor for multilingual static sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: baselink.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Deployment base path (e.g. `/my-repo`), overrides config and PUBLIC_REPO_NAME
    #[arg(short, long, global = true)]
    pub base: Option<String>,

    /// Public site URL, overrides config and PUBLIC_SITE_URL.
    ///
    /// Without an explicit base path, the URL's path component is used:
    ///   baselink --site-url "https://org.github.io/my-repo" validate
    #[arg(short = 'U', long = "site-url", global = true, value_hint = clap::ValueHint::Url)]
    pub site_url: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan build output or source templates for links that ignore the base path
    #[command(visible_alias = "v")]
    Validate {
        #[command(flatten)]
        args: ValidateArgs,
    },

    /// Resolve urls against the configured base path
    #[command(visible_alias = "u")]
    Url {
        #[command(subcommand)]
        op: UrlCommand,
    },
}

/// Validate command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Directory to scan (default: `validate.build.output` or `validate.source.root`)
    #[arg(value_name = "ROOT", value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// What to scan
    #[arg(short, long, value_enum, default_value_t = ScanTarget::Build)]
    pub target: ScanTarget,

    /// Part of each generated page to scan
    #[arg(short, long, value_enum)]
    pub scope: Option<ScanScope>,

    /// Critical template to check (repeatable, replaces configured pages)
    #[arg(short, long = "page", value_name = "PATH")]
    pub pages: Vec<PathBuf>,

    /// Check every template under the source root instead of the critical pages
    #[arg(short, long, conflicts_with = "pages")]
    pub all_templates: bool,

    /// Treat validation failures as warnings instead of errors
    #[arg(long, short = 'w')]
    pub warn_only: bool,
}

/// Url resolution operations.
#[derive(Subcommand, Debug, Clone)]
pub enum UrlCommand {
    /// Print the deployable url for a logical path
    Build {
        /// Logical path (`/fr/events`, `events`, `https://...`)
        path: String,
    },

    /// Print a pathname with the base path and trailing slash removed
    Normalize {
        /// Deployed pathname (`/my-repo/fr/events/`)
        pathname: String,
    },

    /// Exit with success if the link is active on the current page
    Active {
        /// Current page pathname
        current: String,
        /// Link target
        link: String,
    },

    /// Print the site origin joined with the base path
    BaseUrl,
}
