//! Configuration management for `baselink.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── site       # [site]
//! │   └── validate   # [validate.build], [validate.source]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # url path extraction, config file lookup
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Precedence
//!
//! `baselink.toml` < environment (`PUBLIC_SITE_URL`, `PUBLIC_REPO_NAME`) < CLI flags.
//! A missing config file is not an error: every field has a default.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    BuildValidateConfig, ScanScope, ScanTarget, SiteSectionConfig, SourceValidateConfig,
    ValidateConfig, ValidateLevel,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands, ValidateArgs},
    core::BasePath,
    log,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name, searched upward from the working directory.
pub const CONFIG_FILE: &str = "baselink.toml";

/// Environment variable holding the public site URL.
pub const ENV_SITE_URL: &str = "PUBLIC_SITE_URL";

/// Environment variable holding the repository name (base path `/<name>`).
pub const ENV_REPO_NAME: &str = "PUBLIC_REPO_NAME";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing baselink.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory - parent of config file, else cwd (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Site deployment settings
    #[serde(default)]
    pub site: SiteSectionConfig,

    /// Validation settings
    #[serde(default)]
    pub validate: ValidateConfig,
}

impl SiteConfig {
    /// Load configuration for the given CLI invocation.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory, or cwd when no file exists.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let config_name = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        let mut config = match find_config_file(&config_name) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = Some(path);
                config
            }
            // An explicitly requested config must exist
            None if cli.config.is_some() => {
                bail!("config file '{}' not found", config_name.display());
            }
            None => Self {
                root: cwd,
                ..Self::default()
            },
        };

        config.root = crate::utils::path::normalize_path(&config.root);
        config.apply_env(|key| std::env::var(key).ok());
        config.apply_site_args(cli);
        config.normalize_paths();

        if let Commands::Validate { args } = &cli.command {
            config.apply_validate_args(args);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Effective deployment base path.
    #[inline]
    pub fn base_path(&self) -> BasePath {
        self.site.base_path()
    }

    // ========================================================================
    // overrides
    // ========================================================================

    /// Apply deployment settings from the environment.
    ///
    /// Mirrors the site build: `PUBLIC_REPO_NAME=my-repo` deploys under `/my-repo`.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(ENV_SITE_URL).filter(|v| !v.is_empty()) {
            self.site.url = Some(url);
        }
        if let Some(repo) = var(ENV_REPO_NAME).filter(|v| !v.is_empty()) {
            self.site.base = Some(format!("/{}", repo.trim_matches('/')));
        }
    }

    /// Apply global site flags from CLI.
    fn apply_site_args(&mut self, cli: &Cli) {
        if let Some(url) = &cli.site_url {
            self.site.url = Some(url.clone());
        }
        if let Some(base) = &cli.base {
            self.site.base = Some(base.clone());
        }
    }

    /// Apply validate arguments from CLI.
    ///
    /// A positional root is resolved against cwd, not the project root.
    fn apply_validate_args(&mut self, args: &ValidateArgs) {
        if let Some(root) = &args.root {
            let root = crate::utils::path::normalize_path(root);
            match args.target {
                ScanTarget::Build => self.validate.build.output = root,
                ScanTarget::Source => self.validate.source.root = root,
            }
        }

        Self::update_option(&mut self.validate.build.scope, args.scope.as_ref());

        if !args.pages.is_empty() {
            self.validate.source.pages = args.pages.clone();
        }

        if args.all_templates {
            self.validate.source.pages.clear();
        }

        // --warn-only sets all levels to Warn
        if args.warn_only {
            self.validate.set_warn_only();
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve scan directories relative to the project root.
    fn normalize_paths(&mut self) {
        let root = self.root.clone();
        self.validate.build.output =
            crate::utils::path::normalize_path(&root.join(&self.validate.build.output));
        self.validate.source.root =
            crate::utils::path::normalize_path(&root.join(&self.validate.source.root));
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, collecting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.validate.validate(&mut diag);

        Ok(diag.into_result()?)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = SiteConfig::parse_with_ignored("[site\nbase = \"/x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_site_config_default() {
        let config = SiteConfig::default();
        assert!(config.config_path.is_none());
        assert!(config.base_path().is_root());
        assert_eq!(config.validate.build.extension, "html");
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[site]\nbase = \"/x\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
        assert_eq!(config.base_path().as_str(), "/x");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_apply_env_repo_name() {
        let mut config = SiteConfig::default();
        config.apply_env(env_from(&[(ENV_REPO_NAME, "website_template")]));
        assert_eq!(config.base_path().as_str(), "/website_template");
    }

    #[test]
    fn test_apply_env_site_url() {
        let mut config = SiteConfig::default();
        config.apply_env(env_from(&[(ENV_SITE_URL, "https://org.github.io/repo")]));
        assert_eq!(config.site.url.as_deref(), Some("https://org.github.io/repo"));
        assert_eq!(config.base_path().as_str(), "/repo");
    }

    #[test]
    fn test_apply_env_empty_values_ignored() {
        let mut config = test_parse_config("[site]\nbase = \"/kept\"");
        config.apply_env(env_from(&[(ENV_REPO_NAME, ""), (ENV_SITE_URL, "")]));
        assert_eq!(config.base_path().as_str(), "/kept");
        assert!(config.site.url.is_none());
    }

    #[test]
    fn test_cli_overrides_env() {
        let cli = Cli::parse_from(["baselink", "--base", "/cli-base", "validate"]);
        let mut config = SiteConfig::default();
        config.apply_env(env_from(&[(ENV_REPO_NAME, "env-base")]));
        config.apply_site_args(&cli);
        assert_eq!(config.base_path().as_str(), "/cli-base");
    }

    #[test]
    fn test_apply_validate_args() {
        let cli = Cli::parse_from([
            "baselink",
            "validate",
            "--target",
            "source",
            "--page",
            "src/pages/index.astro",
            "--warn-only",
        ]);
        let Commands::Validate { args } = &cli.command else {
            panic!("expected validate command");
        };
        let mut config = SiteConfig::default();
        config.apply_validate_args(args);
        assert_eq!(
            config.validate.source.pages,
            vec![PathBuf::from("src/pages/index.astro")]
        );
        assert_eq!(config.validate.source.level, ValidateLevel::Warn);
        assert_eq!(config.validate.build.broken, ValidateLevel::Warn);
    }

    #[test]
    fn test_apply_validate_args_scope() {
        let cli = Cli::parse_from(["baselink", "validate", "--scope", "nav"]);
        let Commands::Validate { args } = &cli.command else {
            panic!("expected validate command");
        };
        let mut config = SiteConfig::default();
        config.apply_validate_args(args);
        assert_eq!(config.validate.build.scope, ScanScope::Nav);
    }

    #[test]
    fn test_normalize_paths_joins_root() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("dist")).unwrap();
        let mut config = SiteConfig {
            root: crate::utils::path::normalize_path(dir.path()),
            ..SiteConfig::default()
        };
        config.normalize_paths();
        assert_eq!(
            config.validate.build.output,
            crate::utils::path::normalize_path(&dir.path().join("dist"))
        );
    }
}
