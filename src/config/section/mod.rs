//! Configuration section definitions.
//!
//! Each module corresponds to a section in `baselink.toml`:
//!
//! | Module     | TOML Section   | Purpose                              |
//! |------------|----------------|--------------------------------------|
//! | `site`     | `[site]`       | Site url, base path, locales         |
//! | `validate` | `[validate]`   | Build output and source scans        |

mod site;
mod validate;

pub use site::SiteSectionConfig;
pub use validate::{
    BuildValidateConfig, DEFAULT_CRITICAL_PAGES, ScanScope, ScanTarget, SourceValidateConfig,
    ValidateConfig, ValidateLevel,
};
