//! Errors raised while loading `baselink.toml`.

use super::FieldPath;
use crate::utils::plural_count;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file is not valid TOML")]
    Toml(#[from] toml::de::Error),

    // No #[source]: the issues are already part of the message
    #[error("{0}")]
    Invalid(ConfigDiagnostics),
}

/// One rejected config value.
#[derive(Debug, Clone)]
struct FieldIssue {
    field: FieldPath,
    message: String,
    hint: Option<String>,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {} {}: {}", "×".red(), self.field, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n    {} {}", "hint:".yellow(), hint)?;
        }
        Ok(())
    }
}

/// Every problem found by one validation pass, reported together.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    issues: Vec<FieldIssue>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(field, message.into(), Some(hint.into()));
    }

    fn push(&mut self, field: FieldPath, message: String, hint: Option<String>) {
        self.issues.push(FieldIssue { field, message, hint });
    }

    pub fn has_errors(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Fields with at least one issue, in the order they were reported.
    #[cfg(test)]
    pub fn fields(&self) -> Vec<FieldPath> {
        self.issues.iter().map(|issue| issue.field).collect()
    }

    pub fn into_result(self) -> Result<(), ConfigError> {
        if self.has_errors() {
            Err(ConfigError::Invalid(self))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            "invalid configuration".red().bold(),
            plural_count(self.issues.len(), "issue")
        )?;
        for issue in &self.issues {
            write!(f, "\n{issue}")?;
        }
        Ok(())
    }
}
