//! Command-line interface module.

mod args;
pub mod url;
pub mod validate;

pub use args::{Cli, Commands, UrlCommand, ValidateArgs};
