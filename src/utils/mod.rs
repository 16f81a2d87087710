//! Shared helpers for paths and report wording.

pub mod path;
mod plural;

pub use plural::{plural_count, plural_s};
