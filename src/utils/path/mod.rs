//! Path utilities.
//!
//! - [`fs`]: absolute normalization and root-relative display (`normalize_path`, `relative_display`)

pub mod fs;

pub use fs::{normalize_path, relative_display};
