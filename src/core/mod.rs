//! Core types - pure abstractions shared across the codebase.

mod link;
pub mod url;

pub use link::{LinkKind, is_locale_rooted};
pub use url::{
    BasePath, build_url, get_base_url, is_active_path, is_external_url, normalize_base_path,
    normalize_pathname, set_default_base, strip_query_fragment,
};
