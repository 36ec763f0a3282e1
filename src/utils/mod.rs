pub mod constants;
pub mod string_utils;
pub mod url_utils;

pub use constants::*;
pub use string_utils::{collapse_whitespace, first_words, safe_truncate_chars};
pub use url_utils::{is_valid_url, normalize_start_url, resolve_url, same_host};
