//! Static HTTP fetch collaborator.

pub mod static_fetch;

pub use static_fetch::{FetchError, StaticFetcher, StaticPage, fetch_static};
