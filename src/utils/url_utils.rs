//! URL manipulation utilities.
//!
//! Every href and src that ends up in a `ScrapeResult` passes through
//! [`resolve_url`], which is what guarantees absolute URLs in the output.

use url::Url;

/// Schemes that never point at fetchable content
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Check if a URL is a valid absolute http(s) URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Add `https://` to a start URL that has no scheme
#[must_use]
pub fn normalize_start_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Resolve `href` against `base` into an absolute URL.
///
/// Handles relative paths, protocol-relative (`//host/x`) and fragment-only
/// (`#top`) references. Returns `None` for blank hrefs, non-content schemes
/// (`javascript:`, `mailto:`, `tel:`, `data:`) and anything that does not
/// resolve to an absolute http(s) URL.
#[must_use]
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    let resolved = match Url::parse(base) {
        Ok(base_url) => base_url.join(href).ok()?,
        Err(_) => Url::parse(href).ok()?,
    };

    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// Whether both URLs name the same host. Ports and schemes are not compared.
#[must_use]
pub fn same_host(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a.host_str().is_some() && a.host_str() == b.host_str(),
        _ => false,
    }
}
