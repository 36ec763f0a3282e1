//! Plain HTTP page fetch
//!
//! Retrieves a document without executing any script. Failures are mapped
//! onto the `FetchError` taxonomy so the strategy selector and the result's
//! `errors` list can reason about them.

use reqwest::{Client, StatusCode, redirect};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::utils::constants::CHROME_USER_AGENT;

/// Redirect hops tolerated before the chain is reported as a loop
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPage {
    pub html: String,
    /// URL after redirects
    pub final_url: String,
    pub status_code: u16,
}

/// Why a static fetch produced no document
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP 401 Unauthorized")]
    Unauthorized,

    #[error("HTTP 403 Forbidden")]
    Forbidden,

    #[error("HTTP 404 Not Found")]
    NotFound,

    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Client errors outside the named ones (410, 429, ...)
    #[error("Unexpected HTTP status {status}")]
    HttpStatus { status: u16 },

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Redirect loop: {0}")]
    RedirectLoop(String),
}

impl FetchError {
    /// Taxonomy name used in `ErrorRecord::error_type`
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "notFound",
            Self::ServerError { .. } => "serverError",
            Self::HttpStatus { .. } => "httpStatus",
            Self::NetworkFailure(_) => "networkFailure",
            Self::Timeout(_) => "timeout",
            Self::RedirectLoop(_) => "redirectLoop",
        }
    }

    /// HTTP status behind the error, when there was a response
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound => Some(404),
            Self::ServerError { status } | Self::HttpStatus { status } => Some(*status),
            _ => None,
        }
    }

    /// Map a non-success status onto the taxonomy
    #[must_use]
    pub fn from_status(status: StatusCode) -> Option<Self> {
        if status.is_success() {
            return None;
        }
        Some(match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::NOT_FOUND => Self::NotFound,
            s if s.is_server_error() => Self::ServerError { status: s.as_u16() },
            s => Self::HttpStatus { status: s.as_u16() },
        })
    }

    fn from_reqwest(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else if err.is_redirect() {
            Self::RedirectLoop(err.to_string())
        } else {
            Self::NetworkFailure(err.to_string())
        }
    }
}

/// Reusable static fetcher with browser-like headers
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    client: Client,
    timeout_secs: u64,
}

impl StaticFetcher {
    /// Build a fetcher with the given per-request timeout and user agent
    pub fn new(timeout_secs: u64, user_agent: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// Fetch `url` and return its body, or the classified failure.
    pub async fn fetch(&self, url: &str) -> Result<StaticPage, FetchError> {
        info!("Static fetch: {}", url);

        let response = self
            .client
            .get(url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| {
                let err = FetchError::from_reqwest(&e, self.timeout_secs);
                warn!("Static fetch failed for {}: {}", url, err);
                err
            })?;

        let status = response.status();
        if let Some(err) = FetchError::from_status(status) {
            warn!("Static fetch for {} returned {}", url, status);
            return Err(err);
        }

        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(&e, self.timeout_secs))?;

        debug!(
            "Static fetch complete: {} ({} bytes, final url {})",
            url,
            html.len(),
            final_url
        );

        Ok(StaticPage {
            html,
            final_url,
            status_code: status.as_u16(),
        })
    }
}

/// One-shot static fetch with the default user agent.
pub async fn fetch_static(url: &str, timeout_secs: u64) -> Result<StaticPage, FetchError> {
    let fetcher = StaticFetcher::new(timeout_secs, CHROME_USER_AGENT)
        .map_err(|e| FetchError::NetworkFailure(format!("{e:#}")))?;
    fetcher.fetch(url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_taxonomy() {
        assert_eq!(FetchError::from_status(StatusCode::OK), None);
        assert_eq!(
            FetchError::from_status(StatusCode::FORBIDDEN),
            Some(FetchError::Forbidden)
        );
        assert_eq!(
            FetchError::from_status(StatusCode::BAD_GATEWAY),
            Some(FetchError::ServerError { status: 502 })
        );
        assert_eq!(
            FetchError::from_status(StatusCode::TOO_MANY_REQUESTS),
            Some(FetchError::HttpStatus { status: 429 })
        );
    }

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(FetchError::Forbidden.kind_name(), "forbidden");
        assert_eq!(FetchError::Timeout(30).kind_name(), "timeout");
        assert_eq!(FetchError::NotFound.status_code(), Some(404));
        assert_eq!(FetchError::NetworkFailure("x".into()).status_code(), None);
    }
}
