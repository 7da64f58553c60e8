//! Error taxonomy for a census run.
//!
//! Sitemap failures and page failures are separate types so the driver can
//! only ever propagate the former: [`SitemapError`] aborts a run, while a
//! [`PageError`] is reported and skipped.

use thiserror::Error;

/// A single HTTP request did not produce a usable body.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("Failed to fetch {url}. Status: {status}")]
    Status { url: String, status: u16 },
    /// The request itself failed (DNS, TLS, connection reset, bad URL, ...).
    #[error("Failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Transport { url, .. } => url,
        }
    }
}

/// Fatal: a sitemap could not be fetched or did not look like a sitemap.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The body was not a `urlset` of `url`/`loc` entries.
    #[error("Invalid sitemap format for {url}: {reason}")]
    Parse {
        url: String,
        reason: String,
        /// Element outline of what was actually parsed, for diagnostics.
        outline: String,
    },
}

/// Recoverable: one page could not be analyzed.
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Failed to analyze {url}: {reason}")]
    Analysis { url: String, reason: String },
}

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid sitemap URL {url:?}: {reason}")]
    SitemapUrl { url: String, reason: String },
    #[error("invalid class name {0:?}: must be non-empty and contain no whitespace")]
    ClassName(String),
    #[error("no sitemaps configured")]
    NoSitemaps,
    #[error("no class names configured")]
    NoClasses,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_matches_console_format() {
        let err = FetchError::Status {
            url: "https://example.com/a".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch https://example.com/a. Status: 404"
        );
        assert_eq!(err.url(), "https://example.com/a");
    }

    #[test]
    fn test_page_error_is_transparent_over_fetch() {
        let err = PageError::from(FetchError::Status {
            url: "https://example.com/b".to_string(),
            status: 500,
        });
        assert_eq!(
            err.to_string(),
            "Failed to fetch https://example.com/b. Status: 500"
        );
    }

    #[test]
    fn test_sitemap_parse_message() {
        let err = SitemapError::Parse {
            url: "https://example.com/sitemap.xml".to_string(),
            reason: "root element is <sitemapindex>, expected <urlset>".to_string(),
            outline: "sitemapindex".to_string(),
        };
        assert!(err
            .to_string()
            .starts_with("Invalid sitemap format for https://example.com/sitemap.xml"));
    }
}
