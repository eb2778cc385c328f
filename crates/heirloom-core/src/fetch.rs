//! Blocking HTTP fetch behind a small trait seam.
//!
//! The acquisition engine only needs "give me the bytes at this URL", so the
//! network sits behind [`Fetcher`]. [`HttpFetcher`] is the production
//! implementation (ureq, fixed timeout, identifying user agent); tests plug in
//! their own.

use std::io::Read;
use std::time::Duration;

/// Identifying client-agent string sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Historical Game Asset Downloader - Educational Use";

/// Request timeout applied to each fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from a single fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to connect to {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Failed to read response body from {url}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// Source of asset bytes.
pub trait Fetcher {
    /// Fetch the full body at `url`. Any non-success outcome is an error.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url)
    }
}

/// ureq-backed fetcher.
pub struct HttpFetcher {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpFetcher {
    /// Create a fetcher with a per-request timeout and user agent.
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            user_agent: user_agent.into(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(|e| classify(url, e))?;

        let mut body = Vec::new();
        response
            .into_body()
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            })?;

        tracing::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

fn classify(url: &str, err: ureq::Error) -> FetchError {
    let url = url.to_string();
    match err {
        ureq::Error::StatusCode(status) => FetchError::Status { url, status },
        ureq::Error::Timeout(_) => FetchError::Timeout { url },
        other => FetchError::Transport {
            url,
            reason: other.to_string(),
        },
    }
}
