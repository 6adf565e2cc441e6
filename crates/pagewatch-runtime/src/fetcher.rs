//! Page fetching.

use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use crate::error::{FetchError, Result, RuntimeError};

/// Source of page bodies.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the body of `url` as text.
    ///
    /// An empty body is reported as [`FetchError::EmptyBody`], never as `Ok("")`.
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError>;
}

/// [`Fetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pagewatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RuntimeError::Http(e.to_string()))?;
        Ok(Self { client })
    }
}

fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(error.to_string())
    } else {
        FetchError::Network(error.to_string())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(classify)?;
        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        trace!(url = %url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}
