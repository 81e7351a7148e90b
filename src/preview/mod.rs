//! Page preview module
//!
//! Fetches a page and reduces it to a short plain-text excerpt for the
//! classifier prompt. Previews never fail: any problem yields an empty string,
//! which the classifier reads as "no preview available".

mod extract;

pub use extract::extract_preview_text;

use crate::config::Config;
use crate::crawler::{build_http_client, fetch_page, FetchResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Source of page previews consumed by the batch classifier
#[async_trait]
pub trait PreviewSource: Send + Sync {
    /// Returns at most `max_chars` characters of visible text for `url`,
    /// or an empty string when no preview is available
    async fn fetch_preview(&self, url: &str, max_chars: usize) -> String;
}

/// Fetches previews over HTTP
pub struct PreviewFetcher {
    client: Client,
}

impl PreviewFetcher {
    /// Creates a fetcher using an already configured HTTP client
    ///
    /// The client's timeout is the preview timeout.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with the configured user agent and preview timeout
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.preview.timeout_secs),
        )?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl PreviewSource for PreviewFetcher {
    async fn fetch_preview(&self, url: &str, max_chars: usize) -> String {
        match fetch_page(&self.client, url).await {
            FetchResult::Success { body, .. } => extract_preview_text(&body, max_chars),
            failure => {
                tracing::debug!(
                    "No preview for {}: {}",
                    url,
                    failure.failure_reason().unwrap_or_default()
                );
                String::new()
            }
        }
    }
}
