//! RPA-Scout: finds automatable business processes on a website
//!
//! This crate crawls a site's internal link graph, fetches short text previews
//! of the discovered pages and asks a language model which of them describe
//! processes that could be automated with RPA.

pub mod classifier;
pub mod config;
pub mod crawler;
pub mod output;
pub mod pipeline;
pub mod preview;
pub mod url;

use thiserror::Error;

/// Main error type for RPA-Scout operations
///
/// Per-page and per-batch failures never surface here; they are logged and
/// skipped where they happen. Only setup problems propagate.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for RPA-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use classifier::{BatchClassifier, ClassificationReport, StructuredResult};
pub use config::Config;
pub use crawler::SiteCrawler;
pub use pipeline::{Pipeline, ScanReport, ScanRequest};
pub use preview::PreviewFetcher;
pub use crate::url::is_internal;
