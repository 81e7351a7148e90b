//! Scan pipeline - crawl a site, then classify what was found
//!
//! A scan walks through three checkpoints:
//! 1. Cancellation check, then crawl from the seed
//! 2. Cancellation check, then batch classification
//! 3. Assemble the [`ScanReport`]
//!
//! Only setup problems (invalid configuration, bad seed URL, HTTP client
//! construction) are errors.
//! Everything that goes wrong per page or per batch is absorbed further down.

use crate::classifier::{
    BatchClassifier, CancelProbe, ClassificationReport, ClassifierSettings, CompletionService,
    StopPoint,
};
use crate::config::{validate, Config};
use crate::crawler::SiteCrawler;
use crate::preview::{PreviewFetcher, PreviewSource};
use crate::url::parse_seed;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// What to scan and how to judge it
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    /// Site entry point; must be an absolute http(s) URL
    pub seed_url: String,

    /// Classification instructions; `None` uses the default prompt
    pub prompt: Option<String>,

    /// Model identifier passed to the completion service
    pub model: String,

    /// Link hops to follow from the seed
    pub max_depth: u32,
}

impl ScanRequest {
    /// Creates a request using the configured model and crawl depth
    pub fn from_config(seed_url: impl Into<String>, config: &Config) -> Self {
        Self {
            seed_url: seed_url.into(),
            prompt: config.classifier.prompt.clone(),
            model: config.classifier.model.clone(),
            max_depth: config.crawler.max_depth,
        }
    }

    pub fn with_prompt(mut self, prompt: Option<String>) -> Self {
        if prompt.is_some() {
            self.prompt = prompt;
        }
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Outcome of one scan
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Normalized seed URL
    pub seed_url: String,
    pub model: String,
    pub max_depth: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// SHA-256 of the configuration file the scan ran with
    pub config_hash: String,

    /// Pages found by the crawl, in first-visit order
    pub discovered_urls: Vec<String>,

    pub classification: ClassificationReport,
}

impl ScanReport {
    pub fn pages_discovered(&self) -> usize {
        self.discovered_urls.len()
    }

    pub fn opportunities(&self) -> usize {
        self.classification.results.len()
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Crawl-then-classify driver
pub struct Pipeline<S, P = PreviewFetcher> {
    config: Arc<Config>,
    config_hash: String,
    crawler: SiteCrawler,
    classifier: BatchClassifier<S, P>,
}

impl<S: CompletionService> Pipeline<S, PreviewFetcher> {
    /// Builds a pipeline with HTTP crawling and previews from the configuration
    ///
    /// The configuration is validated first.
    pub fn new(config: Config, config_hash: String, service: S) -> crate::Result<Self> {
        validate(&config)?;
        let crawler = SiteCrawler::from_config(&config)?;
        let previews = PreviewFetcher::from_config(&config)?;
        let settings = ClassifierSettings::from_config(&config);
        let classifier = BatchClassifier::new(service, previews, settings);

        Ok(Self::from_parts(config, config_hash, crawler, classifier))
    }
}

impl<S, P> Pipeline<S, P>
where
    S: CompletionService,
    P: PreviewSource,
{
    /// Assembles a pipeline from pre-built stages
    pub fn from_parts(
        config: Config,
        config_hash: String,
        crawler: SiteCrawler,
        classifier: BatchClassifier<S, P>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            config_hash,
            crawler,
            classifier,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    /// Runs one scan
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScoutError::UrlError`] if the seed is not an absolute
    /// http(s) URL. Cancellation is not an error: the report's outcome says
    /// where the scan stopped.
    pub async fn run(
        &self,
        request: &ScanRequest,
        cancel: &dyn CancelProbe,
    ) -> crate::Result<ScanReport> {
        let seed = parse_seed(&request.seed_url)?;
        let seed_url = seed.to_string();
        let started_at = Utc::now();

        tracing::info!(
            "Starting scan of {} (depth {}, model {})",
            seed_url,
            request.max_depth,
            request.model
        );

        let report = |discovered_urls: Vec<String>, classification: ClassificationReport| {
            ScanReport {
                seed_url: seed_url.clone(),
                model: request.model.clone(),
                max_depth: request.max_depth,
                started_at,
                finished_at: Utc::now(),
                config_hash: self.config_hash.clone(),
                discovered_urls,
                classification,
            }
        };

        if cancel.should_cancel().await {
            tracing::warn!("Scan cancelled before crawling");
            return Ok(report(
                Vec::new(),
                ClassificationReport::stopped(StopPoint::BeforeCrawl),
            ));
        }

        let discovered = self.crawler.crawl(&seed_url, request.max_depth).await;
        tracing::info!("Crawl found {} pages", discovered.len());

        if cancel.should_cancel().await {
            tracing::warn!("Scan cancelled before classification");
            return Ok(report(
                discovered,
                ClassificationReport::stopped(StopPoint::BeforeClassify),
            ));
        }

        let classification = self
            .classifier
            .classify(&discovered, request.prompt.as_deref(), &request.model, cancel)
            .await;

        tracing::info!(
            "Scan of {} finished ({}): {} opportunities across {} pages",
            seed_url,
            classification.outcome,
            classification.results.len(),
            discovered.len()
        );

        Ok(report(discovered, classification))
    }
}
