//! Batch classifier - the classify half of a scan
//!
//! URLs are split into fixed-size batches. For each batch the previews are
//! fetched one at a time, folded into a single prompt, and sent to the
//! completion service in one call. Failures cost at most one batch; they are
//! logged and the run moves on.

use crate::classifier::cancel::CancelProbe;
use crate::classifier::outcome::{BatchOutcome, ClassificationReport, RunOutcome, StopPoint};
use crate::classifier::prompt::{build_prompt, PagePreview};
use crate::classifier::reply::parse_reply;
use crate::classifier::service::{CompletionRequest, CompletionService};
use crate::config::Config;
use crate::preview::PreviewSource;
use std::collections::HashSet;

/// Tunables for a classification run
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierSettings {
    /// URLs per model call
    pub batch_size: usize,
    /// Sampling temperature sent with every call
    pub temperature: f32,
    /// Reply length bound sent with every call
    pub max_tokens: u32,
    /// Characters of page text per preview
    pub preview_chars: usize,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            batch_size: 8,
            temperature: 0.3,
            max_tokens: 1500,
            preview_chars: 800,
        }
    }
}

impl ClassifierSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            batch_size: config.classifier.batch_size,
            temperature: config.classifier.temperature,
            max_tokens: config.classifier.max_tokens,
            preview_chars: config.preview.max_chars,
        }
    }
}

/// Classifies pages in batches through a completion service
pub struct BatchClassifier<S, P> {
    service: S,
    previews: P,
    settings: ClassifierSettings,
}

impl<S, P> BatchClassifier<S, P>
where
    S: CompletionService,
    P: PreviewSource,
{
    pub fn new(service: S, previews: P, settings: ClassifierSettings) -> Self {
        Self {
            service,
            previews,
            settings,
        }
    }

    pub fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Classifies `urls`, returning every opportunity found
    ///
    /// # Per-Batch Flow
    ///
    /// 1. Ask `cancel` whether to stop; if so, return what we have
    /// 2. Fetch previews in input order, dropping empty ones
    /// 3. No previews: skip the batch without calling the service
    /// 4. Build the prompt (`prompt`, or the default instruction) and call
    ///    the service once
    /// 5. Parse the reply and keep real opportunities whose URL is one of
    ///    `urls`
    /// 6. Ask `cancel` again
    ///
    /// Cancellation is reported through [`RunOutcome::StoppedEarly`], never
    /// as an error.
    pub async fn classify(
        &self,
        urls: &[String],
        prompt: Option<&str>,
        model: &str,
        cancel: &dyn CancelProbe,
    ) -> ClassificationReport {
        let batch_size = self.settings.batch_size.max(1);
        let total_batches = urls.len().div_ceil(batch_size);
        let known_urls: HashSet<&str> = urls.iter().map(String::as_str).collect();
        let mut report = ClassificationReport::new(total_batches);

        for (index, batch) in urls.chunks(batch_size).enumerate() {
            let number = index + 1;

            if cancel.should_cancel().await {
                tracing::warn!("Cancelled before batch {} started", number);
                report.outcome = RunOutcome::StoppedEarly(StopPoint::BeforeBatch(number));
                return report;
            }

            tracing::info!(
                "Processing batch {}/{} ({} URLs)",
                number,
                total_batches,
                batch.len()
            );

            let outcome = self
                .process_batch(number, batch, prompt, model, &known_urls)
                .await;
            report.record(outcome);

            if cancel.should_cancel().await {
                tracing::warn!("Cancelled after batch {}, stopping early", number);
                report.outcome = RunOutcome::StoppedEarly(StopPoint::AfterBatch(number));
                return report;
            }
        }

        tracing::info!(
            "Classification finished: {} opportunities from {} batches",
            report.results.len(),
            total_batches
        );

        report
    }

    async fn process_batch(
        &self,
        number: usize,
        batch: &[String],
        prompt: Option<&str>,
        model: &str,
        known_urls: &HashSet<&str>,
    ) -> BatchOutcome {
        let mut previews = Vec::with_capacity(batch.len());
        for url in batch {
            let text = self
                .previews
                .fetch_preview(url, self.settings.preview_chars)
                .await;
            if !text.is_empty() {
                previews.push(PagePreview {
                    url: url.clone(),
                    text,
                });
            }
        }

        if previews.is_empty() {
            tracing::warn!("No previews found in batch {}. Skipping.", number);
            return BatchOutcome::NoPreviews;
        }

        let request = CompletionRequest {
            model: model.to_string(),
            prompt: build_prompt(prompt, &previews),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        tracing::debug!(
            "Sending batch {} ({} previews) to {}",
            number,
            previews.len(),
            model
        );

        let reply = match self.service.complete(request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Batch {} failed: {}", number, e);
                return BatchOutcome::ServiceFailed;
            }
        };

        let parsed = match parse_reply(&reply) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Batch {} reply unusable: {}", number, e);
                tracing::debug!("Reply text: {}", reply);
                return BatchOutcome::Unparseable;
            }
        };

        let mut rejected = parsed.rejected;
        let mut results = Vec::with_capacity(parsed.results.len());
        for result in parsed.results {
            if known_urls.contains(result.url.as_str()) {
                results.push(result);
            } else {
                tracing::warn!(
                    "Batch {}: dropping result for unknown URL {}",
                    number,
                    result.url
                );
                rejected += 1;
            }
        }

        tracing::info!(
            "Batch {} complete: {} opportunities, {} rejected",
            number,
            results.len(),
            rejected
        );

        BatchOutcome::Classified { results, rejected }
    }
}
