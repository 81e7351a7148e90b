//! Run outcomes and per-batch bookkeeping

use crate::classifier::StructuredResult;
use std::fmt;

/// Checkpoint at which a cancellation request was honoured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPoint {
    /// Before the crawl started
    BeforeCrawl,
    /// After crawling, before any batch
    BeforeClassify,
    /// Before the given batch (1-based) started
    BeforeBatch(usize),
    /// After the given batch (1-based) finished
    AfterBatch(usize),
}

impl fmt::Display for StopPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopPoint::BeforeCrawl => write!(f, "before crawling"),
            StopPoint::BeforeClassify => write!(f, "before classification"),
            StopPoint::BeforeBatch(n) => write!(f, "before batch {}", n),
            StopPoint::AfterBatch(n) => write!(f, "after batch {}", n),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every batch was processed
    Completed,
    /// The caller asked to stop; results up to this point are kept
    StoppedEarly(StopPoint),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Completed => write!(f, "completed"),
            RunOutcome::StoppedEarly(point) => write!(f, "stopped early ({})", point),
        }
    }
}

/// What happened to a single batch
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// The model replied and the reply was parsed
    Classified {
        results: Vec<StructuredResult>,
        rejected: usize,
    },
    /// Every preview in the batch was empty; no model call was made
    NoPreviews,
    /// The completion service call failed
    ServiceFailed,
    /// The reply held no usable JSON array
    Unparseable,
}

/// Counters across all batches of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Batches the URL list was split into
    pub total: usize,
    /// Batches whose reply was parsed
    pub classified: usize,
    /// Batches skipped because no preview could be fetched
    pub skipped_no_previews: usize,
    /// Batches lost to completion service errors
    pub service_failures: usize,
    /// Batches whose reply held no usable JSON array
    pub unparseable: usize,
    /// Reply items dropped as non-opportunities
    pub rejected_items: usize,
}

impl BatchStats {
    /// Batches that reached a terminal state
    pub fn attempted(&self) -> usize {
        self.classified + self.skipped_no_previews + self.service_failures + self.unparseable
    }
}

/// Everything a classification run produced
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    /// Opportunities in input order (batch order, then reply order)
    pub results: Vec<StructuredResult>,
    pub outcome: RunOutcome,
    pub stats: BatchStats,
}

impl ClassificationReport {
    pub fn new(total_batches: usize) -> Self {
        Self {
            results: Vec::new(),
            outcome: RunOutcome::Completed,
            stats: BatchStats {
                total: total_batches,
                ..BatchStats::default()
            },
        }
    }

    /// A report for a run cancelled before classification began
    pub fn stopped(point: StopPoint) -> Self {
        Self {
            outcome: RunOutcome::StoppedEarly(point),
            ..Self::new(0)
        }
    }

    /// Folds one batch into the running totals
    pub fn record(&mut self, outcome: BatchOutcome) {
        match outcome {
            BatchOutcome::Classified { results, rejected } => {
                self.stats.classified += 1;
                self.stats.rejected_items += rejected;
                self.results.extend(results);
            }
            BatchOutcome::NoPreviews => self.stats.skipped_no_previews += 1,
            BatchOutcome::ServiceFailed => self.stats.service_failures += 1,
            BatchOutcome::Unparseable => self.stats.unparseable += 1,
        }
    }

    pub fn stopped_early(&self) -> bool {
        !self.outcome.is_completed()
    }
}
