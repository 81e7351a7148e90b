//! Classification of crawled pages into RPA opportunities
//!
//! This module provides:
//! - The completion service seam and an OpenAI-compatible client
//! - Prompt assembly and reply parsing
//! - The batch classifier with cooperative cancellation

pub mod batch;
pub mod cancel;
pub mod openai;
pub mod outcome;
pub mod prompt;
pub mod reply;
pub mod service;

use serde::{Deserialize, Serialize};

pub use batch::{BatchClassifier, ClassifierSettings};
pub use cancel::{CancelFlag, CancelProbe, NeverCancel, ProbeFn};
pub use openai::OpenAiClient;
pub use outcome::{BatchOutcome, BatchStats, ClassificationReport, RunOutcome, StopPoint};
pub use prompt::{build_prompt, PagePreview, DEFAULT_PROMPT};
pub use reply::{is_opportunity, parse_reply, ReplyError};
pub use service::{CompletionRequest, CompletionService, ServiceError};

/// One page the model judged automatable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredResult {
    /// Page URL, one of the URLs handed to the classifier
    pub url: String,

    /// One-line description of the page
    pub summary: String,

    /// The automation opportunity the model identified
    pub rpa_opportunity: String,
}
