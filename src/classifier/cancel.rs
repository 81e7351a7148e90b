//! Cooperative cancellation probes
//!
//! A scan asks its probe whether to stop at fixed checkpoints only (before
//! crawling, before classifying, and around each batch). Work already in
//! flight is never interrupted.

use async_trait::async_trait;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Asynchronous "should we stop?" predicate supplied by the caller
#[async_trait]
pub trait CancelProbe: Send + Sync {
    async fn should_cancel(&self) -> bool;
}

/// Probe that never asks to stop
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

#[async_trait]
impl CancelProbe for NeverCancel {
    async fn should_cancel(&self) -> bool {
        false
    }
}

/// Shared flag that can be raised from anywhere, e.g. a Ctrl-C handler
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; every clone observes it
    ///
    /// Returns true if cancellation had already been requested.
    pub fn cancel(&self) -> bool {
        self.flag.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CancelProbe for CancelFlag {
    async fn should_cancel(&self) -> bool {
        self.is_cancelled()
    }
}

/// Adapts an async closure into a probe
///
/// # Example
///
/// ```
/// use rpa_scout::classifier::{CancelProbe, ProbeFn};
///
/// # async fn example() {
/// let probe = ProbeFn(|| async { false });
/// assert!(!probe.should_cancel().await);
/// # }
/// ```
pub struct ProbeFn<F>(pub F);

#[async_trait]
impl<F, Fut> CancelProbe for ProbeFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = bool> + Send,
{
    async fn should_cancel(&self) -> bool {
        (self.0)().await
    }
}
