//! Engine types
//!
//! The fetch seam implemented by transports, and driver statistics.

use crate::error::Result;
use crate::pagination::{PageResponse, PaginationState};
use async_trait::async_trait;

/// Fetches one page for a request context.
///
/// Implementations own transport concerns such as timeouts. The driver calls
/// `fetch` once per issued intent and never retries.
#[async_trait]
pub trait PageFetcher: Send + Sync + 'static {
    /// Item type returned per page
    type Item: Clone + Send + Sync + 'static;
    /// Caller-supplied request context
    type Context: Clone + PartialEq + Send + Sync + 'static;
    /// Out-of-band payload returned alongside items
    type Extra: Clone + Send + Sync + 'static;

    /// Fetch `page` with `per_page` items under `context`
    async fn fetch(
        &self,
        context: &Self::Context,
        page: u32,
        per_page: u32,
    ) -> Result<PageResponse<Self::Item, Self::Extra>>;
}

/// Snapshot type driven by a fetcher
pub type ResourceState<F> = PaginationState<
    <F as PageFetcher>::Item,
    <F as PageFetcher>::Context,
    <F as PageFetcher>::Extra,
>;

/// Counters for a driven resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceStats {
    /// Fetch tasks started
    pub fetches_issued: usize,
    /// Completions reconciled
    pub completions: usize,
    /// Completions that carried an error
    pub failures: usize,
    /// Jumps to the last page after the total shrank
    pub corrective_jumps: usize,
}

impl ResourceStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add issued fetches
    pub fn add_issued(&mut self, count: usize) {
        self.fetches_issued += count;
    }

    /// Add a completion
    pub fn add_completion(&mut self) {
        self.completions += 1;
    }

    /// Add a failure
    pub fn add_failure(&mut self) {
        self.failures += 1;
    }

    /// Add a corrective jump
    pub fn add_corrective_jump(&mut self) {
        self.corrective_jumps += 1;
    }
}
