//! Execution engine module
//!
//! Drives a [`PaginationState`](crate::pagination::PaginationState) against a
//! real transport.
//!
//! # Overview
//!
//! The engine module provides:
//! - `PageFetcher` - The async seam a transport implements
//! - `PagedResource` - Owns the latest snapshot and runs fetch intents
//! - `ResourceStats` - Counters for issued and reconciled fetches
//!
//! Each intent runs as its own tokio task and reports back through one
//! channel. Completions are reconciled one at a time, so the snapshot has a
//! single writer and is always replaced wholesale.

mod types;

pub use types::{PageFetcher, ResourceState, ResourceStats};

use crate::error::{Error, Result};
use crate::pagination::{FetchIntent, FetchOutcome, PageCompletion, PaginationState, Transition};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

type Completion<F> = PageCompletion<<F as PageFetcher>::Item, <F as PageFetcher>::Extra>;

/// A paginated resource bound to a fetcher.
///
/// Must be created inside a tokio runtime: construction already starts the
/// first fetches.
///
/// In-flight fetches are not cancelled on a context or per-page change. A
/// completion issued under the old context still lands in the reset cache by
/// page number, and if it arrives after the new result for that page it
/// replaces it.
pub struct PagedResource<F: PageFetcher> {
    fetcher: Arc<F>,
    state: ResourceState<F>,
    tx: mpsc::UnboundedSender<Completion<F>>,
    rx: mpsc::UnboundedReceiver<Completion<F>>,
    in_flight: usize,
    stats: ResourceStats,
}

impl<F: PageFetcher> PagedResource<F> {
    /// Create a resource at `page` and start fetching it
    pub fn new(fetcher: F, context: F::Context, page: u32, per_page: u32) -> Self {
        Self::from_arc(Arc::new(fetcher), context, page, per_page)
    }

    /// Create a resource over a shared fetcher
    pub fn from_arc(fetcher: Arc<F>, context: F::Context, page: u32, per_page: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let Transition { state, intents } = PaginationState::initial(context, page, per_page);

        let mut resource = Self {
            fetcher,
            state,
            tx,
            rx,
            in_flight: 0,
            stats: ResourceStats::default(),
        };
        resource.dispatch(intents);
        resource
    }

    /// Latest snapshot
    pub fn state(&self) -> &ResourceState<F> {
        &self.state
    }

    /// Statistics
    pub fn stats(&self) -> &ResourceStats {
        &self.stats
    }

    /// Fetches started but not yet reconciled
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Move to the next page if it has been requested
    pub fn move_next(&mut self) -> &ResourceState<F> {
        self.transition(PaginationState::move_next)
    }

    /// Move to the previous page if it has been requested
    pub fn move_previous(&mut self) -> &ResourceState<F> {
        self.transition(PaginationState::move_previous)
    }

    /// Jump to a page
    pub fn jump_to(&mut self, page: u32) -> &ResourceState<F> {
        self.transition(|state| state.jump_to(page))
    }

    /// Replace the request context
    pub fn update_request_context(&mut self, context: F::Context) -> &ResourceState<F> {
        self.transition(|state| state.update_request_context(context))
    }

    /// Change items per page
    pub fn update_items_per_page(&mut self, per_page: u32) -> &ResourceState<F> {
        self.transition(|state| state.update_items_per_page(per_page))
    }

    /// Reconcile a completion produced outside this resource
    pub fn apply_completion(&mut self, completion: Completion<F>) -> &ResourceState<F> {
        let page = completion.page;
        let before = self.state.current_page();
        let succeeded = match &completion.outcome {
            FetchOutcome::Succeeded(_) => true,
            FetchOutcome::Failed(_) => {
                self.stats.add_failure();
                false
            }
            FetchOutcome::Pending | FetchOutcome::NotAsked => false,
        };
        self.stats.add_completion();

        self.transition(|state| state.apply_completion(completion));
        if succeeded && page == before && self.state.current_page() != before {
            self.stats.add_corrective_jump();
        }
        &self.state
    }

    /// Wait for one fetch to finish and reconcile it.
    ///
    /// Returns `false` without waiting when nothing is in flight.
    pub async fn next_completion(&mut self) -> Result<bool> {
        if self.in_flight == 0 {
            return Ok(false);
        }
        let completion = self.rx.recv().await.ok_or(Error::ChannelClosed)?;
        self.in_flight -= 1;
        self.apply_completion(completion);
        Ok(true)
    }

    /// Reconcile completions until no fetch is outstanding.
    ///
    /// Does not return against a server whose total count includes the
    /// current page but which keeps answering it with no items: every
    /// corrective jump lands on the same page and fetches it again. Wrap the
    /// call in `tokio::time::timeout` when the server is not trusted.
    pub async fn settle(&mut self) -> Result<()> {
        while self.next_completion().await? {}
        Ok(())
    }

    fn transition(
        &mut self,
        f: impl FnOnce(ResourceState<F>) -> Transition<F::Item, F::Context, F::Extra>,
    ) -> &ResourceState<F> {
        let Transition { state, intents } = f(self.state.clone());
        self.state = state;
        self.dispatch(intents);
        &self.state
    }

    fn dispatch(&mut self, intents: Vec<FetchIntent<F::Context>>) {
        self.stats.add_issued(intents.len());
        self.in_flight += intents.len();

        for intent in intents {
            let fetcher = Arc::clone(&self.fetcher);
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let FetchIntent {
                    request_context,
                    page,
                    per_page,
                    purpose,
                } = intent;
                debug!(page, ?purpose, "fetch started");
                let result = fetcher.fetch(&request_context, page, per_page).await;
                // Receiver only goes away with the resource itself.
                let _ = tx.send(PageCompletion::new(page, result));
            });
        }
    }
}

impl<F: PageFetcher> std::fmt::Debug for PagedResource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedResource")
            .field("current_page", &self.state.current_page())
            .field("per_page", &self.state.per_page())
            .field("total_items", &self.state.total_items())
            .field("in_flight", &self.in_flight)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
