//! Completion reconciliation
//!
//! Merges a finished fetch into the snapshot. Results are written by absolute
//! page number whether or not the page is still near the current one.

use super::orchestrator::Transition;
use super::types::{total_pages, Chunk, FetchStatus, PaginationState};
use crate::error::FetchError;
use tracing::{debug, info, warn};

/// Payload of a successful page fetch
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<T, X> {
    /// Items on the page
    pub items: Vec<T>,
    /// Server-reported total across all pages
    pub total_count: u64,
    /// Out-of-band payload returned alongside the items
    pub extra_data: Option<X>,
}

impl<T, X> PageResponse<T, X> {
    /// Create a response without extra data
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self {
            items,
            total_count,
            extra_data: None,
        }
    }

    /// Attach extra data
    #[must_use]
    pub fn with_extra(mut self, extra: X) -> Self {
        self.extra_data = Some(extra);
        self
    }
}

/// What came back for a page
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T, X> {
    /// Echo of a not-requested state
    NotAsked,
    /// Progress notification
    Pending,
    /// The fetch failed
    Failed(FetchError),
    /// The fetch succeeded
    Succeeded(PageResponse<T, X>),
}

impl<T, X> From<crate::error::Result<PageResponse<T, X>>> for FetchOutcome<T, X> {
    fn from(result: crate::error::Result<PageResponse<T, X>>) -> Self {
        match result {
            Ok(response) => Self::Succeeded(response),
            Err(error) => Self::Failed(FetchError::new(error)),
        }
    }
}

/// A fetch result tagged with the page it was issued for
#[derive(Debug, Clone, PartialEq)]
pub struct PageCompletion<T, X> {
    /// Page the fetch was issued for
    pub page: u32,
    /// What came back
    pub outcome: FetchOutcome<T, X>,
}

impl<T, X> PageCompletion<T, X> {
    /// Tag an outcome with its page
    pub fn new(page: u32, outcome: impl Into<FetchOutcome<T, X>>) -> Self {
        Self {
            page,
            outcome: outcome.into(),
        }
    }

    /// Successful completion
    pub fn succeeded(page: u32, response: PageResponse<T, X>) -> Self {
        Self::new(page, FetchOutcome::Succeeded(response))
    }

    /// Failed completion
    pub fn failed(page: u32, error: impl Into<FetchError>) -> Self {
        Self::new(page, FetchOutcome::Failed(error.into()))
    }
}

impl<T, C: Clone + PartialEq, X> PaginationState<T, C, X> {
    /// Merge a completed fetch into the snapshot.
    ///
    /// An empty success for the current page while the new total still has
    /// pages means the page no longer exists; the result is then a jump to the
    /// last page.
    pub fn apply_completion(mut self, completion: PageCompletion<T, X>) -> Transition<T, C, X> {
        let PageCompletion { page, outcome } = completion;
        if page == 0 {
            warn!("ignoring completion for page 0");
            return Transition::unchanged(self);
        }

        match outcome {
            FetchOutcome::Failed(error) => {
                warn!(page, %error, "page fetch failed");
                self.cache.insert(page, FetchStatus::Failed(error));
                Transition::unchanged(self)
            }
            FetchOutcome::Succeeded(PageResponse {
                items,
                total_count,
                extra_data,
            }) => {
                let empty = items.is_empty();
                debug!(page, items = items.len(), total_count, "page fetch succeeded");

                self.cache
                    .insert(page, FetchStatus::Succeeded(Chunk::new(items, page)));
                self.total_count = total_count;
                self.extra_data = extra_data;

                let last_page = total_pages(total_count, self.per_page);
                if empty && last_page > 0 && page == self.current_page {
                    if last_page == page {
                        warn!(
                            page,
                            "server counts this page but returned no items, fetching it again"
                        );
                    }
                    info!(
                        page,
                        last_page, "current page is past the end, jumping to last page"
                    );
                    self.jump_to(last_page)
                } else {
                    Transition::unchanged(self)
                }
            }
            FetchOutcome::Pending => {
                self.cache.insert(page, FetchStatus::Pending);
                Transition::unchanged(self)
            }
            FetchOutcome::NotAsked => {
                self.cache.insert(page, FetchStatus::NotAsked);
                Transition::unchanged(self)
            }
        }
    }
}
