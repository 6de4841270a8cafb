//! Navigation transitions
//!
//! Every operation consumes the latest snapshot and returns the next one
//! together with the fetches it needs. Rejected moves are silent: the page
//! number simply stays where it was.

use super::orchestrator::{issue_fetches, Transition};
use super::types::PaginationState;
use tracing::{debug, info};

impl<T, C: Clone + PartialEq, X> PaginationState<T, C, X> {
    /// Start a resource at `page` with `per_page` items per page.
    ///
    /// Both numbers are clamped to at least 1. The returned intents request
    /// the start page and its neighbours.
    pub fn initial(request_context: C, page: u32, per_page: u32) -> Transition<T, C, X> {
        issue_fetches(Self::fresh(request_context, page, per_page))
    }

    /// Step forward, but only onto a page that has already been requested
    pub fn move_next(self) -> Transition<T, C, X> {
        let target = self.current_page.saturating_add(1);
        self.step_to(target)
    }

    /// Step back, but only onto a page that has already been requested
    pub fn move_previous(self) -> Transition<T, C, X> {
        let target = self.current_page.saturating_sub(1);
        self.step_to(target)
    }

    // A refused step leaves the snapshot and the cache untouched.
    fn step_to(mut self, target: u32) -> Transition<T, C, X> {
        if target == 0 || target == self.current_page || !self.cache.contains(target) {
            debug!(
                target,
                current = self.current_page,
                "page not requested yet, staying put"
            );
            return Transition::unchanged(self);
        }
        self.current_page = target;
        issue_fetches(self)
    }

    /// Jump to an arbitrary page.
    ///
    /// Accepted when `1 <= target <= total_pages`, or for any positive target
    /// while no fetch has completed yet and the page count is still unknown.
    pub fn jump_to(mut self, target: u32) -> Transition<T, C, X> {
        let in_range = target > 0 && target <= self.total_pages();
        let bootstrapping = target > 0 && self.cache.is_unresolved();

        if in_range || bootstrapping {
            self.current_page = target;
        } else {
            debug!(
                target,
                total_pages = self.total_pages(),
                "jump rejected"
            );
        }
        issue_fetches(self)
    }

    /// Replace the request context, restarting at page 1 with an empty cache.
    ///
    /// A structurally equal context is a no-op with no intents.
    pub fn update_request_context(self, request_context: C) -> Transition<T, C, X> {
        if self.request_context == request_context {
            return Transition::unchanged(self);
        }
        info!("request context changed, resetting page cache");
        let per_page = self.per_page;
        self.reset(request_context, per_page)
    }

    /// Change items per page, restarting at page 1 with an empty cache.
    ///
    /// Values below 1 count as 1. The current value is a no-op with no
    /// intents.
    pub fn update_items_per_page(self, per_page: u32) -> Transition<T, C, X> {
        let per_page = per_page.max(1);
        if self.per_page == per_page {
            return Transition::unchanged(self);
        }
        info!(from = self.per_page, to = per_page, "per-page changed, resetting page cache");
        let request_context = self.request_context.clone();
        self.reset(request_context, per_page)
    }

    // Extra data survives the reset until the next success overwrites it.
    fn reset(self, request_context: C, per_page: u32) -> Transition<T, C, X> {
        let mut fresh = Self::fresh(request_context, 1, per_page);
        fresh.extra_data = self.extra_data;
        issue_fetches(fresh)
    }
}
