//! Fetch orchestration
//!
//! Decides which of the current page and its two neighbours need a request,
//! marks them pending, and packages one intent per page.

use super::types::{Chunk, FetchStatus, PaginationState};
use tracing::debug;

/// Why a page is being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FetchPurpose {
    /// The page being viewed
    Current,
    /// Prefetch of the page before it
    Previous,
    /// Prefetch of the page after it
    Next,
}

/// Request for the transport to fetch one page
#[derive(Debug, Clone, PartialEq)]
pub struct FetchIntent<C> {
    /// Context the request is issued under
    pub request_context: C,
    /// Page to fetch
    pub page: u32,
    /// Items per page
    pub per_page: u32,
    /// Why the page is needed
    pub purpose: FetchPurpose,
}

/// New snapshot plus the fetches it requires
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<T, C, X> {
    /// The snapshot to keep
    pub state: PaginationState<T, C, X>,
    /// Fetches to start, in no particular order
    pub intents: Vec<FetchIntent<C>>,
}

impl<T, C, X> Transition<T, C, X> {
    /// A transition that starts nothing
    pub fn unchanged(state: PaginationState<T, C, X>) -> Self {
        Self {
            state,
            intents: Vec::new(),
        }
    }

    /// Split into state and intents
    pub fn into_parts(self) -> (PaginationState<T, C, X>, Vec<FetchIntent<C>>) {
        (self.state, self.intents)
    }
}

/// Pages around the current one that need a request.
///
/// A page qualifies when it has no entry or holds an empty success. Pending
/// and failed pages are left alone.
pub fn compute_fetch_plan<T, C, X>(state: &PaginationState<T, C, X>) -> Vec<(u32, FetchPurpose)> {
    let current = state.current_page;
    let total = state.total_pages();

    let mut candidates = vec![(current, FetchPurpose::Current)];
    if current > 1 {
        candidates.push((current - 1, FetchPurpose::Previous));
    }
    if current < total || total == 0 {
        candidates.push((current + 1, FetchPurpose::Next));
    }

    candidates
        .into_iter()
        .filter(|(page, _)| needs_fetch(state.cache.get(*page)))
        .collect()
}

fn needs_fetch<T>(status: Option<&FetchStatus<Chunk<T>>>) -> bool {
    match status {
        None => true,
        Some(FetchStatus::Succeeded(chunk)) => chunk.is_empty(),
        Some(_) => false,
    }
}

/// Run the plan against a snapshot: mark planned pages pending and emit intents
pub fn issue_fetches<T, C: Clone, X>(mut state: PaginationState<T, C, X>) -> Transition<T, C, X> {
    let plan = compute_fetch_plan(&state);
    let mut intents = Vec::with_capacity(plan.len());

    for (page, purpose) in plan {
        debug!(page, ?purpose, per_page = state.per_page, "issuing page fetch");
        state.cache.insert(page, FetchStatus::Pending);
        intents.push(FetchIntent {
            request_context: state.request_context.clone(),
            page,
            per_page: state.per_page,
            purpose,
        });
    }

    Transition { state, intents }
}
