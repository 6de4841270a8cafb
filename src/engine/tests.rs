//! Tests for engine module

use super::*;
use crate::pagination::{FetchStatus, PageResponse};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// In-memory page source over `0..len`; context "even" keeps even numbers only
struct MemoryFetcher {
    len: Mutex<u32>,
    failing: Vec<u32>,
    slow: Vec<u32>,
    hollow: Vec<u32>,
    calls: Mutex<Vec<u32>>,
}

impl MemoryFetcher {
    fn new(len: u32) -> Self {
        Self {
            len: Mutex::new(len),
            failing: Vec::new(),
            slow: Vec::new(),
            hollow: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(mut self, pages: &[u32]) -> Self {
        self.failing = pages.to_vec();
        self
    }

    fn slow(mut self, pages: &[u32]) -> Self {
        self.slow = pages.to_vec();
        self
    }

    /// Pages answered with no items while still counted in the total
    fn hollow(mut self, pages: &[u32]) -> Self {
        self.hollow = pages.to_vec();
        self
    }

    fn calls_for(&self, page: u32) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| **p == page)
            .count()
    }
}

#[async_trait]
impl PageFetcher for MemoryFetcher {
    type Item = u32;
    type Context = String;
    type Extra = String;

    async fn fetch(
        &self,
        context: &String,
        page: u32,
        per_page: u32,
    ) -> Result<PageResponse<u32, String>> {
        self.calls.lock().unwrap().push(page);
        if self.slow.contains(&page) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        if self.failing.contains(&page) {
            return Err(Error::http_status(503, "unavailable"));
        }

        let len = *self.len.lock().unwrap();
        let records: Vec<u32> = (0..len)
            .filter(|n| context != "even" || n % 2 == 0)
            .collect();
        let start = ((page - 1) * per_page) as usize;
        let take = if self.hollow.contains(&page) { 0 } else { per_page as usize };
        let items = records
            .iter()
            .skip(start)
            .take(take)
            .copied()
            .collect();

        Ok(PageResponse::new(items, records.len() as u64).with_extra(format!("ctx={context}")))
    }
}

fn shared(fetcher: MemoryFetcher) -> Arc<MemoryFetcher> {
    Arc::new(fetcher)
}

// ============================================================================
// ResourceStats Tests
// ============================================================================

#[test]
fn test_resource_stats_mutations() {
    let mut stats = ResourceStats::new();

    stats.add_issued(3);
    stats.add_completion();
    stats.add_completion();
    stats.add_failure();
    stats.add_corrective_jump();

    assert_eq!(stats.fetches_issued, 3);
    assert_eq!(stats.completions, 2);
    assert_eq!(stats.failures, 1);
    assert_eq!(stats.corrective_jumps, 1);
}

// ============================================================================
// PagedResource Tests
// ============================================================================

#[tokio::test]
async fn test_initial_load_prefetches_next_page() {
    let fetcher = shared(MemoryFetcher::new(45));
    let mut resource = PagedResource::from_arc(Arc::clone(&fetcher), "all".to_string(), 1, 10);

    assert_eq!(resource.in_flight(), 2);
    assert!(resource.state().is_loading());

    resource.settle().await.unwrap();

    let state = resource.state();
    assert_eq!(state.current_items(), (0..10).collect::<Vec<_>>().as_slice());
    assert_eq!(state.total_pages(), 5);
    assert_eq!(state.extra_data().map(String::as_str), Some("ctx=all"));
    assert!(state.status_of(2).is_some_and(FetchStatus::is_succeeded));
    assert_eq!(resource.in_flight(), 0);
    assert_eq!(resource.stats().fetches_issued, 2);
    assert_eq!(resource.stats().completions, 2);
}

#[tokio::test]
async fn test_next_completion_without_work_returns_false() {
    let mut resource = PagedResource::new(MemoryFetcher::new(5), "all".to_string(), 1, 10);
    resource.settle().await.unwrap();

    assert!(!resource.next_completion().await.unwrap());
}

#[tokio::test]
async fn test_navigation_walks_prefetched_pages() {
    let fetcher = shared(MemoryFetcher::new(45));
    let mut resource = PagedResource::from_arc(Arc::clone(&fetcher), "all".to_string(), 1, 10);
    resource.settle().await.unwrap();

    // Page 2 is already cached, so the move shows it immediately.
    let state = resource.move_next();
    assert_eq!(state.current_page(), 2);
    assert_eq!(state.current_items().first(), Some(&10));
    assert_eq!(resource.in_flight(), 1);

    resource.settle().await.unwrap();
    assert_eq!(fetcher.calls_for(3), 1);

    resource.move_previous();
    resource.move_next();
    resource.settle().await.unwrap();
    assert_eq!(fetcher.calls_for(1), 1);
    assert_eq!(fetcher.calls_for(2), 1);
    assert_eq!(fetcher.calls_for(3), 1);
}

#[tokio::test]
async fn test_move_before_prefetch_lands_on_pending_page() {
    let fetcher = shared(MemoryFetcher::new(45).slow(&[2]));
    let mut resource = PagedResource::from_arc(Arc::clone(&fetcher), "all".to_string(), 1, 10);

    // Page 2 is pending, which is enough to move onto it.
    assert_eq!(resource.move_next().current_page(), 2);
    assert!(resource.state().is_loading());

    resource.settle().await.unwrap();
    assert_eq!(resource.state().current_items().first(), Some(&10));
}

#[tokio::test]
async fn test_failed_page_is_not_refetched() {
    let fetcher = shared(MemoryFetcher::new(45).failing(&[2]));
    let mut resource = PagedResource::from_arc(Arc::clone(&fetcher), "all".to_string(), 1, 10);
    resource.settle().await.unwrap();

    resource.move_next();
    resource.settle().await.unwrap();
    assert!(resource.state().current_error().is_some());

    resource.move_previous();
    resource.move_next();
    resource.settle().await.unwrap();

    assert_eq!(fetcher.calls_for(2), 1);
    assert_eq!(resource.stats().failures, 1);
    assert!(resource.state().status_of(1).is_some_and(FetchStatus::is_succeeded));
}

#[tokio::test]
async fn test_shrunk_total_jumps_to_last_page() {
    let fetcher = shared(MemoryFetcher::new(15));
    let mut resource = PagedResource::from_arc(Arc::clone(&fetcher), "all".to_string(), 5, 10);
    resource.settle().await.unwrap();

    let state = resource.state();
    assert_eq!(state.current_page(), 2);
    assert_eq!(state.current_items(), (10..15).collect::<Vec<_>>().as_slice());
    assert_eq!(resource.stats().corrective_jumps, 1);
}

#[tokio::test]
async fn test_stale_completion_is_cached() {
    let fetcher = shared(MemoryFetcher::new(200).slow(&[2]));
    let mut resource = PagedResource::from_arc(Arc::clone(&fetcher), "all".to_string(), 1, 10);

    // Wait for page 1, then leave before the slow page 2 arrives.
    while !resource
        .state()
        .status_of(1)
        .is_some_and(FetchStatus::is_succeeded)
    {
        assert!(resource.next_completion().await.unwrap());
    }
    resource.jump_to(10);
    resource.settle().await.unwrap();

    let state = resource.state();
    assert_eq!(state.current_page(), 10);
    assert!(state.status_of(2).is_some_and(FetchStatus::is_succeeded));
    assert_eq!(fetcher.calls_for(2), 1);
}

#[tokio::test]
async fn test_request_context_change_refetches_from_first_page() {
    let fetcher = shared(MemoryFetcher::new(40));
    let mut resource = PagedResource::from_arc(Arc::clone(&fetcher), "all".to_string(), 1, 10);
    resource.settle().await.unwrap();
    resource.jump_to(3);
    resource.settle().await.unwrap();

    let same = resource.update_request_context("all".to_string()).current_page();
    assert_eq!(same, 3);
    assert_eq!(resource.in_flight(), 0);

    let state = resource.update_request_context("even".to_string());
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.total_items(), 0);
    // Extra data from the old context stays visible until the reload lands.
    assert_eq!(state.extra_data().map(String::as_str), Some("ctx=all"));

    resource.settle().await.unwrap();
    let state = resource.state();
    assert_eq!(state.total_items(), 20);
    assert_eq!(state.current_items().get(1), Some(&2));
    assert_eq!(state.extra_data().map(String::as_str), Some("ctx=even"));
}

#[tokio::test]
async fn test_per_page_change_resets() {
    let mut resource = PagedResource::new(MemoryFetcher::new(40), "all".to_string(), 1, 10);
    resource.settle().await.unwrap();
    let issued = resource.stats().fetches_issued;

    resource.update_items_per_page(10);
    assert_eq!(resource.stats().fetches_issued, issued);

    resource.update_items_per_page(25);
    resource.settle().await.unwrap();

    let state = resource.state();
    assert_eq!(state.per_page(), 25);
    assert_eq!(state.total_pages(), 2);
    assert_eq!(state.current_items().len(), 25);
}

#[tokio::test]
async fn test_external_completion_is_reconciled() {
    let mut resource = PagedResource::new(MemoryFetcher::new(40), "all".to_string(), 1, 10);
    resource.settle().await.unwrap();

    let state = resource.apply_completion(PageCompletion::failed(
        4,
        Error::Timeout { timeout_ms: 100 },
    ));
    assert!(state.status_of(4).is_some_and(FetchStatus::is_failed));
    assert_eq!(resource.stats().failures, 1);
}

#[tokio::test]
async fn test_settle_keeps_refetching_a_hollow_last_page() {
    let fetcher = shared(MemoryFetcher::new(20).hollow(&[2]).slow(&[2]));
    let mut resource = PagedResource::from_arc(Arc::clone(&fetcher), "all".to_string(), 2, 10);

    let settled = tokio::time::timeout(Duration::from_millis(300), resource.settle()).await;

    assert!(settled.is_err());
    assert_eq!(resource.state().current_page(), 2);
    assert!(fetcher.calls_for(2) >= 2);
}

#[tokio::test]
async fn test_late_completion_from_old_context_replaces_page() {
    let mut resource = PagedResource::new(MemoryFetcher::new(40), "all".to_string(), 1, 10);
    resource.settle().await.unwrap();
    resource.update_request_context("even".to_string());
    resource.settle().await.unwrap();
    assert_eq!(resource.state().current_items().get(1), Some(&2));

    // Fetches are keyed by page only, so an answer for the old context still lands.
    let state = resource.apply_completion(PageCompletion::succeeded(
        1,
        PageResponse::new(vec![0, 1, 2], 40),
    ));
    assert_eq!(state.current_items(), &[0, 1, 2]);
    assert_eq!(state.request_context(), "even");
}
