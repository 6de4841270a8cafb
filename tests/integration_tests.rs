//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → HTTP page fetches → cached
//! pagination state

use pagecache::loader::load_config_from_str;
use pagecache::pagination::format_pager;
use pagecache::{FetchStatus, HttpPageFetcher, PagedResource, QueryParams};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// ============================================================================
// Mock API
// ============================================================================

/// Serves `{"items": [...], "total": N}` pages over items with ids 1..=len.
/// `parity=even` narrows the set to even ids.
struct Catalog {
    len: usize,
}

impl Catalog {
    fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Respond for Catalog {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut page = 1usize;
        let mut per_page = 10usize;
        let mut even_only = false;
        for (key, value) in request.url.query_pairs() {
            match key.as_ref() {
                "page" => page = value.parse().unwrap_or(1),
                "per_page" => per_page = value.parse().unwrap_or(10),
                "parity" => even_only = value == "even",
                _ => {}
            }
        }

        let ids: Vec<usize> = (1..=self.len)
            .filter(|id| !even_only || id % 2 == 0)
            .collect();
        let items: Vec<_> = ids
            .iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .map(|id| json!({"id": id}))
            .collect();

        ResponseTemplate::new(200).set_body_json(json!({
            "items": items,
            "total": ids.len(),
            "meta": {"page": page}
        }))
    }
}

fn config_yaml(base_url: &str) -> String {
    format!(
        r#"
source:
  base_url: "{base_url}"
  path: /items
  records_path: items
  total_path: total
  extra_path: meta
per_page: 5
pager:
  end_count: 1
  middle_count: 1
"#
    )
}

async fn open(server: &MockServer, page: u32) -> PagedResource<HttpPageFetcher> {
    let config = load_config_from_str(&config_yaml(&server.uri())).unwrap();
    let fetcher = HttpPageFetcher::from_config(&config.source).unwrap();
    let mut resource = PagedResource::new(
        fetcher,
        config.request_context.clone(),
        page,
        config.per_page,
    );
    resource.settle().await.unwrap();
    resource
}

fn ids(resource: &PagedResource<HttpPageFetcher>) -> Vec<u64> {
    resource
        .state()
        .current_items()
        .iter()
        .filter_map(|item| item["id"].as_u64())
        .collect()
}

// ============================================================================
// End-to-End Tests
// ============================================================================

#[tokio::test]
async fn test_open_loads_current_and_next_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(Catalog::new(23))
        .expect(2)
        .mount(&server)
        .await;

    let resource = open(&server, 1).await;
    let state = resource.state();

    assert_eq!(ids(&resource), vec![1, 2, 3, 4, 5]);
    assert_eq!(state.total_items(), 23);
    assert_eq!(state.total_pages(), 5);
    assert_eq!(state.cached_pages(), vec![1, 2]);
    // Extra data comes from whichever page finished last.
    assert!(state.extra_data().is_some_and(|meta| meta.get("page").is_some()));
    assert!(state.is_first());
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_walk_forward_prefetches_one_page_ahead() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(Catalog::new(23))
        .mount(&server)
        .await;

    let mut resource = open(&server, 1).await;

    resource.move_next();
    assert_eq!(ids(&resource), vec![6, 7, 8, 9, 10]);
    resource.settle().await.unwrap();
    assert_eq!(resource.state().cached_pages(), vec![1, 2, 3]);

    for _ in 0..3 {
        resource.move_next();
        resource.settle().await.unwrap();
    }

    let state = resource.state();
    assert_eq!(state.current_page(), 5);
    assert!(state.is_last());
    assert_eq!(ids(&resource), vec![21, 22, 23]);
    assert_eq!(state.cached_pages(), vec![1, 2, 3, 4, 5]);
    assert_eq!(format_pager(&state.sections(1, 1)), "1 2 3 4 [5]");

    // Page 6 is past the end and never requested.
    let moved = resource.move_next().current_page();
    assert_eq!(moved, 5);
    assert_eq!(resource.in_flight(), 0);
}

#[tokio::test]
async fn test_opening_past_a_shrunk_result_lands_on_last_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(Catalog::new(12))
        .mount(&server)
        .await;

    let resource = open(&server, 4).await;
    let state = resource.state();

    assert_eq!(state.current_page(), 3);
    assert_eq!(state.total_pages(), 3);
    assert_eq!(ids(&resource), vec![11, 12]);
    assert_eq!(resource.stats().corrective_jumps, 1);
}

#[tokio::test]
async fn test_failed_page_stays_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(Catalog::new(23))
        .mount(&server)
        .await;

    let mut resource = open(&server, 1).await;
    assert!(resource
        .state()
        .status_of(2)
        .is_some_and(FetchStatus::is_failed));

    resource.move_next();
    let state = resource.state();
    assert_eq!(state.current_page(), 2);
    assert!(state.current_items().is_empty());
    let error = state.current_error().unwrap().to_string();
    assert!(error.contains("500"), "unexpected error: {error}");

    resource.settle().await.unwrap();
    resource.move_previous();
    resource.settle().await.unwrap();
    resource.move_next();
    resource.settle().await.unwrap();

    assert!(matches!(
        resource.state().current_status(),
        Some(FetchStatus::Failed(_))
    ));
    assert!(resource.stats().failures >= 1);
}

#[tokio::test]
async fn test_context_change_resets_to_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(Catalog::new(23))
        .mount(&server)
        .await;

    let mut resource = open(&server, 1).await;
    resource.jump_to(4);
    resource.settle().await.unwrap();
    assert_eq!(resource.state().current_page(), 4);

    let mut context = QueryParams::new();
    context.insert("parity".to_string(), "even".to_string());
    resource.update_request_context(context.clone());
    resource.settle().await.unwrap();

    let state = resource.state();
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.request_context(), &context);
    assert_eq!(state.total_items(), 11);
    assert_eq!(ids(&resource), vec![2, 4, 6, 8, 10]);
    assert_eq!(state.cached_pages(), vec![1, 2]);

    let requests = server.received_requests().await.unwrap();
    let filtered = requests
        .iter()
        .filter(|r| r.url.query().is_some_and(|q| q.contains("parity=even")))
        .count();
    assert_eq!(filtered, 2);
}

#[tokio::test]
async fn test_per_page_change_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(Catalog::new(23))
        .mount(&server)
        .await;

    let mut resource = open(&server, 1).await;
    resource.move_next();
    resource.settle().await.unwrap();

    resource.update_items_per_page(10);
    resource.settle().await.unwrap();

    let state = resource.state();
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.per_page(), 10);
    assert_eq!(state.total_pages(), 3);
    assert_eq!(ids(&resource), (1..=10).collect::<Vec<_>>());
}
