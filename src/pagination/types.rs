//! Pagination types
//!
//! The page-indexed cache, the fetch lifecycle of a single page, and the
//! aggregate snapshot every transition consumes and produces.

use crate::error::FetchError;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Lifecycle of a single page fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchStatus<T> {
    /// Never requested
    #[default]
    NotAsked,
    /// Request issued, no result yet
    Pending,
    /// Request completed with a value
    Succeeded(T),
    /// Request completed with an error
    Failed(FetchError),
}

impl<T> FetchStatus<T> {
    /// Check if the fetch is still outstanding
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Check if the fetch succeeded
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Check if the fetch failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Borrow the success value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the failure, if any
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Map the success value, keeping every other state as-is
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchStatus<U> {
        match self {
            Self::NotAsked => FetchStatus::NotAsked,
            Self::Pending => FetchStatus::Pending,
            Self::Succeeded(value) => FetchStatus::Succeeded(f(value)),
            Self::Failed(error) => FetchStatus::Failed(error),
        }
    }
}

/// Items of one page, tagged with the page they belong to
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<T> {
    items: Vec<T>,
    page: u32,
}

impl<T> Chunk<T> {
    /// Create a chunk for a page
    pub fn new(items: Vec<T>, page: u32) -> Self {
        Self { items, page }
    }

    /// Items in server order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Page number the items were fetched for
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Check if the page came back empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Page-keyed cache of fetch results.
///
/// Keys are exactly the pages that were ever requested. Entries are inserted
/// or overwritten, never removed; a full reset replaces the whole cache.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCache<T> {
    entries: BTreeMap<u32, FetchStatus<Chunk<T>>>,
}

impl<T> Default for PageCache<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> PageCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Status for a page, `None` when it was never requested
    pub fn get(&self, page: u32) -> Option<&FetchStatus<Chunk<T>>> {
        self.entries.get(&page)
    }

    /// Check if a page has any entry
    pub fn contains(&self, page: u32) -> bool {
        self.entries.contains_key(&page)
    }

    /// Write the status for a page
    pub fn insert(&mut self, page: u32, status: FetchStatus<Chunk<T>>) {
        self.entries.insert(page, status);
    }

    /// Check if nothing was ever requested
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if no fetch has completed yet; only pending or not-asked entries
    pub fn is_unresolved(&self) -> bool {
        !self
            .entries
            .values()
            .any(|status| status.is_succeeded() || status.is_failed())
    }

    /// Number of cached pages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Cached page numbers, ascending
    pub fn pages(&self) -> Vec<u32> {
        self.entries.keys().copied().collect()
    }

    /// Iterate entries in page order
    pub fn iter(&self) -> btree_map::Iter<'_, u32, FetchStatus<Chunk<T>>> {
        self.entries.iter()
    }
}

/// Number of pages needed for `total_count` items, `0` when nothing is known
pub fn total_pages(total_count: u64, per_page: u32) -> u32 {
    if total_count == 0 {
        return 0;
    }
    let per_page = u64::from(per_page.max(1));
    total_count.div_ceil(per_page) as u32
}

/// Snapshot of a paginated resource.
///
/// Replaced wholesale by every navigation and completion; never shared
/// between two writers.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState<T, C, X> {
    pub(crate) cache: PageCache<T>,
    pub(crate) current_page: u32,
    pub(crate) per_page: u32,
    pub(crate) total_count: u64,
    pub(crate) request_context: C,
    pub(crate) extra_data: Option<X>,
}

impl<T, C, X> PaginationState<T, C, X> {
    /// Fresh snapshot with an empty cache and an unknown total
    pub(crate) fn fresh(request_context: C, page: u32, per_page: u32) -> Self {
        Self {
            cache: PageCache::new(),
            current_page: page.max(1),
            per_page: per_page.max(1),
            total_count: 0,
            request_context,
            extra_data: None,
        }
    }

    /// The page cache
    pub fn cache(&self) -> &PageCache<T> {
        &self.cache
    }

    /// Items of the current page, empty unless it has succeeded
    pub fn current_items(&self) -> &[T] {
        match self.current_status() {
            Some(FetchStatus::Succeeded(chunk)) => chunk.items(),
            _ => &[],
        }
    }

    /// Current page number
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Items requested per page
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Total item count reported by the last successful fetch
    pub fn total_items(&self) -> u64 {
        self.total_count
    }

    /// Total page count; `0` means the bound is still unknown
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count, self.per_page)
    }

    /// Error of the current page, if its fetch failed
    pub fn current_error(&self) -> Option<&FetchError> {
        self.current_status().and_then(FetchStatus::error)
    }

    /// Caller-supplied context threaded into every fetch
    pub fn request_context(&self) -> &C {
        &self.request_context
    }

    /// Extra payload returned by the last successful fetch
    pub fn extra_data(&self) -> Option<&X> {
        self.extra_data.as_ref()
    }

    /// Raw cache entry of the current page
    pub fn current_status(&self) -> Option<&FetchStatus<Chunk<T>>> {
        self.cache.get(self.current_page)
    }

    /// Raw cache entry of any page
    pub fn status_of(&self, page: u32) -> Option<&FetchStatus<Chunk<T>>> {
        self.cache.get(page)
    }

    /// Every page with a cache entry, ascending
    pub fn cached_pages(&self) -> Vec<u32> {
        self.cache.pages()
    }

    /// Check if the current page loaded and came back empty
    pub fn has_no_items(&self) -> bool {
        matches!(self.current_status(), Some(FetchStatus::Succeeded(chunk)) if chunk.is_empty())
    }

    /// Check if the current page has no result yet
    pub fn is_loading(&self) -> bool {
        matches!(self.current_status(), None | Some(FetchStatus::Pending))
    }

    /// Check if the current page is the first one
    pub fn is_first(&self) -> bool {
        self.current_page == 1
    }

    /// Check if the current page is the last known one
    pub fn is_last(&self) -> bool {
        self.current_page == self.total_pages()
    }
}
