// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pagecache
//!
//! A client-side page cache for page-numbered APIs.
//!
//! ## Features
//!
//! - **Immutable pagination state**: every operation returns a new snapshot
//!   plus the fetches it wants issued
//! - **Neighbour prefetch**: the previous and next pages are loaded alongside
//!   the current one, so moves are instant
//! - **Self-correcting**: an empty page past a shrunk result set jumps back to
//!   the last page
//! - **Pager sections**: compact page lists with edges, a window around the
//!   current page and gaps
//! - **HTTP transport**: any JSON endpoint taking a page number and page size
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagecache::{load_config, HttpPageFetcher, PagedResource, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = load_config("resource.yaml")?;
//!     let fetcher = HttpPageFetcher::from_config(&config.source)?;
//!
//!     let mut resource = PagedResource::new(
//!         fetcher,
//!         config.request_context.clone(),
//!         config.start_page,
//!         config.per_page,
//!     );
//!     resource.settle().await?;
//!
//!     resource.move_next();
//!     println!("{:?}", resource.state().current_items());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       PaginationState                           │
//! │  initial() · move_next() · jump_to() · apply_completion()       │
//! │           each returns Transition { state, intents }            │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴───────────────┬──────────────────┐
//! │    Engine    │             HTTP              │      Config      │
//! ├──────────────┼───────────────────────────────┼──────────────────┤
//! │ PagedResource│ HttpClient                    │ YAML / JSON      │
//! │ tokio tasks  │ ResponseDecoder (JSONPath)    │ validation       │
//! │ completions  │ HttpPageFetcher               │ pager layout     │
//! └──────────────┴───────────────────────────────┴──────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and utilities
pub mod types;

/// Page cache state machine and pager sections
pub mod pagination;

/// Async driver for pagination state
pub mod engine;

/// HTTP transport
pub mod http;

/// Resource configuration
pub mod config;

/// Configuration loading
pub mod loader;

/// CLI interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, FetchError, Result};
pub use types::*;

pub use config::{PagerConfig, ResourceConfig, SourceConfig};
pub use engine::{PageFetcher, PagedResource, ResourceStats};
pub use http::{HttpPageFetcher, ResponseDecoder};
pub use loader::{load_config, load_config_from_json, load_config_from_str};
pub use pagination::{
    format_pager, sectionize, Chunk, FetchIntent, FetchPurpose, FetchStatus, PageCache,
    PageCompletion, PageResponse, PagerEntry, PaginationState, Transition,
};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
