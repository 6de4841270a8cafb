//! Pagination module
//!
//! The page cache state machine: snapshot model, fetch orchestration,
//! navigation, completion reconciliation and pager sections.
//!
//! # Overview
//!
//! Every operation is a synchronous transition from one [`PaginationState`]
//! to the next, paired with the [`FetchIntent`]s the new snapshot needs.
//! Intents run elsewhere and come back as [`PageCompletion`]s, which are fed
//! to [`PaginationState::apply_completion`].
//!
//! ```text
//! navigation ──► PaginationState ──► compute_fetch_plan ──► FetchIntent*
//!      ▲                                                        │
//!      └──── apply_completion ◄──── PageCompletion ◄── transport┘
//! ```

mod navigation;
mod orchestrator;
mod reconcile;
mod sections;
mod types;

pub use orchestrator::{compute_fetch_plan, issue_fetches, FetchIntent, FetchPurpose, Transition};
pub use reconcile::{FetchOutcome, PageCompletion, PageResponse};
pub use sections::{
    compute_sections, format_pager, render_pager, sectionize, PagerEntry, PagerItem,
};
pub use types::{total_pages, Chunk, FetchStatus, PageCache, PaginationState};
