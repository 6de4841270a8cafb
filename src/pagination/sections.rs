//! Pager sections
//!
//! Computes the page numbers a compact pager shows around the current page.
//! Sections are contiguous runs; a renderer puts an ellipsis between them.

use super::types::PaginationState;
use serde::Serialize;
use std::fmt::Write as _;

/// One page number in a pager section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PagerEntry {
    /// Page number
    pub page: u32,
    /// Whether this is the page being viewed
    pub is_current: bool,
}

/// Sections for a snapshot: `end_count` pages at each edge and
/// `middle_count` pages on either side of the current page.
pub fn compute_sections<T, C, X>(
    end_count: u32,
    middle_count: u32,
    state: &PaginationState<T, C, X>,
) -> Vec<Vec<PagerEntry>> {
    sectionize(
        end_count,
        middle_count,
        state.total_pages(),
        state.current_page(),
    )
}

/// Sections for raw page numbers.
///
/// Below `2 * end + 2 * middle + 3` pages everything fits in one section.
pub fn sectionize(
    end_count: u32,
    middle_count: u32,
    total_pages: u32,
    current: u32,
) -> Vec<Vec<PagerEntry>> {
    let (e, m, t, c) = (end_count, middle_count, total_pages, current);
    let split_threshold = 2 * e + 2 * m + 3;
    let section = |from: u32, to: u32| -> Vec<PagerEntry> {
        (from..=to)
            .map(|page| PagerEntry {
                page,
                is_current: page == c,
            })
            .collect()
    };

    if t < split_threshold {
        return vec![section(1, t)];
    }

    let past_start = c > e + m + 1;
    let before_end = c < t - e - m;

    match (past_start, before_end) {
        (true, true) => vec![
            section(1, e),
            section(c - m, c + m),
            section(t - e + 1, t),
        ],
        (true, false) => vec![section(1, e), section(t - e - m, t)],
        (false, _) => vec![section(1, e + m + 1), section(t - e + 1, t)],
    }
}

impl<T, C, X> PaginationState<T, C, X> {
    /// Pager sections around the current page
    pub fn sections(&self, end_count: u32, middle_count: u32) -> Vec<Vec<PagerEntry>> {
        compute_sections(end_count, middle_count, self)
    }
}

/// A renderable pager element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerItem<A> {
    /// A link to a page
    Page {
        /// Page number
        page: u32,
        /// Whether this is the page being viewed
        is_current: bool,
        /// Caller-generated rendering attributes
        attributes: A,
    },
    /// Gap between two sections
    Ellipsis,
}

/// Flatten sections into pager items, generating link attributes per page
pub fn render_pager<A>(
    sections: &[Vec<PagerEntry>],
    mut attributes: impl FnMut(u32) -> A,
) -> Vec<PagerItem<A>> {
    let mut items = Vec::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            items.push(PagerItem::Ellipsis);
        }
        items.extend(section.iter().map(|entry| PagerItem::Page {
            page: entry.page,
            is_current: entry.is_current,
            attributes: attributes(entry.page),
        }));
    }
    items
}

/// Plain-text pager line, current page in brackets: `1 2 … [7] 8 … 20`
pub fn format_pager(sections: &[Vec<PagerEntry>]) -> String {
    let mut out = String::new();
    for item in render_pager(sections, |_| ()) {
        if !out.is_empty() {
            out.push(' ');
        }
        match item {
            PagerItem::Page {
                page,
                is_current: true,
                ..
            } => {
                let _ = write!(out, "[{page}]");
            }
            PagerItem::Page { page, .. } => {
                let _ = write!(out, "{page}");
            }
            PagerItem::Ellipsis => out.push('…'),
        }
    }
    out
}
