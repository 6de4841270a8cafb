//! Configuration types for paginated resources
//!
//! This module contains the structures that describe a page-numbered HTTP
//! source, the pager layout, and the starting position. They are loaded from
//! YAML or JSON by the [`loader`](crate::loader) module.

use crate::error::{Error, Result};
use crate::pagination::{sectionize, PagerEntry};
use crate::types::{QueryParams, StringMap};
use serde::{Deserialize, Serialize};

// ============================================================================
// Top-Level Resource Config
// ============================================================================

/// Complete resource configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Where pages come from
    pub source: SourceConfig,

    /// Pager layout
    #[serde(default)]
    pub pager: PagerConfig,

    /// Items per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Page to open first
    #[serde(default = "default_start_page")]
    pub start_page: u32,

    /// Query parameters sent with every request
    #[serde(default)]
    pub request_context: QueryParams,
}

fn default_per_page() -> u32 {
    20
}

fn default_start_page() -> u32 {
    1
}

impl ResourceConfig {
    /// Create a config for a source with default paging
    pub fn new(source: SourceConfig) -> Self {
        Self {
            source,
            pager: PagerConfig::default(),
            per_page: default_per_page(),
            start_page: default_start_page(),
            request_context: QueryParams::new(),
        }
    }

    /// Check values that deserialization cannot
    pub fn validate(&self) -> Result<()> {
        if self.per_page == 0 {
            return Err(Error::invalid_value("per_page", "must be at least 1"));
        }
        if self.start_page == 0 {
            return Err(Error::invalid_value("start_page", "pages start at 1"));
        }
        self.source.validate()
    }
}

// ============================================================================
// Source
// ============================================================================

/// A page-numbered JSON endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL (scheme and host, optionally a path prefix)
    pub base_url: String,

    /// Endpoint path appended to the base URL
    #[serde(default)]
    pub path: String,

    /// Query parameter carrying the page number
    #[serde(default = "default_page_param")]
    pub page_param: String,

    /// Query parameter carrying the page size
    #[serde(default = "default_per_page_param")]
    pub per_page_param: String,

    /// Path to the item array; the body root when absent
    #[serde(default)]
    pub records_path: Option<String>,

    /// Path to the total item count
    #[serde(default = "default_total_path")]
    pub total_path: String,

    /// Path to extra data returned with each page
    #[serde(default)]
    pub extra_path: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: StringMap,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_per_page_param() -> String {
    "per_page".to_string()
}

fn default_total_path() -> String {
    "total".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl SourceConfig {
    /// Source at `base_url` with default parameter names
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: String::new(),
            page_param: default_page_param(),
            per_page_param: default_per_page_param(),
            records_path: None,
            total_path: default_total_path(),
            extra_path: None,
            headers: StringMap::new(),
            timeout_secs: default_timeout_secs(),
        }
    }

    fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("source.base_url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "source.base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if self.page_param.is_empty() || self.per_page_param.is_empty() {
            return Err(Error::invalid_value(
                "source.page_param",
                "parameter names must not be empty",
            ));
        }
        if self.page_param == self.per_page_param {
            return Err(Error::invalid_value(
                "source.per_page_param",
                "must differ from page_param",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("source.timeout_secs", "must be positive"));
        }
        Ok(())
    }
}

// ============================================================================
// Pager
// ============================================================================

/// How many page links a pager shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Pages shown at each edge
    #[serde(default = "default_window")]
    pub end_count: u32,

    /// Pages shown on each side of the current page
    #[serde(default = "default_window")]
    pub middle_count: u32,
}

fn default_window() -> u32 {
    2
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            end_count: default_window(),
            middle_count: default_window(),
        }
    }
}

impl PagerConfig {
    /// Sections for `total_pages` with `current` highlighted
    pub fn sections(&self, total_pages: u32, current: u32) -> Vec<Vec<PagerEntry>> {
        sectionize(self.end_count, self.middle_count, total_pages, current)
    }
}
