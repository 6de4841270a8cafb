//! HTTP transport module
//!
//! A concrete page fetcher for JSON APIs addressed by page number.
//!
//! # Features
//!
//! - **Page requests**: page and per-page query parameters plus the request context
//! - **Response decoding**: dot paths for items, total count and extra data
//! - **Timeouts**: per-client and per-request, reported as `Error::Timeout`
//!
//! Requests are single attempts. A failed page stays failed until the cache
//! is reset.

mod client;
mod decoder;
mod fetcher;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use decoder::ResponseDecoder;
pub use fetcher::HttpPageFetcher;
