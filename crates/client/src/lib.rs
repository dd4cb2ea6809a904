//! Client code for fetchcache.
//!
//! This crate provides the HTTP fetch pipeline and the cached fetcher that
//! composes it with a key-value store.

pub mod cached;
pub mod fetch;

pub use cached::{CachedFetcher, DEFAULT_TTL, cache_key, count_key};
pub use fetch::{FetchConfig, HttpFetcher, PageFetcher};
