//! Core types and shared functionality for fetchcache.
//!
//! This crate provides:
//! - The key-value store abstraction and its backends
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod store;

pub use config::AppConfig;
pub use error::Error;
pub use store::{KeyValueStore, MemoryStore};

#[cfg(feature = "redis")]
pub use store::RedisStore;
