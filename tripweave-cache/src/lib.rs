//! Tripweave cache layer.
//!
//! Three pieces compose here:
//!
//! - [`key::build_key`]: deterministic, content-addressed key derivation
//!   from an operation name and its structured argument payload;
//! - [`store::CacheStore`]: an async key/value store with per-entry TTL,
//!   where store failures read as misses and never fail the caller;
//! - [`cached`]: the get-or-compute-and-store wrapper every call site
//!   goes through.
//!
//! Two overlapping aggregations may both miss the same key and both
//! recompute; that duplicate-work race is accepted because values for a
//! given key are idempotent within the TTL window.

pub mod cached;
pub mod key;
pub mod store;

pub use cached::cached;
pub use key::build_key;
pub use store::{CacheStats, CacheStore, MemoryCacheStore};
