//! The get-or-compute-and-store wrapper.
//!
//! Every call site that memoizes an upstream operation goes through
//! [`cached`]; the per-route copies of derive-key / check / compute /
//! store logic collapse into this one function.

use crate::key::build_key;
use crate::store::CacheStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tripweave_core::SerializationError;

/// Run `operation(args)` through the cache.
///
/// On a hit the cached payload is deserialized and returned without
/// invoking `compute`. On a miss, `compute` runs; a successful result is
/// stored under the derived key with `ttl` before being returned. If
/// `compute` fails nothing is written, so a later identical call retries
/// the upstream computation rather than replaying a cached failure.
///
/// A cached payload that no longer deserializes (e.g. the value shape
/// changed between releases) is treated as a miss and recomputed.
pub async fn cached<T, E, A, F, Fut>(
    store: &dyn CacheStore,
    operation: &str,
    args: &A,
    ttl: Duration,
    compute: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    E: From<SerializationError>,
    A: Serialize,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let key = build_key(operation, args)?;

    if let Some(raw) = store.get(&key).await {
        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!(key = %key, "cache hit");
                return Ok(value);
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cached payload unreadable, recomputing");
            }
        }
    }

    let value = compute().await?;

    match serde_json::to_string(&value) {
        Ok(raw) => store.set(&key, raw, ttl).await,
        // Non-fatal by contract: the computed value is still returned.
        Err(e) => tracing::warn!(key = %key, error = %e, "computed value not cacheable"),
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCacheStore;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tripweave_core::{ProviderError, TripweaveError};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        city: String,
        total: u32,
    }

    fn payload() -> Payload {
        Payload {
            city: "Lisbon".to_string(),
            total: 7,
        }
    }

    #[tokio::test]
    async fn miss_computes_and_stores() {
        let store = MemoryCacheStore::new();
        let calls = AtomicU32::new(0);

        let out: Result<Payload, TripweaveError> =
            cached(&store, "venues", &"args", Duration::from_secs(60), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(payload())
            })
            .await;

        assert_eq!(out.unwrap(), payload());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.stats().entries, 1);
    }

    #[tokio::test]
    async fn hit_short_circuits_compute() {
        let store = MemoryCacheStore::new();
        let calls = AtomicU32::new(0);

        for _ in 0..3 {
            let out: Result<Payload, TripweaveError> =
                cached(&store, "venues", &"args", Duration::from_secs(60), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(payload())
                })
                .await;
            assert_eq!(out.unwrap(), payload());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_never_cached() {
        let store = MemoryCacheStore::new();

        let out: Result<Payload, TripweaveError> =
            cached(&store, "weather", &"args", Duration::from_secs(60), || async {
                Err(ProviderError::Timeout {
                    provider: "maps".to_string(),
                    detail: "30s elapsed".to_string(),
                }
                .into())
            })
            .await;
        assert!(out.is_err());

        // The derived key must still be a miss afterwards.
        let key = build_key("weather", &"args").unwrap();
        assert_eq!(store.get(&key).await, None);

        // And a later identical call retries the computation.
        let retried: Result<Payload, TripweaveError> =
            cached(&store, "weather", &"args", Duration::from_secs(60), || async {
                Ok(payload())
            })
            .await;
        assert_eq!(retried.unwrap(), payload());
    }

    #[tokio::test]
    async fn unreadable_cached_payload_is_recomputed() {
        let store = MemoryCacheStore::new();
        let key = build_key("venues", &"args").unwrap();
        store
            .set(&key, "not json".to_string(), Duration::from_secs(60))
            .await;

        let out: Result<Payload, TripweaveError> =
            cached(&store, "venues", &"args", Duration::from_secs(60), || async {
                Ok(payload())
            })
            .await;
        assert_eq!(out.unwrap(), payload());
    }

    #[tokio::test]
    async fn identical_payloads_share_one_entry_across_call_sites() {
        let store = MemoryCacheStore::new();
        #[derive(Serialize)]
        struct ArgsA {
            city: &'static str,
            limit: u32,
        }
        #[derive(Serialize)]
        struct ArgsB {
            limit: u32,
            city: &'static str,
        }

        let a: Result<Payload, TripweaveError> = cached(
            &store,
            "taste",
            &ArgsA { city: "Porto", limit: 5 },
            Duration::from_secs(60),
            || async { Ok(payload()) },
        )
        .await;
        assert!(a.is_ok());

        // Field ordering differs; the entry is shared all the same.
        let b: Result<Payload, TripweaveError> = cached(
            &store,
            "taste",
            &ArgsB { limit: 5, city: "Porto" },
            Duration::from_secs(60),
            || async {
                panic!("second call site must hit the shared entry");
            },
        )
        .await;
        assert_eq!(b.unwrap(), payload());
        assert_eq!(store.stats().entries, 1);
    }
}
