//! Concurrent fan-out of named sub-operations.
//!
//! All sub-requests of one aggregation are issued concurrently and joined
//! at a single barrier; partial results are never streamed. A failing
//! sub-request does not cancel its siblings - failures come back per
//! name, and the caller decides which subset of failures is fatal.

use futures::future::{join_all, BoxFuture};
use std::collections::HashMap;
use tripweave_core::{AggregationError, ProviderError};

/// One named sub-operation of an aggregation.
pub type SubOperation<'a, T> = BoxFuture<'a, Result<T, ProviderError>>;

/// Issue every sub-operation concurrently and wait for all of them.
///
/// The returned mapping is keyed by name, so result association is
/// independent of completion order, and it always contains exactly one
/// entry per submitted name.
pub async fn fan_out<'a, T>(
    requests: Vec<(String, SubOperation<'a, T>)>,
) -> HashMap<String, Result<T, ProviderError>> {
    let (names, operations): (Vec<_>, Vec<_>) = requests.into_iter().unzip();
    let outcomes = join_all(operations).await;
    names.into_iter().zip(outcomes).collect()
}

/// All-or-nothing policy: any failed sub-operation fails the whole
/// aggregation, and no partial data leaves this function.
pub fn require_all<T>(
    results: HashMap<String, Result<T, ProviderError>>,
) -> Result<HashMap<String, T>, AggregationError> {
    let mut succeeded = HashMap::new();
    let mut failed = Vec::new();

    for (name, result) in results {
        match result {
            Ok(value) => {
                succeeded.insert(name, value);
            }
            Err(err) => failed.push((name, err)),
        }
    }

    if failed.is_empty() {
        return Ok(succeeded);
    }

    failed.sort_by(|a, b| a.0.cmp(&b.0));
    let reason = failed
        .iter()
        .map(|(name, err)| format!("{}: {}", name, err))
        .collect::<Vec<_>>()
        .join("; ");
    Err(AggregationError::PartialFailure {
        categories: failed.into_iter().map(|(name, _)| name).collect(),
        reason,
    })
}
