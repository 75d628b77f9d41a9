//! Error types for tripweave operations

use thiserror::Error;

/// Failures at a single provider boundary.
///
/// Adapters map every upstream outcome into exactly one of these kinds;
/// they never retry and never cache, so the same error surface applies
/// under cached and uncached call sites alike.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{provider} request timed out: {detail}")]
    Timeout { provider: String, detail: String },

    #[error("{provider} rejected the request with status {status}: {detail}")]
    UpstreamRejected {
        provider: String,
        status: u16,
        detail: String,
    },

    #[error("malformed response from {provider}: {detail}")]
    MalformedResponse { provider: String, detail: String },

    #[error("{provider} found nothing: {detail}")]
    NotFound { provider: String, detail: String },
}

impl ProviderError {
    /// Name of the provider the failure originated from.
    pub fn provider(&self) -> &str {
        match self {
            ProviderError::Timeout { provider, .. }
            | ProviderError::UpstreamRejected { provider, .. }
            | ProviderError::MalformedResponse { provider, .. }
            | ProviderError::NotFound { provider, .. } => provider,
        }
    }
}

/// Cache key derivation failed because the argument payload would not
/// serialize. Well-typed call sites never hit this; it marks a programming
/// contract violation rather than a runtime-recoverable condition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SerializationError {
    #[error("cache key payload for '{operation}' is not serializable: {reason}")]
    UnserializablePayload { operation: String, reason: String },
}

/// Cache store failures. Always non-fatal: logged at the wrapper boundary
/// and swallowed, never surfaced to the caller of the primary operation.
///
/// Only fallible backends (a networked store, a store with serialization
/// of its own) produce these; the in-process memory store cannot fail and
/// never constructs them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache read failed for {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("cache write failed for {key}: {reason}")]
    WriteFailed { key: String, reason: String },
}

/// Aggregation-level failures surfaced to the outermost request handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AggregationError {
    #[error("sub-requests failed for {categories:?}: {reason}")]
    PartialFailure {
        categories: Vec<String>,
        reason: String,
    },

    #[error("aggregation failed: {reason}")]
    TotalFailure { reason: String },
}

/// Request payload validation failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Text-generation failures. Reported as a distinct condition and never
/// retried automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("generation output did not match the expected shape: {reason}")]
    MalformedOutput { reason: String },
}

/// Top-level error wrapping all subsystems.
///
/// `CacheError` is deliberately absent: cache failures are logged and
/// swallowed at the wrapper boundary and must never fail the caller's
/// primary operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TripweaveError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("serialization error: {0}")]
    Serialization(#[from] SerializationError),

    #[error("aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}

/// Result type alias for tripweave operations.
pub type TripweaveResult<T> = Result<T, TripweaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_exposes_origin() {
        let err = ProviderError::UpstreamRejected {
            provider: "taste-graph".to_string(),
            status: 503,
            detail: "unavailable".to_string(),
        };
        assert_eq!(err.provider(), "taste-graph");
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn generation_wraps_provider_failures() {
        let inner = ProviderError::Timeout {
            provider: "textgen".to_string(),
            detail: "45s elapsed".to_string(),
        };
        let err: TripweaveError = GenerationError::from(inner).into();
        assert!(matches!(err, TripweaveError::Generation(_)));
    }
}
