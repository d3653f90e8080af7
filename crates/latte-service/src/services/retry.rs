//! Bounded retry for repository calls

use std::future::Future;
use std::time::Duration;

use backon::Retryable;
use latte_common::RetryConfig;
use latte_core::DomainError;
use tracing::warn;

/// Run `op`, retrying only `StorageUnavailable` with exponential backoff
///
/// After `max_times` retries the last error is returned unchanged, so callers
/// still see `StorageUnavailable`.
pub(crate) async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    operation: &'static str,
    op: F,
) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    op.retry(config.policy())
        .when(DomainError::is_transient)
        .notify(|err, delay: Duration| {
            warn!(operation, error = %err, ?delay, "storage unavailable, retrying");
        })
        .await
}
