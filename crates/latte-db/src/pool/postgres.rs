//! PostgreSQL connection pool management

use backon::Retryable;
use latte_common::{DatabaseConfig, RetryConfig};
use latte_core::DomainError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, warn};

use crate::repositories::map_db_error;

/// Create a new PostgreSQL connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await
}

/// Create a pool, retrying transient connection failures with bounded backoff
///
/// # Errors
/// Returns `DomainError::StorageUnavailable` once the retries are exhausted,
/// or the mapped error straight away if it is not transient (bad credentials,
/// malformed URL).
pub async fn connect_with_retry(
    config: &DatabaseConfig,
    retry: &RetryConfig,
) -> Result<PgPool, DomainError> {
    let pool = (|| async { create_pool(config).await.map_err(map_db_error) })
        .retry(retry.policy())
        .when(DomainError::is_transient)
        .notify(|err, dur: Duration| {
            warn!(error = %err, delay = ?dur, "database connect failed, retrying");
        })
        .await?;

    info!(url = %config.redacted_url(), "database pool ready");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_url_without_retrying() {
        let config = DatabaseConfig {
            url: "not a url".to_string(),
            ..DatabaseConfig::default()
        };
        let retry = RetryConfig {
            min_delay: Duration::from_secs(30),
            max_delay: Duration::from_secs(30),
            max_times: 3,
        };

        // A retry would sleep for 30s; the configuration error must surface at once.
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            connect_with_retry(&config, &retry),
        )
        .await
        .expect("non-transient error should not be retried");

        assert!(matches!(result, Err(ref e) if !e.is_transient()));
    }
}
