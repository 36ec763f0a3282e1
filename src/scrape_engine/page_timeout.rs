//! Timeout wrapper for driver operations
//!
//! Every wait against the browser is bounded so a hung page can never stall
//! a scrape; an elapsed bound surfaces as [`DriverError::Timeout`].

use std::future::Future;
use std::time::Duration;

use crate::renderer::DriverError;

/// Run `operation` under `limit`, naming it in the timeout error.
pub async fn with_page_timeout<F, T>(
    operation: F,
    limit: Duration,
    operation_name: &str,
) -> Result<T, DriverError>
where
    F: Future<Output = Result<T, DriverError>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(DriverError::Timeout(format!(
            "{operation_name} timeout after {}ms",
            limit.as_millis()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_results() {
        let ok = with_page_timeout(async { Ok::<_, DriverError>(7) }, Duration::from_secs(1), "op").await;
        assert_eq!(ok, Ok(7));

        let err = with_page_timeout(
            async { Err::<(), _>(DriverError::NotFound("gone".into())) },
            Duration::from_secs(1),
            "op",
        )
        .await;
        assert_eq!(err, Err(DriverError::NotFound("gone".into())));
    }

    #[tokio::test]
    async fn elapsed_bound_is_a_timeout() {
        let result = with_page_timeout(
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, DriverError>(())
            },
            Duration::from_millis(50),
            "open page",
        )
        .await;
        assert_eq!(
            result,
            Err(DriverError::Timeout("open page timeout after 50ms".into()))
        );
    }
}
