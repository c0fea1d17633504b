use std::future::Future;
use std::time::Duration;

use crate::errors::AppError;

/// Default budget for a single service call.
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(10);

/// Runs `fut` under `budget`. On expiry the future is dropped, which cancels
/// whatever it was awaiting; writes already sent to the store stay applied.
pub async fn with_deadline<T, F>(budget: Duration, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(budget_ms = budget.as_millis() as u64, "service call timed out");
            Err(AppError::timeout())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_completes_within_budget() {
        let value = with_deadline(Duration::from_secs(1), async { Ok::<_, AppError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_budget_is_timeout() {
        let err = with_deadline(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, AppError>(())
        })
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let err = with_deadline(DEFAULT_BUDGET, async { Err::<(), _>(AppError::not_found()) })
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
