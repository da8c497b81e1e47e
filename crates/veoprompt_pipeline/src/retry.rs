//! Bounded retries and time allowances for model-backed stages.

use std::future::Future;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, warn};
use veoprompt_config::RetryConfig;
use veoprompt_error::{
    PipelineStage, RetryableError, StageError, StageErrorKind, VeoError, VeoResult,
};

/// Runs `operation` with exponential backoff inside a single time allowance.
///
/// The first retryable failure picks the schedule: its
/// [`RetryableError::retry_strategy_params`] give the initial backoff, the
/// retry count and the delay cap, so a rate limit waits longer than a
/// malformed reply. `retry.initial_backoff_ms` and `retry.max_delay_secs`
/// override the error's values when set, and `retry.max_retries` caps the
/// retry count. When retries run out the stage fails with
/// `RetriesExhausted`; when the whole allowance elapses it fails with
/// `Timeout`. Permanent failures come back unchanged on the first attempt.
pub(crate) async fn run_stage<T, F, Fut>(
    stage: PipelineStage,
    retry: &RetryConfig,
    allowance: Duration,
    mut operation: F,
) -> VeoResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = VeoResult<T>>,
{
    let mut attempts = 0usize;
    let attempted = tokio::time::timeout(allowance, async {
        attempts += 1;
        let first = match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => e,
        };

        let mut delays = backoff_for(&first, retry);
        let Some(delay) = delays.next() else {
            return Err(first);
        };
        warn!(%stage, attempt = 1, error = %first, delay_ms = delay.as_millis() as u64, "Transient stage failure, will retry");
        tokio::time::sleep(delay).await;

        Retry::spawn(delays, || {
            attempts += 1;
            let current = attempts;
            let pending = operation();
            async move {
                match pending.await {
                    Ok(value) => Ok(value),
                    Err(e) if e.is_retryable() => {
                        warn!(%stage, attempt = current, error = %e, "Transient stage failure, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => Err(RetryError::Permanent(e)),
                }
            }
        })
        .await
    })
    .await;

    match attempted {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) if e.is_retryable() => Err(StageError::new(StageErrorKind::RetriesExhausted {
            stage,
            attempts,
            last: e.to_string(),
        })
        .into()),
        Ok(Err(e)) => Err(e),
        Err(_) => {
            warn!(%stage, seconds = allowance.as_secs(), "Stage timed out");
            Err(StageError::new(StageErrorKind::Timeout {
                stage,
                seconds: allowance.as_secs(),
            })
            .into())
        }
    }
}

/// `(initial_backoff_ms, retries, max_delay_secs)` for `error`, with the
/// configured overrides and retry cap applied.
fn schedule(error: &VeoError, retry: &RetryConfig) -> (u64, usize, u64) {
    let (initial_ms, retries, max_delay_secs) = error.retry_strategy_params();
    (
        retry.initial_backoff_ms.unwrap_or(initial_ms).max(1),
        retries.min(retry.max_retries),
        retry.max_delay_secs.unwrap_or(max_delay_secs),
    )
}

/// Delays between retries for `error`.
fn backoff_for(error: &VeoError, retry: &RetryConfig) -> impl Iterator<Item = Duration> + use<> {
    let (initial_ms, retries, max_delay_secs) = schedule(error, retry);
    debug!(
        initial_backoff_ms = initial_ms,
        retries, max_delay_secs, "Retry strategy selected"
    );

    ExponentialBackoff::from_millis(initial_ms)
        .factor(2)
        .max_delay(Duration::from_secs(max_delay_secs))
        .map(jitter)
        .take(retries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use veoprompt_error::{GeminiError, GeminiErrorKind, InferenceError, InferenceErrorKind, VeoErrorKind};

    fn quick() -> RetryConfig {
        RetryConfig {
            max_retries: 2,
            initial_backoff_ms: Some(1),
            max_delay_secs: Some(1),
        }
    }

    fn unbounded() -> RetryConfig {
        RetryConfig {
            max_retries: 10,
            initial_backoff_ms: None,
            max_delay_secs: None,
        }
    }

    fn rate_limited() -> VeoError {
        GeminiError::new(GeminiErrorKind::HttpError {
            status_code: 429,
            message: "quota".to_string(),
        })
        .into()
    }

    fn malformed() -> VeoError {
        InferenceError::invalid_shape("judge", "no verdict").into()
    }

    #[test]
    fn schedule_follows_the_failing_error() {
        assert_eq!(schedule(&rate_limited(), &unbounded()), (5000, 3, 40));
        assert_eq!(schedule(&malformed(), &unbounded()), (250, 2, 2));
        assert_eq!(backoff_for(&rate_limited(), &unbounded()).count(), 3);
    }

    #[test]
    fn configuration_overrides_and_caps_the_schedule() {
        assert_eq!(schedule(&rate_limited(), &quick()), (1, 2, 1));
        let delays: Vec<Duration> = backoff_for(&rate_limited(), &quick()).collect();
        assert_eq!(delays.len(), 2);
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_retries_on_its_own_schedule() {
        let calls = AtomicUsize::new(0);
        let result: VeoResult<()> =
            run_stage(PipelineStage::Filter, &unbounded(), Duration::from_secs(600), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), VeoError>(rate_limited()) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(matches!(
            result.unwrap_err().kind(),
            VeoErrorKind::Stage(e)
                if matches!(&e.kind, StageErrorKind::RetriesExhausted { attempts: 4, .. })
        ));
    }

    #[tokio::test]
    async fn transient_failures_exhaust_into_stage_error() {
        let calls = AtomicUsize::new(0);
        let result: VeoResult<()> =
            run_stage(PipelineStage::Staging, &quick(), Duration::from_secs(5), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err::<(), VeoError>(
                        InferenceError::new(InferenceErrorKind::ServiceUnavailable(
                            "503".to_string(),
                        ))
                        .into(),
                    )
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let err = result.unwrap_err();
        match err.kind() {
            VeoErrorKind::Stage(e) => assert!(matches!(
                &e.kind,
                StageErrorKind::RetriesExhausted { attempts: 3, .. }
            )),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_stage_times_out() {
        let result: VeoResult<()> =
            run_stage(PipelineStage::Filter, &quick(), Duration::from_secs(2), || async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<(), VeoError>(())
            })
            .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("realism filter stage timed out after 2s"));
    }
}
