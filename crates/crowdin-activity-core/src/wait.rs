//! Bounded polling.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::PageError;

/// Poll `probe` every `interval` until it yields a value or `timeout` elapses.
///
/// The probe always runs at least once. Returns `Ok(None)` on timeout.
pub(crate) async fn poll_until<T, F, Fut>(
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> Result<Option<T>, PageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, PageError>>,
{
    let start = Instant::now();

    loop {
        if let Some(value) = probe().await? {
            return Ok(Some(value));
        }

        if start.elapsed() >= timeout {
            return Ok(None);
        }

        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_resolves_when_probe_succeeds() {
        let calls = AtomicUsize::new(0);
        let value = poll_until(Duration::from_secs(1), Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(if n == 2 { Some(n) } else { None }) }
        })
        .await
        .unwrap();
        assert_eq!(value, Some(2));
    }

    #[tokio::test]
    async fn test_times_out_with_none() {
        let value: Option<()> =
            poll_until(Duration::from_millis(20), Duration::from_millis(5), || async {
                Ok(None)
            })
            .await
            .unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_zero_timeout_still_probes_once() {
        let calls = AtomicUsize::new(0);
        let value = poll_until(Duration::ZERO, Duration::from_millis(5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Some(())) }
        })
        .await
        .unwrap();
        assert!(value.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_probe_error_propagates() {
        let result: Result<Option<()>, _> =
            poll_until(Duration::from_secs(1), Duration::from_millis(1), || async {
                Err(PageError::Unavailable("gone".to_string()))
            })
            .await;
        assert!(matches!(result, Err(PageError::Unavailable(_))));
    }
}
