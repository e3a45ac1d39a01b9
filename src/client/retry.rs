use crate::error::{ReportError, Result};
use std::future::Future;
use std::time::Duration;

/// 限流重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// 总尝试次数上限，0 表示不限
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_attempts: 10,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// 第 `retry` 次重试前的等待时间 (从 0 开始)
    /// 服务端给出的延迟优先 (为 0 时按 initial_delay)，否则 1s 起指数翻倍，封顶 max_delay
    pub fn delay_for(&self, retry: u32, server_hint: Option<Duration>) -> Duration {
        if let Some(hint) = server_hint {
            return if hint.is_zero() { self.initial_delay } else { hint };
        }
        let factor = 2u32.saturating_pow(retry.min(31));
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    /// 已尝试 `attempts` 次后是否还能再试
    pub fn allows(&self, attempts: u32) -> bool {
        self.max_attempts == 0 || attempts < self.max_attempts
    }
}

/// 对限流错误等待后重试，其他结果原样返回
pub async fn retry_transient<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempts = 0u32;
    loop {
        let err = match op().await {
            Err(e) if e.is_transient() => e,
            other => return other,
        };
        attempts += 1;

        if !policy.allows(attempts) {
            tracing::error!("Rate limited {} times, giving up", attempts);
            return Err(ReportError::RetryExhausted {
                attempts,
                last: err.to_string(),
            });
        }

        let hint = match err {
            ReportError::RateLimited { retry_after } => retry_after,
            _ => None,
        };
        let wait = policy.delay_for(attempts - 1, hint);
        tracing::warn!(
            "Monday rate limit hit (attempt {}), waiting {:?}",
            attempts,
            wait
        );
        tokio::time::sleep(wait).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn rate_limited(secs: Option<u64>) -> ReportError {
        ReportError::RateLimited {
            retry_after: secs.map(Duration::from_secs),
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        let delays: Vec<u64> = (0..7).map(|i| policy.delay_for(i, None).as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 16, 30, 30]);
        assert_eq!(policy.delay_for(200, None), Duration::from_secs(30));
    }

    #[test]
    fn server_hint_wins_over_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.delay_for(4, Some(Duration::from_secs(3))),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn zero_server_hint_still_waits_initial_delay() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(3, Some(Duration::ZERO)), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_after_zero_does_not_spin() {
        let calls = AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let result = retry_transient(&RetryPolicy::default(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(rate_limited(Some(0)))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[test]
    fn zero_max_attempts_is_unbounded() {
        assert!(RetryPolicy::with_max_attempts(0).allows(u32::MAX));
        assert!(!RetryPolicy::with_max_attempts(3).allows(3));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_server_delay_then_succeeds() {
        let calls = AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let result = retry_transient(&RetryPolicy::default(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(rate_limited(Some(3)))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(4), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_transient(&RetryPolicy::with_max_attempts(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(rate_limited(None)) }
        })
        .await;

        assert!(matches!(
            result,
            Err(ReportError::RetryExhausted { attempts: 3, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn fatal_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_transient(&RetryPolicy::default(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ReportError::upstream("boom")) }
        })
        .await;

        assert!(matches!(result, Err(ReportError::Upstream { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
