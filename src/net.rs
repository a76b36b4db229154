//! Small helpers for retry-friendly networking.

use std::future::Future;
use std::time::Duration;

use rand::{thread_rng, Rng};

use crate::error::ApiError;

/// Run `op` until it succeeds, fails with a non-retryable error, or
/// `max_retries` extra attempts are spent. With `max_retries == 0` this is
/// exactly one call.
pub async fn with_backoff<T, F, Fut>(label: &str, max_retries: u8, mut op: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0u8;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                attempt += 1;
                let back_ms = backoff_delay_ms(attempt);
                log::warn!("[net] {label} retry={attempt} backoff={back_ms}ms : {e}");
                tokio::time::sleep(Duration::from_millis(back_ms)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn backoff_delay_ms(attempt: u8) -> u64 {
    let base = 300u64.saturating_mul(1u64 << (attempt.clamp(1, 5) - 1)); // 300,600,1200,2400,4800
    let jitter: u64 = thread_rng().gen_range(0..=250);
    base + jitter
}
