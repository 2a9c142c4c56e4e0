//! Exponential backoff with jitter

use rand::Rng;
use std::time::Duration;

/// Retries performed when the caller does not pass a budget
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Jitter bounds in seconds, upper bound exclusive
const JITTER_RANGE: std::ops::Range<f64> = 0.1..0.9;

/// Delay slept after failed attempt `attempt` (0-based): `2^attempt` seconds plus jitter
pub fn backoff_delay(attempt: u32) -> Duration {
    let jitter = rand::rng().random_range(JITTER_RANGE);
    backoff_delay_with_jitter(attempt, jitter)
}

/// Same as [`backoff_delay`] with a caller-supplied jitter
fn backoff_delay_with_jitter(attempt: u32, jitter_secs: f64) -> Duration {
    let base = 2_f64.powi(attempt.min(30) as i32);
    Duration::from_secs_f64(base + jitter_secs)
}
