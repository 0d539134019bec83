//! The fixed retry ladder shared by `check` and `download`.
//!
//! Every cloud call gets up to three retries after its initial attempt, at
//! delays of 1s, 2s, 4s, bounded by a ~60s total wall clock. The schedule is
//! fixed rather than configurable: this is a narrow, known-flaky subprocess
//! boundary, not a general-purpose retry policy with knobs to tune.

use std::time::Duration;

/// Delay before each retry, in order. Index 0 is the delay before the
/// first retry (i.e. after the initial attempt fails).
const DELAYS_MS: [u64; 3] = [1_000, 2_000, 4_000];

/// Total attempts including the first: one initial try plus all retries.
pub const MAX_ATTEMPTS: u32 = 1 + DELAYS_MS.len() as u32;

/// Soft wall-clock budget for one `check`/`download` call across all of its
/// retries.
pub const WALL_CLOCK_BUDGET: Duration = Duration::from_secs(60);

/// Delay to sleep after attempt `attempt` (1-indexed) has failed, before
/// attempt `attempt + 1`. Returns `None` once attempts are exhausted.
pub fn delay_after(attempt: u32) -> Option<Duration> {
    DELAYS_MS
        .get((attempt.saturating_sub(1)) as usize)
        .map(|ms| Duration::from_millis(*ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_is_1s_2s_4s() {
        assert_eq!(delay_after(1), Some(Duration::from_secs(1)));
        assert_eq!(delay_after(2), Some(Duration::from_secs(2)));
        assert_eq!(delay_after(3), Some(Duration::from_secs(4)));
        assert_eq!(delay_after(4), None);
    }
}
