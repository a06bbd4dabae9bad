//! CPU burning worker
//!
//! Each worker process spins on a deliberately expensive integer
//! computation until the shared deadline passes.

use std::hint::black_box;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Factorial argument used for each unit of work
pub const FACTORIAL_N: u32 = 1000;

/// n! over wrapping 128-bit arithmetic
///
/// The result overflows long before n = 1000; only the multiplications
/// matter.
pub fn factorial_wrapping(n: u32) -> u128 {
    (1..=u128::from(n)).fold(1u128, |acc, k| acc.wrapping_mul(k))
}

/// Burn CPU until `deadline`, returning how many factorials were computed
pub fn burn_until(deadline: SystemTime) -> u64 {
    let mut iterations = 0u64;

    while SystemTime::now() < deadline {
        black_box(factorial_wrapping(black_box(FACTORIAL_N)));
        iterations += 1;
    }

    iterations
}

/// Deadline as milliseconds since the unix epoch, for passing to workers
pub fn deadline_after(duration: Duration) -> u64 {
    let deadline = SystemTime::now() + duration;
    deadline
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Inverse of [`deadline_after`]
pub fn deadline_from_millis(millis: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(millis)
}
