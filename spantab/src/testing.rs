//! Shared helpers for unit tests.

use crate::interval::Interval;
use crate::interval::Intervals;

/// Builds a store from `(low, high)` pairs that are already canonical.
pub fn intervals(ranges: &[(u32, u32)]) -> Intervals {
    Intervals::try_from_iter(ranges.iter().map(|&(low, high)| Interval::new(low, high)))
        .expect("test intervals must be canonical")
}

/// Builds canonical intervals from `(gap, span)` pairs. Each interval starts
/// `gap` past the first value that may legally follow the previous one.
pub fn build_intervals(raw: &[(u32, u32)]) -> Intervals {
    let mut ranges = Vec::new();
    let mut next = 0u32;
    for &(gap, span) in raw {
        let low = next + gap;
        ranges.push((low, low + span));
        next = low + span + 2;
    }
    intervals(&ranges)
}
