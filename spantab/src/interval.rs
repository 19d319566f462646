//! Canonical interval store and the line-oriented reader that builds it.
//!
//! # Invariants
//!
//! [`Intervals`] maintains, at all times:
//! - every interval has `low <= high`
//! - intervals are strictly increasing
//! - consecutive intervals are neither overlapping nor adjacent, i.e.
//!   `next.low >= prev.high + 2`
//!
//! Overlapping and adjacent input ranges are merged by [`Intervals::parse`]
//! before they reach the store.

use std::io::BufRead;
use std::ops::Index;

use crate::error::Error;

/// Errors raised when an interval would break the store's invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    /// The interval's upper bound is below its lower bound.
    #[error("interval {low:#X}..{high:#X} is inverted")]
    Inverted {
        /// Lower bound.
        low: u32,
        /// Upper bound.
        high: u32,
    },

    /// The interval starts at or before the end of the previous one.
    #[error("interval starting at {0:#X} overlaps or precedes the previous interval")]
    Unsorted(u32),

    /// The interval starts immediately after the previous one and should
    /// have been merged into it.
    #[error("interval starting at {0:#X} is adjacent to the previous interval")]
    Adjacent(u32),
}

/// An inclusive range of integers sharing one span value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    low: u32,
    high: u32,
}

impl Interval {
    /// Creates an interval covering `low..=high`. Whether `low <= high` is
    /// checked when the interval is pushed into [`Intervals`].
    pub const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    /// First value in the interval.
    pub fn low(&self) -> u32 {
        self.low
    }

    /// Last value in the interval.
    pub fn high(&self) -> u32 {
        self.high
    }

    /// The interval's span, `high - low`.
    pub fn span(&self) -> u32 {
        self.high - self.low
    }
}

/// Ordered collection of canonical intervals, indexed `0..n`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Intervals(Vec<Interval>);

impl Index<usize> for Intervals {
    type Output = Interval;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Intervals {
    /// Builds a store from intervals that are already canonical.
    pub fn try_from_iter<I>(intervals: I) -> Result<Self, IntervalError>
    where
        I: IntoIterator<Item = Interval>,
    {
        let mut store = Self::default();
        for interval in intervals {
            store.try_push(interval)?;
        }
        Ok(store)
    }

    /// Appends an interval, enforcing the store invariants.
    pub fn try_push(&mut self, interval: Interval) -> Result<(), IntervalError> {
        if interval.high < interval.low {
            return Err(IntervalError::Inverted {
                low: interval.low,
                high: interval.high,
            });
        }

        if let Some(last) = self.0.last() {
            if interval.low <= last.high {
                return Err(IntervalError::Unsorted(interval.low));
            }
            if interval.low == last.high + 1 {
                return Err(IntervalError::Adjacent(interval.low));
            }
        }

        self.0.push(interval);
        Ok(())
    }

    /// Reads one range per line and merges overlapping or adjacent ranges
    /// into canonical intervals.
    ///
    /// Each line is `HEX` or `HEX..HEX`, optionally indented, with an
    /// optional `0x` prefix on each bound. Whatever follows the range on the
    /// line (property names, comments) is ignored.
    ///
    /// ## Errors
    /// - `MalformedInput` if a line does not start with a hex number
    /// - `InvertedRange` if a line's upper bound is below its lower bound
    /// - `UnsortedInput` if a line starts below the start of the range it
    ///   would have to merge with
    /// - `CapacityExceeded` if more than `max_intervals` intervals result
    pub fn parse<R: BufRead>(reader: R, max_intervals: usize) -> Result<Self, Error> {
        let mut store = Self::default();
        let mut current: Option<Interval> = None;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;

            let (low, high) = parse_line(&line).ok_or_else(|| Error::MalformedInput {
                line: line_number,
                content: line.clone(),
            })?;

            if high < low {
                return Err(Error::InvertedRange { line: line_number, low, high });
            }

            current = match current {
                Some(open) if low < open.low => {
                    return Err(Error::UnsortedInput { line: line_number, low });
                }
                Some(open) if low <= open.high.saturating_add(1) => {
                    Some(Interval::new(open.low, open.high.max(high)))
                }
                Some(open) => {
                    store.push_within(open, max_intervals)?;
                    Some(Interval::new(low, high))
                }
                None => Some(Interval::new(low, high)),
            };
        }

        if let Some(open) = current {
            store.push_within(open, max_intervals)?;
        }

        tracing::info!(intervals = store.len(), "loaded intervals");
        Ok(store)
    }

    fn push_within(&mut self, interval: Interval, max_intervals: usize) -> Result<(), Error> {
        if self.0.len() >= max_intervals {
            return Err(Error::CapacityExceeded { limit: max_intervals });
        }
        self.try_push(interval)?;
        Ok(())
    }

    /// Returns the number of intervals.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no intervals.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the intervals as a slice.
    pub fn as_slice(&self) -> &[Interval] {
        &self.0
    }
}

/// Parses the leading `HEX` or `HEX..HEX` of a line.
fn parse_line(line: &str) -> Option<(u32, u32)> {
    let (low, rest) = parse_hex(line.trim_start())?;

    let high = rest
        .strip_prefix("..")
        .and_then(parse_hex)
        .map_or(low, |(high, _)| high);

    Some((low, high))
}

/// Parses a leading hex number, returning it and the unparsed remainder.
fn parse_hex(text: &str) -> Option<(u32, &str)> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_hexdigit()))
        .unwrap_or(text);

    let end = digits
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = u32::from_str_radix(&digits[..end], 16).ok()?;
    Some((value, &digits[end..]))
}
