//! # Cost model
//!
//! Every sub-range of intervals can be encoded either as one flat lookup
//! table in some [`TableFormat`], or as a comparison that splits it into two
//! smaller sub-ranges. This module prices both options.
//!
//! A [`Cost`] is a `(size, depth)` pair. Emitted bytes dominate: depth (the
//! worst-case number of comparisons before reaching a table) only breaks
//! ties between encodings of equal size.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::interval::Intervals;

/// Bytes of overhead for a table whose entries are stored relative to a base
/// value (the base register load).
pub const BASE_REGISTER_SIZE: u32 = 4;

/// Bytes of overhead for one comparison and conditional branch.
pub const SPLIT_SIZE: u32 = 8;

/// Bit width meaning "unrestricted": values are stored raw.
pub const UNRESTRICTED_BITS: u8 = 32;

/// The `(size, depth)` cost of an encoding.
///
/// The derived ordering is lexicographic over the fields in declaration
/// order, so `size` is compared first and `depth` breaks ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cost {
    size: u32,
    depth: u32,
}

impl Cost {
    /// The cost of an infeasible strategy. Loses every comparison.
    pub const INFINITE: Cost = Cost { size: u32::MAX, depth: u32::MAX };

    /// Creates a finite cost.
    pub const fn new(size: u32, depth: u32) -> Self {
        Self { size, depth }
    }

    /// Size of the encoding in bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Worst-case number of comparisons before a table is reached.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns `true` unless this is [`Cost::INFINITE`].
    pub fn is_finite(&self) -> bool {
        *self != Self::INFINITE
    }

    /// Cost of a split node whose two children cost `left` and `right`.
    ///
    /// Infinite if either child is infinite. Saturates instead of wrapping.
    pub fn split(left: Cost, right: Cost) -> Cost {
        if !left.is_finite() || !right.is_finite() {
            return Self::INFINITE;
        }

        let size = SPLIT_SIZE
            .saturating_add(left.size)
            .saturating_add(right.size);
        let depth = left.depth.max(right.depth).saturating_add(1);

        Cost { size, depth }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_finite() {
            write!(f, "({}, {})", self.size, self.depth)
        } else {
            write!(f, "(inf, inf)")
        }
    }
}

/// A fixed-width layout for one table entry: the offset of the interval's
/// low bound from the table base, and the interval's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct TableFormat {
    base_bits: u8,
    span_bits: u8,
}

impl TableFormat {
    /// 16-bit offsets and 16-bit spans.
    pub const W16X16: TableFormat = TableFormat { base_bits: 16, span_bits: 16 };

    /// Raw 32-bit values, no base register.
    pub const W32X32: TableFormat = TableFormat { base_bits: 32, span_bits: 32 };

    /// Creates a format, validating that both widths lie in `1..=32`.
    pub fn new(base_bits: u8, span_bits: u8) -> Result<Self, Error> {
        let valid = 1..=UNRESTRICTED_BITS;
        if !valid.contains(&base_bits) || !valid.contains(&span_bits) {
            return Err(Error::InvalidFormat(format!("{base_bits}x{span_bits}")));
        }

        Ok(Self { base_bits, span_bits })
    }

    /// Bit width of the offset-from-base field.
    pub fn base_bits(&self) -> u8 {
        self.base_bits
    }

    /// Bit width of the span field.
    pub fn span_bits(&self) -> u8 {
        self.span_bits
    }

    /// Whether entries are stored raw, without a base register.
    pub fn is_unrestricted_base(&self) -> bool {
        self.base_bits >= UNRESTRICTED_BITS
    }

    /// Bytes per table entry, rounded up to whole bytes.
    pub fn entry_size(&self) -> u32 {
        (u32::from(self.base_bits) + u32::from(self.span_bits)).div_ceil(8)
    }

    /// Whether `offset` fits in the base field.
    pub fn fits_offset(&self, offset: u32) -> bool {
        fits(offset, self.base_bits)
    }

    /// Whether `span` fits in the span field.
    pub fn fits_span(&self, span: u32) -> bool {
        fits(span, self.span_bits)
    }
}

/// Whether `value` can be stored in an unsigned field of `bits` bits.
pub(crate) fn fits(value: u32, bits: u8) -> bool {
    bits >= UNRESTRICTED_BITS || u64::from(value) < 1u64 << bits
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.base_bits, self.span_bits)
    }
}

impl FromStr for TableFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidFormat(s.to_string());

        let (base, span) = s
            .trim()
            .split_once(['x', 'X', ','])
            .ok_or_else(invalid)?;
        let base_bits = base.trim().parse().map_err(|_| invalid())?;
        let span_bits = span.trim().parse().map_err(|_| invalid())?;

        Self::new(base_bits, span_bits).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TableFormat {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Ordered, non-empty list of the table formats the optimizer may use.
///
/// Order matters: when two formats produce the same cost for a sub-range,
/// the one listed first wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog(Vec<TableFormat>);

impl Catalog {
    /// Creates a catalog, rejecting empty lists and duplicates.
    pub fn new<I>(formats: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = TableFormat>,
    {
        let mut catalog = Vec::new();
        for format in formats {
            if catalog.contains(&format) {
                return Err(Error::DuplicateFormat(format));
            }
            catalog.push(format);
        }

        if catalog.is_empty() {
            return Err(Error::EmptyCatalog);
        }

        Ok(Self(catalog))
    }

    /// Iterates over the formats in tie-break order.
    pub fn iter(&self) -> impl Iterator<Item = &TableFormat> {
        self.0.iter()
    }

    /// Returns the number of formats in the catalog.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the formats as a slice.
    pub fn as_slice(&self) -> &[TableFormat] {
        &self.0
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self(vec![TableFormat::W16X16, TableFormat::W32X32])
    }
}

/// Cost of encoding intervals `first..=last` as one flat table of `format`.
///
/// Infinite if the offset of the last interval from the first does not fit
/// the base field, or if any interval's span does not fit the span field.
pub fn table_cost(intervals: &Intervals, format: TableFormat, first: usize, last: usize) -> Cost {
    debug_assert!(first <= last && last < intervals.len());

    let base = intervals[first].low();
    if !format.fits_offset(intervals[last].low() - base) {
        return Cost::INFINITE;
    }

    let slice = &intervals.as_slice()[first..=last];
    if !slice.iter().all(|interval| format.fits_span(interval.span())) {
        return Cost::INFINITE;
    }

    let count = (last - first + 1) as u32;
    let mut size = format.entry_size().saturating_mul(count);
    if !format.is_unrestricted_base() {
        size = size.saturating_add(BASE_REGISTER_SIZE);
    }

    Cost::new(size, 0)
}
