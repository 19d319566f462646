//! Top-level error type for the spantab library
//!

use crate::cost::TableFormat;

/// Errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input line did not start with a hexadecimal range.
    #[error("cannot parse input line {line}: {content:?}")]
    MalformedInput {
        /// The 1-based line number of the offending line.
        line: usize,
        /// The raw contents of the line.
        content: String,
    },

    /// An input line had an upper bound below its lower bound.
    #[error("input line {line} has an inverted range: {low:#X}..{high:#X}")]
    InvertedRange {
        /// The 1-based line number of the offending line.
        line: usize,
        /// The lower bound as written.
        low: u32,
        /// The upper bound as written.
        high: u32,
    },

    /// An input line started below the start of the interval before it.
    #[error("input line {line} is out of order: {low:#X} starts before the previous range")]
    UnsortedInput {
        /// The 1-based line number of the offending line.
        line: usize,
        /// The lower bound of the offending range.
        low: u32,
    },

    /// An interval would break the interval store's invariants.
    #[error(transparent)]
    Interval(#[from] crate::interval::IntervalError),

    /// The input contained no ranges at all.
    #[error("the input is empty")]
    EmptyInput,

    /// The input held more intervals than the configured ceiling.
    #[error("input too big: more than {limit} intervals")]
    CapacityExceeded {
        /// The configured maximum number of intervals.
        limit: usize,
    },

    /// No combination of table formats and splits can encode the input.
    #[error(
        "no table format can encode interval {index} ({low:#X}..{high:#X}); \
         its span does not fit any format in the catalog"
    )]
    Infeasible {
        /// Index of the first interval that cannot be encoded on its own.
        index: usize,
        /// Lower bound of that interval.
        low: u32,
        /// Upper bound of that interval.
        high: u32,
    },

    /// A table format reached the data emitter with no defined byte layout.
    #[error("internal error: no packing is defined for table format {0}")]
    UnsupportedPacking(TableFormat),

    /// A value handed to a packing did not fit the format's bit width.
    #[error("internal error: {field} value {value:#X} does not fit in {bits} bits")]
    ValueOutOfRange {
        /// Which half of the entry overflowed ("offset" or "span").
        field: &'static str,
        /// The offending value.
        value: u32,
        /// The bit width available for it.
        bits: u8,
    },

    /// Packed table data ended in the middle of an entry.
    #[error("packed table data ended unexpectedly")]
    UnexpectedEndOfData,

    /// A table format could not be parsed from text.
    #[error("invalid table format {0:?}: expected BASExSPAN with widths in 1..=32")]
    InvalidFormat(String),

    /// The same table format was listed twice in the catalog.
    #[error("table format {0} appears more than once in the catalog")]
    DuplicateFormat(TableFormat),

    /// The catalog of table formats was empty.
    #[error("the table format catalog is empty")]
    EmptyCatalog,

    /// An error loading the configuration.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Formatting into an output buffer failed.
    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// An I/O error while reading input or writing output.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
