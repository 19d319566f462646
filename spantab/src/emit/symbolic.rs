//! S-expression rendering of a decision tree.
//!
//! ```text
//! (split #x41 ; 0 0 1
//!  (table-16-16 #x41 (0 25))
//!  (table-16-16 #x61 (0 25)))
//! ```
//!
//! Closing parentheses are batched: a split prints no closer of its own, and
//! the right-most leaf beneath it closes every enclosing split at once.

use std::fmt;

use crate::interval::Intervals;
use crate::optimizer::Decision;

use super::leaf_entries;

/// Displays a decision tree as a nested s-expression, one node per line.
pub struct Symbolic<'a> {
    tree: &'a Decision,
    intervals: &'a Intervals,
}

impl<'a> Symbolic<'a> {
    /// Wraps `tree`, which must have been built for `intervals`.
    pub fn new(tree: &'a Decision, intervals: &'a Intervals) -> Self {
        Self { tree, intervals }
    }

    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: &Decision,
        indent: usize,
        pending: usize,
    ) -> fmt::Result {
        write!(f, "{:indent$}", "")?;

        match node {
            Decision::Leaf { format, first, last } => {
                let base = self.intervals[*first].low();
                write!(f, "(table-{}-{} #x{base:X}", format.base_bits(), format.span_bits())?;
                for (offset, span) in leaf_entries(self.intervals, *first, *last) {
                    write!(f, " ({offset} {span})")?;
                }
                writeln!(f, "{}", ")".repeat(1 + pending))
            }
            Decision::Split { pivot, left, right } => {
                let pivot_low = self.intervals[*pivot].low();
                writeln!(f, "(split #x{pivot_low:X} ; {} {pivot} {}", node.first(), node.last())?;
                self.write_node(f, left, indent + 1, 0)?;
                self.write_node(f, right, indent + 1, 1 + pending)
            }
        }
    }
}

impl fmt::Display for Symbolic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.tree, 0, 0)
    }
}
