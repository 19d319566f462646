//! Output renderers for an optimized decision tree.
//!
//! Two documents can be produced from the same [`Decision`]:
//! - [`Symbolic`]: a nested s-expression describing the tree.
//! - [`Assembly`]: packed data tables followed by the dispatch code.

pub mod asm;
pub mod packing;
pub mod symbolic;

pub use asm::Assembly;
pub use packing::{pack_entries, packing_for, unpack_entries, EntryPacking};
pub use symbolic::Symbolic;

use crate::error::Error;
use crate::interval::Intervals;
use crate::optimizer::Decision;

/// Which document to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// The s-expression listing.
    Symbolic,
    /// The data and code listing, with labels derived from `name`.
    Assembly {
        /// Prefix for the `<name>_data` and `<name>_code` labels.
        name: String,
    },
}

/// Renders `tree` into a complete document.
pub fn render(mode: &OutputMode, tree: &Decision, intervals: &Intervals) -> Result<String, Error> {
    match mode {
        OutputMode::Symbolic => Ok(Symbolic::new(tree, intervals).to_string()),
        OutputMode::Assembly { name } => Assembly::new(name, tree, intervals).render(),
    }
}

/// The `(offset, span)` entries of the table holding `first..=last`, with
/// offsets relative to the low bound of interval `first`.
pub(crate) fn leaf_entries(
    intervals: &Intervals,
    first: usize,
    last: usize,
) -> impl Iterator<Item = (u32, u32)> + '_ {
    let base = intervals[first].low();
    intervals.as_slice()[first..=last]
        .iter()
        .map(move |interval| (interval.low() - base, interval.span()))
}
