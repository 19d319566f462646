#![deny(missing_docs)]

//! # spantab
//!
//! Compiles a sorted list of integer ranges into the smallest lookup
//! structure built from flat tables and binary comparisons.
//!
//! The pipeline is:
//! 1. [`interval::Intervals::parse`] reads and canonicalizes the ranges,
//! 2. [`optimizer::CostTable::optimize`] prices every sub-range,
//! 3. [`optimizer::CostTable::reconstruct`] recovers the optimal tree,
//! 4. [`emit::render`] turns the tree into a symbolic or assembly listing.

pub mod config;
pub mod cost;
pub mod emit;
pub mod error;
pub mod interval;
pub mod logging;
pub mod optimizer;

#[cfg(test)]
pub(crate) mod testing;

use std::io::BufRead;

use crate::cost::Catalog;
use crate::emit::OutputMode;
use crate::error::Error;
use crate::interval::Intervals;
use crate::optimizer::CostTable;

/// Runs the whole pipeline over `reader` and returns the rendered document.
///
/// Nothing is written anywhere; the caller decides what to do with the
/// text, so a failure at any stage leaves no partial output behind.
pub fn compile<R: BufRead>(
    reader: R,
    catalog: &Catalog,
    max_intervals: usize,
    mode: &OutputMode,
) -> Result<String, Error> {
    let intervals = Intervals::parse(reader, max_intervals)?;
    let table = CostTable::optimize(&intervals, catalog)?;
    let tree = table.reconstruct()?;

    tracing::debug!(leaves = tree.leaves().count(), "reconstructed decision tree");

    emit::render(mode, &tree, &intervals)
}
