//! # Lookup-table optimizer
//!
//! Finds, for every contiguous sub-range of intervals, the cheapest way to
//! encode it: one flat table in some catalog format, or a comparison that
//! splits it into two sub-ranges which are in turn encoded optimally.
//!
//! ## Algorithm
//!
//! Bottom-up dynamic programming over the triangular table `cost[i][j]`,
//! `0 <= i <= j < n`, visited in strictly increasing length order. A split of
//! `i..=j` at `k` only reads `cost[i][k]` and `cost[k+1][j]`, both strictly
//! shorter and therefore already final.
//!
//! - Time: `O(n² · (|catalog| · n + n))`
//! - Space: `O(n²)`
//!
//! The chosen encoding is recovered afterwards by [`CostTable::reconstruct`].

mod decision;

use tracing_attributes::instrument;

use crate::cost::{self, Catalog, Cost, TableFormat};
use crate::error::Error;
use crate::interval::Intervals;

pub use decision::{Decision, Leaves};

/// The filled optimization table for one interval list and catalog.
///
/// Built once by [`CostTable::optimize`] and read-only afterwards.
#[derive(Debug)]
pub struct CostTable<'a> {
    intervals: &'a Intervals,
    catalog: &'a Catalog,
    /// `rows[i][j - i]` holds `cost[i][j]`.
    rows: Vec<Vec<Cost>>,
}

/// The order in which cells are filled: every `(i, j)` of length 0, then
/// every cell of length 1, and so on up to the whole range.
pub fn fill_order(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |len| (0..n - len).map(move |first| (first, first + len)))
}

impl<'a> CostTable<'a> {
    /// Computes the minimum cost of every sub-range of `intervals`.
    ///
    /// ## Errors
    /// - `EmptyInput` if there are no intervals
    #[instrument(skip_all, fields(intervals = intervals.len(), formats = catalog.len()))]
    pub fn optimize(intervals: &'a Intervals, catalog: &'a Catalog) -> Result<Self, Error> {
        let n = intervals.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        let rows = (0..n).map(|first| vec![Cost::INFINITE; n - first]).collect();
        let mut table = Self { intervals, catalog, rows };

        for (first, last) in fill_order(n) {
            let best_table = catalog
                .iter()
                .map(|&format| table.table_cost(format, first, last))
                .min()
                .unwrap_or(Cost::INFINITE);

            let best = best_table.min(table.min_split_cost(first, last));
            table.rows[first][last - first] = best;
        }

        let total = table.total();
        if total.is_finite() {
            tracing::info!(size = total.size(), depth = total.depth(), "final cost");
        } else {
            tracing::warn!("no finite encoding exists for the interval list");
        }

        Ok(table)
    }

    /// Minimum cost of encoding intervals `first..=last` as one unit.
    pub fn cost(&self, first: usize, last: usize) -> Cost {
        self.rows[first][last - first]
    }

    /// Minimum cost of encoding the whole interval list.
    pub fn total(&self) -> Cost {
        self.cost(0, self.len() - 1)
    }

    /// Cost of encoding `first..=last` as one flat table of `format`.
    pub fn table_cost(&self, format: TableFormat, first: usize, last: usize) -> Cost {
        cost::table_cost(self.intervals, format, first, last)
    }

    /// Cost of splitting `first..=last` into `first..=pivot` and
    /// `pivot+1..=last` with one comparison against the low bound of the
    /// interval at `pivot`.
    pub fn split_cost(&self, first: usize, pivot: usize, last: usize) -> Cost {
        debug_assert!(first <= pivot && pivot < last);
        Cost::split(self.cost(first, pivot), self.cost(pivot + 1, last))
    }

    /// Cheapest split of `first..=last`; infinite for a single interval.
    pub fn min_split_cost(&self, first: usize, last: usize) -> Cost {
        (first..last)
            .map(|pivot| self.split_cost(first, pivot, last))
            .min()
            .unwrap_or(Cost::INFINITE)
    }

    /// Number of intervals covered by the table.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
