//! Recovery of the decision tree realizing the optimal cost.
//!
//! The cost table only stores costs, not choices. The choice at each
//! sub-range is re-derived by recomputing candidate costs and taking the
//! first one equal to the stored minimum: catalog formats in catalog order,
//! then split points in increasing order. That enumeration order is the
//! tie-break rule and fixes the output for a given input.

use crate::cost::{Cost, TableFormat};
use crate::error::Error;
use crate::interval::Intervals;

use super::CostTable;

/// One node of the lookup decision tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Intervals `first..=last` are stored in one flat table of `format`.
    Leaf {
        /// Entry layout of the table.
        format: TableFormat,
        /// Index of the first interval in the table.
        first: usize,
        /// Index of the last interval in the table.
        last: usize,
    },
    /// Values below the low bound of interval `pivot` go left, the rest go
    /// right.
    Split {
        /// Last interval index covered by `left`.
        pivot: usize,
        /// Subtree for `first..=pivot`.
        left: Box<Decision>,
        /// Subtree for `pivot+1..=last`.
        right: Box<Decision>,
    },
}

impl Decision {
    /// Index of the first interval covered by this node.
    pub fn first(&self) -> usize {
        match self {
            Decision::Leaf { first, .. } => *first,
            Decision::Split { left, .. } => left.first(),
        }
    }

    /// Index of the last interval covered by this node.
    pub fn last(&self) -> usize {
        match self {
            Decision::Leaf { last, .. } => *last,
            Decision::Split { right, .. } => right.last(),
        }
    }

    /// Iterates over the leaves from left to right.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }

    /// Recomputes the cost of this tree from scratch.
    pub fn cost(&self, intervals: &Intervals) -> Cost {
        match self {
            Decision::Leaf { format, first, last } => {
                crate::cost::table_cost(intervals, *format, *first, *last)
            }
            Decision::Split { left, right, .. } => {
                Cost::split(left.cost(intervals), right.cost(intervals))
            }
        }
    }
}

/// Left-to-right iterator over the leaves of a [`Decision`].
pub struct Leaves<'a> {
    stack: Vec<&'a Decision>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Decision;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                Decision::Leaf { .. } => return Some(node),
                Decision::Split { left, right, .. } => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
            }
        }
        None
    }
}

impl CostTable<'_> {
    /// Rebuilds the optimal decision tree for the whole interval list.
    ///
    /// ## Errors
    /// - `Infeasible` if no encoding of the whole list has finite cost; the
    ///   error names the first interval that no format can hold
    pub fn reconstruct(&self) -> Result<Decision, Error> {
        if !self.total().is_finite() {
            return Err(self.infeasible());
        }

        self.decide(0, self.len() - 1)
    }

    fn decide(&self, first: usize, last: usize) -> Result<Decision, Error> {
        let target = self.cost(first, last);

        for &format in self.catalog.iter() {
            if self.table_cost(format, first, last) == target {
                return Ok(Decision::Leaf { format, first, last });
            }
        }

        for pivot in first..last {
            if self.split_cost(first, pivot, last) == target {
                return Ok(Decision::Split {
                    pivot,
                    left: Box::new(self.decide(first, pivot)?),
                    right: Box::new(self.decide(pivot + 1, last)?),
                });
            }
        }

        // A finite cell always equals one of its candidates.
        Err(self.infeasible())
    }

    fn infeasible(&self) -> Error {
        let index = (0..self.len())
            .find(|&index| !self.cost(index, index).is_finite())
            .unwrap_or(0);
        let interval = self.intervals[index];

        Error::Infeasible {
            index,
            low: interval.low(),
            high: interval.high(),
        }
    }
}
