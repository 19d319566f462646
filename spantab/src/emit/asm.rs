//! Assembly-like rendering: packed data tables plus the comparison code that
//! dispatches into them.
//!
//! Every node gets a label `.L_<first>_<last>`. A split compares `eax`
//! against the low bound of its pivot interval and jumps to the right
//! subtree on `jae`, falling through into the left subtree's code. A leaf
//! rebases `eax`, loads its table address and entry count, and tail-jumps
//! into the shared `unicode_bsearch_<base>_<span>` routine for its format.

use std::fmt::Write;

use crate::error::Error;
use crate::interval::Intervals;
use crate::optimizer::Decision;

use super::leaf_entries;
use super::packing::packing_for;

/// Renders the data and code sections for a decision tree.
pub struct Assembly<'a> {
    name: &'a str,
    tree: &'a Decision,
    intervals: &'a Intervals,
}

impl<'a> Assembly<'a> {
    /// Labels are derived from `name`; `tree` must have been built for
    /// `intervals`.
    pub fn new(name: &'a str, tree: &'a Decision, intervals: &'a Intervals) -> Self {
        Self { name, tree, intervals }
    }

    /// Renders both sections.
    ///
    /// ## Errors
    /// - `UnsupportedPacking` if a leaf uses a format with no byte layout
    pub fn render(&self) -> Result<String, Error> {
        let mut out = String::new();
        self.write_data(&mut out)?;
        self.write_code(&mut out)?;
        Ok(out)
    }

    /// Writes the `<name>_data` section: one aligned, labelled table per leaf.
    pub fn write_data(&self, out: &mut String) -> Result<(), Error> {
        let name = self.name;
        writeln!(out, ";; {name} data start")?;
        writeln!(out, "{name}_data:")?;

        for leaf in self.tree.leaves() {
            let Decision::Leaf { format, first, last } = leaf else {
                continue;
            };
            let packing = packing_for(*format)?;

            writeln!(out, "    align 4")?;
            writeln!(out, " .T_{first}_{last}:")?;
            for (offset, span) in leaf_entries(self.intervals, *first, *last) {
                writeln!(out, "    {}", packing.directive(offset, span)?)?;
            }
        }

        writeln!(out, ";; {name} data end")?;
        Ok(())
    }

    /// Writes the `<name>_code` section.
    pub fn write_code(&self, out: &mut String) -> Result<(), Error> {
        let name = self.name;
        writeln!(out, ";; {name} code start")?;
        writeln!(out, "{name}_code:")?;
        self.write_node(out, self.tree)?;
        writeln!(out, ";; {name} code end")?;
        Ok(())
    }

    fn write_node(&self, out: &mut String, node: &Decision) -> Result<(), Error> {
        writeln!(out, "  .L_{}_{}:", node.first(), node.last())?;

        match node {
            Decision::Leaf { format, first, last } => {
                writeln!(out, "    sub eax, 0x{:X}", self.intervals[*first].low())?;
                writeln!(out, "    mov ebx, {}_data.T_{first}_{last}", self.name)?;
                writeln!(out, "    mov ecx, {}", last - first + 1)?;
                writeln!(
                    out,
                    "    jmp unicode_bsearch_{}_{}",
                    format.base_bits(),
                    format.span_bits()
                )?;
            }
            Decision::Split { pivot, left, right } => {
                writeln!(out, "    cmp eax, 0x{:X}", self.intervals[*pivot].low())?;
                writeln!(out, "    jae .L_{}_{}", right.first(), right.last())?;
                self.write_node(out, left)?;
                self.write_node(out, right)?;
            }
        }

        Ok(())
    }
}
