// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`RowModel`] for rows of differing heights, refined by measurement.

use alloc::vec::Vec;

use crate::DEFAULT_ITEM_HEIGHT;
use crate::RowModel;
use crate::options::positive_or;

/// A [`RowModel`] with per-row extents and a lazily rebuilt prefix-sum cache.
///
/// Every row starts out at an estimated extent. As the host lays out realized rows it
/// reports their real heights with [`MeasuredRows::set_row_extent`]; offsets for rows
/// after a changed row are recomputed the next time they are queried.
#[derive(Clone, Debug)]
pub struct MeasuredRows {
    estimate: f64,
    measured: Vec<Option<f64>>,
    starts: Vec<f64>,
    /// Number of leading entries in `starts` that are up to date.
    clean: usize,
}

impl MeasuredRows {
    /// Creates an empty model whose unmeasured rows use `estimate`.
    #[must_use]
    pub fn new(estimate: f64) -> Self {
        Self {
            estimate: positive_or(estimate, DEFAULT_ITEM_HEIGHT),
            measured: Vec::new(),
            starts: Vec::new(),
            clean: 0,
        }
    }

    /// Returns the extent used for unmeasured rows.
    #[must_use]
    pub const fn estimate(&self) -> f64 {
        self.estimate
    }

    /// Records the measured extent of `row`, growing the model if needed.
    ///
    /// Non-positive or non-finite measurements are discarded and the row goes back to
    /// the estimate.
    pub fn set_row_extent(&mut self, row: usize, extent: f64) {
        if row >= self.measured.len() {
            self.set_row_count(row + 1);
        }
        debug_assert!(
            !extent.is_nan(),
            "MeasuredRows extents must not be NaN (row {row})"
        );
        self.measured[row] = (extent.is_finite() && extent > 0.0).then_some(extent);
        // Row `row` keeps its start; everything after it moves.
        self.clean = self.clean.min(row + 1);
    }

    /// Returns `true` if `row` has a recorded measurement.
    #[must_use]
    pub fn is_measured(&self, row: usize) -> bool {
        matches!(self.measured.get(row), Some(Some(_)))
    }

    /// Returns the recorded measurement of `row`, if any.
    #[must_use]
    pub fn measured_extent(&self, row: usize) -> Option<f64> {
        self.measured.get(row).copied().flatten()
    }

    /// Forgets every measurement; all rows return to the estimate.
    pub fn clear_measurements(&mut self) {
        self.measured.iter_mut().for_each(|m| *m = None);
        self.clean = 0;
    }

    fn extent(&self, row: usize) -> f64 {
        match self.measured.get(row) {
            Some(Some(extent)) => *extent,
            Some(None) => self.estimate,
            None => 0.0,
        }
    }

    fn ensure_starts_through(&mut self, row: usize) {
        if row < self.clean {
            return;
        }
        let mut pos = match self.clean {
            0 => 0.0,
            clean => self.starts[clean - 1] + self.extent(clean - 1),
        };
        for i in self.clean..=row {
            self.starts[i] = pos;
            pos += self.extent(i);
        }
        self.clean = row + 1;
    }
}

impl Default for MeasuredRows {
    fn default() -> Self {
        Self::new(DEFAULT_ITEM_HEIGHT)
    }
}

impl RowModel for MeasuredRows {
    fn row_count(&self) -> usize {
        self.measured.len()
    }

    fn set_row_count(&mut self, rows: usize) {
        self.measured.resize(rows, None);
        self.starts.resize(rows, 0.0);
        self.clean = self.clean.min(rows);
    }

    fn set_default_extent(&mut self, extent: f64) {
        let extent = positive_or(extent, DEFAULT_ITEM_HEIGHT);
        if extent != self.estimate {
            self.estimate = extent;
            self.clean = 0;
        }
    }

    fn total_extent(&mut self) -> f64 {
        match self.measured.len() {
            0 => 0.0,
            len => {
                let last = len - 1;
                self.ensure_starts_through(last);
                self.starts[last] + self.extent(last)
            }
        }
    }

    fn extent_of(&mut self, row: usize) -> f64 {
        self.extent(row)
    }

    fn offset_of(&mut self, row: usize) -> f64 {
        if row >= self.measured.len() {
            return self.total_extent();
        }
        self.ensure_starts_through(row);
        self.starts[row]
    }

    fn row_at_offset(&mut self, offset: f64) -> usize {
        let len = self.measured.len();
        if len == 0 {
            return 0;
        }
        self.ensure_starts_through(len - 1);
        // Starts are strictly increasing since every extent is positive.
        let at_or_before = self.starts.partition_point(|start| *start <= offset);
        at_or_before.saturating_sub(1).min(len - 1)
    }
}
