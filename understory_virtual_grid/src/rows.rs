// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row models: extents and offsets of grid rows along the scroll axis.

use crate::DEFAULT_ITEM_HEIGHT;
use crate::options::positive_or;
use crate::util::{ceil_index, floor_index};

/// A 1D model over the rows of a grid, indexed `0..row_count()`.
///
/// Extents and offsets are in the same coordinate space as the scroll offset and
/// viewport height. Rows are laid out back to back, so for every valid `r`:
///
/// - `offset_of(0) == 0`,
/// - `offset_of(r + 1) == offset_of(r) + extent_of(r)`,
/// - `offset_of(row_count())` equals [`total_extent`](Self::total_extent).
///
/// Methods that consult prefix sums take `&mut self` so implementations can keep
/// lazy caches.
pub trait RowModel {
    /// Number of rows.
    fn row_count(&self) -> usize;

    /// Resizes the model to `rows` rows.
    ///
    /// Rows added by growing use the model's default extent.
    fn set_row_count(&mut self, rows: usize);

    /// Sets the extent used for rows without a more specific extent.
    ///
    /// Non-positive or non-finite values fall back to [`DEFAULT_ITEM_HEIGHT`].
    fn set_default_extent(&mut self, extent: f64);

    /// Total extent of all rows.
    fn total_extent(&mut self) -> f64;

    /// Extent of a single row. Out-of-range rows have extent `0.0`.
    fn extent_of(&mut self, row: usize) -> f64;

    /// Offset of the start of `row`. Rows at or past `row_count()` start at the
    /// total extent.
    fn offset_of(&mut self, row: usize) -> f64;

    /// Returns the row containing `offset`, clamped into `0..row_count()`.
    ///
    /// Returns `0` when there are no rows.
    fn row_at_offset(&mut self, offset: f64) -> usize;

    /// Returns the first row whose start is at or after `offset`.
    ///
    /// The result is in `0..=row_count()`; `row_count()` means no row starts at or
    /// after `offset`. For uniform rows of extent `h` this is `ceil(offset / h)`.
    fn row_at_or_after(&mut self, offset: f64) -> usize {
        let rows = self.row_count();
        if rows == 0 {
            return 0;
        }
        let row = self.row_at_offset(offset);
        if self.offset_of(row) >= offset {
            row
        } else {
            row + 1
        }
    }
}

/// A [`RowModel`] where every row has the same extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformRows {
    rows: usize,
    extent: f64,
}

impl UniformRows {
    /// Creates `rows` rows of the given extent.
    ///
    /// Non-positive or non-finite extents fall back to [`DEFAULT_ITEM_HEIGHT`] so
    /// offset lookups never divide by zero.
    #[must_use]
    pub fn new(rows: usize, extent: f64) -> Self {
        Self {
            rows,
            extent: positive_or(extent, DEFAULT_ITEM_HEIGHT),
        }
    }

    /// Returns the shared row extent.
    #[must_use]
    pub const fn extent(&self) -> f64 {
        self.extent
    }
}

impl RowModel for UniformRows {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn set_row_count(&mut self, rows: usize) {
        self.rows = rows;
    }

    fn set_default_extent(&mut self, extent: f64) {
        self.extent = positive_or(extent, DEFAULT_ITEM_HEIGHT);
    }

    fn total_extent(&mut self) -> f64 {
        self.extent * self.rows as f64
    }

    fn extent_of(&mut self, row: usize) -> f64 {
        if row < self.rows { self.extent } else { 0.0 }
    }

    fn offset_of(&mut self, row: usize) -> f64 {
        self.extent * row.min(self.rows) as f64
    }

    fn row_at_offset(&mut self, offset: f64) -> usize {
        if self.rows == 0 {
            return 0;
        }
        floor_index(offset / self.extent).min(self.rows - 1)
    }

    fn row_at_or_after(&mut self, offset: f64) -> usize {
        ceil_index(offset / self.extent).min(self.rows)
    }
}
