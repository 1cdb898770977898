// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible range calculation.

use core::num::NonZeroUsize;
use core::ops::Range;

use crate::{RowModel, UniformRows};

/// The window of item indices to realize for one pass.
///
/// Indices are stored half-open as `start..end`, so the inclusive bounds are
/// `start` and `end - 1` (see [`first_index`](Self::first_index) and
/// [`last_index`](Self::last_index)). When the range is non-empty it always covers
/// whole rows, except that the last row may be partially filled.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    /// First realized item index (inclusive).
    pub start: usize,
    /// One past the last realized item index (exclusive).
    pub end: usize,
    /// First realized row (inclusive).
    pub first_row: usize,
    /// One past the last realized row (exclusive).
    pub end_row: usize,
    /// Total extent of the rows before `first_row`.
    pub before_extent: f64,
    /// Total extent of the rows at or after `end_row`.
    pub after_extent: f64,
    /// Total extent of all rows.
    pub content_extent: f64,
}

impl VisibleRange {
    /// A range with no items and no content.
    pub const EMPTY: Self = Self {
        start: 0,
        end: 0,
        first_row: 0,
        end_row: 0,
        before_extent: 0.0,
        after_extent: 0.0,
        content_extent: 0.0,
    };

    /// Creates a range from inclusive index bounds.
    ///
    /// `start_index > end_index` yields an empty range. Row and extent fields are zero,
    /// since no layout is known.
    #[must_use]
    pub const fn from_inclusive(start_index: usize, end_index: usize) -> Self {
        if start_index > end_index {
            return Self::EMPTY;
        }
        Self {
            start: start_index,
            end: end_index.saturating_add(1),
            ..Self::EMPTY
        }
    }

    /// Returns `true` if no item is realized.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of realized items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// First realized index, if any.
    #[must_use]
    pub const fn first_index(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.start)
        }
    }

    /// Last realized index (inclusive), if any.
    #[must_use]
    pub const fn last_index(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - 1)
        }
    }

    /// Realized indices in ascending order.
    #[must_use]
    pub fn indices(&self) -> Range<usize> {
        self.start..self.end.max(self.start)
    }

    /// Returns `true` if `index` is realized.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }
}

impl Default for VisibleRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Computes the realized range for uniform rows of `row_height`.
///
/// With `rows = ceil(item_count / columns)` and `h = row_height`:
///
/// - `first_row = max(0, floor(scroll_top / h) - buffer_rows)`
/// - `last_row = min(rows - 1, ceil((scroll_top + viewport_height) / h) + buffer_rows)`
/// - the range is `first_row * columns ..= min(item_count - 1, (last_row + 1) * columns - 1)`.
///
/// When the viewport is scrolled to the very end and `buffer_rows` is `0`, the first
/// formula lands one past the last row; `first_row` is then capped at `last_row`.
///
/// Inputs are normalized first: `item_count == 0` yields [`VisibleRange::EMPTY`], a
/// non-positive or non-finite `row_height` falls back to
/// [`DEFAULT_ITEM_HEIGHT`](crate::DEFAULT_ITEM_HEIGHT), `scroll_top` is clamped into
/// `[0, content_extent]`, and a negative or NaN `viewport_height` counts as zero.
///
/// ```rust
/// use core::num::NonZeroUsize;
/// use understory_virtual_grid::compute_visible_range;
///
/// let columns = NonZeroUsize::new(4).unwrap();
/// let range = compute_visible_range(100, columns, 100.0, 0.0, 500.0, 1);
/// assert_eq!((range.first_index(), range.last_index()), (Some(0), Some(27)));
///
/// let range = compute_visible_range(100, columns, 100.0, 1_000.0, 500.0, 1);
/// assert_eq!((range.first_index(), range.last_index()), (Some(36), Some(67)));
/// ```
#[must_use]
pub fn compute_visible_range(
    item_count: usize,
    columns: NonZeroUsize,
    row_height: f64,
    scroll_top: f64,
    viewport_height: f64,
    buffer_rows: usize,
) -> VisibleRange {
    let mut rows = UniformRows::new(0, row_height);
    compute_visible_range_in(
        &mut rows,
        item_count,
        columns,
        scroll_top,
        viewport_height,
        buffer_rows,
    )
}

/// Computes the realized range over an arbitrary [`RowModel`].
///
/// The model is resized to `ceil(item_count / columns)` rows first. The calculation
/// is the one documented on [`compute_visible_range`], with `floor(scroll_top / h)`
/// read as "the row containing `scroll_top`" and `ceil(bottom / h)` read as "the first
/// row starting at or after `bottom`". For [`UniformRows`] both functions agree.
#[must_use]
pub fn compute_visible_range_in<R>(
    rows: &mut R,
    item_count: usize,
    columns: NonZeroUsize,
    scroll_top: f64,
    viewport_height: f64,
    buffer_rows: usize,
) -> VisibleRange
where
    R: RowModel + ?Sized,
{
    if item_count == 0 {
        rows.set_row_count(0);
        return VisibleRange::EMPTY;
    }

    let columns = columns.get();
    let row_count = item_count.div_ceil(columns);
    rows.set_row_count(row_count);

    let content_extent = rows.total_extent().max(0.0);
    // `f64::max` discards NaN, so NaN inputs clamp to zero.
    let scroll_top = scroll_top.max(0.0).min(content_extent);
    let viewport_height = viewport_height.max(0.0);

    // At the very end of the content the top edge lies past the last row.
    let top_row = if scroll_top >= content_extent {
        row_count
    } else {
        rows.row_at_offset(scroll_top)
    };
    let last_row = rows
        .row_at_or_after(scroll_top + viewport_height)
        .saturating_add(buffer_rows)
        .min(row_count - 1);
    let first_row = top_row.saturating_sub(buffer_rows).min(last_row);
    debug_assert!(
        first_row <= last_row,
        "visible rows out of order: first={first_row}, last={last_row}"
    );

    let start = first_row * columns;
    let end = (last_row + 1).saturating_mul(columns).min(item_count);

    let before_extent = rows.offset_of(first_row);
    let after_extent = (content_extent - rows.offset_of(last_row + 1)).max(0.0);

    VisibleRange {
        start,
        end,
        first_row,
        end_row: last_row + 1,
        before_extent,
        after_extent,
        content_extent,
    }
}
