// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A controller that owns grid options, viewport state, and a row model.

use core::num::NonZeroUsize;
use core::ops::Range;

use kurbo::{Rect, Size};

use crate::{
    DEFAULT_ITEM_WIDTH, GridOptions, RenderPass, RowModel, SlotRenderer, UniformRows,
    VisibleRange, compute_visible_range_in, render_range, resolve_columns,
};

/// Alignment mode when scrolling a specific index into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Align the top of the item's row with the top of the viewport.
    Start,
    /// Center the item's row within the viewport.
    Center,
    /// Align the bottom of the item's row with the bottom of the viewport.
    End,
    /// Move just enough to make the row fully visible, preferring the smallest change
    /// from the current scroll offset.
    Nearest,
}

/// Scroll position and viewport geometry, as reported by the host.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    /// Scroll offset of the top of the viewport, `>= 0`.
    pub scroll_top: f64,
    /// Height of the viewport, `>= 0`.
    pub viewport_height: f64,
    /// Width available to lay out columns, `>= 0`.
    pub container_width: f64,
}

impl ViewportState {
    /// The viewport as a size (`container_width` × `viewport_height`).
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.container_width, self.viewport_height)
    }
}

/// A discrete input to a [`VirtualGrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridEvent {
    /// The viewport scrolled to an absolute offset.
    Scroll(f64),
    /// The container was resized (width × viewport height).
    Resize(Size),
    /// The item sequence was replaced or changed length.
    ItemCount(usize),
}

/// Whether a grid currently has anything to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridState {
    /// No items; nothing is rendered until items arrive.
    Empty,
    /// At least one item; a range is computed on every pass.
    Populated,
}

bitflags::bitflags! {
    /// Derived state that is stale and will be recomputed on the next read.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Invalidation: u8 {
        /// The column count depends on a changed width or option.
        const COLUMNS = 0b0000_0001;
        /// The row model needs a new row count or default extent.
        const ROWS    = 0b0000_0010;
        /// The visible range must be recomputed.
        const RANGE   = 0b0000_0100;
    }
}

/// Controller for a virtualized grid.
///
/// This type:
/// - stores [`GridOptions`], the [`ViewportState`], and the item count,
/// - owns a [`RowModel`] ([`UniformRows`] unless built with [`VirtualGrid::with_rows`]),
/// - caches the resolved column count and the last [`VisibleRange`],
/// - recomputes only what the inputs since the last read invalidated.
///
/// Inputs never trigger work by themselves. Any number of scroll, resize, or item
/// count changes between two reads collapse into one recompute that sees only the
/// latest values, and the cached range is replaced only once that recompute is done.
#[derive(Debug, Clone)]
pub struct VirtualGrid<R: RowModel = UniformRows, G = ()> {
    options: GridOptions<G>,
    viewport: ViewportState,
    item_count: usize,
    rows: R,

    columns: NonZeroUsize,
    invalid: Invalidation,
    last_range: VisibleRange,
}

impl<G> VirtualGrid<UniformRows, G> {
    /// Creates a grid with uniform rows of `options.default_item_height`.
    #[must_use]
    pub fn new(options: GridOptions<G>) -> Self {
        let rows = UniformRows::new(0, options.row_height());
        Self::with_rows(options, rows)
    }
}

impl<R: RowModel, G> VirtualGrid<R, G> {
    /// Creates a grid over a caller-supplied row model.
    ///
    /// The model's default extent is set from `options.default_item_height`.
    #[must_use]
    pub fn with_rows(options: GridOptions<G>, mut rows: R) -> Self {
        rows.set_default_extent(options.row_height());
        Self {
            options,
            viewport: ViewportState::default(),
            item_count: 0,
            rows,
            columns: NonZeroUsize::MIN,
            invalid: Invalidation::all(),
            last_range: VisibleRange::EMPTY,
        }
    }

    /// Returns the current options.
    #[must_use]
    pub const fn options(&self) -> &GridOptions<G> {
        &self.options
    }

    /// Replaces the options.
    pub fn set_options(&mut self, options: GridOptions<G>) {
        self.options = options;
        self.invalid = Invalidation::all();
    }

    /// Returns a shared reference to the row model.
    #[must_use]
    pub const fn rows(&self) -> &R {
        &self.rows
    }

    /// Returns a mutable reference to the row model, marking the range stale.
    ///
    /// Use this to feed measured row heights into a [`MeasuredRows`](crate::MeasuredRows).
    pub fn rows_mut(&mut self) -> &mut R {
        self.invalid |= Invalidation::RANGE;
        &mut self.rows
    }

    /// Returns the viewport state as of the last read.
    #[must_use]
    pub const fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// Returns the number of items.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// Sets the number of items.
    pub fn set_item_count(&mut self, item_count: usize) {
        if item_count != self.item_count {
            self.item_count = item_count;
            self.invalid |= Invalidation::ROWS | Invalidation::RANGE;
        }
    }

    /// Returns [`GridState::Empty`] when there are no items.
    #[must_use]
    pub const fn state(&self) -> GridState {
        if self.item_count == 0 {
            GridState::Empty
        } else {
            GridState::Populated
        }
    }

    /// Returns the scroll offset, clamped into the current content.
    #[must_use]
    pub fn scroll_top(&mut self) -> f64 {
        self.refresh();
        self.viewport.scroll_top
    }

    /// Sets the scroll offset. Negative and NaN offsets become `0`.
    ///
    /// Offsets past the end of the content are clamped on the next read.
    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        let scroll_top = scroll_top.max(0.0);
        if scroll_top != self.viewport.scroll_top {
            self.viewport.scroll_top = scroll_top;
            self.invalid |= Invalidation::RANGE;
        }
    }

    /// Adjusts the scroll offset by `delta`.
    pub fn scroll_by(&mut self, delta: f64) {
        let current = self.scroll_top();
        self.set_scroll_top(current + delta);
    }

    /// Sets the viewport height.
    pub fn set_viewport_height(&mut self, height: f64) {
        let height = height.max(0.0);
        if height != self.viewport.viewport_height {
            self.viewport.viewport_height = height;
            self.invalid |= Invalidation::RANGE;
        }
    }

    /// Sets the width available for columns.
    pub fn set_container_width(&mut self, width: f64) {
        let width = width.max(0.0);
        if width != self.viewport.container_width {
            self.viewport.container_width = width;
            self.invalid |= Invalidation::COLUMNS | Invalidation::RANGE;
        }
    }

    /// Sets container width and viewport height at once.
    pub fn set_viewport(&mut self, size: Size) {
        self.set_container_width(size.width);
        self.set_viewport_height(size.height);
    }

    /// Applies one event.
    pub fn handle(&mut self, event: GridEvent) {
        match event {
            GridEvent::Scroll(top) => self.set_scroll_top(top),
            GridEvent::Resize(size) => self.set_viewport(size),
            GridEvent::ItemCount(count) => self.set_item_count(count),
        }
    }

    /// Applies events in order. Later events supersede earlier ones.
    pub fn handle_all(&mut self, events: impl IntoIterator<Item = GridEvent>) {
        for event in events {
            self.handle(event);
        }
    }

    /// Returns which derived state is stale.
    #[must_use]
    pub const fn invalidation(&self) -> Invalidation {
        self.invalid
    }

    fn refresh(&mut self) {
        if self.invalid.is_empty() {
            return;
        }

        if self.invalid.contains(Invalidation::COLUMNS) {
            let columns = resolve_columns(
                self.viewport.container_width,
                self.options.default_item_width,
                self.options.max_columns,
            );
            if columns != self.columns {
                vdebug!(
                    from = self.columns.get(),
                    to = columns.get(),
                    width = self.viewport.container_width,
                    "column count changed"
                );
                self.columns = columns;
                self.invalid |= Invalidation::ROWS;
            }
        }

        if self.invalid.contains(Invalidation::ROWS) {
            self.rows.set_default_extent(self.options.row_height());
        }

        let range = compute_visible_range_in(
            &mut self.rows,
            self.item_count,
            self.columns,
            self.viewport.scroll_top,
            self.viewport.viewport_height,
            self.options.buffer_rows,
        );
        vtrace!(
            start = range.start,
            end = range.end,
            scroll_top = self.viewport.scroll_top,
            "visible range recomputed"
        );
        // Queries read the same offset the range was computed from.
        self.viewport.scroll_top = self.viewport.scroll_top.min(range.content_extent);
        self.last_range = range;
        self.invalid = Invalidation::empty();
    }

    /// Returns the resolved column count.
    #[must_use]
    pub fn columns(&mut self) -> NonZeroUsize {
        self.refresh();
        self.columns
    }

    /// Returns the number of rows needed for all items.
    #[must_use]
    pub fn row_count(&mut self) -> usize {
        self.refresh();
        self.rows.row_count()
    }

    /// Computes or returns the cached visible range.
    #[must_use]
    pub fn visible_range(&mut self) -> VisibleRange {
        self.refresh();
        self.last_range
    }

    /// Realized indices in ascending order.
    #[must_use]
    pub fn visible_indices(&mut self) -> Range<usize> {
        self.visible_range().indices()
    }

    /// Total height of all rows.
    #[must_use]
    pub fn content_height(&mut self) -> f64 {
        self.refresh();
        self.rows.total_extent()
    }

    /// Size of the scrollable content (container width × content height).
    #[must_use]
    pub fn content_size(&mut self) -> Size {
        Size::new(self.viewport.container_width, self.content_height())
    }

    /// Row containing `index`.
    #[must_use]
    pub fn row_of(&mut self, index: usize) -> usize {
        index / self.columns().get()
    }

    /// Column of `index` within its row.
    #[must_use]
    pub fn column_of(&mut self, index: usize) -> usize {
        index % self.columns().get()
    }

    /// Width of one column.
    ///
    /// Columns share the container width evenly. Before a width is known this is the
    /// configured item width.
    #[must_use]
    pub fn column_width(&mut self) -> f64 {
        let columns = self.columns().get() as f64;
        let width = self.viewport.container_width;
        if width > 0.0 {
            width / columns
        } else {
            self.options.item_width().unwrap_or(DEFAULT_ITEM_WIDTH)
        }
    }

    /// Absolute placement of `index` within the content, or `None` if out of range.
    #[must_use]
    pub fn cell_rect(&mut self, index: usize) -> Option<Rect> {
        if index >= self.item_count {
            return None;
        }
        let column_width = self.column_width();
        let row = self.row_of(index);
        let x0 = self.column_of(index) as f64 * column_width;
        let y0 = self.rows.offset_of(row);
        let y1 = y0 + self.rows.extent_of(row);
        Some(Rect::new(x0, y0, x0 + column_width, y1))
    }

    /// Returns `true` if `index` is part of the realized range (buffer rows included).
    #[must_use]
    pub fn is_index_rendered(&mut self, index: usize) -> bool {
        self.visible_range().contains(index)
    }

    fn row_span(&mut self, index: usize) -> Option<(f64, f64)> {
        if index >= self.item_count {
            return None;
        }
        let row = self.row_of(index);
        let start = self.rows.offset_of(row);
        Some((start, start + self.rows.extent_of(row)))
    }

    /// Returns `true` if the row of `index` lies entirely inside the viewport.
    #[must_use]
    pub fn is_index_fully_visible(&mut self, index: usize) -> bool {
        let Some((item_start, item_end)) = self.row_span(index) else {
            return false;
        };
        let view_start = self.viewport.scroll_top;
        let view_end = view_start + self.viewport.viewport_height;
        item_start >= view_start && item_end <= view_end
    }

    /// Returns `true` if the row of `index` overlaps the viewport at all.
    #[must_use]
    pub fn is_index_partially_visible(&mut self, index: usize) -> bool {
        let Some((item_start, item_end)) = self.row_span(index) else {
            return false;
        };
        let view_start = self.viewport.scroll_top;
        let view_end = view_start + self.viewport.viewport_height;
        item_end > view_start && item_start < view_end
    }

    /// Clamps the scroll offset so the viewport stays within the content.
    pub fn clamp_scroll_to_content(&mut self) {
        let content = self.content_height();
        let max_offset = (content - self.viewport.viewport_height).max(0.0);
        if self.viewport.scroll_top > max_offset {
            self.set_scroll_top(max_offset);
        }
    }

    /// Scrolls so the row of `index` is brought into view using `align`.
    pub fn scroll_to_index(&mut self, index: usize, align: ScrollAlign) {
        if self.item_count == 0 {
            self.set_scroll_top(0.0);
            return;
        }
        let index = index.min(self.item_count - 1);
        let Some((item_start, item_end)) = self.row_span(index) else {
            return;
        };
        let viewport = self.viewport.viewport_height;

        let new_offset = match align {
            ScrollAlign::Start => item_start,
            ScrollAlign::End => (item_end - viewport).max(0.0),
            ScrollAlign::Center => ((item_start + item_end) / 2.0 - viewport / 2.0).max(0.0),
            ScrollAlign::Nearest => {
                let current = self.viewport.scroll_top;
                if item_start >= current && item_end <= current + viewport {
                    current
                } else if item_start < current {
                    item_start
                } else {
                    (item_end - viewport).max(0.0)
                }
            }
        };

        self.set_scroll_top(new_offset);
    }

    /// Starts a render pass over the current range of `items`.
    ///
    /// The item count is synced from `items.len()` first, so replacing the sequence
    /// needs no separate [`GridEvent::ItemCount`].
    pub fn render<'a, T, S>(&mut self, items: &'a [T], renderer: S) -> RenderPass<'a, T, S>
    where
        S: SlotRenderer<T>,
    {
        self.set_item_count(items.len());
        let range = self.visible_range();
        render_range(items, range, renderer)
    }
}
