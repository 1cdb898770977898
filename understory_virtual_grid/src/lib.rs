// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_virtual_grid --heading-base-level=0

//! Understory Virtual Grid: headless virtualization for item grids.
//!
//! This crate decides *which* items of a large ordered collection should be realized
//! for the current viewport of a scrolling grid, and in what order. It does not own
//! widgets, styling, or content; host frameworks feed it scroll and resize events and
//! hand it a renderer for the indices it selects.
//!
//! The core pieces are:
//!
//! - [`resolve_columns`]: derives the column count from the container width, the
//!   nominal item width, and an optional column cap.
//! - [`compute_visible_range`]: the closed-form range calculation for uniform rows,
//!   returning a [`VisibleRange`] of flat item indices plus spacer extents.
//!   [`compute_visible_range_in`] runs the same calculation over any [`RowModel`],
//!   such as [`MeasuredRows`] for rows of differing heights.
//! - [`render_range`]: walks a range in ascending order and invokes a
//!   [`SlotRenderer`] once per index with the item and its absolute index.
//!   Renderer failures are reported per slot as [`SlotError`] and never stop the pass.
//! - [`VirtualGrid`]: a controller that owns [`GridOptions`], the [`ViewportState`],
//!   and a row model, consumes [`GridEvent`]s, and lazily recomputes columns and
//!   range when something it depends on changed.
//! - [`SlotRecycler`]: an optional helper that gives item keys stable slot ids across
//!   passes so hosts can reuse realized views.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use understory_virtual_grid::{GridOptions, VirtualGrid, infallible};
//!
//! let items: Vec<u32> = (0..100).collect();
//!
//! // 100px cells, at most four per row, one extra row above and below the viewport.
//! let options = GridOptions::new()
//!     .with_default_item_height(100.0)
//!     .with_default_item_width(100.0)
//!     .with_max_columns(4)
//!     .with_buffer_rows(1);
//! let mut grid = VirtualGrid::new(options);
//! grid.set_viewport(Size::new(400.0, 500.0));
//!
//! let rendered: Vec<usize> = grid
//!     .render(&items, infallible(|slot| slot.index))
//!     .filter_map(Result::ok)
//!     .map(|slot| slot.output)
//!     .collect();
//!
//! // Five visible rows plus one buffer row below (and the row that starts at the
//! // bottom edge), four columns each.
//! assert_eq!(rendered, (0..28).collect::<Vec<_>>());
//! ```
//!
//! ## Rows of differing heights
//!
//! ```rust
//! use core::num::NonZeroUsize;
//! use understory_virtual_grid::{MeasuredRows, RowModel, compute_visible_range_in};
//!
//! let mut rows = MeasuredRows::new(50.0);
//! rows.set_row_count(10);
//! rows.set_row_extent(0, 200.0);
//!
//! let columns = NonZeroUsize::new(2).unwrap();
//! let range = compute_visible_range_in(&mut rows, 20, columns, 0.0, 100.0, 0);
//! // Row 0 fills the viewport; row 1 starts at its bottom edge and is realized too.
//! assert_eq!(range.indices(), 0..4);
//! assert_eq!(range.after_extent, 400.0);
//! ```
//!
//! All extents and offsets share the host's coordinate space (typically logical
//! pixels). Degenerate inputs such as zero item sizes, negative scroll offsets, or an
//! empty item sequence are normalized rather than reported as errors.
//!
//! ## Features
//!
//! - `std` *(default)*: enables `kurbo/std`.
//! - `libm`: enables `kurbo/libm` for `no_std` builds.
//! - `serde`: derives `Serialize`/`Deserialize` for options, viewport state, and ranges.
//! - `tracing`: emits `tracing` events under the `understory_virtual_grid` target.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[macro_use]
mod macros;

mod grid;
mod layout;
mod measured;
mod options;
mod range;
mod recycle;
mod rows;
mod slots;
mod util;

pub use grid::{GridEvent, GridState, Invalidation, ScrollAlign, ViewportState, VirtualGrid};
pub use layout::resolve_columns;
pub use measured::MeasuredRows;
pub use options::{DEFAULT_BUFFER_ROWS, DEFAULT_ITEM_HEIGHT, DEFAULT_ITEM_WIDTH, GridOptions};
pub use range::{VisibleRange, compute_visible_range, compute_visible_range_in};
pub use recycle::{SlotAssignment, SlotId, SlotRecycler};
pub use rows::{RowModel, UniformRows};
pub use slots::{
    InfallibleRenderer, PassOutcome, RenderPass, RenderedSlot, Slot, SlotError, SlotRenderer,
    fallible, infallible, render_range,
};
