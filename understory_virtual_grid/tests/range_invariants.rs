// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for column resolution, visible ranges, and render passes.
//!
//! For any inputs:
//!
//! 1. At most `item_count` indices are realized, and never one past the end. When the
//!    rows outnumber what the viewport and buffers can show, strictly fewer are.
//! 2. Realized indices are contiguous and ascending, starting on a row boundary.
//! 3. An empty sequence realizes nothing.
//! 4. The column count is at least 1, at most the cap, and fits the container.
//! 5. Recomputing with the same inputs gives the same range.
//! 6. Uniform rows match the closed-form row bounds.
//! 7. The controller agrees with the free function.
//! 8. A render pass visits exactly the realized indices, in order.

use core::num::NonZeroUsize;

use kurbo::Size;
use proptest::prelude::*;
use understory_virtual_grid::{
    GridOptions, MeasuredRows, VirtualGrid, VisibleRange, compute_visible_range,
    compute_visible_range_in, infallible, render_range, resolve_columns,
};

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Inputs {
    item_count: usize,
    columns: NonZeroUsize,
    row_height: f64,
    scroll_top: f64,
    viewport_height: f64,
    buffer_rows: usize,
}

impl Inputs {
    fn range(&self) -> VisibleRange {
        compute_visible_range(
            self.item_count,
            self.columns,
            self.row_height,
            self.scroll_top,
            self.viewport_height,
            self.buffer_rows,
        )
    }
}

fn columns_strategy() -> impl Strategy<Value = NonZeroUsize> {
    (1_usize..=12).prop_map(|n| NonZeroUsize::new(n).unwrap())
}

// Whole-number geometry keeps the closed-form comparison free of rounding noise.
fn inputs_strategy() -> impl Strategy<Value = Inputs> {
    (
        0_usize..=2_000,
        columns_strategy(),
        1_u32..=400,
        0_u32..=200_000,
        0_u32..=2_000,
        0_usize..=4,
    )
        .prop_map(
            |(item_count, columns, row_height, scroll_top, viewport_height, buffer_rows)| Inputs {
                item_count,
                columns,
                row_height: f64::from(row_height),
                scroll_top: f64::from(scroll_top),
                viewport_height: f64::from(viewport_height),
                buffer_rows,
            },
        )
}

fn closed_form_rows(inputs: &Inputs) -> (usize, usize) {
    let rows = inputs.item_count.div_ceil(inputs.columns.get());
    let h = inputs.row_height;
    let content = rows as f64 * h;
    let scroll = inputs.scroll_top.min(content);
    let first = ((scroll / h).floor() as usize).saturating_sub(inputs.buffer_rows);
    let last = (((scroll + inputs.viewport_height) / h).ceil() as usize + inputs.buffer_rows)
        .min(rows - 1);
    // Only reachable at the very end of the content with no buffer.
    (first.min(last), last)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Bounded by the item count
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn realized_count_never_exceeds_items(inputs in inputs_strategy()) {
        let range = inputs.range();
        prop_assert!(range.len() <= inputs.item_count, "{:?} -> {:?}", inputs, range);
        if let Some(last) = range.last_index() {
            prop_assert!(last < inputs.item_count, "{:?} -> {:?}", inputs, range);
        }
    }
}

// More rows than the viewport plus both buffers (plus two partial rows) can hold.
fn overflowing_strategy() -> impl Strategy<Value = Inputs> {
    (inputs_strategy(), 1_usize..=300, 0_usize..12).prop_map(|(inputs, extra, short)| {
        let h = inputs.row_height;
        let window = ((inputs.viewport_height + 2.0 * inputs.buffer_rows as f64 * h) / h).ceil()
            as usize
            + 2;
        let columns = inputs.columns.get();
        let item_count = (window + extra) * columns - short.min(columns - 1);
        Inputs {
            item_count,
            ..inputs
        }
    })
}

proptest! {
    #[test]
    fn overflowing_rows_realize_strictly_fewer(inputs in overflowing_strategy()) {
        let rows = inputs.item_count.div_ceil(inputs.columns.get());
        let h = inputs.row_height;
        let window = ((inputs.viewport_height + 2.0 * inputs.buffer_rows as f64 * h) / h).ceil()
            as usize;
        prop_assert!(rows > window + 2, "strategy produced {} rows for {:?}", rows, inputs);

        let range = inputs.range();
        prop_assert!(range.len() < inputs.item_count, "{:?} -> {:?}", inputs, range);
        prop_assert!(range.end_row - range.first_row < rows, "{:?} -> {:?}", inputs, range);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Contiguous, ascending, row-aligned
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn realized_indices_are_contiguous(inputs in inputs_strategy()) {
        let range = inputs.range();
        let indices: Vec<usize> = range.indices().collect();
        prop_assert!(
            indices.windows(2).all(|w| w[1] == w[0] + 1),
            "gap in {:?}",
            range
        );
        if let Some(first) = range.first_index() {
            prop_assert_eq!(first % inputs.columns.get(), 0);
            prop_assert_eq!(first, range.first_row * inputs.columns.get());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Empty sequences
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn empty_sequence_realizes_nothing(inputs in inputs_strategy()) {
        let inputs = Inputs { item_count: 0, ..inputs };
        let range = inputs.range();
        prop_assert!(range.is_empty());
        prop_assert_eq!(range, VisibleRange::EMPTY);

        let items: [u8; 0] = [];
        let mut calls = 0;
        let _ = render_range(&items, range, infallible(|_slot| calls += 1)).count();
        prop_assert_eq!(calls, 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Column count bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn columns_fit_container_and_cap(
        width in 0_u32..=10_000,
        item_width in 1_u32..=800,
        max in proptest::option::of(1_usize..=16),
    ) {
        let max = max.and_then(NonZeroUsize::new);
        let width = f64::from(width);
        let item_width = f64::from(item_width);
        let columns = resolve_columns(width, item_width, max).get();

        prop_assert!(columns >= 1);
        if let Some(max) = max {
            prop_assert!(columns <= max.get(), "{} > cap {}", columns, max);
        }
        let fitting = (width / item_width).floor() as usize;
        prop_assert!(columns <= fitting.max(1), "{} columns in {} / {}", columns, width, item_width);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn recomputation_is_stable(inputs in inputs_strategy()) {
        prop_assert_eq!(inputs.range(), inputs.range());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Closed form
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn uniform_rows_match_closed_form(inputs in inputs_strategy()) {
        prop_assume!(inputs.item_count > 0);
        let range = inputs.range();
        let (first, last) = closed_form_rows(&inputs);
        let columns = inputs.columns.get();

        prop_assert_eq!(range.first_row, first, "{:?}", inputs);
        prop_assert_eq!(range.end_row, last + 1, "{:?}", inputs);
        prop_assert_eq!(range.start, first * columns);
        prop_assert_eq!(range.end, ((last + 1) * columns).min(inputs.item_count));
    }

    #[test]
    fn unmeasured_rows_match_uniform_rows(inputs in inputs_strategy()) {
        let mut rows = MeasuredRows::new(inputs.row_height);
        let measured = compute_visible_range_in(
            &mut rows,
            inputs.item_count,
            inputs.columns,
            inputs.scroll_top,
            inputs.viewport_height,
            inputs.buffer_rows,
        );
        prop_assert_eq!(measured, inputs.range());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Controller
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn controller_matches_free_function(
        inputs in inputs_strategy(),
        width in 0_u32..=4_000,
        item_width in 1_u32..=400,
        max in 1_usize..=12,
    ) {
        let options = GridOptions::new()
            .with_default_item_height(inputs.row_height)
            .with_default_item_width(f64::from(item_width))
            .with_max_columns(max)
            .with_buffer_rows(inputs.buffer_rows);
        let mut grid = VirtualGrid::new(options);
        grid.set_item_count(inputs.item_count);
        grid.set_viewport(Size::new(f64::from(width), inputs.viewport_height));
        grid.set_scroll_top(inputs.scroll_top);

        let columns = grid.columns();
        prop_assert_eq!(
            columns,
            resolve_columns(f64::from(width), f64::from(item_width), NonZeroUsize::new(max))
        );
        let expected = Inputs { columns, ..inputs }.range();
        prop_assert_eq!(grid.visible_range(), expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Render passes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pass_visits_exactly_the_range(inputs in inputs_strategy()) {
        let items: Vec<usize> = (0..inputs.item_count).collect();
        let range = inputs.range();
        let mut seen = Vec::new();
        let rendered = render_range(
            &items,
            range,
            infallible(|slot| {
                seen.push(slot.index);
                *slot.item
            }),
        )
        .filter_map(Result::ok)
        .map(|slot| slot.output)
        .collect::<Vec<_>>();

        let expected: Vec<usize> = range.indices().collect();
        prop_assert_eq!(&seen, &expected);
        prop_assert_eq!(&rendered, &expected);
    }
}

// ── Scenarios ───────────────────────────────────────────────────────────

#[test]
fn hundred_items_in_four_columns_realize_28() {
    let columns = resolve_columns(400.0, 100.0, NonZeroUsize::new(4));
    assert_eq!(columns.get(), 4);
    let range = compute_visible_range(100, columns, 100.0, 0.0, 500.0, 1);
    assert_eq!(range.indices(), 0..28);
}

#[test]
fn twenty_items_single_column_start_at_zero() {
    let columns = resolve_columns(300.0, 100.0, NonZeroUsize::new(1));
    let range = compute_visible_range(20, columns, 50.0, 0.0, 200.0, 1);
    assert_eq!(range.first_index(), Some(0));
    assert!(range.len() < 20);
    let indices: Vec<usize> = range.indices().collect();
    assert!(indices.windows(2).all(|w| w[1] == w[0] + 1));
}
