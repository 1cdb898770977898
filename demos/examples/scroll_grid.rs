// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrolling a virtualized card grid.
//!
//! This example shows how to combine:
//! - `VirtualGrid` for column layout and the realized index range,
//! - `MeasuredRows` to refine row heights as cards are laid out,
//! - `SlotRecycler` to keep card views bound to item keys while scrolling.
//!
//! Range recomputes, column changes, and failed cards are logged through `tracing`.
//!
//! Run:
//! - `cargo run -p understory_demos --example scroll_grid`

use kurbo::Size;
use tracing_subscriber::filter::LevelFilter;
use understory_virtual_grid::{
    GridEvent, GridOptions, MeasuredRows, Slot, SlotRecycler, VirtualGrid, fallible,
};

/// A card in the gallery.
#[derive(Clone, Debug)]
struct Card {
    id: u64,
    title: String,
    /// Cards with long titles wrap onto a second line.
    lines: u32,
}

fn cards(n: u64) -> Vec<Card> {
    (0..n)
        .map(|id| {
            let lines = if id % 7 == 3 { 2 } else { 1 };
            Card {
                id,
                title: format!("Card {id}"),
                lines,
            }
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    let items = cards(500);
    let options = GridOptions::new()
        .with_default_item_height(180.0)
        .with_default_item_width(220.0)
        .with_max_columns(6)
        .with_buffer_rows(1);
    let mut grid = VirtualGrid::with_rows(options, MeasuredRows::new(180.0));
    let mut recycler = SlotRecycler::new();

    // A burst of host input before the first frame; only the last values count.
    grid.handle_all([
        GridEvent::ItemCount(items.len()),
        GridEvent::Resize(Size::new(1_000.0, 720.0)),
        GridEvent::Scroll(40.0),
        GridEvent::Scroll(0.0),
    ]);

    let frames = [
        GridEvent::Scroll(0.0),
        GridEvent::Scroll(450.0),
        GridEvent::Resize(Size::new(700.0, 720.0)),
        GridEvent::Scroll(5_000.0),
        GridEvent::Scroll(1.0e9),
    ];

    for (frame, event) in frames.into_iter().enumerate() {
        grid.handle(event);
        grid.clamp_scroll_to_content();

        let outcome = grid
            .render(
                &items,
                fallible(|slot: Slot<'_, Card>| {
                    if slot.item.title.is_empty() {
                        Err("card has no title")
                    } else {
                        Ok(slot.item.lines)
                    }
                }),
            )
            .finish();

        // Report measured heights back; wrapped cards grow their whole row.
        let columns = grid.columns().get();
        for rendered in &outcome.rendered {
            let row = rendered.index / columns;
            let height = 140.0 + 40.0 * f64::from(rendered.output);
            let current = grid.rows().measured_extent(row).unwrap_or(0.0);
            if height > current {
                grid.rows_mut().set_row_extent(row, height);
            }
        }

        let range = grid.visible_range();
        let assignments = recycler.assign(&items, range, |card| card.id);
        let rebound = assignments.iter().filter(|a| a.rebound).count();

        println!(
            "frame {frame}: columns={columns} indices={:?} rendered={} failed={} \
             rebound={rebound} slots={} content={:.0}",
            range.indices(),
            outcome.rendered.len(),
            outcome.failures.len(),
            recycler.allocated(),
            range.content_extent,
        );
    }
}
