// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column layout.

use core::num::NonZeroUsize;

use crate::util::floor_index;

/// Resolves how many columns fit in a container.
///
/// The result is `clamp(floor(container_width / default_item_width), 1, max_columns)`:
///
/// - `max_columns = None` leaves the count bounded only by the container width.
/// - If `default_item_width` is zero, negative, or not finite, no division happens and
///   the result is `max_columns` (or `1` when unbounded).
/// - A container too narrow for a single item, or with a negative or non-finite width,
///   still yields one column.
///
/// ```rust
/// use core::num::NonZeroUsize;
/// use understory_virtual_grid::resolve_columns;
///
/// let four = NonZeroUsize::new(4);
/// assert_eq!(resolve_columns(1000.0, 100.0, four).get(), 4);
/// assert_eq!(resolve_columns(250.0, 100.0, four).get(), 2);
/// assert_eq!(resolve_columns(50.0, 100.0, four).get(), 1);
/// assert_eq!(resolve_columns(1000.0, 0.0, four).get(), 4);
/// ```
#[must_use]
pub fn resolve_columns(
    container_width: f64,
    default_item_width: f64,
    max_columns: Option<NonZeroUsize>,
) -> NonZeroUsize {
    if !default_item_width.is_finite() || default_item_width <= 0.0 {
        return max_columns.unwrap_or(NonZeroUsize::MIN);
    }
    let container_width = if container_width.is_finite() {
        container_width
    } else {
        0.0
    };

    let fit = floor_index(container_width / default_item_width);
    let fit = NonZeroUsize::new(fit).unwrap_or(NonZeroUsize::MIN);
    match max_columns {
        Some(max) => fit.min(max),
        None => fit,
    }
}
