// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid configuration.

use core::num::NonZeroUsize;

/// Row height used when no valid item height is configured.
pub const DEFAULT_ITEM_HEIGHT: f64 = 200.0;

/// Item width used when no valid item width is configured.
pub const DEFAULT_ITEM_WIDTH: f64 = 200.0;

/// Rows realized beyond each edge of the viewport by default.
pub const DEFAULT_BUFFER_ROWS: usize = 1;

/// Configuration for a virtualized grid.
///
/// Options are plain data; a [`VirtualGrid`](crate::VirtualGrid) reads them on every
/// recompute and never mutates them. `G` is an opaque style payload carried for the
/// host (for example a grid template description) and is never interpreted here.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`. Missing
/// fields deserialize to their defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridOptions<G = ()> {
    /// Height of one row. Non-positive or non-finite values fall back to
    /// [`DEFAULT_ITEM_HEIGHT`].
    #[cfg_attr(feature = "serde", serde(default = "default_item_height"))]
    pub default_item_height: f64,
    /// Nominal width of one item, used to derive the column count. Non-positive or
    /// non-finite values mean "unset".
    #[cfg_attr(feature = "serde", serde(default = "default_item_width"))]
    pub default_item_width: f64,
    /// Upper bound on the column count. `None` is unbounded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_columns: Option<NonZeroUsize>,
    /// Extra rows realized before and after the viewport.
    #[cfg_attr(feature = "serde", serde(default = "default_buffer_rows"))]
    pub buffer_rows: usize,
    /// Opaque layout style passthrough.
    #[cfg_attr(feature = "serde", serde(default))]
    pub grid_style: G,
}

#[cfg(feature = "serde")]
fn default_item_height() -> f64 {
    DEFAULT_ITEM_HEIGHT
}

#[cfg(feature = "serde")]
fn default_item_width() -> f64 {
    DEFAULT_ITEM_WIDTH
}

#[cfg(feature = "serde")]
fn default_buffer_rows() -> usize {
    DEFAULT_BUFFER_ROWS
}

impl GridOptions {
    /// Creates options with all defaults and no style payload.
    #[must_use]
    pub fn new() -> Self {
        Self::with_style(())
    }
}

impl<G: Default> Default for GridOptions<G> {
    fn default() -> Self {
        Self::with_style(G::default())
    }
}

impl<G> GridOptions<G> {
    /// Creates options with all defaults and the given style payload.
    #[must_use]
    pub fn with_style(grid_style: G) -> Self {
        Self {
            default_item_height: DEFAULT_ITEM_HEIGHT,
            default_item_width: DEFAULT_ITEM_WIDTH,
            max_columns: None,
            buffer_rows: DEFAULT_BUFFER_ROWS,
            grid_style,
        }
    }

    /// Sets the row height.
    #[must_use]
    pub fn with_default_item_height(mut self, height: f64) -> Self {
        debug_assert!(
            !height.is_nan(),
            "GridOptions item height must not be NaN"
        );
        self.default_item_height = height;
        self
    }

    /// Sets the nominal item width.
    #[must_use]
    pub fn with_default_item_width(mut self, width: f64) -> Self {
        debug_assert!(!width.is_nan(), "GridOptions item width must not be NaN");
        self.default_item_width = width;
        self
    }

    /// Caps the column count. A cap of `0` is treated as `1`.
    #[must_use]
    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = Some(NonZeroUsize::new(max_columns).unwrap_or(NonZeroUsize::MIN));
        self
    }

    /// Removes the column cap.
    #[must_use]
    pub fn with_unbounded_columns(mut self) -> Self {
        self.max_columns = None;
        self
    }

    /// Sets the number of buffer rows on each side of the viewport.
    #[must_use]
    pub fn with_buffer_rows(mut self, buffer_rows: usize) -> Self {
        self.buffer_rows = buffer_rows;
        self
    }

    /// Replaces the style payload, keeping every other option.
    #[must_use]
    pub fn with_grid_style<H>(self, grid_style: H) -> GridOptions<H> {
        GridOptions {
            default_item_height: self.default_item_height,
            default_item_width: self.default_item_width,
            max_columns: self.max_columns,
            buffer_rows: self.buffer_rows,
            grid_style,
        }
    }

    /// The row height actually used for range math.
    ///
    /// This is `default_item_height` when it is finite and positive, and
    /// [`DEFAULT_ITEM_HEIGHT`] otherwise.
    #[must_use]
    pub fn row_height(&self) -> f64 {
        positive_or(self.default_item_height, DEFAULT_ITEM_HEIGHT)
    }

    /// The item width used for column layout, or `None` if unset.
    #[must_use]
    pub fn item_width(&self) -> Option<f64> {
        let width = self.default_item_width;
        (width.is_finite() && width > 0.0).then_some(width)
    }

    /// Resolves the column count for a container of the given width.
    #[must_use]
    pub fn resolve_columns(&self, container_width: f64) -> NonZeroUsize {
        crate::resolve_columns(container_width, self.default_item_width, self.max_columns)
    }
}

/// Returns `value` if it is finite and strictly positive, `fallback` otherwise.
pub(crate) fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
