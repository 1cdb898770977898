// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Returns `floor(value)` as an index.
///
/// NaN and non-positive values map to `0`; values past `usize::MAX` saturate.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Float to int casts saturate, and the result is an index clamped by callers"
)]
#[inline]
pub(crate) fn floor_index(value: f64) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    value as usize
}

/// Returns `ceil(value)` as an index, with the same clamping as [`floor_index`].
#[inline]
pub(crate) fn ceil_index(value: f64) -> usize {
    let floor = floor_index(value);
    if (floor as f64) < value {
        floor.saturating_add(1)
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::{ceil_index, floor_index};

    #[test]
    fn floor_and_ceil_on_boundaries() {
        assert_eq!(floor_index(0.0), 0);
        assert_eq!(floor_index(4.99), 4);
        assert_eq!(floor_index(5.0), 5);
        assert_eq!(ceil_index(5.0), 5);
        assert_eq!(ceil_index(5.01), 6);
        assert_eq!(ceil_index(0.2), 1);
    }

    #[test]
    fn degenerate_values_clamp() {
        assert_eq!(floor_index(-3.5), 0);
        assert_eq!(ceil_index(-3.5), 0);
        assert_eq!(floor_index(f64::NAN), 0);
        assert_eq!(ceil_index(f64::NAN), 0);
        assert_eq!(floor_index(f64::INFINITY), usize::MAX);
        assert_eq!(ceil_index(f64::INFINITY), usize::MAX);
    }
}
