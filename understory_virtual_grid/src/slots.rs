// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered slot rendering over a visible range.
//!
//! A pass walks the realized indices in ascending order and hands each item, together
//! with its absolute index in the full sequence, to a [`SlotRenderer`]. Passes are lazy
//! and independent: nothing is carried from one pass to the next, and a renderer error
//! for one index is reported for that slot alone.

use alloc::vec::Vec;
use core::convert::Infallible;
use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::VisibleRange;

/// One item handed to a renderer.
#[derive(Debug, PartialEq, Eq)]
pub struct Slot<'a, T> {
    /// The item at `index`.
    pub item: &'a T,
    /// Absolute position of the item in the full sequence.
    pub index: usize,
}

impl<T> Clone for Slot<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<'_, T> {}

/// Produces output for one realized item.
///
/// This is implemented for every `FnMut(Slot<'_, T>) -> Result<O, E>`. Use
/// [`fallible`] or [`infallible`] to help closure type inference at call sites.
pub trait SlotRenderer<T> {
    /// Rendered output for one slot.
    type Output;
    /// Failure reported for one slot.
    type Error;

    /// Renders a single slot.
    fn render(&mut self, slot: Slot<'_, T>) -> Result<Self::Output, Self::Error>;
}

impl<T, O, E, F> SlotRenderer<T> for F
where
    F: FnMut(Slot<'_, T>) -> Result<O, E>,
{
    type Output = O;
    type Error = E;

    fn render(&mut self, slot: Slot<'_, T>) -> Result<O, E> {
        self(slot)
    }
}

/// Adapts a closure that cannot fail into a [`SlotRenderer`].
#[derive(Clone, Copy)]
pub struct InfallibleRenderer<F>(F);

impl<F> fmt::Debug for InfallibleRenderer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InfallibleRenderer(..)")
    }
}

impl<T, O, F> SlotRenderer<T> for InfallibleRenderer<F>
where
    F: FnMut(Slot<'_, T>) -> O,
{
    type Output = O;
    type Error = Infallible;

    fn render(&mut self, slot: Slot<'_, T>) -> Result<O, Infallible> {
        Ok((self.0)(slot))
    }
}

/// Wraps a renderer closure that always succeeds.
pub fn infallible<T, O, F>(render: F) -> InfallibleRenderer<F>
where
    F: FnMut(Slot<'_, T>) -> O,
{
    InfallibleRenderer(render)
}

/// Identity helper that pins the closure signature of a fallible renderer.
pub fn fallible<T, O, E, F>(render: F) -> F
where
    F: FnMut(Slot<'_, T>) -> Result<O, E>,
{
    render
}

/// Output of one successfully rendered slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSlot<O> {
    /// Absolute index of the slot.
    pub index: usize,
    /// What the renderer produced.
    pub output: O,
}

/// A renderer failure, isolated to one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotError<E> {
    /// Absolute index of the slot that failed.
    pub index: usize,
    /// The renderer's error.
    pub error: E,
}

impl<E: fmt::Display> fmt::Display for SlotError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {} failed to render: {}", self.index, self.error)
    }
}

impl<E> core::error::Error for SlotError<E>
where
    E: core::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Everything a drained [`RenderPass`] produced, split by outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome<O, E> {
    /// Successfully rendered slots, ascending by index.
    pub rendered: Vec<RenderedSlot<O>>,
    /// Failed slots, ascending by index.
    pub failures: SmallVec<[SlotError<E>; 2]>,
}

impl<O, E> PassOutcome<O, E> {
    /// Returns `true` if every slot rendered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A lazy render pass over a contiguous index window.
///
/// Yields one result per index, strictly ascending with no gaps. Dropping the pass
/// early simply skips the remaining slots.
pub struct RenderPass<'a, T, R> {
    items: &'a [T],
    next: usize,
    end: usize,
    renderer: R,
}

impl<T, R> fmt::Debug for RenderPass<'_, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderPass")
            .field("len", &self.items.len())
            .field("next", &self.next)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}

impl<'a, T, R: SlotRenderer<T>> RenderPass<'a, T, R> {
    /// Indices not yet rendered by this pass.
    #[must_use]
    pub fn remaining(&self) -> core::ops::Range<usize> {
        self.next..self.end
    }

    /// Runs the rest of the pass and collects every result.
    pub fn finish(self) -> PassOutcome<R::Output, R::Error> {
        let mut rendered = Vec::with_capacity(self.end - self.next);
        let mut failures = SmallVec::new();
        for result in self {
            match result {
                Ok(slot) => rendered.push(slot),
                Err(failure) => failures.push(failure),
            }
        }
        PassOutcome { rendered, failures }
    }
}

impl<'a, T, R: SlotRenderer<T>> Iterator for RenderPass<'a, T, R> {
    type Item = Result<RenderedSlot<R::Output>, SlotError<R::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        let item = self.items.get(index)?;
        match self.renderer.render(Slot { item, index }) {
            Ok(output) => Some(Ok(RenderedSlot { index, output })),
            Err(error) => {
                vwarn!(index, "slot renderer failed");
                Some(Err(SlotError { index, error }))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.next;
        (len, Some(len))
    }
}

impl<T, R: SlotRenderer<T>> ExactSizeIterator for RenderPass<'_, T, R> {}

impl<T, R: SlotRenderer<T>> FusedIterator for RenderPass<'_, T, R> {}

/// Starts a render pass over `range`.
///
/// The renderer is invoked once per index in `range`, in ascending order, with the item
/// at that index and the index itself. Bounds past the end of `items` are clamped, so a
/// range computed for a longer sequence never reads out of bounds. An empty range
/// produces no invocations.
///
/// ```rust
/// use understory_virtual_grid::{VisibleRange, infallible, render_range};
///
/// let items = ["a", "b", "c", "d"];
/// let out: Vec<String> = render_range(
///     &items,
///     VisibleRange::from_inclusive(1, 2),
///     infallible(|slot| format!("{}:{}", slot.index, slot.item)),
/// )
/// .filter_map(Result::ok)
/// .map(|slot| slot.output)
/// .collect();
/// assert_eq!(out, ["1:b", "2:c"]);
/// ```
pub fn render_range<'a, T, R>(
    items: &'a [T],
    range: VisibleRange,
    renderer: R,
) -> RenderPass<'a, T, R>
where
    R: SlotRenderer<T>,
{
    let end = range.end.min(items.len());
    let start = range.start.min(end);
    RenderPass {
        items,
        next: start,
        end,
        renderer,
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::{SlotError, fallible, infallible, render_range};
    use crate::VisibleRange;

    #[test]
    fn indices_are_absolute_and_ascending() {
        let items: Vec<u32> = (0..20).map(|i| i * 10).collect();
        let mut seen = Vec::new();
        let pass = render_range(
            &items,
            VisibleRange::from_inclusive(5, 9),
            infallible(|slot| {
                seen.push(slot.index);
                *slot.item
            }),
        );
        let outputs: Vec<u32> = pass.filter_map(Result::ok).map(|s| s.output).collect();
        assert_eq!(seen, [5, 6, 7, 8, 9]);
        assert_eq!(outputs, [50, 60, 70, 80, 90]);
    }

    #[test]
    fn empty_range_never_invokes_renderer() {
        let items = [1, 2, 3];
        let mut calls = 0;
        let pass = render_range(&items, VisibleRange::EMPTY, infallible(|_slot| calls += 1));
        assert_eq!(pass.len(), 0);
        assert_eq!(pass.count(), 0);
        assert_eq!(calls, 0);

        let empty: [u8; 0] = [];
        let range = VisibleRange::from_inclusive(0, 10);
        let pass = render_range(&empty, range, infallible(|s| s.index));
        assert_eq!(pass.count(), 0);
    }

    #[test]
    fn range_is_clamped_to_items() {
        let items = ["a", "b", "c"];
        let range = VisibleRange::from_inclusive(1, 40);
        let pass = render_range(&items, range, infallible(|s| s.index));
        assert_eq!(pass.remaining(), 1..3);
        let indices: Vec<usize> = pass.filter_map(Result::ok).map(|s| s.index).collect();
        assert_eq!(indices, [1, 2]);
    }

    #[test]
    fn failures_are_isolated_per_slot() {
        let items: Vec<u32> = (0..6).collect();
        let renderer = fallible(|slot| {
            if slot.index % 3 == 1 {
                Err("boom")
            } else {
                Ok(slot.index * 2)
            }
        });
        let range = VisibleRange::from_inclusive(0, 5);
        let outcome = render_range(&items, range, renderer).finish();
        assert!(!outcome.is_complete());
        let ok: Vec<usize> = outcome.rendered.iter().map(|s| s.index).collect();
        assert_eq!(ok, [0, 2, 3, 5]);
        assert_eq!(outcome.rendered[1].output, 4);
        let failed: Vec<usize> = outcome.failures.iter().map(|f| f.index).collect();
        assert_eq!(failed, [1, 4]);

        // A later pass with the same renderer shape is unaffected.
        let outcome = render_range(
            &items,
            VisibleRange::from_inclusive(2, 3),
            fallible(|slot| Ok::<_, &str>(slot.index)),
        )
        .finish();
        assert!(outcome.is_complete());
        assert_eq!(outcome.rendered.len(), 2);
    }

    #[test]
    fn passes_are_restartable() {
        let items = ["x", "y", "z"];
        let range = VisibleRange::from_inclusive(0, 2);
        let first: Vec<usize> = render_range(&items, range, infallible(|s| s.index))
            .take(1)
            .filter_map(Result::ok)
            .map(|s| s.output)
            .collect();
        let second: Vec<usize> = render_range(&items, range, infallible(|s| s.index))
            .filter_map(Result::ok)
            .map(|s| s.output)
            .collect();
        assert_eq!(first, [0]);
        assert_eq!(second, [0, 1, 2]);
    }

    #[test]
    fn slot_error_display() {
        let error = SlotError {
            index: 7,
            error: "missing thumbnail",
        };
        assert_eq!(error.to_string(), "slot 7 failed to render: missing thumbnail");
    }
}
