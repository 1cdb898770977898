// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key-based slot recycling.
//!
//! The range math works on indices only. Hosts that keep realized views alive across
//! passes need a second notion of identity: the item's key. [`SlotRecycler`] maps keys
//! in the current range to small, dense slot ids. A key that stays in range keeps its
//! slot; slots released by keys that left the range are handed to newly visible keys,
//! so the number of live slots stays bounded by the largest range ever realized.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::VisibleRange;

/// Identifier of a reusable render slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u32);

impl SlotId {
    /// Returns the slot number; slots are allocated densely from `0`.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }
}

/// The slot chosen for one realized index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotAssignment {
    /// Absolute item index.
    pub index: usize,
    /// Slot that renders this item.
    pub slot: SlotId,
    /// `true` if the slot held a different item (or nothing) before this pass.
    pub rebound: bool,
}

/// Assigns stable slot ids to item keys across render passes.
#[derive(Clone, Debug)]
pub struct SlotRecycler<K> {
    live: HashMap<K, SlotId>,
    /// Slots handed to repeated keys in the last pass; never kept across passes.
    duplicates: SmallVec<[SlotId; 2]>,
    free: SmallVec<[SlotId; 16]>,
    allocated: u32,
}

impl<K: Eq + Hash + Clone> SlotRecycler<K> {
    /// Creates an empty recycler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            live: HashMap::new(),
            duplicates: SmallVec::new(),
            free: SmallVec::new(),
            allocated: 0,
        }
    }

    /// Assigns slots for every index in `range`, ascending.
    ///
    /// `key_of` extracts the stable key of an item; keys are expected to be unique
    /// within a range. Keys from the previous pass that are not in `range` release
    /// their slots, and new keys take the lowest released slot before a new one is
    /// allocated. Indices past the end of `items` are ignored.
    ///
    /// A key repeated within `range` is logged. The first occurrence keeps the key's
    /// slot and every later one gets a slot of its own for this pass only.
    pub fn assign<T, F>(
        &mut self,
        items: &[T],
        range: VisibleRange,
        mut key_of: F,
    ) -> Vec<SlotAssignment>
    where
        F: FnMut(&T) -> K,
    {
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        let window = &items[start..end];

        let mut keys: Vec<(K, bool)> = Vec::with_capacity(window.len());
        let mut in_range: HashSet<K> = HashSet::with_capacity(window.len());
        for (offset, item) in window.iter().enumerate() {
            let key = key_of(item);
            let fresh = in_range.insert(key.clone());
            if !fresh {
                vwarn!(index = start + offset, "duplicate item key in realized range");
            }
            keys.push((key, fresh));
        }

        let free = &mut self.free;
        free.extend(self.duplicates.drain(..));
        self.live.retain(|key, slot| {
            let keep = in_range.contains(key);
            if !keep {
                free.push(*slot);
            }
            keep
        });
        // Highest first, so `pop` hands out the lowest free slot.
        self.free.sort_unstable_by(|a, b| b.cmp(a));

        let mut assignments = Vec::with_capacity(keys.len());
        for (offset, (key, fresh)) in keys.into_iter().enumerate() {
            let index = start + offset;
            let (slot, rebound) = match self.live.get(&key).copied() {
                Some(slot) if fresh => (slot, false),
                Some(_) => {
                    let slot = self.take_slot();
                    self.duplicates.push(slot);
                    (slot, true)
                }
                None => {
                    let slot = self.take_slot();
                    self.live.insert(key, slot);
                    (slot, true)
                }
            };
            assignments.push(SlotAssignment {
                index,
                slot,
                rebound,
            });
        }
        vtrace!(
            live = self.live.len(),
            allocated = self.allocated,
            "assigned render slots"
        );
        assignments
    }

    fn take_slot(&mut self) -> SlotId {
        self.free.pop().unwrap_or_else(|| {
            let slot = SlotId(self.allocated);
            self.allocated += 1;
            slot
        })
    }

    /// Returns the slot currently bound to `key`, if it was in the last range.
    #[must_use]
    pub fn slot_of(&self, key: &K) -> Option<SlotId> {
        self.live.get(key).copied()
    }

    /// Number of slots in use by the last range.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len() + self.duplicates.len()
    }

    /// Returns `true` if no slot is in use.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && self.duplicates.is_empty()
    }

    /// Number of distinct slots ever handed out.
    #[must_use]
    pub const fn allocated(&self) -> usize {
        self.allocated as usize
    }

    /// Releases every slot and forgets all allocations.
    pub fn clear(&mut self) {
        self.live.clear();
        self.duplicates.clear();
        self.free.clear();
        self.allocated = 0;
    }
}

impl<K: Eq + Hash + Clone> Default for SlotRecycler<K> {
    fn default() -> Self {
        Self::new()
    }
}
