// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pooled column intervals used while merging rows of free tiles.
//!
//! Intervals are stored in an [`IntervalPool`] and referred to by
//! [`IntervalId`] handles. A handle packs the slot index together with the
//! slot's generation, so using a handle after it has been released is caught
//! instead of silently reading whatever interval now occupies the slot.

use alloc::vec::Vec;
use core::num::Wrapping;
use smallvec::SmallVec;

const GEN_MASK: u32 = 0xFF000000;
const IDX_MASK: u32 = 0x00FFFFFF;

/// An inclusive run of columns `[start, end]` within one row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    /// First column of the run.
    pub start: u32,
    /// Last column of the run, inclusive.
    pub end: u32,
    /// Set once the run has been claimed by a growing rectangle.
    pub mark: bool,
}

impl Interval {
    /// Create a new interval. `start` must not be greater than `end`.
    pub fn new(start: u32, end: u32, mark: bool) -> Self {
        debug_assert!(start <= end, "interval start must not exceed its end");
        Self { start, end, mark }
    }

    /// Number of columns in the run.
    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Whether this interval completely contains `[start, end]`.
    pub fn fits(&self, start: u32, end: u32) -> bool {
        self.start <= start && self.end >= end
    }

    /// Whether this interval and `[start, end]` share at least one column.
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.start <= end && start <= self.end
    }
}

/// Handle to an interval stored in an [`IntervalPool`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntervalId(u32);

impl IntervalId {
    fn index(self) -> usize {
        (self.0 & IDX_MASK) as usize
    }

    fn generation(self) -> u32 {
        (self.0 & GEN_MASK) >> 24
    }
}

/// The pieces produced by [`IntervalPool::split_around`], left to right.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Split {
    /// The unmarked piece left of the matched span, if any.
    pub before: Option<IntervalId>,
    /// The matched span.
    pub matched: IntervalId,
    /// The unmarked piece right of the matched span, if any.
    pub after: Option<IntervalId>,
}

impl Split {
    /// All pieces in left-to-right order.
    pub fn pieces(&self) -> SmallVec<[IntervalId; 3]> {
        let mut pieces = SmallVec::new();
        pieces.extend(self.before);
        pieces.push(self.matched);
        pieces.extend(self.after);
        pieces
    }
}

#[derive(Clone, Debug)]
struct Slot {
    interval: Interval,
    generation: Wrapping<u8>,
    in_use: bool,
}

/// A free-list pool of [`Interval`]s.
///
/// The pool only grows: released slots are kept and handed out again by
/// later calls to [`acquire`](Self::acquire). Looking up a handle that has
/// been released panics.
#[derive(Clone, Debug, Default)]
pub struct IntervalPool {
    slots: Vec<Slot>,
    /// Stack of released slot indices.
    free_idxs: Vec<u32>,
    live: usize,
}

impl IntervalPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new interval and return its handle.
    pub fn acquire(&mut self, start: u32, end: u32, mark: bool) -> IntervalId {
        let interval = Interval::new(start, end, mark);
        self.live += 1;

        if let Some(index) = self.free_idxs.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(!slot.in_use, "free list must only hold released slots");
            slot.generation += Wrapping(1);
            slot.interval = interval;
            slot.in_use = true;
            return IntervalId(index | (u32::from(slot.generation.0) << 24));
        }

        let index = u32::try_from(self.slots.len())
            .ok()
            .filter(|index| index & IDX_MASK == *index)
            .expect("interval pool exceeded the maximum number of slots");
        self.slots.push(Slot {
            interval,
            generation: Wrapping(0),
            in_use: true,
        });
        IntervalId(index)
    }

    /// Look up a live interval.
    ///
    /// # Panics
    ///
    /// Panics if `id` has been released or did not come from this pool.
    pub fn get(&self, id: IntervalId) -> &Interval {
        &self.slots[self.checked_index(id)].interval
    }

    /// Mutable access to a live interval.
    ///
    /// # Panics
    ///
    /// Panics if `id` has been released or did not come from this pool.
    pub fn get_mut(&mut self, id: IntervalId) -> &mut Interval {
        let index = self.checked_index(id);
        &mut self.slots[index].interval
    }

    /// Split the interval behind `id` around the span `[start, end]`.
    ///
    /// The matched piece carries `mark`. The pieces before and after it are
    /// only created when they would be non-empty, and are unmarked. `id`
    /// itself stays live; releasing it is up to the caller.
    ///
    /// The span must lie within the interval.
    pub fn split_around(&mut self, id: IntervalId, start: u32, end: u32, mark: bool) -> Split {
        let source = *self.get(id);
        debug_assert!(
            source.fits(start, end),
            "split span must lie within the interval"
        );

        let before = (start > source.start).then(|| self.acquire(source.start, start - 1, false));
        let matched = self.acquire(start, end, mark);
        let after = (end < source.end).then(|| self.acquire(end + 1, source.end, false));

        Split {
            before,
            matched,
            after,
        }
    }

    /// Return an interval to the pool.
    ///
    /// # Panics
    ///
    /// Panics if `id` has already been released.
    pub fn release(&mut self, id: IntervalId) {
        let index = self.checked_index(id);
        self.slots[index].in_use = false;
        self.free_idxs.push(id.0 & IDX_MASK);
        self.live -= 1;
    }

    /// Number of handles acquired and not yet released.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Number of slots the pool has allocated so far.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn checked_index(&self, id: IntervalId) -> usize {
        let index = id.index();
        assert!(
            index < self.slots.len(),
            "IntervalId does not belong to this pool"
        );
        let slot = &self.slots[index];
        assert!(
            slot.in_use && u32::from(slot.generation.0) == id.generation(),
            "IntervalId generation mismatch: stale or released id"
        );
        index
    }
}
