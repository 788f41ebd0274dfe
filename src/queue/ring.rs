//! Fixed-capacity ring of slots with priority-aware removal
//!
//! Occupied slots run from `head` for `len` positions, wrapping at the end of
//! the slot array; their logical order is arrival order. Removing the head is
//! O(1). Removing any other slot shifts every later slot back by one position
//! so that the survivors keep their relative order; that O(len) compaction is
//! bounded by the queue's small fixed capacity.
//!
//! ```text
//!  capacity 6, head 4, len 4          remove offset 1 (slot 5)
//!  ┌───┬───┬───┬───┬───┬───┐          ┌───┬───┬───┬───┬───┬───┐
//!  │ C │ D │   │   │ A │ B │   ──▶    │ D │   │   │   │ A │ C │
//!  └───┴───┴───┴───┴───┴───┘          └───┴───┴───┴───┴───┴───┘
//!            ▲ tail  ▲ head                 ▲ tail      ▲ head
//! ```
//!
//! Not synchronised; callers hold the queue's lock.

use super::item::Prioritized;

pub(crate) struct PriorityRing<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    len: usize,
}

impl<T: Prioritized> PriorityRing<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Physical slot index of the `offset`-th item in arrival order
    #[inline]
    fn slot(&self, offset: usize) -> usize {
        (self.head + offset) % self.slots.len()
    }

    /// Place `item` at the logical tail. Hands the item back if the ring is full.
    pub(crate) fn push_back(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        let tail = self.slot(self.len);
        self.slots[tail] = Some(item);
        self.len += 1;
        Ok(())
    }

    /// Offset of the most urgent item; the earliest arrival wins a tie.
    fn select(&self) -> Option<usize> {
        let mut best: Option<(usize, T::Key)> = None;
        for offset in 0..self.len {
            let Some(item) = &self.slots[self.slot(offset)] else {
                continue;
            };
            let key = item.priority();
            match best {
                // Strictly greater only, so an earlier equal key is kept
                Some((_, best_key)) if key <= best_key => {}
                _ => best = Some((offset, key)),
            }
        }
        best.map(|(offset, _)| offset)
    }

    /// Remove and return the most urgent item, preserving the order of the rest.
    pub(crate) fn pop_highest(&mut self) -> Option<T> {
        let offset = self.select()?;
        if offset == 0 {
            self.pop_front()
        } else {
            self.remove_at(offset)
        }
    }

    fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = self.slot(1);
        self.len -= 1;
        item
    }

    /// Remove the `offset`-th item and close the gap by shifting later items
    /// back one slot; the tail retreats by one.
    fn remove_at(&mut self, offset: usize) -> Option<T> {
        if offset >= self.len {
            return None;
        }
        let item = self.slots[self.slot(offset)].take();
        for current in offset..self.len - 1 {
            let next = self.slots[self.slot(current + 1)].take();
            let here = self.slot(current);
            self.slots[here] = next;
        }
        self.len -= 1;
        item
    }

    /// Occupied items in arrival order
    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |offset| self.slots[self.slot(offset)].as_ref())
    }

    /// Remove every item, in arrival order
    pub(crate) fn drain(&mut self) -> Vec<T> {
        let mut items = Vec::with_capacity(self.len);
        while let Some(item) = self.pop_front() {
            items.push(item);
        }
        self.head = 0;
        items
    }
}
