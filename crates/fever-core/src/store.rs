// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Dense, slot-recycling storage for data referred to by [`Handle`]s.

use crate::handle::Handle;
use std::collections::VecDeque;

/// Owns a dense list of values and hands out generation-checked handles to them.
///
/// Every slot that has ever been created keeps a generation counter. Removing a
/// value bumps the counter and queues the slot index for reuse, so any handle
/// issued before the removal stops resolving. Allocation and release are
/// $O(1)$.
///
/// Values may move in memory when the backing vector grows. Callers that need
/// a stable address for something they hand out should use
/// [`PersistentHandleDataStore`](crate::PersistentHandleDataStore).
#[derive(Debug, Clone)]
pub struct HandleDataStore<T> {
    /// One entry per slot; `Some` only while the slot is live.
    objects: Vec<Option<T>>,
    /// Current generation of every slot, parallel to `objects`.
    generations: Vec<u8>,
    /// Retired slot indices, reused oldest first.
    free_indices: VecDeque<u32>,
}

impl<T> HandleDataStore<T> {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            generations: Vec::new(),
            free_indices: VecDeque::new(),
        }
    }

    /// Creates an empty store with room for `capacity` slots before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            free_indices: VecDeque::new(),
        }
    }

    /// Checks whether `handle` still refers to a live value in this store.
    ///
    /// A handle is valid only if its index is in bounds, its generation matches
    /// the slot's current generation, and the slot is occupied. Never panics.
    pub fn is_valid(&self, handle: Handle) -> bool {
        let index = handle.index() as usize;
        match (self.generations.get(index), self.objects.get(index)) {
            (Some(&generation), Some(Some(_))) => u32::from(generation) == handle.generation(),
            _ => false,
        }
    }

    /// Adds a value and returns a handle to it.
    ///
    /// If a retired slot is queued, it is reused with its already incremented
    /// generation. Otherwise a new slot is appended at generation 0, which may
    /// reallocate the backing storage.
    pub fn add(&mut self, value: T) -> Handle {
        if let Some(index) = self.free_indices.pop_front() {
            let slot = index as usize;
            self.objects[slot] = Some(value);
            Handle::pack(index, self.generations[slot])
        } else {
            assert!(
                self.objects.len() <= Handle::MAX_INDEX as usize,
                "HandleDataStore cannot address more than {} slots.",
                Handle::MAX_INDEX as usize + 1
            );
            let index = self.objects.len() as u32;
            self.objects.push(Some(value));
            self.generations.push(0);
            Handle::pack(index, 0)
        }
    }

    /// Removes the value referred to by `handle` and returns it.
    ///
    /// The slot's generation is incremented (wrapping) and its index queued for
    /// reuse, invalidating every copy of `handle`. Returns `None` and leaves the
    /// store untouched if the handle is not valid, so removing twice is safe.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if !self.is_valid(handle) {
            return None;
        }

        let index = handle.index();
        let slot = index as usize;
        let value = self.objects[slot].take();

        let generation = &mut self.generations[slot];
        *generation = generation.wrapping_add(1);
        if *generation == 0 {
            // 8 bits of generation: handles issued 256 reuses ago alias again.
            log::debug!(
                "HandleDataStore: generation of slot {index} wrapped around; stale handles to it may alias new ones"
            );
        }

        self.free_indices.push_back(index);
        value
    }

    /// Returns a reference to the value behind `handle`, or `None` if it is invalid.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        if !self.is_valid(handle) {
            return None;
        }
        self.objects[handle.index() as usize].as_ref()
    }

    /// Returns a mutable reference to the value behind `handle`, or `None` if it is invalid.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if !self.is_valid(handle) {
            return None;
        }
        self.objects[handle.index() as usize].as_mut()
    }

    /// Returns the number of live values.
    pub fn len(&self) -> usize {
        self.objects.len() - self.free_indices.len()
    }

    /// Returns `true` if no value is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the total number of slots (both live and retired).
    pub fn slot_count(&self) -> usize {
        self.objects.len()
    }

    /// Returns an iterator over every live value and its current handle, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.objects
            .iter()
            .zip(&self.generations)
            .enumerate()
            .filter_map(|(index, (object, &generation))| {
                object
                    .as_ref()
                    .map(|value| (Handle::pack(index as u32, generation), value))
            })
    }

    /// Removes every live value, returning them with the handles they had.
    ///
    /// Goes through [`remove`](Self::remove), so all outstanding handles are
    /// invalidated and every slot becomes reusable.
    pub fn drain(&mut self) -> Vec<(Handle, T)> {
        let live: Vec<Handle> = self.iter().map(|(handle, _)| handle).collect();
        live.into_iter()
            .filter_map(|handle| self.remove(handle).map(|value| (handle, value)))
            .collect()
    }
}

impl<T> Default for HandleDataStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_handle_is_invalid() {
        let store: HandleDataStore<u32> = HandleDataStore::new();
        assert!(!store.is_valid(Handle::from_raw(0)));
        assert!(store.get(Handle::from_raw(0)).is_none());
    }

    #[test]
    fn added_handle_is_valid() {
        let mut store = HandleDataStore::new();
        let handle = store.add(2u32);
        assert!(store.is_valid(handle));
        assert_eq!(handle.index(), 0);
        assert_eq!(handle.generation(), 0);
    }

    #[test]
    fn get_returns_the_inserted_value() {
        let mut store = HandleDataStore::new();
        let handle = store.add(2u32);
        assert_eq!(store.get(handle), Some(&2));
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut store = HandleDataStore::new();
        let handle = store.add(String::from("vertex"));
        store.get_mut(handle).unwrap().push_str("_buffer");
        assert_eq!(store.get(handle).map(String::as_str), Some("vertex_buffer"));
    }

    #[test]
    fn remove_invalidates_and_returns_the_value() {
        let mut store = HandleDataStore::new();
        let handle = store.add(2u32);

        assert_eq!(store.remove(handle), Some(2));
        assert!(!store.is_valid(handle));
        assert!(store.get(handle).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn second_remove_is_a_no_op() {
        let mut store = HandleDataStore::new();
        let handle = store.add(2u32);
        store.remove(handle);

        assert_eq!(store.remove(handle), None);
        assert_eq!(store.free_indices.len(), 1, "index must be queued once");
        assert_eq!(store.generations[0], 1, "generation must be bumped once");
    }

    #[test]
    fn reused_slot_carries_the_next_generation() {
        let mut store = HandleDataStore::new();
        let first = store.add(1u32);
        store.remove(first);
        let second = store.add(2u32);

        assert_eq!(second.index(), first.index());
        assert_eq!(second.generation(), first.generation() + 1);
        assert!(!store.is_valid(first));
        assert_eq!(store.get(second), Some(&2));
        assert_eq!(store.slot_count(), 1);
    }

    #[test]
    fn free_slots_are_reused_oldest_first() {
        let mut store = HandleDataStore::new();
        let handles: Vec<_> = (0..4u32).map(|i| store.add(i)).collect();
        store.remove(handles[2]);
        store.remove(handles[0]);

        assert_eq!(store.add(10).index(), 2);
        assert_eq!(store.add(11).index(), 0);
        assert_eq!(store.add(12).index(), 4);
    }

    #[test]
    fn forged_handle_to_a_retired_slot_is_invalid() {
        let mut store = HandleDataStore::new();
        let handle = store.add(5u32);
        store.remove(handle);

        // Same index, current generation, but nothing lives there.
        let forged = Handle::pack(handle.index(), store.generations[0]);
        assert!(!store.is_valid(forged));
        assert!(store.get(forged).is_none());
        assert_eq!(store.remove(forged), None);
    }

    #[test]
    fn generation_wraps_after_256_reuses_and_aliases_the_first_handle() {
        let mut store = HandleDataStore::new();
        let first = store.add(0u32);

        let mut current = first;
        for value in 1..=256u32 {
            store.remove(current);
            current = store.add(value);
        }

        assert_eq!(current.index(), first.index());
        assert_eq!(current.generation(), 0);
        // Known 8-bit limitation: the oldest handle resolves to the newest value.
        assert_eq!(current, first);
        assert_eq!(store.get(first), Some(&256));
    }

    #[test]
    fn iter_skips_retired_slots() {
        let mut store = HandleDataStore::new();
        let a = store.add('a');
        let b = store.add('b');
        let c = store.add('c');
        store.remove(b);

        let live: Vec<_> = store.iter().collect();
        assert_eq!(live, vec![(a, &'a'), (c, &'c')]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn drain_empties_the_store_and_invalidates_handles() {
        let mut store = HandleDataStore::new();
        let handles: Vec<_> = (0..3u32).map(|i| store.add(i * 10)).collect();

        let drained = store.drain();
        assert_eq!(
            drained,
            vec![(handles[0], 0), (handles[1], 10), (handles[2], 20)]
        );
        assert!(store.is_empty());
        assert_eq!(store.slot_count(), 3);
        assert!(handles.iter().all(|h| !store.is_valid(*h)));
    }
}
