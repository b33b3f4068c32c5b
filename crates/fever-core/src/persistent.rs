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

//! A fixed-capacity handle store whose handles live at stable addresses.

use crate::handle::Handle;
use crate::store::HandleDataStore;
use std::collections::VecDeque;

/// Same interface as [`HandleDataStore`], but keeps every issued handle in an
/// internal registry and returns references into that registry.
///
/// The registry is reserved once at construction and never grows past
/// `capacity`, so the address of a returned handle stays the same until that
/// entry is removed, no matter how many other entries come and go. The price
/// is a hard ceiling: [`add`](Self::add) fails once every registry slot is
/// taken.
///
/// Lookups of a handle's registry slot are a linear scan; capacities are
/// expected to be small (a few hundred resources of one kind).
#[derive(Debug)]
pub struct PersistentHandleDataStore<T> {
    data_store: HandleDataStore<T>,
    /// Registry slots. Never pushed past `capacity`, hence never reallocated.
    handles: Vec<Option<Handle>>,
    /// Registry slots released by `remove`, reused oldest first.
    free_indices: VecDeque<usize>,
    capacity: usize,
}

impl<T> PersistentHandleDataStore<T> {
    /// Creates a store that can hold at most `max_num_handles` live entries.
    pub fn new(max_num_handles: usize) -> Self {
        Self {
            data_store: HandleDataStore::with_capacity(max_num_handles),
            handles: Vec::with_capacity(max_num_handles),
            free_indices: VecDeque::with_capacity(max_num_handles),
            capacity: max_num_handles,
        }
    }

    /// Checks whether `handle` is both present in the registry and valid in the
    /// underlying store.
    pub fn is_valid(&self, handle: Handle) -> bool {
        self.data_store.is_valid(handle) && self.registry_slot(handle).is_some()
    }

    /// Adds a value and returns a reference to its handle in the registry.
    ///
    /// The handle is guaranteed to stay at the same address until it is passed
    /// to [`remove`](Self::remove). Returns `None` (dropping `value`) when the
    /// store is full; use [`try_add`](Self::try_add) to get the value back.
    pub fn add(&mut self, value: T) -> Option<&Handle> {
        self.try_add(value).ok()
    }

    /// Adds a value, or hands it back if every registry slot is taken.
    pub fn try_add(&mut self, value: T) -> Result<&Handle, T> {
        let slot = if let Some(slot) = self.free_indices.pop_front() {
            // Fill a hole left by a previous removal.
            slot
        } else if self.handles.len() < self.capacity {
            self.handles.push(None);
            self.handles.len() - 1
        } else {
            return Err(value);
        };

        let handle = self.data_store.add(value);
        let entry: &Handle = self.handles[slot].insert(handle);
        Ok(entry)
    }

    /// Removes the value referred to by `handle` and returns it.
    ///
    /// Both the underlying store slot and the registry slot are released; the
    /// registry reference previously returned for this entry must not be used
    /// again. Returns `None` and changes nothing if `handle` is not valid.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let slot = self.registry_slot(handle)?;
        let value = self.data_store.remove(handle)?;
        self.handles[slot] = None;
        self.free_indices.push_back(slot);
        Some(value)
    }

    /// Returns a reference to the value behind `handle`, or `None` if it is invalid.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.data_store.get(handle)
    }

    /// Returns a mutable reference to the value behind `handle`, or `None` if it is invalid.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.data_store.get_mut(handle)
    }

    /// Returns the registry slot holding `handle`, at the address `add` returned.
    pub fn entry(&self, handle: Handle) -> Option<&Handle> {
        if !self.data_store.is_valid(handle) {
            return None;
        }
        let slot = self.registry_slot(handle)?;
        self.handles[slot].as_ref()
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.data_store.len()
    }

    /// Returns `true` if no entry is live.
    pub fn is_empty(&self) -> bool {
        self.data_store.is_empty()
    }

    /// Returns the maximum number of live entries, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if the next [`add`](Self::add) would fail.
    pub fn is_full(&self) -> bool {
        self.free_indices.is_empty() && self.handles.len() >= self.capacity
    }

    /// Returns an iterator over every live entry: its registry handle and value.
    pub fn iter(&self) -> impl Iterator<Item = (&Handle, &T)> + '_ {
        self.handles.iter().flatten().filter_map(|handle| {
            self.data_store.get(*handle).map(|value| (handle, value))
        })
    }

    /// Removes every live entry, returning them with the handles they had.
    pub fn drain(&mut self) -> Vec<(Handle, T)> {
        let drained = self.data_store.drain();
        // `clear` keeps the reserved allocation, so addresses stay fixed.
        self.handles.clear();
        self.free_indices.clear();
        drained
    }

    fn registry_slot(&self, handle: Handle) -> Option<usize> {
        self.handles.iter().position(|entry| *entry == Some(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn added_handle_is_valid_and_resolves() {
        let mut store = PersistentHandleDataStore::new(4);
        let handle = *store.add(7u32).unwrap();

        assert!(store.is_valid(handle));
        assert_eq!(store.get(handle), Some(&7));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_fails_when_full() {
        let mut store = PersistentHandleDataStore::new(2);
        assert!(store.add(1u32).is_some());
        assert!(store.add(2u32).is_some());
        assert!(store.is_full());

        assert!(store.add(3u32).is_none());
        assert_eq!(store.try_add(4u32), Err(4));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn zero_capacity_store_rejects_everything() {
        let mut store = PersistentHandleDataStore::new(0);
        assert!(store.is_full());
        assert!(store.add(1u32).is_none());
    }

    #[test]
    fn removal_frees_a_registry_slot_for_reuse() {
        let mut store = PersistentHandleDataStore::new(2);
        let a = *store.add(1u32).unwrap();
        let _b = *store.add(2u32).unwrap();

        assert_eq!(store.remove(a), Some(1));
        assert!(!store.is_full());

        let c = *store.add(3u32).unwrap();
        assert_ne!(c, a, "the reused data slot carries a new generation");
        assert!(!store.is_valid(a));
        assert_eq!(store.get(c), Some(&3));
    }

    #[test]
    fn stale_remove_does_not_free_the_registry_slot_twice() {
        let mut store = PersistentHandleDataStore::new(2);
        let a = *store.add(1u32).unwrap();
        store.remove(a);

        assert_eq!(store.remove(a), None);
        assert_eq!(store.free_indices.len(), 1);
    }

    #[test]
    fn entry_points_at_the_address_add_returned() {
        let mut store = PersistentHandleDataStore::new(8);
        let (first, handle) = {
            let entry = store.add(1u32).unwrap();
            (entry as *const Handle, *entry)
        };

        for value in 2..8u32 {
            let other = *store.add(value).unwrap();
            if value % 2 == 0 {
                store.remove(other);
            }
        }

        let entry = store.entry(handle).unwrap();
        assert!(std::ptr::eq(entry, first));
        assert_eq!(*entry, handle);
    }

    #[test]
    fn entry_is_none_after_remove() {
        let mut store = PersistentHandleDataStore::new(1);
        let a = *store.add(1u32).unwrap();
        store.remove(a);
        assert!(store.entry(a).is_none());
    }

    #[test]
    fn iter_and_drain_cover_live_entries() {
        let mut store = PersistentHandleDataStore::new(4);
        let a = *store.add('a').unwrap();
        let b = *store.add('b').unwrap();
        let c = *store.add('c').unwrap();
        store.remove(b);

        let live: Vec<_> = store.iter().map(|(h, v)| (*h, *v)).collect();
        assert_eq!(live, vec![(a, 'a'), (c, 'c')]);

        let drained = store.drain();
        assert_eq!(drained, vec![(a, 'a'), (c, 'c')]);
        assert!(store.is_empty());
        assert!(!store.is_valid(a));
        assert_eq!(store.capacity(), 4);
        for value in ['w', 'x', 'y', 'z'] {
            assert!(store.add(value).is_some());
        }
        assert!(store.is_full());
    }
}
