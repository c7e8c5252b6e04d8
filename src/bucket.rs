//! Collision chains: sorted insertion, linear scan, swap-remove.
//!
//! A chain keeps its entries in `(key, hash)` order so insertion placement
//! is deterministic, but that order is advisory only: `swap_remove` breaks
//! it and nothing restores it, so every search is a linear scan. Under a
//! well-seeded hash a chain holds a handful of entries and linear scan wins
//! anyway.

use crate::hash::KeyStrategy;
use crate::map::SetError;
use core::borrow::Borrow;
use core::cmp::Ordering;

/// One key/value pair plus its hash as computed at insertion time. The hash
/// is stored so rehashing never re-runs user code; only the value field is
/// ever mutated after creation.
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u32,
}

#[derive(Debug)]
pub(crate) struct Bucket<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Bucket<K, V> {
    /// An empty chain. Allocates nothing until `reserve_one`.
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [Entry<K, V>] {
        &mut self.entries
    }

    pub(crate) fn into_entries(self) -> Vec<Entry<K, V>> {
        self.entries
    }

    /// Make room for one more entry. This is the only allocation point on
    /// the insertion path; `insert_sorted` relies on the reserved capacity.
    pub(crate) fn reserve_one(&mut self) -> Result<(), SetError> {
        self.entries.try_reserve(1).map_err(SetError::Alloc)
    }

    /// Linear scan for the entry matching `hash` whose key compares equal
    /// to `key`. Both must match: equal keys with different hashes (or the
    /// reverse) are different entries as far as the chain is concerned.
    pub(crate) fn position<Q, S>(&self, hash: u32, key: &Q, strategy: &S) -> Option<usize>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
    {
        self.entries.iter().position(|entry| {
            entry.hash == hash && strategy.compare(entry.key.borrow(), key) == Ordering::Equal
        })
    }

    /// Place `entry` by binary search under the `(key, hash)` order.
    /// Capacity must already be reserved via `reserve_one`. On a chain left
    /// unsorted by deletions the computed position is arbitrary, which is
    /// fine: searches never consult the order.
    pub(crate) fn insert_sorted<S>(&mut self, entry: Entry<K, V>, strategy: &S)
    where
        S: KeyStrategy<K>,
    {
        debug_assert!(self.entries.len() < self.entries.capacity());
        let at = match self.entries.binary_search_by(|probe| {
            strategy
                .compare(&probe.key, &entry.key)
                .then(probe.hash.cmp(&entry.hash))
        }) {
            Ok(i) | Err(i) => i,
        };
        self.entries.insert(at, entry);
    }

    /// O(1) removal: overwrite slot `at` with the last entry and shrink by
    /// one. Leaves the chain unsorted from `at` onward.
    pub(crate) fn swap_remove(&mut self, at: usize) -> Entry<K, V> {
        self.entries.swap_remove(at)
    }

    pub(crate) fn entry_mut(&mut self, at: usize) -> &mut Entry<K, V> {
        &mut self.entries[at]
    }
}
