//! The map engine: bucket table ownership, growth policy, and the public
//! set/get/delete/traverse surface.

use crate::bucket::{Bucket, Entry};
use crate::hash::{ByteKeys, KeyStrategy};
use crate::reentrancy::ReentryCheck;
use core::borrow::Borrow;
use std::collections::TryReserveError;

/// Bucket count used by `new` when the caller does not choose one.
pub const DEFAULT_BUCKETS: usize = 100;

/// Construction-time validation failures. No map is produced.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// A bucket count of zero leaves nowhere to put entries.
    ZeroBuckets,
    /// Load factors must be strictly positive; NaN is rejected too.
    InvalidLoadFactor,
}

/// Failure while inserting or growing. The map is left exactly as it was
/// before the failing call.
#[derive(Debug)]
pub enum SetError {
    /// An entry or table allocation was refused by the allocator.
    Alloc(TryReserveError),
}

#[derive(Copy, Clone, Debug)]
enum Growth {
    /// Default and caller-sized modes: the table never changes length.
    Fixed,
    /// Dynamic mode: double the table once entries reach
    /// `bucket_count * factor`.
    LoadFactor(f64),
}

/// A seeded, separate-chaining hash map.
///
/// Keys and values are owned by the map; the hash/comparison strategy `S`
/// is injected at construction and defaults to byte-sequence keys. Lookups
/// accept any borrowed form `Q` of the key that the strategy also covers.
pub struct ChainedHashMap<K, V, S = ByteKeys> {
    table: Vec<Option<Bucket<K, V>>>,
    entries: usize,
    growth: Growth,
    seed: u32,
    strategy: S,
    reentry: ReentryCheck,
}

fn draw_seed() -> u32 {
    let mut raw = [0u8; 4];
    getrandom::getrandom(&mut raw).expect("process entropy source unavailable");
    u32::from_le_bytes(raw)
}

impl<K, V> ChainedHashMap<K, V>
where
    K: AsRef<[u8]>,
{
    /// Map with the built-in bucket count and no automatic growth.
    pub fn new() -> Self {
        Self::with_strategy(ByteKeys)
    }

    /// Map with a caller-chosen bucket count that never changes.
    pub fn with_buckets(buckets: usize) -> Result<Self, ConfigError> {
        Self::with_buckets_and_strategy(buckets, ByteKeys)
    }

    /// Map that doubles its table whenever the entry count reaches
    /// `buckets * load_factor`.
    pub fn with_growth(buckets: usize, load_factor: f64) -> Result<Self, ConfigError> {
        Self::with_growth_and_strategy(buckets, load_factor, ByteKeys)
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: AsRef<[u8]>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    S: KeyStrategy<K>,
{
    /// Like `new`, with a caller-supplied strategy.
    pub fn with_strategy(strategy: S) -> Self {
        Self::build(DEFAULT_BUCKETS, Growth::Fixed, strategy)
    }

    /// Like `with_buckets`, with a caller-supplied strategy.
    pub fn with_buckets_and_strategy(buckets: usize, strategy: S) -> Result<Self, ConfigError> {
        if buckets == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        Ok(Self::build(buckets, Growth::Fixed, strategy))
    }

    /// Like `with_growth`, with a caller-supplied strategy.
    pub fn with_growth_and_strategy(
        buckets: usize,
        load_factor: f64,
        strategy: S,
    ) -> Result<Self, ConfigError> {
        if buckets == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        // NaN fails this comparison as well.
        if !(load_factor > 0.0) {
            return Err(ConfigError::InvalidLoadFactor);
        }
        Ok(Self::build(buckets, Growth::LoadFactor(load_factor), strategy))
    }

    fn build(buckets: usize, growth: Growth, strategy: S) -> Self {
        let mut table = Vec::new();
        table.resize_with(buckets, || None);
        Self {
            table,
            entries: 0,
            growth,
            seed: draw_seed(),
            strategy,
            reentry: ReentryCheck::new(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Current table length. Fixed for non-growing maps; doubles per resize
    /// in dynamic mode.
    pub fn bucket_count(&self) -> usize {
        self.table.len()
    }

    /// The per-instance hash seed, drawn at construction and fixed for the
    /// map's lifetime.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    fn bucket_for<Q>(&self, key: &Q) -> (usize, u32)
    where
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        let hash = self.strategy.hash(key, self.seed);
        (hash as usize % self.table.len(), hash)
    }

    fn at_threshold(&self) -> bool {
        match self.growth {
            Growth::Fixed => false,
            Growth::LoadFactor(factor) => {
                self.entries >= (self.table.len() as f64 * factor) as usize
            }
        }
    }

    /// Insert `value` under `key`, overwriting any previous value in place.
    ///
    /// An overwrite never allocates and never changes `len`. A fresh insert
    /// may first trigger a resize in dynamic mode; on any allocation
    /// failure the map is unchanged.
    pub fn set(&mut self, key: K, value: V) -> Result<(), SetError> {
        let _g = self.reentry.enter();
        let (index, hash) = self.bucket_for(&key);

        if let Some(bucket) = self.table[index].as_mut() {
            if let Some(at) = bucket.position(hash, &key, &self.strategy) {
                bucket.entry_mut(at).value = value;
                return Ok(());
            }
        }

        let index = if self.at_threshold() {
            Self::grow(&mut self.table, &self.strategy)?;
            // The table length changed; the slot must be recomputed.
            hash as usize % self.table.len()
        } else {
            index
        };

        let bucket = self.table[index].get_or_insert_with(Bucket::new);
        bucket.reserve_one()?;
        bucket.insert_sorted(Entry { key, value, hash }, &self.strategy);
        self.entries += 1;
        Ok(())
    }

    /// Borrowed lookup: a map keyed by `String` can be queried with `&str`,
    /// provided the strategy hashes and compares both forms identically.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
    {
        let _g = self.reentry.enter();
        let (index, hash) = self.bucket_for(key);
        let bucket = self.table[index].as_ref()?;
        let at = bucket.position(hash, key, &self.strategy)?;
        Some(&bucket.entries()[at].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
    {
        let _g = self.reentry.enter();
        let (index, hash) = self.bucket_for(key);
        let bucket = self.table[index].as_mut()?;
        let at = bucket.position(hash, key, &self.strategy)?;
        Some(&mut bucket.entry_mut(at).value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
    {
        self.get(key).is_some()
    }

    /// Remove `key`, returning the owned value. Removal swap-removes within
    /// the chain: O(1), at the cost of the chain's sort order, which
    /// lookups never rely on.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        S: KeyStrategy<Q>,
    {
        let _g = self.reentry.enter();
        let (index, hash) = self.bucket_for(key);
        let bucket = self.table[index].as_mut()?;
        let at = bucket.position(hash, key, &self.strategy)?;
        let removed = bucket.swap_remove(at);
        self.entries -= 1;
        Some(removed.value)
    }

    /// Visit every live entry in table-slot order, then current chain
    /// order. The first `Err` from `visit` stops the walk and is returned
    /// verbatim.
    pub fn traverse<F, E>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&K, &V) -> Result<(), E>,
    {
        let _g = self.reentry.enter();
        for bucket in self.table.iter().flatten() {
            for entry in bucket.entries() {
                visit(&entry.key, &entry.value)?;
            }
        }
        Ok(())
    }

    /// Iterate `(&K, &V)` in traversal order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            outer: self.table.iter(),
            inner: Default::default(),
        }
    }

    /// Iterate `(&K, &mut V)` in traversal order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            outer: self.table.iter_mut(),
            inner: Default::default(),
        }
    }

    /// Double the table and redistribute every entry by its stored hash.
    ///
    /// Two passes keep the operation all-or-nothing: the first walks the
    /// old table immutably and pre-reserves every destination chain of the
    /// doubled table, so a refused allocation returns with the old table
    /// untouched; the second only moves entries into reserved capacity and
    /// cannot fail. Stored hashes are reused, only the slot is recomputed.
    fn grow(table: &mut Vec<Option<Bucket<K, V>>>, strategy: &S) -> Result<(), SetError> {
        let doubled = table.len() * 2;
        let mut next: Vec<Option<Bucket<K, V>>> = Vec::new();
        next.try_reserve_exact(doubled).map_err(SetError::Alloc)?;
        next.resize_with(doubled, || None);

        for bucket in table.iter().flatten() {
            for entry in bucket.entries() {
                let slot = entry.hash as usize % doubled;
                next[slot].get_or_insert_with(Bucket::new).reserve_one()?;
            }
        }

        for slot in table.iter_mut() {
            let Some(bucket) = slot.take() else { continue };
            for entry in bucket.into_entries() {
                let dest = entry.hash as usize % doubled;
                next[dest]
                    .as_mut()
                    .expect("destination chains are created in the reservation pass")
                    .insert_sorted(entry, strategy);
            }
        }

        *table = next;
        Ok(())
    }
}

#[cfg(test)]
impl<K, V, S> ChainedHashMap<K, V, S> {
    /// Chain length per table slot, for structure-invariant tests.
    pub(crate) fn chain_lengths(&self) -> Vec<usize> {
        self.table
            .iter()
            .map(|slot| slot.as_ref().map_or(0, |bucket| bucket.entries().len()))
            .collect()
    }
}

/// Iterator over `(&K, &V)` in traversal order.
pub struct Iter<'a, K, V> {
    outer: core::slice::Iter<'a, Option<Bucket<K, V>>>,
    inner: core::slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.inner.next() {
                return Some((&entry.key, &entry.value));
            }
            if let Some(bucket) = self.outer.next()? {
                self.inner = bucket.entries().iter();
            }
        }
    }
}

/// Iterator over `(&K, &mut V)` in traversal order.
pub struct IterMut<'a, K, V> {
    outer: core::slice::IterMut<'a, Option<Bucket<K, V>>>,
    inner: core::slice::IterMut<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.inner.next() {
                let Entry { key, value, .. } = entry;
                return Some((&*key, value));
            }
            if let Some(bucket) = self.outer.next()? {
                self.inner = bucket.entries_mut().iter_mut();
            }
        }
    }
}
