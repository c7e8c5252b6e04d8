//! chained-hashmap: a single-threaded, seeded, separate-chaining hash map
//! with pluggable key comparison/hashing and optional load-factor growth.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: an associative container usable as a building block inside
//!   interpreters, compilers, and caches, built in small verifiable layers
//!   so each piece can be reasoned about independently.
//! - Layers:
//!   - `hash`: Murmur3-32 plus the `KeyStrategy` trait, the injected
//!     hash/compare capability. `ByteKeys` is the default for keys that
//!     expose their bytes.
//!   - `bucket`: one collision chain. Entries carry their hash; insertion
//!     places by `(key, hash)` order, search is always a linear scan, and
//!     removal swap-removes in O(1).
//!   - `map`: `ChainedHashMap` owns the bucket table, the entry counter,
//!     the growth policy, and the per-instance seed; it implements
//!     set/get/delete/traverse and the resize/rehash machinery.
//!
//! Constraints
//! - Single-threaded: no internal locking. The map is `Send` but `!Sync`;
//!   cross-thread use means wrapping one map in an exclusive lock.
//! - Every map draws its own random seed at construction and keeps it for
//!   life, so the chain distribution of a fixed key set differs per
//!   instance and adversarial key sets do not transfer between maps.
//! - Insertion-path allocation is fallible (`try_reserve`); a refused
//!   allocation fails the one `set` that needed it and changes nothing.
//!
//! Growth policy
//! - Default and caller-sized maps never resize; chains just get longer.
//! - A map built with a load factor doubles its table when the entry count
//!   reaches `bucket_count * load_factor`, re-slotting every entry by its
//!   stored hash. Rehashing is all-or-nothing: allocation happens before
//!   any entry moves, so a failure leaves the old table intact.
//!
//! Why sorted chains but linear search?
//! - Sorted insertion makes chain layout deterministic for a given insert
//!   history. Deletion swap-removes and deliberately does not re-sort, so
//!   order cannot be trusted for search; with well-seeded chains holding a
//!   couple of entries, a linear scan beats maintaining order anyway. Any
//!   future order-dependent optimization is therefore off the table by
//!   contract, not by oversight.
//!
//! Reentrancy
//! - The map runs user code (the strategy, traversal callbacks) while its
//!   internals may be transiently inconsistent. A debug-only check panics
//!   if that code calls back into the same map; release builds compile the
//!   check away.

mod bucket;
pub mod hash;
pub mod map;
mod map_proptest;
mod reentrancy;

// Public surface
pub use hash::{murmur3_32, ByteKeys, KeyStrategy};
pub use map::{ChainedHashMap, ConfigError, Iter, IterMut, SetError, DEFAULT_BUCKETS};
