//! chained-hashmap: a single-threaded, string-keyed hash table with
//! separate chaining, load-factor driven resizing and an external cursor
//! iterator.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small associative container whose collision strategy, resize
//!   policy and iteration contract are each easy to reason about alone.
//! - Layers:
//!   - `hash`: one-at-a-time mixing reduced modulo the bucket count.
//!   - `chain::Chain<T>`: per-bucket doubly linked list over a `SlotMap`
//!     arena, with read-only and mutable cursors.
//!   - `ChainedHashMap<V>`: owns one chain per bucket, every entry and every
//!     key copy. Values are caller-supplied; an optional disposer receives
//!     the ones the table discards.
//!   - `Iter<'a, V>`: bucket index plus a chain cursor, skipping empty
//!     buckets.
//!
//! Constraints
//! - Single-threaded: the disposer is a `Box<dyn FnMut(V)>`, so the table is
//!   neither `Send` nor `Sync`.
//! - Keys are `&str` on the way in and owned `Box<str>` copies inside; the
//!   table never hands out mutable access to a key.
//! - Unique keys: inserting an existing key replaces its value in place.
//!
//! Resize policy
//! - Starts at `INITIAL_CAPACITY` buckets and never goes below it.
//! - `insert` doubles first when `len / capacity` (integer division) is
//!   greater than `MAX_LOAD_FACTOR`.
//! - `remove` halves first when `len / capacity` is below
//!   `MIN_LOAD_FACTOR`. A shrink that cannot allocate is skipped; it is never
//!   reported as a missing key.
//! - Resizing allocates the new bucket array up front, then moves each entry
//!   (never copying it) to the front of its new bucket. Order within a bucket
//!   is therefore unspecified.
//!
//! Disposal
//! - The disposer runs exactly once per value the table throws away: the old
//!   value on overwrite, every value on `clear`, every remaining value on
//!   drop. Values returned by `remove` belong to the caller and never reach
//!   it.
//!
//! Iteration
//! - `Iter` borrows the table, so inserting or removing while an iterator is
//!   live is a compile error rather than a documented hazard.

pub mod chain;
mod chained_hash_map;
mod chained_hash_map_proptest;
mod error;
pub mod hash;
mod iter;

// Public surface
pub use chained_hash_map::{ChainedHashMap, INITIAL_CAPACITY, MAX_LOAD_FACTOR, MIN_LOAD_FACTOR};
pub use error::MapError;
pub use iter::Iter;
