//! ChainedHashMap: string-keyed table with one chain per bucket.

use crate::chain::Chain;
use crate::error::MapError;
use crate::hash::bucket_index;
use crate::iter::Iter;
use core::fmt;
use core::mem;
use log::{debug, trace};

/// Bucket count of a fresh table; the table never shrinks below it.
pub const INITIAL_CAPACITY: usize = 8;
/// Grow when the truncated load factor `len / capacity` exceeds this.
pub const MAX_LOAD_FACTOR: usize = 4;
/// Shrink when the truncated load factor drops below this. With integer
/// division a threshold of one half only holds when `len < capacity`.
pub const MIN_LOAD_FACTOR: usize = 1;

/// Callback receiving values the table discards on overwrite, `clear` and
/// drop. Values returned by `remove` never reach it.
pub(crate) type Disposer<V> = Box<dyn FnMut(V)>;

#[derive(Debug)]
pub(crate) struct Entry<V> {
    key: Box<str>,
    value: V,
}

impl<V> Entry<V> {
    #[inline]
    pub(crate) fn key(&self) -> &str {
        &self.key
    }
    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }
}

pub struct ChainedHashMap<V> {
    buckets: Buckets<V>,
    len: usize,
    disposer: Option<Disposer<V>>,
}

type Buckets<V> = Vec<Chain<Entry<V>>>;

/// Allocates `capacity` empty chains. Empty chains own no memory, so the
/// array reservation is the only allocation and the only failure point.
fn empty_buckets<V>(capacity: usize) -> Result<Buckets<V>, MapError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(capacity)?;
    buckets.extend((0..capacity).map(|_| Chain::new()));
    Ok(buckets)
}

fn dispose<V>(disposer: &mut Option<Disposer<V>>, value: V) {
    match disposer {
        Some(d) => d(value),
        None => drop(value),
    }
}

impl<V> ChainedHashMap<V> {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_disposer<F>(disposer: F) -> Self
    where
        F: FnMut(V) + 'static,
    {
        Self::build(Some(Box::new(disposer)))
    }

    /// Like `new`, but reports a failed bucket-array allocation instead of
    /// aborting.
    pub fn try_new() -> Result<Self, MapError> {
        Self::try_build(None)
    }

    pub fn try_with_disposer<F>(disposer: F) -> Result<Self, MapError>
    where
        F: FnMut(V) + 'static,
    {
        Self::try_build(Some(Box::new(disposer)))
    }

    fn build(disposer: Option<Disposer<V>>) -> Self {
        trace!("creating table with {} buckets", INITIAL_CAPACITY);
        Self {
            buckets: (0..INITIAL_CAPACITY).map(|_| Chain::new()).collect(),
            len: 0,
            disposer,
        }
    }

    fn try_build(disposer: Option<Disposer<V>>) -> Result<Self, MapError> {
        trace!("creating table with {} buckets", INITIAL_CAPACITY);
        Ok(Self {
            buckets: empty_buckets(INITIAL_CAPACITY)?,
            len: 0,
            disposer,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    fn load_factor(&self) -> usize {
        self.len / self.capacity()
    }

    pub(crate) fn buckets(&self) -> &[Chain<Entry<V>>] {
        &self.buckets
    }

    /// Stores `value` under `key`.
    ///
    /// An existing entry keeps its key and only has its value replaced; the
    /// old value goes to the disposer. A new key is copied into a fresh
    /// entry at the back of its bucket. If the table is over its load limit
    /// it first doubles; when that fails nothing is modified.
    pub fn insert(&mut self, key: &str, value: V) -> Result<(), MapError> {
        if self.load_factor() > MAX_LOAD_FACTOR {
            let capacity = self.capacity();
            let grown = capacity
                .checked_mul(2)
                .ok_or(MapError::CapacityOverflow { capacity })?;
            self.resize(grown)?;
        }

        let idx = bucket_index(key, self.capacity());
        let chain = &mut self.buckets[idx];
        let mut cursor = chain.cursor_mut();
        while let Some(entry) = cursor.peek_mut() {
            if &*entry.key == key {
                let old = mem::replace(&mut entry.value, value);
                dispose(&mut self.disposer, old);
                return Ok(());
            }
            cursor.advance();
        }

        chain.push_back(Entry {
            key: key.into(),
            value,
        });
        self.len += 1;
        Ok(())
    }

    /// Removes `key` and hands its value back to the caller without running
    /// the disposer. `None` means the key was not present.
    ///
    /// A sparse table halves first. If that shrink cannot allocate, it is
    /// skipped and the removal proceeds at the current capacity.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.remove_with(key, empty_buckets)
    }

    /// `remove` with the shrink's bucket allocation supplied by `allocate`.
    fn remove_with<A>(&mut self, key: &str, allocate: A) -> Option<V>
    where
        A: FnOnce(usize) -> Result<Buckets<V>, MapError>,
    {
        self.shrink_if_sparse(allocate);

        let idx = bucket_index(key, self.capacity());
        let mut cursor = self.buckets[idx].cursor_mut();
        while let Some(entry) = cursor.peek() {
            if &*entry.key == key {
                let entry = cursor.remove_current()?;
                self.len -= 1;
                return Some(entry.value);
            }
            cursor.advance();
        }
        None
    }

    /// Halves the bucket array when `len < capacity` and the table is above
    /// its floor. An allocation failure leaves the table as it was.
    fn shrink_if_sparse<A>(&mut self, allocate: A)
    where
        A: FnOnce(usize) -> Result<Buckets<V>, MapError>,
    {
        if self.load_factor() >= MIN_LOAD_FACTOR || self.capacity() <= INITIAL_CAPACITY {
            return;
        }
        let target = self.capacity() / 2;
        match allocate(target) {
            Ok(fresh) => self.rehash_into(fresh),
            Err(err) => debug!("shrink to {} buckets skipped: {}", target, err),
        }
    }

    fn find(&self, key: &str) -> Option<&Entry<V>> {
        let idx = bucket_index(key, self.capacity());
        let mut cursor = self.buckets[idx].cursor();
        while let Some(entry) = cursor.peek() {
            if &*entry.key == key {
                return Some(entry);
            }
            cursor.advance();
        }
        None
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.find(key).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let idx = bucket_index(key, self.capacity());
        let mut cursor = self.buckets[idx].cursor_mut();
        while let Some(entry) = cursor.peek() {
            if &*entry.key == key {
                break;
            }
            cursor.advance();
        }
        cursor.into_current().map(|e| &mut e.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Disposes of every value. The bucket count is kept.
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            while let Some(entry) = chain.pop_front() {
                dispose(&mut self.disposer, entry.value);
            }
        }
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self)
    }

    /// Moves every entry into a fresh array of `new_capacity` buckets.
    ///
    /// The new array is allocated before anything moves, so a failure
    /// leaves the table untouched.
    fn resize(&mut self, new_capacity: usize) -> Result<(), MapError> {
        let fresh = empty_buckets(new_capacity)?;
        self.rehash_into(fresh);
        Ok(())
    }

    /// Rehashes every entry into `fresh`, which must be all empty chains.
    /// Entries are drained from the front of each old bucket and pushed onto
    /// the front of their new one.
    fn rehash_into(&mut self, fresh: Buckets<V>) {
        let new_capacity = fresh.len();
        let old = mem::replace(&mut self.buckets, fresh);
        debug!(
            "resizing table: {} -> {} buckets, {} entries",
            old.len(),
            new_capacity,
            self.len
        );
        for mut chain in old {
            while let Some(entry) = chain.pop_front() {
                let idx = bucket_index(&entry.key, new_capacity);
                self.buckets[idx].push_front(entry);
            }
        }
    }

    /// Checks the structural invariants: every entry sits in its home
    /// bucket, keys are unique, `len` matches the live entries and the
    /// capacity never drops below its floor.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut seen = std::collections::HashSet::new();
        let mut total = 0;
        for (i, chain) in self.buckets.iter().enumerate() {
            assert_eq!(chain.is_empty(), chain.len() == 0);
            for entry in chain.iter() {
                assert_eq!(bucket_index(&entry.key, self.capacity()), i);
                assert!(seen.insert(entry.key.clone()), "duplicate key");
                total += 1;
            }
        }
        assert_eq!(total, self.len);
        assert!(self.capacity() >= INITIAL_CAPACITY);
    }
}

impl<V> Default for ChainedHashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Drop for ChainedHashMap<V> {
    fn drop(&mut self) {
        let Some(disposer) = self.disposer.as_mut() else {
            return;
        };
        for chain in self.buckets.drain(..) {
            chain.destroy_with(|entry| disposer(entry.value));
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for ChainedHashMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V> IntoIterator for &'a ChainedHashMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
