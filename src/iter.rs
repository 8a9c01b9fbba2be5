//! Iter: cursor over a table's non-empty buckets.
//!
//! The iterator pairs a bucket index with a chain cursor into that bucket.
//! Whenever a live cursor is held it points at an element of a non-empty
//! bucket; running off the end of one chain immediately moves on to the
//! next non-empty bucket or to the terminal state. The table is borrowed
//! for the iterator's lifetime, so it cannot be modified mid-iteration.

use crate::chain::Cursor;
use core::iter::FusedIterator;
use crate::chained_hash_map::{ChainedHashMap, Entry};

pub struct Iter<'a, V> {
    map: &'a ChainedHashMap<V>,
    pos: usize,
    cursor: Option<Cursor<'a, Entry<V>>>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(map: &'a ChainedHashMap<V>) -> Self {
        let mut it = Self {
            map,
            pos: 0,
            cursor: None,
        };
        if !map.is_empty() {
            it.open_from(0);
        }
        it
    }

    /// Opens a cursor on the first non-empty bucket at or after `start`,
    /// or drops into the terminal state when none is left.
    fn open_from(&mut self, start: usize) {
        let buckets = self.map.buckets();
        match (start..buckets.len()).find(|&i| !buckets[i].is_empty()) {
            Some(i) => {
                self.pos = i;
                self.cursor = Some(buckets[i].cursor());
            }
            None => {
                self.pos = buckets.len();
                self.cursor = None;
            }
        }
    }

    /// Moves to the next entry. Returns false, doing nothing, once at end;
    /// the step onto the terminal state itself still returns true.
    pub fn advance(&mut self) -> bool {
        let Some(cursor) = self.cursor.as_mut() else {
            return false;
        };
        cursor.advance();
        if cursor.at_end() {
            self.open_from(self.pos + 1);
        }
        true
    }

    /// Key under the cursor, borrowed from the table.
    pub fn current(&self) -> Option<&'a str> {
        self.entry().map(Entry::key)
    }

    pub fn current_value(&self) -> Option<&'a V> {
        self.entry().map(Entry::value)
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.cursor.is_none()
    }

    fn entry(&self) -> Option<&'a Entry<V>> {
        self.cursor.as_ref().and_then(|c| c.peek())
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entry()?;
        self.advance();
        Some((entry.key(), entry.value()))
    }

    /// The table's length bounds what is left; nothing more is tracked.
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.at_end() {
            (0, Some(0))
        } else {
            (1, Some(self.map.len()))
        }
    }
}

// Once `cursor` is `None` nothing reopens it.
impl<V> FusedIterator for Iter<'_, V> {}
