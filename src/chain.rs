//! Chain: the ordered sequence stored in each bucket.
//!
//! A doubly linked list whose nodes live in a `SlotMap` arena owned by the
//! chain. Links are generational keys rather than pointers, so a cursor can
//! unlink the node under it in O(1) using safe indexing only.
//!
//! The arena is created by the first push. A chain that never held an
//! element owns no heap memory, so a fresh bucket array costs one
//! allocation regardless of its length.

use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
struct Node<T> {
    elem: T,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

#[derive(Debug)]
pub struct Chain<T> {
    // `None` until the first push. Invariant: `head.is_some()` implies
    // `nodes.is_some()`.
    nodes: Option<SlotMap<DefaultKey, Node<T>>>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Chain<T> {
    pub const fn new() -> Self {
        Self {
            nodes: None,
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.as_ref().map_or(0, SlotMap::len)
    }
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Whether the node arena has been created.
    #[cfg(test)]
    pub(crate) fn holds_arena(&self) -> bool {
        self.nodes.is_some()
    }

    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|k| self.node(k)).map(|n| &n.elem)
    }

    pub fn push_front(&mut self, elem: T) {
        let nodes = self.nodes.get_or_insert_with(SlotMap::with_key);
        let k = nodes.insert(Node {
            elem,
            prev: None,
            next: self.head,
        });
        match self.head {
            Some(h) => nodes[h].prev = Some(k),
            None => self.tail = Some(k),
        }
        self.head = Some(k);
    }

    pub fn push_back(&mut self, elem: T) {
        let nodes = self.nodes.get_or_insert_with(SlotMap::with_key);
        let k = nodes.insert(Node {
            elem,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(t) => nodes[t].next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let k = self.head?;
        self.unlink(k)
    }

    /// Consumes the chain, handing every element to `f` front to back.
    pub fn destroy_with<F>(mut self, mut f: F)
    where
        F: FnMut(T),
    {
        while let Some(elem) = self.pop_front() {
            f(elem);
        }
    }

    pub fn cursor(&self) -> Cursor<'_, T> {
        Cursor {
            chain: self,
            at: self.head,
        }
    }

    pub fn cursor_mut(&mut self) -> CursorMut<'_, T> {
        let at = self.head;
        CursorMut { chain: self, at }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            cursor: self.cursor(),
        }
    }

    #[inline]
    fn node(&self, k: DefaultKey) -> Option<&Node<T>> {
        self.nodes.as_ref()?.get(k)
    }

    #[inline]
    fn node_mut(&mut self, k: DefaultKey) -> Option<&mut Node<T>> {
        self.nodes.as_mut()?.get_mut(k)
    }

    fn unlink(&mut self, k: DefaultKey) -> Option<T> {
        let nodes = self.nodes.as_mut()?;
        let node = nodes.remove(k)?;
        match node.prev {
            Some(p) => nodes[p].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(n) => nodes[n].prev = node.prev,
            None => self.tail = node.prev,
        }
        Some(node.elem)
    }
}

/// Read-only position in a chain. Starts on the front element; past the
/// back it is at end.
pub struct Cursor<'a, T> {
    chain: &'a Chain<T>,
    at: Option<DefaultKey>,
}

impl<'a, T> Cursor<'a, T> {
    #[inline]
    pub fn at_end(&self) -> bool {
        self.at.is_none()
    }

    pub fn peek(&self) -> Option<&'a T> {
        let chain = self.chain;
        self.at.and_then(|k| chain.node(k)).map(|n| &n.elem)
    }

    /// Steps to the next element. Returns false, without moving, when
    /// already at end.
    pub fn advance(&mut self) -> bool {
        match self.at {
            Some(k) => {
                self.at = self.chain.node(k).and_then(|n| n.next);
                true
            }
            None => false,
        }
    }
}

/// Position in a chain that can also unlink the element under it.
pub struct CursorMut<'a, T> {
    chain: &'a mut Chain<T>,
    at: Option<DefaultKey>,
}

impl<'a, T> CursorMut<'a, T> {
    #[inline]
    pub fn at_end(&self) -> bool {
        self.at.is_none()
    }

    pub fn peek(&self) -> Option<&T> {
        self.at.and_then(|k| self.chain.node(k)).map(|n| &n.elem)
    }

    pub fn peek_mut(&mut self) -> Option<&mut T> {
        let k = self.at?;
        self.chain.node_mut(k).map(|n| &mut n.elem)
    }

    pub fn advance(&mut self) -> bool {
        match self.at {
            Some(k) => {
                self.at = self.chain.node(k).and_then(|n| n.next);
                true
            }
            None => false,
        }
    }

    /// Consumes the cursor, keeping the mutable borrow of the element
    /// under it for the chain's full lifetime.
    pub fn into_current(self) -> Option<&'a mut T> {
        let chain = self.chain;
        let k = self.at?;
        chain.node_mut(k).map(|n| &mut n.elem)
    }

    /// Unlinks and returns the element under the cursor; the cursor moves
    /// on to the element that followed it.
    pub fn remove_current(&mut self) -> Option<T> {
        let k = self.at?;
        self.at = self.chain.node(k).and_then(|n| n.next);
        self.chain.unlink(k)
    }
}

/// Front-to-back iterator over a chain.
pub struct Iter<'a, T> {
    cursor: Cursor<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let elem = self.cursor.peek()?;
        self.cursor.advance();
        Some(elem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<T: Copy>(c: &Chain<T>) -> Vec<T> {
        c.iter().copied().collect()
    }

    /// Invariant: front insertion prepends, back insertion appends, and
    /// `pop_front` drains in list order.
    #[test]
    fn push_and_pop_order() {
        let mut c = Chain::new();
        assert!(c.is_empty());
        c.push_back(2);
        c.push_back(3);
        c.push_front(1);
        assert_eq!(collect(&c), vec![1, 2, 3]);
        assert_eq!(c.len(), 3);
        assert_eq!(c.front(), Some(&1));

        assert_eq!(c.pop_front(), Some(1));
        assert_eq!(c.pop_front(), Some(2));
        assert_eq!(c.pop_front(), Some(3));
        assert_eq!(c.pop_front(), None);
        assert!(c.is_empty());

        // Links are reset once drained.
        c.push_front(9);
        c.push_back(10);
        assert_eq!(collect(&c), vec![9, 10]);
    }

    /// Invariant: a cursor on an empty chain is at end and cannot advance.
    #[test]
    fn cursor_on_empty_chain() {
        let c: Chain<i32> = Chain::new();
        let mut cur = c.cursor();
        assert!(cur.at_end());
        assert_eq!(cur.peek(), None);
        assert!(!cur.advance());
    }

    /// Invariant: a cursor visits every element once then reports at end.
    #[test]
    fn cursor_walks_front_to_back() {
        let mut c = Chain::new();
        for i in 0..4 {
            c.push_back(i);
        }
        let mut cur = c.cursor();
        let mut seen = Vec::new();
        while !cur.at_end() {
            seen.push(*cur.peek().unwrap());
            assert!(cur.advance());
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert!(!cur.advance());
    }

    /// Invariant: removing at the cursor unlinks head, middle and tail
    /// correctly and leaves the cursor on the following element.
    #[test]
    fn remove_current_relinks_neighbours() {
        let mut c = Chain::new();
        for i in 0..5 {
            c.push_back(i);
        }
        {
            let mut cur = c.cursor_mut();
            assert_eq!(cur.remove_current(), Some(0)); // head
            assert_eq!(cur.peek(), Some(&1));
            cur.advance();
            assert_eq!(cur.remove_current(), Some(2)); // middle
            assert_eq!(cur.peek(), Some(&3));
            cur.advance();
            assert_eq!(cur.remove_current(), Some(4)); // tail
            assert!(cur.at_end());
            assert_eq!(cur.remove_current(), None);
        }
        assert_eq!(collect(&c), vec![1, 3]);
        c.push_back(7);
        c.push_front(6);
        assert_eq!(collect(&c), vec![6, 1, 3, 7]);
        assert_eq!(c.len(), 4);
    }

    /// Invariant: `peek_mut` edits the element in place.
    #[test]
    fn peek_mut_updates_in_place() {
        let mut c = Chain::new();
        c.push_back(String::from("a"));
        c.push_back(String::from("b"));
        {
            let mut cur = c.cursor_mut();
            cur.advance();
            cur.peek_mut().unwrap().push('!');
        }
        let v: Vec<&str> = c.iter().map(String::as_str).collect();
        assert_eq!(v, vec!["a", "b!"]);
    }

    /// Invariant: `destroy_with` hands each element to the callback exactly
    /// once, in list order.
    #[test]
    fn destroy_with_visits_each_element_once() {
        let mut c = Chain::new();
        for i in 0..3 {
            c.push_back(i);
        }
        let mut out = Vec::new();
        c.destroy_with(|e| out.push(e));
        assert_eq!(out, vec![0, 1, 2]);
    }

    /// Invariant: a chain that never held an element owns no arena; the
    /// first push creates it and draining keeps it for reuse.
    #[test]
    fn arena_is_created_by_first_push() {
        let mut c: Chain<i32> = Chain::new();
        assert!(!c.holds_arena());
        assert_eq!(c.len(), 0);
        assert_eq!(c.front(), None);
        assert_eq!(c.pop_front(), None);
        assert_eq!(c.cursor_mut().remove_current(), None);
        assert!(!c.holds_arena());

        c.push_back(1);
        assert!(c.holds_arena());
        assert_eq!(c.pop_front(), Some(1));
        assert!(c.is_empty());
        assert!(c.holds_arena());

        let mut d: Chain<i32> = Chain::default();
        d.push_front(5);
        assert!(d.holds_arena());
        assert_eq!(d.front(), Some(&5));
    }
}
