// ChainedHashMap property tests (public API).
//
// Property 1: exactly-once ownership of values.
//  - Model: every inserted value carries a unique id.
//  - Invariant: after the table is dropped, each id was either returned by
//    `remove` or handed to the disposer, never both and never twice.
//  - Operations: insert (fresh or overwrite), remove, optional clear.
//
// Property 2: growth never loses a mapping.
//  - Model: BTreeMap of key -> value.
//  - Invariant: after inserting an arbitrary key set (crossing several
//    doublings), every key maps to its latest value and iteration yields
//    the model's key set.
use proptest::prelude::*;
use chained_hashmap::{ChainedHashMap, INITIAL_CAPACITY};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

// Property 1: every value leaves the table exactly once.
proptest! {
    #[test]
    fn prop_values_leave_exactly_once(
        keys in 1usize..=40,
        ops in proptest::collection::vec((0u8..=2u8, 0usize..1000usize), 1..400),
    ) {
        let disposed: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = disposed.clone();
        let mut m = ChainedHashMap::with_disposer(move |id: usize| sink.borrow_mut().push(id));
        let mut returned: Vec<usize> = Vec::new();
        let mut next_id = 0usize;

        for (op, raw_k) in ops {
            let k = format!("k{}", raw_k % keys);
            match op {
                // Insert a fresh id; an overwrite disposes of the previous one.
                0 | 1 => {
                    m.insert(&k, next_id).unwrap();
                    next_id += 1;
                }
                // Remove hands the id back to us instead of the disposer.
                _ => {
                    if let Some(id) = m.remove(&k) {
                        returned.push(id);
                    }
                }
            }
        }
        drop(m);

        let disposed = disposed.borrow();
        let d: BTreeSet<usize> = disposed.iter().copied().collect();
        let r: BTreeSet<usize> = returned.iter().copied().collect();
        prop_assert_eq!(d.len(), disposed.len(), "an id was disposed of twice");
        prop_assert_eq!(r.len(), returned.len(), "an id was returned twice");
        prop_assert!(d.is_disjoint(&r), "an id was both returned and disposed");
        let all: BTreeSet<usize> = d.union(&r).copied().collect();
        prop_assert_eq!(all, (0..next_id).collect::<BTreeSet<_>>());
    }
}

// Property 2: growth keeps every mapping reachable.
proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]
    #[test]
    fn prop_growth_keeps_mappings(
        entries in proptest::collection::vec(("[a-z0-9]{1,8}", any::<u32>()), 0..600),
    ) {
        let mut m = ChainedHashMap::new();
        let mut model = BTreeMap::new();
        for (k, v) in &entries {
            m.insert(k, *v).unwrap();
            model.insert(k.clone(), *v);
        }

        prop_assert_eq!(m.len(), model.len());
        prop_assert!(m.capacity() >= INITIAL_CAPACITY);
        prop_assert!(m.len() / m.capacity() <= 5, "load factor ran away");
        for (k, v) in &model {
            prop_assert_eq!(m.get(k), Some(v));
        }
        let keys: BTreeSet<String> = m.iter().map(|(k, _)| k.to_string()).collect();
        let want: BTreeSet<String> = model.keys().cloned().collect();
        prop_assert_eq!(keys, want);
    }
}
