#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// bucket placement through crate-private accessors.

use crate::chained_hash_map::{ChainedHashMap, INITIAL_CAPACITY};
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i64),
    Iterate,
    Clear,
}

fn arb_scenario(
    pool_len: std::ops::RangeInclusive<usize>,
    op_count: std::ops::Range<usize>,
) -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,6}", pool_len).prop_flat_map(move |pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => idx.clone().prop_map(OpI::Insert),
            4 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,6}".prop_map(|s| s)].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, i64::from(d))),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, op_count.clone()).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `get`/`contains_key` agree with the model; `remove` returns the model's value.
// - Overwrite keeps `len` and sends exactly the replaced value to the disposer.
// - Every value is disposed of at most once, never after being returned by
//   `remove`, and the drop at the end disposes of exactly the survivors.
// - Iteration yields each live key exactly once.
// - Structural invariants (home bucket, unique keys, len, capacity floor)
//   hold after every op, across grows and shrinks.
fn run_state_machine(pool: Vec<String>, ops: Vec<OpI>) -> Result<(), TestCaseError> {
    let disposed: Rc<RefCell<Vec<i64>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = disposed.clone();
    let mut sut: ChainedHashMap<i64> =
        ChainedHashMap::with_disposer(move |v| sink.borrow_mut().push(v));
    let mut model: HashMap<String, i64> = HashMap::new();
    let mut expected_disposed: Vec<i64> = Vec::new();
    let mut next_value: i64 = 0;

    for op in ops {
        match op {
            OpI::Insert(i) => {
                let k = &pool[i];
                let v = next_value;
                next_value += 1;
                sut.insert(k, v).expect("insert");
                if let Some(old) = model.insert(k.clone(), v) {
                    expected_disposed.push(old);
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k));
                prop_assert!(!sut.contains_key(k));
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                match (sut.get_mut(k), model.get_mut(k)) {
                    (Some(sv), Some(mv)) => {
                        *sv += d;
                        *mv += d;
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "get_mut disagrees with model for {:?}", k),
                }
            }
            OpI::Iterate => {
                let mut count = 0;
                let mut s_keys = BTreeSet::new();
                for (k, v) in sut.iter() {
                    prop_assert_eq!(model.get(k), Some(v));
                    s_keys.insert(k.to_string());
                    count += 1;
                }
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(count, model.len());
                prop_assert_eq!(s_keys, m_keys);
            }
            OpI::Clear => {
                sut.clear();
                expected_disposed.extend(model.drain().map(|(_, v)| v));
            }
        }

        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.capacity() >= INITIAL_CAPACITY);

        let mut got = disposed.borrow().clone();
        let mut want = expected_disposed.clone();
        got.sort_unstable();
        want.sort_unstable();
        prop_assert_eq!(got, want);
    }

    drop(sut);
    expected_disposed.extend(model.into_values());
    let mut got = disposed.borrow().clone();
    got.sort_unstable();
    expected_disposed.sort_unstable();
    prop_assert_eq!(got, expected_disposed);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(1..=8, 1..60)) {
        run_state_machine(pool, ops)?;
    }
}

// Property: Same state machine with a key pool large enough that random
// operation runs repeatedly cross the grow and shrink thresholds.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_across_resizes((pool, ops) in arb_scenario(60..=160, 200..600)) {
        run_state_machine(pool, ops)?;
    }
}
