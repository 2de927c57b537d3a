use super::*;

use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
enum Op {
    Insert(i16),
    Find(i16),
    Take,
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        70 => any::<i16>().prop_map(Op::Insert),
        29 => any::<i16>().prop_map(Op::Find),
        1 => Just(Op::Take),
    ];
    prop::collection::vec(op, 0..=1000)
}

/// Elements from a narrow range so duplicates are common.
fn elems_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..64, 0..=200)
}

/// Walks the whole tree with a cursor, forward then backward.
fn walk<T: Clone>(t: &BTree<T>) -> (Vec<T>, Vec<T>) {
    let mut forward = Vec::with_capacity(t.len());
    let mut cursor = t.begin();
    while let Some(elem) = cursor.current() {
        forward.push(elem.clone());
        cursor.move_next();
    }

    let mut backward = Vec::with_capacity(t.len());
    let mut cursor = t.rbegin();
    while cursor != t.rend() {
        backward.extend(cursor.current().cloned());
        cursor.move_next();
    }

    (forward, backward)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(capacity in 1usize..=8, ops in ops_strategy()) {
        let mut t: BTree<i16> = BTree::new(capacity).unwrap();
        let mut m: BTreeSet<i16> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(x) => {
                    let (cursor, inserted) = t.insert(x);
                    prop_assert_eq!(cursor.current(), Some(&x));
                    prop_assert_eq!(inserted, m.insert(x));
                }
                Op::Find(x) => {
                    let found = t.find(&x);
                    prop_assert_eq!(found.current(), m.get(&x));
                    prop_assert_eq!(found.is_end(), !m.contains(&x));
                }
                Op::Take => {
                    let moved = t.take();
                    prop_assert_eq!(moved.len(), m.len());
                    prop_assert!(moved.iter().eq(m.iter()));
                    prop_assert!(t.is_empty());
                    prop_assert_eq!(t.node_capacity(), capacity);
                    m.clear();
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        t.check_invariants();
        prop_assert_eq!(t.first(), m.iter().next());
        prop_assert_eq!(t.last(), m.iter().next_back());
        let got: Vec<i16> = t.iter().copied().collect();
        let expected: Vec<i16> = m.iter().copied().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_cursor_walks_match_model(capacity in 1usize..=6, elems in elems_strategy()) {
        let mut t = BTree::new(capacity).unwrap();
        t.extend(elems.iter().copied());
        let m: BTreeSet<u8> = elems.iter().copied().collect();

        let (forward, backward) = walk(&t);
        prop_assert_eq!(&forward, &m.iter().copied().collect::<Vec<_>>());
        prop_assert_eq!(&backward, &m.iter().rev().copied().collect::<Vec<_>>());
        prop_assert!(t.iter().rev().eq(m.iter().rev()));

        // Every element steps to its neighbours in the model.
        for &x in m.iter() {
            let cursor = t.find(&x);
            prop_assert_eq!(cursor.peek_next(), m.range(x + 1..).next());
            prop_assert_eq!(cursor.peek_prev(), m.range(..x).next_back());
        }
    }

    #[test]
    fn prop_clone_is_independent(
        capacity in 1usize..=6,
        elems in elems_strategy(),
        extra in 64u8..,
    ) {
        let mut original = BTree::new(capacity).unwrap();
        original.extend(elems.iter().copied());
        let snapshot: Vec<u8> = original.iter().copied().collect();

        let mut copy = original.clone();
        copy.check_invariants();
        prop_assert_eq!(copy.to_string(), original.to_string());
        prop_assert!(copy == original);

        prop_assert!(copy.insert(extra).1);
        prop_assert!(!original.contains(&extra));
        prop_assert!(original.iter().copied().eq(snapshot.iter().copied()));

        original.clear();
        prop_assert_eq!(copy.len(), snapshot.len() + 1);
        copy.check_invariants();
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let elems = [1, 2, 3, 4, 5, 6];

    for capacity in 1..=3 {
        for_each_permutation(&elems, |perm| {
            let mut t = BTree::new(capacity).unwrap();
            for &x in perm.iter() {
                assert!(t.insert(x).1);
            }
            for &x in perm.iter() {
                assert!(!t.insert(x).1);
            }

            t.check_invariants();
            let (forward, backward) = walk(&t);
            assert_eq!(forward, elems);
            assert_eq!(backward, vec![6, 5, 4, 3, 2, 1]);
        });
    }
}
