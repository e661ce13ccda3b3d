// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// The tree is built bottom-up over the key/value pairs sorted by key. Leaves are allocated
// first, so the leaf for the `i`-th smallest key is arena slot `i` and the sorted key vector
// doubles as the key -> leaf index. Internal nodes follow in post-order. For 5 keys:
//
//              (8)
//            /     \
//         (5)       (7)
//        /   \     /   \
//      [0]   [1] [2]   (6)
//                     /   \
//                   [3]   [4]
//
// Splits are by position, never by value, so the shape depends only on the number of keys.

use compare::Compare;

use crate::error::Error;
use crate::min_of;
use crate::node::{nth, Arena, Node, NodeId};

pub(crate) struct Built<K, V> {
    pub(crate) keys: Vec<K>,
    pub(crate) arena: Arena<V>,
    pub(crate) root: NodeId,
}

/// Builds the tree over `pairs`.
///
/// Fails if `pairs` is empty or contains the same key twice.
pub(crate) fn build<K, V, C>(mut pairs: Vec<(K, V)>, cmp: &C) -> Result<Built<K, V>, Error>
    where K: Ord, V: Clone, C: Compare<V>
{
    if pairs.is_empty() { return Err(Error::EmptyInput); }

    pairs.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    if pairs.windows(2).any(|w| w[0].0 == w[1].0) { return Err(Error::DuplicateKey); }

    let len = pairs.len();
    let mut arena = Arena::with_capacity(2 * len - 1);
    let mut keys = Vec::with_capacity(len);
    for (key, value) in pairs {
        keys.push(key);
        arena.alloc(Node::leaf(value));
    }

    let root = build_range(&mut arena, 0, len, cmp);
    debug_assert_eq!(arena.len(), 2 * len - 1);
    Ok(Built { keys: keys, arena: arena, root: root })
}

/// Builds the subtree over the leaves in slots `start..end` and returns its root.
fn build_range<V: Clone, C: Compare<V>>(arena: &mut Arena<V>, start: usize, end: usize,
                                        cmp: &C) -> NodeId {
    debug_assert!(start < end);
    if end - start == 1 { return nth(start); }

    // the midpoint goes to the right half
    let mid = start + (end - start) / 2;
    let left = build_range(arena, start, mid, cmp);
    let right = build_range(arena, mid, end, cmp);

    let value = min_of(cmp, &arena[left].value, &arena[right].value).clone();
    let id = arena.alloc(Node::internal(value, left, right));
    arena.set_parent(left, id);
    arena.set_parent(right, id);
    id
}

/// Height of the tree built over `len` leaves: `ceil(log2(len))`.
pub(crate) fn height(len: usize) -> usize {
    debug_assert!(len > 0);
    len.next_power_of_two().trailing_zeros() as usize
}

#[cfg(test)]
mod test {
    use compare::natural;
    use rand::{thread_rng, Rng};
    use rand::seq::SliceRandom;

    use crate::error::Error;
    use crate::node::{nth, Arena, Kind, NodeId};
    use super::{build, height, Built};

    fn build_seq(len: i64) -> Built<i64, i64> {
        build((1..len + 1).map(|i| (i, i)).collect(), &natural()).unwrap()
    }

    fn children(arena: &Arena<i64>, id: NodeId) -> (NodeId, NodeId) {
        match arena[id].kind {
            Kind::Internal { left, right } => (left, right),
            Kind::Leaf => panic!("expected an internal node"),
        }
    }

    fn in_order(arena: &Arena<i64>, id: NodeId, out: &mut Vec<NodeId>) {
        match arena[id].kind {
            Kind::Leaf => out.push(id),
            Kind::Internal { left, right } => {
                in_order(arena, left, out);
                in_order(arena, right, out);
            }
        }
    }

    // Structural description independent of values: `L` for a leaf, `(left right)` otherwise.
    fn shape(arena: &Arena<i64>, id: NodeId) -> String {
        match arena[id].kind {
            Kind::Leaf => "L".to_string(),
            Kind::Internal { left, right } =>
                format!("({} {})", shape(arena, left), shape(arena, right)),
        }
    }

    #[test]
    fn test_empty() {
        let res = build::<i32, i32, _>(vec![], &natural());
        assert_eq!(res.err(), Some(Error::EmptyInput));
    }

    #[test]
    fn test_duplicate_keys() {
        let res = build(vec![(1, 10), (2, 20), (1, 30)], &natural());
        assert_eq!(res.err(), Some(Error::DuplicateKey));
    }

    #[test]
    fn test_single_leaf() {
        let built = build(vec![(7, 70)], &natural()).unwrap();
        assert_eq!(built.root, nth(0));
        assert_eq!(built.arena[built.root].kind, Kind::Leaf);
        assert_eq!(built.arena[built.root].parent, None);
        assert_eq!(built.keys, vec![7]);
    }

    #[test]
    fn test_shape_of_three() {
        let Built { arena, root, .. } = build_seq(3);
        let (leaf1, middle) = children(&arena, root);
        let (leaf2, leaf3) = children(&arena, middle);

        assert_eq!(arena[root].value, 1);
        assert_eq!(arena[leaf1].kind, Kind::Leaf);
        assert_eq!(arena[leaf1].value, 1);
        assert_eq!(arena[middle].value, 2);
        assert_eq!(arena[leaf2].value, 2);
        assert_eq!(arena[leaf3].value, 3);
        assert_eq!(shape(&arena, root), "(L (L L))");
    }

    #[test]
    fn test_shape_of_four() {
        let Built { arena, root, .. } = build_seq(4);
        let (left, right) = children(&arena, root);
        let (leaf1, leaf2) = children(&arena, left);
        let (leaf3, leaf4) = children(&arena, right);

        assert_eq!(arena[root].value, 1);
        assert_eq!(arena[left].value, 1);
        assert_eq!(arena[right].value, 3);
        assert_eq!(arena[leaf1].value, 1);
        assert_eq!(arena[leaf2].value, 2);
        assert_eq!(arena[leaf3].value, 3);
        assert_eq!(arena[leaf4].value, 4);

        assert_eq!(arena[left].parent, Some(root));
        assert_eq!(arena[leaf4].parent, Some(right));
        assert_eq!(arena[root].parent, None);
    }

    #[test]
    fn test_leaves_in_key_order() {
        let pairs = vec![(30, 3), (10, 1), (50, 5), (20, 2), (40, 4)];
        let Built { keys, arena, root } = build(pairs, &natural()).unwrap();
        assert_eq!(keys, vec![10, 20, 30, 40, 50]);

        let mut leaves = vec![];
        in_order(&arena, root, &mut leaves);
        assert_eq!(leaves, (0..5).map(nth).collect::<Vec<_>>());
        let values: Vec<i64> = leaves.iter().map(|&id| arena[id].value).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_height() {
        assert_eq!(height(1), 0);
        assert_eq!(height(2), 1);
        assert_eq!(height(3), 2);
        assert_eq!(height(4), 2);
        assert_eq!(height(5), 3);
        assert_eq!(height(1024), 10);
        assert_eq!(height(1025), 11);

        for len in 1..130 {
            let Built { arena, .. } = build_seq(len);
            let deepest = (0..len as usize)
                .map(|i| arena.ancestors(nth(i)).count() - 1)
                .max()
                .unwrap();
            assert_eq!(deepest, height(len as usize));
        }
    }

    #[test]
    fn fuzz_shape_independent_of_input_order() {
        let mut rng = thread_rng();
        for _ in 0..50 {
            let len = rng.gen_range(1..200);
            let mut pairs: Vec<(u32, i64)> = (0..len).map(|k| (k * 3, rng.gen())).collect();
            let sorted = build(pairs.clone(), &natural()).unwrap();
            pairs.shuffle(&mut rng);
            let shuffled = build(pairs, &natural()).unwrap();

            assert_eq!(sorted.keys, shuffled.keys);
            assert_eq!(sorted.root, shuffled.root);
            let a: Vec<_> = sorted.arena.iter().map(|n| (n.value, n.parent, n.kind)).collect();
            let b: Vec<_> = shuffled.arena.iter().map(|n| (n.value, n.parent, n.kind)).collect();
            assert_eq!(a, b);
        }
    }
}
