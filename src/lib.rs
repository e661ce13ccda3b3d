// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A semi-dynamic range minimum query tree.
//!
//! An `RmqTree` is built once over a fixed set of keyed values. Afterwards it answers "what is
//! the smallest value among all keys in `[left, right]`?" and lowers the value of a single key,
//! both in `O(log n)` time. Keys can never be added or removed and the shape of the tree never
//! changes; only values do.
//!
//! Values are ordered by a custom comparator, so the same structure doubles as a range maximum
//! tree when given a reversed order.
//!
//! Construction takes `O(n log n)` time.
//!
//! # Examples
//!
//! ```
//! use semi_dynamic_rmq::RmqTree;
//!
//! let mut tree = RmqTree::new(vec![(1, 10), (2, 20), (3, 30), (4, 40)]).unwrap();
//! assert_eq!(tree.range_minimum(&2, &4), Ok(&20));
//!
//! tree.update(&3, 5).unwrap();
//! assert_eq!(tree.range_minimum(&2, &4), Ok(&5));
//! assert_eq!(tree.min(), &5);
//! ```

extern crate compare;
#[cfg(test)] extern crate rand;

mod builder;
mod error;
mod node;

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display};
use std::iter;
use std::slice;
use std::vec;

use compare::{Compare, Natural, natural};

use builder::Built;
use node::{nth, Arena, Kind, Node, NodeId};

pub use error::Error;

/// Returns the smaller of two values, preferring `a` on ties.
fn min_of<'a, V, C: Compare<V>>(cmp: &C, a: &'a V, b: &'a V) -> &'a V {
    if cmp.compares_le(a, b) { a } else { b }
}

/// Which end of a query range a root-to-leaf path leads to.
#[derive(Clone, Copy, Debug)]
enum Side {
    Left,
    Right,
}

/// A range minimum query tree over a fixed set of keys.
///
/// The tree is a perfectly balanced binary tree whose leaves hold the values in ascending key
/// order, and whose internal nodes hold the minimum of their two children. The key set and the
/// shape are fixed at construction.
///
/// Values only ever go down: `update` keeps the smaller of the stored and the given value.
///
/// The tree is not synchronized. Callers sharing one across threads must serialize all access to
/// it themselves.
#[derive(Clone)]
pub struct RmqTree<K, V, C: Compare<V> = Natural<V>> {
    // Sorted and distinct. The leaf for `keys[i]` is arena slot `i`.
    keys: Vec<K>,
    arena: Arena<V>,
    root: NodeId,
    cmp: C,
}

impl<K: Ord, V: Ord + Clone> RmqTree<K, V> {
    /// Builds a tree over the given key/value pairs, ordering values naturally.
    ///
    /// Fails with `Error::EmptyInput` if there are no pairs, and with `Error::DuplicateKey` if a
    /// key appears twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use semi_dynamic_rmq::{Error, RmqTree};
    ///
    /// let tree = RmqTree::new(vec![(3, 'c'), (1, 'a'), (2, 'b')]).unwrap();
    /// assert_eq!(tree.len(), 3);
    /// assert_eq!(tree.min(), &'a');
    ///
    /// assert_eq!(RmqTree::<u32, u32>::new(vec![]).err(), Some(Error::EmptyInput));
    /// ```
    pub fn new<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Result<RmqTree<K, V>, Error> {
        Self::with_comparator(pairs, natural())
    }
}

impl<K: Ord, V: Ord + Clone> TryFrom<BTreeMap<K, V>> for RmqTree<K, V> {
    type Error = Error;

    /// Builds a tree over the entries of `map`.
    ///
    /// Keys of a map are already distinct, so this only fails on an empty map.
    fn try_from(map: BTreeMap<K, V>) -> Result<RmqTree<K, V>, Error> {
        Self::new(map)
    }
}

impl<K: Ord, V: Clone, C: Compare<V>> RmqTree<K, V, C> {
    /// Builds a tree over the given key/value pairs, ordering values according to the given
    /// comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    /// use semi_dynamic_rmq::RmqTree;
    ///
    /// // Reversing the order turns range minimum into range maximum.
    /// let tree = RmqTree::with_comparator(vec![(1, 4), (2, 9), (3, 1)], natural().rev()).unwrap();
    /// assert_eq!(tree.range_minimum(&1, &3), Ok(&9));
    /// ```
    pub fn with_comparator<I>(pairs: I, cmp: C) -> Result<RmqTree<K, V, C>, Error>
        where I: IntoIterator<Item = (K, V)>
    {
        let Built { keys, arena, root } = builder::build(pairs.into_iter().collect(), &cmp)?;
        let tree = RmqTree { keys: keys, arena: arena, root: root, cmp: cmp };
        debug_assert!(tree.is_valid());
        Ok(tree)
    }

    /// Lowers the value of `key` to `value`, if `value` is smaller than the current one.
    ///
    /// This never raises a value: updating a key with something greater than what it holds leaves
    /// the tree untouched. Runs in `O(log n)` time.
    ///
    /// Fails with `Error::KeyNotFound`, without modifying anything, if `key` is not in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use semi_dynamic_rmq::RmqTree;
    ///
    /// let mut tree = RmqTree::new(vec![(1, 10), (2, 20)]).unwrap();
    /// tree.update(&2, 5).unwrap();
    /// assert_eq!(tree.get(&2), Some(&5));
    ///
    /// tree.update(&2, 50).unwrap();
    /// assert_eq!(tree.get(&2), Some(&5));
    /// ```
    pub fn update(&mut self, key: &K, value: V) -> Result<(), Error> {
        let leaf = self.leaf(key).ok_or(Error::KeyNotFound)?;

        let mut next = Some(leaf);
        while let Some(id) = next {
            let node = &mut self.arena[id];
            // A parent is never greater than its children, so once a node already holds
            // something no greater than `value`, so does every node above it.
            if self.cmp.compares_le(&node.value, &value) { break; }
            node.value = value.clone();
            next = node.parent;
        }

        debug_assert!(self.is_valid());
        Ok(())
    }
}

impl<K: Ord, V, C: Compare<V>> RmqTree<K, V, C> {
    /// Returns the smallest value among all keys in `[left, right]`, both ends inclusive.
    ///
    /// Runs in `O(log n)` time.
    ///
    /// Fails with `Error::KeyNotFound` if either key is not in the tree, and with
    /// `Error::InvalidRange` if `left` is greater than `right`.
    ///
    /// # Examples
    ///
    /// ```
    /// use semi_dynamic_rmq::{Error, RmqTree};
    ///
    /// let tree = RmqTree::new(vec![(1, 5), (2, 2), (3, 6), (4, 7)]).unwrap();
    /// assert_eq!(tree.range_minimum(&1, &3), Ok(&2));
    /// assert_eq!(tree.range_minimum(&3, &4), Ok(&6));
    /// assert_eq!(tree.range_minimum(&4, &4), Ok(&7));
    ///
    /// assert_eq!(tree.range_minimum(&3, &1), Err(Error::InvalidRange));
    /// assert_eq!(tree.range_minimum(&1, &9), Err(Error::KeyNotFound));
    /// ```
    pub fn range_minimum(&self, left: &K, right: &K) -> Result<&V, Error> {
        let (left_leaf, right_leaf) = match (self.leaf(left), self.leaf(right)) {
            (Some(l), Some(r)) => (l, r),
            _ => return Err(Error::KeyNotFound),
        };
        if left > right { return Err(Error::InvalidRange); }

        // Both ancestor chains end at the root. The split node is the deepest node they share;
        // cut it and everything above it off, leaving each leaf followed by the open path up to
        // the split node.
        let left_path: Vec<NodeId> = self.arena.ancestors(left_leaf).collect();
        let right_path: Vec<NodeId> = self.arena.ancestors(right_leaf).collect();
        let shared = left_path.iter().rev()
            .zip(right_path.iter().rev())
            .take_while(|&(l, r)| l == r)
            .count();
        let left_path = &left_path[..left_path.len() - shared];
        let right_path = &right_path[..right_path.len() - shared];

        // The range is exactly the two end leaves plus the subtrees hanging off either path on
        // the side facing into the range.
        let ends = min_of(&self.cmp, &self.arena[left_leaf].value, &self.arena[right_leaf].value);
        let min = self.inner_siblings(left_path, Side::Left)
            .chain(self.inner_siblings(right_path, Side::Right))
            .fold(ends, |min, id| min_of(&self.cmp, min, &self.arena[id].value));
        Ok(min)
    }

    /// Returns the current value of `key`, or `None` if it is not in the tree.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.leaf(key).map(|id| &self.arena[id].value)
    }

    /// Returns `true` if `key` is in the tree.
    pub fn contains_key(&self, key: &K) -> bool {
        self.leaf(key).is_some()
    }

    fn leaf(&self, key: &K) -> Option<NodeId> {
        self.keys.binary_search(key).ok().map(nth)
    }

    /// Walks `path` (a leaf followed by its ancestors, up to but excluding the split node) and
    /// yields the roots of the sibling subtrees lying between the leaf and the split node.
    ///
    /// On the left path those are right siblings of nodes entered from the left; on the right
    /// path, left siblings of nodes entered from the right. The leaf itself counts as a node on
    /// the path.
    fn inner_siblings<'a>(&'a self, path: &'a [NodeId], side: Side)
                          -> impl Iterator<Item = NodeId> + 'a {
        path.windows(2).filter_map(move |pair| {
            let (child, node) = (pair[0], pair[1]);
            match (self.arena[node].kind, side) {
                (Kind::Internal { left, right }, Side::Left) if left == child => Some(right),
                (Kind::Internal { left, right }, Side::Right) if right == child => Some(left),
                _ => None,
            }
        })
    }

    /// Checks if the tree is valid.
    ///
    /// The tree is valid if:
    ///
    /// 1. Its keys are sorted and distinct, AND
    /// 2. The root has no parent, AND
    /// 3. Each internal node's children point back to it, AND
    /// 4. Each internal node's value is equal to the smaller of its children's values
    fn is_valid(&self) -> bool {
        self.keys.windows(2).all(|w| w[0] < w[1]) &&               // 1
        self.arena[self.root].parent.is_none() &&                   // 2
        self.arena.iter().enumerate().all(|(i, node)| match node.kind {
            Kind::Leaf => true,
            Kind::Internal { left, right } => {
                let (l, r) = (&self.arena[left], &self.arena[right]);

                l.parent == Some(nth(i)) && r.parent == Some(nth(i)) && // 3
                self.cmp.compares_eq(&node.value, min_of(&self.cmp, &l.value, &r.value)) // 4
            }
        })
    }
}

impl<K, V, C: Compare<V>> RmqTree<K, V, C> {
    /// Returns the smallest value in the tree.
    ///
    /// This is the value at the root and takes `O(1)` time.
    pub fn min(&self) -> &V {
        &self.arena[self.root].value
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always returns `false`: a tree holds at least one key.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the number of edges on the longest path from the root to a leaf.
    ///
    /// This is `ceil(log2(len))`.
    pub fn height(&self) -> usize {
        builder::height(self.len())
    }

    /// Returns an iterator over the keys in ascending order.
    pub fn keys(&self) -> slice::Iter<K> {
        self.keys.iter()
    }

    /// Returns an iterator over the keys and their current values in ascending key order.
    pub fn iter(&self) -> Iter<K, V> {
        Iter(self.keys.iter().zip(self.arena.leaves(self.keys.len())))
    }
}

impl<K: Debug, V: Debug, C: Compare<V>> Debug for RmqTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self).finish()
    }
}

/// Renders the tree level by level, one line per level, starting at the root.
///
/// ```
/// use semi_dynamic_rmq::RmqTree;
///
/// let tree = RmqTree::new(vec![(1, 1), (2, 2), (3, 3)]).unwrap();
/// assert_eq!(tree.to_string(), "\
/// [INTERNAL: value = 1]
/// [LEAF: value = 1] [INTERNAL: value = 2]
/// [LEAF: value = 2] [LEAF: value = 3]
/// ");
/// ```
impl<K, V: Display, C: Compare<V>> Display for RmqTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut level = vec![self.root];
        while !level.is_empty() {
            let mut next = Vec::with_capacity(level.len() * 2);
            for (i, &id) in level.iter().enumerate() {
                if i > 0 { f.write_str(" ")?; }
                let node = &self.arena[id];
                match node.kind {
                    Kind::Leaf => write!(f, "[LEAF: value = {}]", node.value)?,
                    Kind::Internal { left, right } => {
                        write!(f, "[INTERNAL: value = {}]", node.value)?;
                        next.push(left);
                        next.push(right);
                    }
                }
            }
            writeln!(f)?;
            level = next;
        }
        Ok(())
    }
}

/// An iterator over the keys of an `RmqTree` and their values, in ascending key order.
///
/// Acquire through [`RmqTree::iter`](struct.RmqTree.html#method.iter).
pub struct Iter<'a, K: 'a, V: 'a>(iter::Zip<slice::Iter<'a, K>, slice::Iter<'a, Node<V>>>);

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Iter<'a, K, V> { Iter(self.0.clone()) }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline] fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.0.next().map(|(k, node)| (k, &node.value))
    }
    #[inline] fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        self.0.next_back().map(|(k, node)| (k, &node.value))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// A consuming iterator over the keys of an `RmqTree` and their values, in ascending key order.
///
/// Acquire through [`IntoIterator::into_iter`](
/// https://doc.rust-lang.org/stable/std/iter/trait.IntoIterator.html#tymethod.into_iter).
pub struct IntoIter<K, V>(iter::Zip<vec::IntoIter<K>, vec::IntoIter<Node<V>>>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    fn next(&mut self) -> Option<(K, V)> { self.0.next().map(|(k, node)| (k, node.value)) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.0.next_back().map(|(k, node)| (k, node.value))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V, C: Compare<V>> IntoIterator for RmqTree<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> IntoIter<K, V> {
        // Leaves come first in the arena; drop the internal nodes behind them.
        let mut nodes = self.arena.into_vec();
        nodes.truncate(self.keys.len());
        IntoIter(self.keys.into_iter().zip(nodes))
    }
}

impl<'a, K, V, C: Compare<V>> IntoIterator for &'a RmqTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}
