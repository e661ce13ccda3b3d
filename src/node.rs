// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Node storage for the RMQ tree.
//!
//! Nodes live in a flat arena and refer to each other by `NodeId`. Ownership flows from the
//! arena alone; the parent link is just an index used for upward walks.

use std::iter;
use std::ops::{Index, IndexMut};
use std::slice;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Kind {
    Leaf,
    Internal { left: NodeId, right: NodeId },
}

#[derive(Clone, Debug)]
pub(crate) struct Node<V> {
    pub(crate) value: V,
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: Kind,
}

impl<V> Node<V> {
    pub(crate) fn leaf(value: V) -> Node<V> {
        Node { value: value, parent: None, kind: Kind::Leaf }
    }

    pub(crate) fn internal(value: V, left: NodeId, right: NodeId) -> Node<V> {
        Node { value: value, parent: None, kind: Kind::Internal { left: left, right: right } }
    }
}

#[derive(Clone)]
pub(crate) struct Arena<V> {
    nodes: Vec<Node<V>>,
}

impl<V> Arena<V> {
    pub(crate) fn with_capacity(capacity: usize) -> Arena<V> {
        Arena { nodes: Vec::with_capacity(capacity) }
    }

    pub(crate) fn alloc(&mut self, node: Node<V>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn iter(&self) -> slice::Iter<Node<V>> {
        self.nodes.iter()
    }

    /// The first `count` nodes, which are the leaves in key order.
    pub(crate) fn leaves(&self, count: usize) -> slice::Iter<Node<V>> {
        self.nodes[..count].iter()
    }

    pub(crate) fn into_vec(self) -> Vec<Node<V>> {
        self.nodes
    }

    /// Yields `id` itself, then each of its ancestors up to and including the root.
    pub(crate) fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(Some(id), move |&node| self[node].parent)
    }

    /// Links `child` to `parent`. Each node gets its parent exactly once.
    pub(crate) fn set_parent(&mut self, child: NodeId, parent: NodeId) {
        debug_assert!(self[child].parent.is_none());
        self[child].parent = Some(parent);
    }
}

impl<V> Index<NodeId> for Arena<V> {
    type Output = Node<V>;

    fn index(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id.0]
    }
}

impl<V> IndexMut<NodeId> for Arena<V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.nodes[id.0]
    }
}

/// The id of the `index`-th allocated node.
pub(crate) fn nth(index: usize) -> NodeId { NodeId(index) }
