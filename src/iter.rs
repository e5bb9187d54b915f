//! Traversals over a [`Tree`](crate::Tree). All of them keep an explicit stack of pending nodes
//! rather than recursing, so traversal depth never ties to call-stack depth.

use std::iter::FusedIterator;

use crate::node::{Arena, NodeId};

/// Ascending iterator over the values of a [`Tree`](crate::Tree). Created by
/// [`Tree::iter`](crate::Tree::iter).
pub struct Iter<'a, T> {
    arena: &'a Arena<T>,
    /// Nodes whose left subtree has been queued but whose own value hasn't been yielded.
    stack: Vec<NodeId>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(arena: &'a Arena<T>, root: Option<NodeId>) -> Self {
        let mut iter = Self {
            arena,
            stack: Vec::new(),
        };
        iter.push_left(root);
        iter
    }

    fn push_left(&mut self, mut cursor: Option<NodeId>) {
        while let Some(id) = cursor {
            self.stack.push(id);
            cursor = self.arena[id].left;
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let arena: &'a Arena<T> = self.arena;
        let node = &arena[id];
        self.push_left(node.right);
        Some(&node.value)
    }
}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            stack: self.stack.clone(),
        }
    }
}

/// Iterator visiting each node before its left subtree and then its right subtree. Created by
/// [`Tree::pre_order`](crate::Tree::pre_order).
pub struct PreOrder<'a, T> {
    arena: &'a Arena<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> PreOrder<'a, T> {
    pub(crate) fn new(arena: &'a Arena<T>, root: Option<NodeId>) -> Self {
        Self {
            arena,
            stack: root.into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for PreOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let arena: &'a Arena<T> = self.arena;
        let node = &arena[id];
        // Right goes first so the left subtree is popped first.
        self.stack.extend(node.right);
        self.stack.extend(node.left);
        Some(&node.value)
    }
}

impl<'a, T> FusedIterator for PreOrder<'a, T> {}

/// Owning ascending iterator. Created by `Tree::into_iter`.
pub struct IntoIter<T> {
    values: std::vec::IntoIter<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(mut arena: Arena<T>, root: Option<NodeId>) -> Self {
        let order: Vec<NodeId> = {
            let mut order = Vec::new();
            let mut stack = Vec::new();
            let mut cursor = root;
            loop {
                while let Some(id) = cursor {
                    stack.push(id);
                    cursor = arena[id].left;
                }
                let Some(id) = stack.pop() else {
                    break;
                };
                order.push(id);
                cursor = arena[id].right;
            }
            order
        };
        let values = order
            .into_iter()
            .map(|id| arena.free(id))
            .collect::<Vec<_>>();
        Self {
            values: values.into_iter(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.values.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.values.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}
