//! The balancing engine. A [`Tree`] owns every node through its arena and keeps a single root
//! reference. Mutations descend to the point of the edit, make a local structural change and then
//! walk back to the root refreshing heights and rotating where needed.
//!
//! # Examples
//!
//! ```
//! use avl::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(&1));
//! assert_eq!(tree.minimum(), None);
//!
//! assert!(tree.insert(1));
//! assert!(tree.contains(&1));
//!
//! // Inserting the same value again changes nothing.
//! assert!(!tree.insert(1));
//! assert_eq!(tree.len(), 1);
//!
//! // Deleting reports whether the value was there.
//! assert!(tree.delete(&1));
//! assert!(!tree.delete(&1));
//! assert!(tree.is_empty());
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::error::Violation;
use crate::iter::{IntoIter, Iter, PreOrder};
use crate::node::{Arena, NodeId, NodeRef};

/// A self-balancing Binary Search Tree (specifically, an AVL tree) holding a set of distinct
/// values.
#[derive(Clone)]
pub struct Tree<T> {
    nodes: Arena<T>,
    root: Option<NodeId>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Generate a new, empty `Tree` with room for `capacity` nodes before the arena reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// How many nodes the tree can hold before its arena reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let tree = Tree::<u8>::with_capacity(16);
    /// assert!(tree.capacity() >= 16);
    /// ```
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Whether the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of stored values. The size isn't cached so this walks the whole tree.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// The height of the root, or -1 for an empty tree. A single node has height 0.
    pub fn height(&self) -> isize {
        self.nodes.height(self.root)
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// A read-only view of the root node.
    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        self.root.map(|id| NodeRef::new(&self.nodes, id))
    }

    /// The smallest stored value.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let tree: Tree<_> = [8, 10, -4, 5, -1].into_iter().collect();
    /// assert_eq!(tree.minimum(), Some(&-4));
    /// assert_eq!(Tree::<i32>::new().minimum(), None);
    /// ```
    pub fn minimum(&self) -> Option<&T> {
        let mut id = self.root?;
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        Some(&self.nodes[id].value)
    }

    /// The largest stored value.
    pub fn maximum(&self) -> Option<&T> {
        let mut id = self.root?;
        while let Some(right) = self.nodes[id].right {
            id = right;
        }
        Some(&self.nodes[id].value)
    }

    /// Iterates the stored values in ascending order. Every call starts a fresh traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let tree: Tree<_> = [10, 20, 5, 15, 17, 7, 12].into_iter().collect();
    /// let values: Vec<_> = tree.iter().copied().collect();
    ///
    /// assert_eq!(values, [5, 7, 10, 12, 15, 17, 20]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.root)
    }

    /// Iterates the stored values visiting each node before its left and then its right subtree.
    pub fn pre_order(&self) -> PreOrder<'_, T> {
        PreOrder::new(&self.nodes, self.root)
    }

    /// The stored values in ascending order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Checks that every reachable node caches the right height, is within one level of balance
    /// and is linked from the parent it points at. Nodes without a parent must be the root.
    ///
    /// This is a diagnostic for tests; it says nothing about ordering (see
    /// [`is_ordered`](Self::is_ordered)).
    pub fn validate(&self) -> bool
    where
        T: Ord,
    {
        self.check_structure().is_ok()
    }

    /// Checks that every value lies strictly between the values of the ancestors that bound it.
    pub fn is_ordered(&self) -> bool
    where
        T: Ord,
    {
        self.check_order().is_ok()
    }

    /// Runs both [`validate`](Self::validate) and [`is_ordered`](Self::is_ordered), returning the
    /// first problem found.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let tree: Tree<_> = (0..100).collect();
    /// assert_eq!(tree.check(), Ok(()));
    /// ```
    pub fn check(&self) -> Result<(), Violation>
    where
        T: Ord,
    {
        self.check_structure()?;
        self.check_order()
    }

    fn check_structure(&self) -> Result<(), Violation>
    where
        T: Ord,
    {
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];

            let expected = self.nodes.expected_height(id);
            if node.height != expected {
                return Err(Violation::Height {
                    node: id,
                    cached: node.height,
                    expected,
                });
            }

            let factor = self.nodes.balance_factor(id);
            if factor.abs() > 1 {
                return Err(Violation::Balance { node: id, factor });
            }

            match node.parent {
                Some(parent) if self.root == Some(id) => {
                    return Err(Violation::RootHasParent { node: id, parent });
                }
                Some(parent) => {
                    let parent_node = &self.nodes[parent];
                    let slot = if node.value < parent_node.value {
                        parent_node.left
                    } else {
                        parent_node.right
                    };
                    if slot != Some(id) {
                        return Err(Violation::ParentLink { node: id, parent });
                    }
                }
                None if self.root != Some(id) => {
                    return Err(Violation::OrphanNode { node: id });
                }
                None => {}
            }

            stack.extend(node.right);
            stack.extend(node.left);
        }
        Ok(())
    }

    fn check_order(&self) -> Result<(), Violation>
    where
        T: Ord,
    {
        // Each entry carries the exclusive bounds its subtree must fall between.
        let mut stack: Vec<(NodeId, Option<&T>, Option<&T>)> =
            self.root.map(|id| (id, None, None)).into_iter().collect();
        while let Some((id, lower, upper)) = stack.pop() {
            let node = &self.nodes[id];
            let above_lower = lower.map_or(true, |lower| *lower < node.value);
            let below_upper = upper.map_or(true, |upper| node.value < *upper);
            if !(above_lower && below_upper) {
                return Err(Violation::Ordering { node: id });
            }
            if let Some(right) = node.right {
                stack.push((right, Some(&node.value), upper));
            }
            if let Some(left) = node.left {
                stack.push((left, lower, Some(&node.value)));
            }
        }
        Ok(())
    }
}

impl<T> Tree<T>
where
    T: Ord,
{
    /// Whether `value` is stored in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let tree: Tree<_> = [10, 5, 15].into_iter().collect();
    ///
    /// assert!(tree.contains(&15));
    /// assert!(!tree.contains(&-10));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Inserts `value` and rebalances. Returns `false` without touching the tree if an equal
    /// value is already stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for x in [1, 2, 3] {
    ///     tree.insert(x);
    /// }
    ///
    /// // Ascending inserts get rotated into a balanced shape.
    /// assert_eq!(tree.to_string(), "AVL pre-order { 2, 1, 3 }");
    /// assert!(!tree.insert(2));
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let mut parent = None;
        let mut goes_left = false;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            goes_left = match value.cmp(&node.value) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => return false,
            };
            parent = Some(id);
            cursor = if goes_left { node.left } else { node.right };
        }

        let leaf = self.nodes.alloc(value, parent);
        match parent {
            None => self.root = Some(leaf),
            Some(parent) if goes_left => self.nodes[parent].left = Some(leaf),
            Some(parent) => self.nodes[parent].right = Some(leaf),
        }

        if cfg!(debug_assertions) {
            if let Some(parent) = parent {
                let parent = &self.nodes[parent];
                let leaf = &self.nodes[leaf];
                assert_eq!(goes_left, leaf.value < parent.value);
            }
        }

        self.fixup(parent);
        true
    }

    /// Deletes `value` from the tree. Returns `false` without touching the tree if it isn't
    /// stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree: Tree<_> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
    /// for x in [5, 3, 8, 1, 4, 7, 9] {
    ///     assert!(tree.delete(&x));
    /// }
    ///
    /// assert!(tree.is_empty());
    /// ```
    pub fn delete(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Deletes `value` from the tree and returns the stored value that compared equal to it.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let target = self.find(value)?;
        let start = self.unlink(target);
        let removed = self.nodes.free(target);
        self.fixup(start);
        Some(removed)
    }

    fn find(&self, value: &T) -> Option<NodeId> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            cursor = match value.cmp(&node.value) {
                Ordering::Less => node.left,
                Ordering::Equal => return Some(id),
                Ordering::Greater => node.right,
            };
        }
        None
    }
}

impl<T> Tree<T> {
    /// Detaches `target` from the tree, splicing its children (or its inorder successor) into its
    /// place. Returns the lowest node whose subtree changed, which is where the fixup walk starts.
    ///
    /// ```text
    ///  no children         one child          two children
    ///
    ///     p                 p        p           p                p
    ///     |                 |        |           |                |
    ///   target    ->      target ->  c         target     ->      s
    ///                       |                  /    \            /  \
    ///                       c                 l      r          l    r
    ///                                               /               /
    ///                                             ...             ...
    ///                                             /               /
    ///                                            s               s.right
    ///                                             \
    ///                                             s.right
    /// ```
    fn unlink(&mut self, target: NodeId) -> Option<NodeId> {
        let node = &self.nodes[target];
        let (parent, left, right) = (node.parent, node.left, node.right);
        match (left, right) {
            (None, None) => {
                self.replace_child(parent, target, None);
                parent
            }
            (Some(child), None) | (None, Some(child)) => {
                self.replace_child(parent, target, Some(child));
                parent
            }
            (Some(left), Some(right)) => {
                let mut successor = right;
                let mut successor_parent = target;
                while let Some(next) = self.nodes[successor].left {
                    successor_parent = successor;
                    successor = next;
                }

                let start = if successor == right {
                    // The successor keeps its right subtree and just moves up a level.
                    successor
                } else {
                    let successor_right = self.nodes[successor].right;
                    self.replace_child(Some(successor_parent), successor, successor_right);
                    self.nodes[successor].right = Some(right);
                    self.nodes[right].parent = Some(successor);
                    successor_parent
                };

                self.nodes[successor].left = Some(left);
                self.nodes[left].parent = Some(successor);
                self.replace_child(parent, target, Some(successor));
                Some(start)
            }
        }
    }

    /// Points whichever slot of `parent` holds `old` (the root slot if there is no parent) at
    /// `new`, and makes `parent` the parent of `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent = &mut self.nodes[parent];
                if parent.left == Some(old) {
                    parent.left = new;
                } else {
                    debug_assert_eq!(parent.right, Some(old));
                    parent.right = new;
                }
            }
        }
        if let Some(new) = new {
            self.nodes[new].parent = parent;
        }
    }

    /// Walks from `start` up to the root, rebalancing every node on the way. This can't stop at
    /// the first rotation: ancestors above it still need their heights refreshed, and a delete can
    /// shrink several levels at once.
    fn fixup(&mut self, start: Option<NodeId>) {
        let mut cursor = start;
        while let Some(id) = cursor {
            let subtree_root = self.rebalance(id);
            cursor = self.nodes[subtree_root].parent;
        }
    }

    /// Refreshes the height of `id` and rotates if it's more than one level out of balance.
    /// Returns whichever node now roots the subtree `id` used to root. See
    /// <https://en.wikipedia.org/wiki/AVL_tree#Rebalancing> for terminology.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        self.nodes.fix_height(id);

        let subtree_root = match self.nodes.balance_factor(id) {
            factor if factor < -1 => {
                let left = self.nodes[id].left.expect("Left heavy => left child");
                if self.nodes.balance_factor(left) > 0 {
                    self.rotate_left(left);
                }
                self.rotate_right(id)
            }
            factor if factor > 1 => {
                let right = self.nodes[id].right.expect("Right heavy => right child");
                if self.nodes.balance_factor(right) < 0 {
                    self.rotate_right(right);
                }
                self.rotate_left(id)
            }
            _ => id,
        };

        if cfg!(debug_assertions) {
            assert_eq!(
                self.nodes[subtree_root].height,
                self.nodes.expected_height(subtree_root)
            );
            assert!(self.nodes.balance_factor(subtree_root).abs() <= 1);
        }
        subtree_root
    }

    /// Rotate `id` to the left. This moves the right child up vertically and `id` down
    /// vertically. Used to rebalance the tree when the right child is too tall. As such, it must
    /// only be called when there _is_ a right child.
    ///
    /// ## Panics
    ///
    /// When called on a node without a right child.
    ///
    /// # Diagram
    ///
    /// ```text
    ///  Option<parent>              Option<parent>
    ///      |                           |
    ///   old_root (i.e. "id")        new_root
    ///    /     \                    /     \
    ///   x    new_root  rotate ->  old_root  z
    ///         /  \                 /  \
    ///        y    z               x    y
    /// ```
    fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let new_root = self.nodes[id].right.expect("Rotate left => right child");
        let parent = self.nodes[id].parent;

        let inner = self.nodes[new_root].left;
        self.nodes[id].right = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(id);
        }

        self.replace_child(parent, id, Some(new_root));
        self.nodes[new_root].left = Some(id);
        self.nodes[id].parent = Some(new_root);

        // The old root is now below the new one so its height has to be refreshed first.
        self.nodes.fix_height(id);
        self.nodes.fix_height(new_root);
        new_root
    }

    /// Rotate `id` to the right. The mirror image of [`rotate_left`](Self::rotate_left).
    ///
    /// ## Panics
    ///
    /// When called on a node without a left child.
    ///
    /// # Diagram
    ///
    /// ```text
    ///    Option<parent>            Option<parent>
    ///        |                         |
    ///   old_root (i.e. "id")        new_root
    ///    /     \                    /     \
    /// new_root  z     rotate ->    x    old_root
    ///  / \                               /  \
    /// x   y                             y    z
    /// ```
    fn rotate_right(&mut self, id: NodeId) -> NodeId {
        let new_root = self.nodes[id].left.expect("Rotate right => left child");
        let parent = self.nodes[id].parent;

        let inner = self.nodes[new_root].right;
        self.nodes[id].left = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(id);
        }

        self.replace_child(parent, id, Some(new_root));
        self.nodes[new_root].right = Some(id);
        self.nodes[id].parent = Some(new_root);

        self.nodes.fix_height(id);
        self.nodes.fix_height(new_root);
        new_root
    }
}

impl<T> fmt::Display for Tree<T>
where
    T: fmt::Display,
{
    /// Renders the values in pre-order, e.g. `AVL pre-order { 2, 1, 3 }`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AVL pre-order {{ ")?;
        for (i, value) in self.pre_order().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, " }}")
    }
}

impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> PartialEq for Tree<T>
where
    T: PartialEq,
{
    /// Two trees are equal when they hold the same values, whatever their shapes.
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T> Eq for Tree<T> where T: Eq {}

impl<T> FromIterator<T> for Tree<T>
where
    T: Ord,
{
    /// Inserts each value in turn. Duplicates are silently dropped.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T, const N: usize> From<[T; N]> for Tree<T>
where
    T: Ord,
{
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T> Extend<T> for Tree<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for Tree<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.nodes, self.root)
    }
}
