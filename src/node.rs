//! The node model. A [`Node`] is pure data: a value, links to at most two children, a
//! back-reference to its parent and a cached height. Nodes live in an [`Arena`] and refer to one
//! another by [`NodeId`], so a parent link never owns the node it points at.

use std::fmt;
use std::ops::{Index, IndexMut};

use slab::Slab;

/// Height of an absent subtree.
pub(crate) const EMPTY_HEIGHT: isize = -1;

/// The index of a node inside its tree's arena. Only meaningful for the tree that handed it out
/// and only until that node is deleted; the slot may then be handed to a later insert.
///
/// # Examples
///
/// ```
/// use avl::Tree;
///
/// let mut tree = Tree::new();
/// tree.insert(1);
/// let slot = tree.root().unwrap().id().index();
///
/// tree.delete(&1);
/// tree.insert(2);
/// assert_eq!(tree.root().unwrap().id().index(), slot);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The raw arena slot.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
    /// Longest path down to a leaf. A leaf has height 0.
    pub(crate) height: isize,
}

impl<T> Node<T> {
    fn leaf(value: T, parent: Option<NodeId>) -> Self {
        Self {
            value,
            left: None,
            right: None,
            parent,
            height: 0,
        }
    }
}

/// Slot storage for nodes, a newtype over [`Slab`] indexed by [`NodeId`] instead of a raw key.
/// Vacated slots are handed out again before the slab grows.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    nodes: Slab<Node<T>>,
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Self { nodes: Slab::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
        }
    }

    /// Number of slots the arena can hold before reallocating.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Stores a new leaf and returns its id.
    pub(crate) fn alloc(&mut self, value: T, parent: Option<NodeId>) -> NodeId {
        NodeId(self.nodes.insert(Node::leaf(value, parent)))
    }

    /// Vacates the slot and hands back the value that lived there. The caller must already have
    /// unlinked the node from the tree.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already vacant.
    pub(crate) fn free(&mut self, id: NodeId) -> T {
        self.nodes.remove(id.0).value
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Height of the subtree at `id`, or [`EMPTY_HEIGHT`] when there isn't one.
    pub(crate) fn height(&self, id: Option<NodeId>) -> isize {
        id.map_or(EMPTY_HEIGHT, |id| self[id].height)
    }

    /// `height(right) - height(left)`. See [the Wikipedia page][wiki] for more details.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
    pub(crate) fn balance_factor(&self, id: NodeId) -> isize {
        let node = &self[id];
        self.height(node.right) - self.height(node.left)
    }

    /// What the height of `id` should be given its children's cached heights.
    pub(crate) fn expected_height(&self, id: NodeId) -> isize {
        let node = &self[id];
        1 + self.height(node.left).max(self.height(node.right))
    }

    /// Adjusts the height of `id` to be the max of its children's heights + 1.
    pub(crate) fn fix_height(&mut self, id: NodeId) {
        self[id].height = self.expected_height(id);
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        self.get(id).expect("Node ids always point at live slots")
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.nodes
            .get_mut(id.0)
            .expect("Node ids always point at live slots")
    }
}

/// A read-only view of one node in a [`Tree`](crate::Tree).
///
/// # Examples
///
/// ```
/// use avl::Tree;
///
/// let tree: Tree<_> = [1, 2, 3].into_iter().collect();
/// let root = tree.root().unwrap();
///
/// assert_eq!(root.value(), &2);
/// assert_eq!(root.height(), 1);
/// assert_eq!(root.left().map(|n| *n.value()), Some(1));
/// assert_eq!(root.right().and_then(|n| n.parent()).map(|n| n.id()), Some(root.id()));
/// ```
pub struct NodeRef<'a, T> {
    arena: &'a Arena<T>,
    id: NodeId,
}

impl<'a, T> Clone for NodeRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<'a, T> Copy for NodeRef<'a, T> {}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn new(arena: &'a Arena<T>, id: NodeId) -> Self {
        Self { arena, id }
    }

    fn node(&self) -> &'a Node<T> {
        let arena: &'a Arena<T> = self.arena;
        &arena[self.id]
    }

    fn relative(&self, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| Self::new(self.arena, id))
    }

    /// The arena index of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The stored value.
    pub fn value(&self) -> &'a T {
        &self.node().value
    }

    /// The root of the left subtree, if any.
    pub fn left(&self) -> Option<Self> {
        self.relative(self.node().left)
    }

    /// The root of the right subtree, if any.
    pub fn right(&self) -> Option<Self> {
        self.relative(self.node().right)
    }

    /// The parent, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        self.relative(self.node().parent)
    }

    /// The cached height. A leaf has height 0.
    pub fn height(&self) -> isize {
        self.node().height
    }

    /// `height(right) - height(left)`, with an absent subtree counting as -1.
    pub fn balance_factor(&self) -> isize {
        self.arena.balance_factor(self.id)
    }
}

impl<'a, T> fmt::Debug for NodeRef<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("value", self.value())
            .field("height", &self.height())
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}
