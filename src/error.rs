//! Invariant violations reported by [`Tree::check`](crate::Tree::check).

use thiserror::Error;

use crate::node::NodeId;

/// The first inconsistency found while auditing a tree. A tree built only through the public
/// API never produces one of these; they exist to make test failures readable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The cached height disagrees with the heights of the node's children.
    #[error("node {node} caches height {cached} but its children imply {expected}")]
    Height {
        /// The offending node.
        node: NodeId,
        /// The height stored on the node.
        cached: isize,
        /// `1 + max(height(left), height(right))`.
        expected: isize,
    },
    /// The heights of the node's subtrees differ by more than one.
    #[error("node {node} has balance factor {factor}")]
    Balance {
        /// The offending node.
        node: NodeId,
        /// `height(right) - height(left)`.
        factor: isize,
    },
    /// The node points at a parent whose matching child slot doesn't point back.
    #[error("node {node} names {parent} as its parent but is not linked from it")]
    ParentLink {
        /// The offending node.
        node: NodeId,
        /// The parent it claims.
        parent: NodeId,
    },
    /// A node without a parent that isn't the root.
    #[error("node {node} has no parent but is not the root")]
    OrphanNode {
        /// The offending node.
        node: NodeId,
    },
    /// The root claims to have a parent.
    #[error("root {node} has parent {parent}")]
    RootHasParent {
        /// The root.
        node: NodeId,
        /// The parent it claims.
        parent: NodeId,
    },
    /// The node's value falls outside the range allowed by its ancestors.
    #[error("node {node} is out of order with its ancestors")]
    Ordering {
        /// The offending node.
        node: NodeId,
    },
}
