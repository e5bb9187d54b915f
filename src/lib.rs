//! This crate exposes a self-balancing Binary Search Tree (an AVL tree) that
//! stores a set of distinct, totally ordered values.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored values. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a value and
//! will sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for values in the tree takes `O(height)` (where `height` is the
//! longest path from the root `Node` to a leaf `Node`).
//!
//! ## AVL Tree
//!
//! An AVL tree additionally caches the height of every node and keeps the
//! heights of each node's two subtrees within one of each other. Every insert
//! and delete walks from the point of the edit back up to the root, refreshing
//! heights and rotating wherever a node has become too lopsided. This keeps the
//! height of the tree below `1.44 * lg(N + 2)`.
//!
//! Nodes are stored in an arena and refer to each other by index, so the
//! back-reference from a child to its parent never owns anything.
//!
//! # Examples
//!
//! ```
//! use avl::Tree;
//!
//! let mut tree: Tree<_> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
//!
//! assert!(tree.contains(&4));
//! assert_eq!(tree.minimum(), Some(&1));
//! assert_eq!(tree.maximum(), Some(&9));
//!
//! assert!(tree.delete(&4));
//! assert!(!tree.delete(&4));
//!
//! assert_eq!(tree.to_vec(), vec![1, 3, 5, 7, 8, 9]);
//! assert!(tree.validate());
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod iter;
pub mod node;
pub mod tree;


pub use error::Violation;
pub use node::{NodeId, NodeRef};
pub use tree::Tree;
