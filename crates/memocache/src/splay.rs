//! Splay tree used as an ordered, unbounded memo store
//!
//! Every `search` and `insert` splays the touched key to the root, so
//! lookups restructure the tree and need `&mut self`. Children are owned
//! boxes; rotations move subtrees between parents and never share nodes.
//!
//! The splay is recursive, with depth proportional to the search path.
//! That is fine for memo keys in the hundreds; a much larger key space
//! would want an explicit-stack splay.

use std::cmp::Ordering;

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
        })
    }
}

/// Self-adjusting binary search tree
pub struct SplayTree<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K: Ord, V> SplayTree<K, V> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Splay `key` to the root and return its value if present
    ///
    /// On a miss the last node on the search path becomes the root.
    pub fn search(&mut self, key: &K) -> Option<&V> {
        self.root = splay(self.root.take(), key);
        self.root
            .as_deref()
            .filter(|root| root.key == *key)
            .map(|root| &root.value)
    }

    /// Insert `key` as the new root
    ///
    /// An existing key keeps its original value: the first write wins.
    pub fn insert(&mut self, key: K, value: V) {
        let Some(mut root) = splay(self.root.take(), &key) else {
            self.root = Some(Node::new(key, value));
            self.len += 1;
            return;
        };

        let mut node = Node::new(key, value);
        match node.key.cmp(&root.key) {
            Ordering::Equal => {
                self.root = Some(root);
                return;
            }
            Ordering::Less => {
                node.left = root.left.take();
                node.right = Some(root);
            }
            Ordering::Greater => {
                node.right = root.right.take();
                node.left = Some(root);
            }
        }
        self.root = Some(node);
        self.len += 1;
    }

    /// Key currently at the root
    pub fn root_key(&self) -> Option<&K> {
        self.root.as_deref().map(|root| &root.key)
    }

    /// Number of keys stored
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// In-order iterator; does not splay
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }
}

impl<K, V> SplayTree<K, V> {
    /// Remove every key
    ///
    /// Sequential inserts build a spine as long as the tree, so nodes are
    /// freed from an explicit stack rather than by nested `Box` drops.
    pub fn clear(&mut self) {
        let mut pending: Vec<Box<Node<K, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
        self.len = 0;
    }
}

impl<K: Ord, V> Default for SplayTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for SplayTree<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// In-order iterator over a [`SplayTree`]
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn push_left(&mut self, mut link: Option<&'a Node<K, V>>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some((&node.key, &node.value))
    }
}

/// Bring `key`, or the last node on its search path, to the top of `link`
fn splay<K: Ord, V>(link: Link<K, V>, key: &K) -> Link<K, V> {
    let mut root = link?;

    match key.cmp(&root.key) {
        Ordering::Equal => Some(root),
        Ordering::Less => {
            let Some(mut left) = root.left.take() else {
                return Some(root);
            };
            match key.cmp(&left.key) {
                // zig-zig
                Ordering::Less => {
                    left.left = splay(left.left.take(), key);
                    root.left = Some(left);
                    root = rotate_right(root);
                }
                // zig-zag
                Ordering::Greater => {
                    left.right = splay(left.right.take(), key);
                    if left.right.is_some() {
                        left = rotate_left(left);
                    }
                    root.left = Some(left);
                }
                Ordering::Equal => root.left = Some(left),
            }
            Some(if root.left.is_some() {
                rotate_right(root)
            } else {
                root
            })
        }
        Ordering::Greater => {
            let Some(mut right) = root.right.take() else {
                return Some(root);
            };
            match key.cmp(&right.key) {
                Ordering::Greater => {
                    right.right = splay(right.right.take(), key);
                    root.right = Some(right);
                    root = rotate_left(root);
                }
                Ordering::Less => {
                    right.left = splay(right.left.take(), key);
                    if right.left.is_some() {
                        right = rotate_right(right);
                    }
                    root.right = Some(right);
                }
                Ordering::Equal => root.right = Some(right),
            }
            Some(if root.right.is_some() {
                rotate_left(root)
            } else {
                root
            })
        }
    }
}

/// Promote the left child; a node without one is returned unchanged
fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    match node.left.take() {
        Some(mut new_root) => {
            node.left = new_root.right.take();
            new_root.right = Some(node);
            new_root
        }
        None => node,
    }
}

/// Promote the right child; a node without one is returned unchanged
fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    match node.right.take() {
        Some(mut new_root) => {
            node.right = new_root.left.take();
            new_root.left = Some(node);
            new_root
        }
        None => node,
    }
}
