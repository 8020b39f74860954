//! Order-statistics tree for windowed character matching
//!
//! A cartesian tree (treap without randomness) holding the characters of one
//! string that are still open for matching. Nodes are ordered as a binary
//! search tree by character and as a min-heap by position, so the root is
//! always the earliest open position.
//!
//! Positions arrive in increasing order, which means the heap order never
//! needs rebalancing by rotation: inserts, deletes and evictions are all
//! expressed with `split` and `merge`. Both are iterative, since a window over
//! a sorted string degenerates the tree into a path as long as the window.
//!
//! Nodes live in an arena owned by the tree and are addressed by index; slots
//! freed by deletes are recycled by later inserts.

/// Index of a node in the arena
type Link = Option<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    key: char,
    priority: usize,
    left: Link,
    right: Link,
}

/// Multiset of `(character, position)` pairs with earliest-position access
#[derive(Debug, Default, Clone)]
pub struct PriorityTree {
    nodes: Vec<Node>,
    free: Vec<usize>,
    root: Link,
    len: usize,
    last_position: Option<usize>,
}

impl PriorityTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree whose arena can hold `capacity` nodes without growing
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Number of open entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every entry, keeping the arena allocation
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
        self.last_position = None;
    }

    /// Add `key` at `position`.
    ///
    /// Positions are expected to be strictly increasing across inserts; the
    /// new node then always lands below every existing node.
    pub fn insert(&mut self, key: char, position: usize) {
        debug_assert!(
            self.last_position.map_or(true, |last| last < position),
            "positions must be inserted in increasing order"
        );
        self.last_position = Some(position);

        let mut parent = None;
        let mut cur = self.root;
        while let Some(x) = cur {
            let node = self.nodes[x];
            if node.priority > position {
                break;
            }
            if key < node.key {
                parent = Some((x, Side::Left));
                cur = node.left;
            } else {
                parent = Some((x, Side::Right));
                cur = node.right;
            }
        }

        let (left, right) = self.split(cur, key);
        let slot = self.alloc(Node {
            key,
            priority: position,
            left,
            right,
        });
        self.replace_child(parent, Some(slot));
        self.len += 1;
    }

    /// Earliest open position, if any
    #[inline]
    #[must_use]
    pub fn peek_min(&self) -> Option<usize> {
        self.root.map(|r| self.nodes[r].priority)
    }

    /// Remove and return the entry with the earliest position
    pub fn pop_min(&mut self) -> Option<(char, usize)> {
        let root = self.root?;
        let node = self.nodes[root];
        self.root = self.merge(node.left, node.right);
        self.release(root);
        Some((node.key, node.priority))
    }

    /// Remove the earliest open entry with character `key` and return its position.
    ///
    /// All entries with the same key form a contiguous in-order run whose
    /// topmost node has the smallest position, and a search from the root
    /// reaches that node first.
    pub fn remove(&mut self, key: char) -> Option<usize> {
        let mut parent = None;
        let mut cur = self.root;
        while let Some(x) = cur {
            let node = self.nodes[x];
            if key == node.key {
                let merged = self.merge(node.left, node.right);
                self.replace_child(parent, merged);
                self.release(x);
                return Some(node.priority);
            }
            if key < node.key {
                parent = Some((x, Side::Left));
                cur = node.left;
            } else {
                parent = Some((x, Side::Right));
                cur = node.right;
            }
        }
        None
    }

    fn alloc(&mut self, node: Node) -> usize {
        if let Some(slot) = self.free.pop() {
            self.nodes[slot] = node;
            slot
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    fn release(&mut self, slot: usize) {
        self.free.push(slot);
        self.len -= 1;
    }

    fn replace_child(&mut self, parent: Option<(usize, Side)>, child: Link) {
        match parent {
            None => self.root = child,
            Some((p, Side::Left)) => self.nodes[p].left = child,
            Some((p, Side::Right)) => self.nodes[p].right = child,
        }
    }

    /// Split `tree` into keys `< key` and keys `>= key`
    fn split(&mut self, tree: Link, key: char) -> (Link, Link) {
        let mut left_root = None;
        let mut left_tail: Link = None;
        let mut right_root = None;
        let mut right_tail: Link = None;

        let mut cur = tree;
        while let Some(x) = cur {
            if self.nodes[x].key < key {
                match left_tail {
                    Some(t) => self.nodes[t].right = Some(x),
                    None => left_root = Some(x),
                }
                left_tail = Some(x);
                cur = self.nodes[x].right;
            } else {
                match right_tail {
                    Some(t) => self.nodes[t].left = Some(x),
                    None => right_root = Some(x),
                }
                right_tail = Some(x);
                cur = self.nodes[x].left;
            }
        }

        if let Some(t) = left_tail {
            self.nodes[t].right = None;
        }
        if let Some(t) = right_tail {
            self.nodes[t].left = None;
        }
        (left_root, right_root)
    }

    /// Merge two trees where every key of `a` sorts before every key of `b`
    fn merge(&mut self, mut a: Link, mut b: Link) -> Link {
        let mut root = None;
        let mut tail: Option<(usize, Side)> = None;

        loop {
            let (next, side) = match (a, b) {
                (None, rest) | (rest, None) => {
                    match tail {
                        None => root = rest,
                        Some((p, Side::Left)) => self.nodes[p].left = rest,
                        Some((p, Side::Right)) => self.nodes[p].right = rest,
                    }
                    return root;
                }
                (Some(x), Some(y)) => {
                    if self.nodes[x].priority < self.nodes[y].priority {
                        a = self.nodes[x].right;
                        (x, Side::Right)
                    } else {
                        b = self.nodes[y].left;
                        (y, Side::Left)
                    }
                }
            };

            match tail {
                None => root = Some(next),
                Some((p, Side::Left)) => self.nodes[p].left = Some(next),
                Some((p, Side::Right)) => self.nodes[p].right = Some(next),
            }
            tail = Some((next, side));
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-order keys plus a heap-order check on every edge
    fn walk(tree: &PriorityTree) -> Vec<(char, usize)> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        let mut cur = tree.root;
        loop {
            while let Some(x) = cur {
                stack.push(x);
                cur = tree.nodes[x].left;
            }
            let Some(x) = stack.pop() else { break };
            let node = tree.nodes[x];
            for child in [node.left, node.right].into_iter().flatten() {
                assert!(tree.nodes[child].priority > node.priority, "heap order violated");
            }
            out.push((node.key, node.priority));
            cur = node.right;
        }
        out
    }

    fn assert_sorted(tree: &PriorityTree) {
        let keys: Vec<char> = walk(tree).into_iter().map(|(k, _)| k).collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]), "keys out of order: {:?}", keys);
        assert_eq!(keys.len(), tree.len());
    }

    #[test]
    fn test_insert_keeps_both_orders() {
        let mut tree = PriorityTree::new();
        for (pos, c) in "happiness".chars().enumerate() {
            tree.insert(c, pos);
            assert_sorted(&tree);
        }
        assert_eq!(tree.len(), 9);
        assert_eq!(tree.peek_min(), Some(0));
    }

    #[test]
    fn test_remove_returns_earliest_duplicate() {
        let mut tree = PriorityTree::new();
        for (pos, c) in "abacaba".chars().enumerate() {
            tree.insert(c, pos);
        }
        assert_eq!(tree.remove('a'), Some(0));
        assert_eq!(tree.remove('a'), Some(2));
        assert_eq!(tree.remove('b'), Some(1));
        assert_eq!(tree.remove('z'), None);
        assert_sorted(&tree);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.peek_min(), Some(3));
    }

    #[test]
    fn test_pop_min_in_position_order() {
        let mut tree = PriorityTree::new();
        for (pos, c) in "zyxwv".chars().enumerate() {
            tree.insert(c, pos);
        }
        let popped: Vec<_> = std::iter::from_fn(|| tree.pop_min()).collect();
        assert_eq!(popped, vec![('z', 0), ('y', 1), ('x', 2), ('w', 3), ('v', 4)]);
        assert!(tree.is_empty());
        assert_eq!(tree.peek_min(), None);
    }

    #[test]
    fn test_arena_slots_are_recycled() {
        let mut tree = PriorityTree::with_capacity(4);
        for pos in 0..4 {
            tree.insert('a', pos);
        }
        for pos in 4..100 {
            tree.pop_min();
            tree.insert(if pos % 2 == 0 { 'a' } else { 'b' }, pos);
        }
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.nodes.len(), 4);
        assert_sorted(&tree);
    }

    #[test]
    fn test_sorted_input_does_not_recurse() {
        // Increasing keys with increasing positions form a single right path
        let mut tree = PriorityTree::new();
        let sorted: Vec<char> = (0..5_000u32).filter_map(|c| char::from_u32(0x4e00 + c)).collect();
        for (pos, &c) in sorted.iter().enumerate() {
            tree.insert(c, pos);
        }
        let mid = sorted.len() / 2;
        assert_eq!(tree.remove(sorted[mid]), Some(mid));
        assert_eq!(tree.len(), sorted.len() - 1);
        while tree.pop_min().is_some() {}
        assert!(tree.is_empty());
    }
}
