use std::cmp::Ordering;

use itertools::Itertools;
use slab::Slab;

/// Comparator consulted by every [`OrderedSet`] operation.
///
/// The comparator is passed explicitly to each call instead of being
/// stored in the set. A comparator may depend on external state (the
/// sweep position); the set only stays valid while that state orders
/// the stored elements the same way it did when they were inserted.
/// Elements whose relative order changes must be removed under the old
/// state and re-inserted under the new one.
pub trait Compare<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F: Fn(&T, &T) -> Ordering> Compare<T> for F {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Result of a neighbour lookup: the adjacent element, or the side on
/// which the key falls out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjacent<T> {
    Exists(T),
    /// No element is smaller than the key.
    InfNegative,
    /// No element is larger than the key.
    InfPositive,
}

impl<T> Adjacent<T> {
    #[inline]
    pub fn value(self) -> Option<T> {
        match self {
            Adjacent::Exists(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn exists(&self) -> bool {
        matches!(self, Adjacent::Exists(_))
    }
}

#[derive(Debug)]
struct Node<T> {
    item: T,
    left: Option<usize>,
    right: Option<usize>,
    height: u32,
}

/// An ordered set over an injected comparator.
///
/// Implemented as an AVL tree whose nodes live in a [`Slab`]. Supports
/// successor / predecessor queries relative to keys that need not be
/// present in the set, and ordered traversal through [`Cursor`]s.
#[derive(Debug)]
pub struct OrderedSet<T> {
    nodes: Slab<Node<T>>,
    root: Option<usize>,
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        OrderedSet {
            nodes: Slab::new(),
            root: None,
        }
    }
}

impl<T> OrderedSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Insert `item`; no-op returning `false` if an equivalent element is
    /// present.
    pub fn insert<C: Compare<T>>(&mut self, item: T, cmp: &C) -> bool {
        let mut inserted = false;
        let root = self.insert_at(self.root, item, cmp, &mut inserted);
        self.root = Some(root);
        inserted
    }

    /// Remove and return the element equivalent to `item`.
    pub fn remove<C: Compare<T>>(&mut self, item: &T, cmp: &C) -> Option<T> {
        let mut removed = None;
        self.root = self.remove_at(self.root, item, cmp, &mut removed);
        removed
    }

    /// Keep only the elements matching `keep`, then rebuild a balanced tree
    /// from the surviving elements in their current order.
    ///
    /// Needs no comparator, so it also recovers a set whose comparator no
    /// longer agrees with the stored order. Returns the number of removed
    /// elements.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut keep: F) -> usize {
        let keys = self.in_order_keys();
        let before = keys.len();
        let mut items = Vec::with_capacity(before);
        for key in keys {
            let node = self.nodes.remove(key);
            if keep(&node.item) {
                items.push(node.item);
            }
        }
        self.clear();
        let count = items.len();
        self.root = self.build(&mut items.into_iter(), count);
        before - count
    }

    /// Cursor on the element equivalent to `item`, or at the end.
    pub fn find<C: Compare<T>>(&self, item: &T, cmp: &C) -> Cursor<'_, T> {
        let mut path = Vec::new();
        let mut node = self.root;
        while let Some(n) = node {
            path.push(n);
            node = match cmp.compare(item, &self.nodes[n].item) {
                Ordering::Less => self.nodes[n].left,
                Ordering::Greater => self.nodes[n].right,
                Ordering::Equal => return Cursor { set: self, path },
            };
        }
        Cursor::end(self)
    }

    #[inline]
    pub fn contains<C: Compare<T>>(&self, item: &T, cmp: &C) -> bool {
        self.find(item, cmp).get().is_some()
    }

    /// The smallest element strictly greater than `item`.
    pub fn find_next<C: Compare<T>>(&self, item: &T, cmp: &C) -> Adjacent<&T> {
        let mut found = None;
        let mut node = self.root;
        while let Some(n) = node {
            if cmp.compare(item, &self.nodes[n].item) == Ordering::Less {
                found = Some(n);
                node = self.nodes[n].left;
            } else {
                node = self.nodes[n].right;
            }
        }
        found.map_or(Adjacent::InfPositive, |n| Adjacent::Exists(&self.nodes[n].item))
    }

    /// The largest element strictly smaller than `item`.
    pub fn find_prev<C: Compare<T>>(&self, item: &T, cmp: &C) -> Adjacent<&T> {
        let mut found = None;
        let mut node = self.root;
        while let Some(n) = node {
            if cmp.compare(item, &self.nodes[n].item) == Ordering::Greater {
                found = Some(n);
                node = self.nodes[n].right;
            } else {
                node = self.nodes[n].left;
            }
        }
        found.map_or(Adjacent::InfNegative, |n| Adjacent::Exists(&self.nodes[n].item))
    }

    /// Cursor on the first element `e` with `position(e) != Less`, where
    /// `position` places an element relative to some key and must be
    /// monotone along the set order.
    pub fn lower_bound_by<F: Fn(&T) -> Ordering>(&self, position: F) -> Cursor<'_, T> {
        let mut path = Vec::new();
        let mut keep = 0;
        let mut node = self.root;
        while let Some(n) = node {
            path.push(n);
            if position(&self.nodes[n].item) == Ordering::Less {
                node = self.nodes[n].right;
            } else {
                keep = path.len();
                node = self.nodes[n].left;
            }
        }
        path.truncate(keep);
        Cursor { set: self, path }
    }

    /// Cursor on the smallest element.
    pub fn first(&self) -> Cursor<'_, T> {
        let mut cursor = Cursor::end(self);
        let mut node = self.root;
        while let Some(n) = node {
            cursor.path.push(n);
            node = self.nodes[n].left;
        }
        cursor
    }

    /// Cursor on the largest element.
    pub fn last(&self) -> Cursor<'_, T> {
        let mut cursor = Cursor::end(self);
        let mut node = self.root;
        while let Some(n) = node {
            cursor.path.push(n);
            node = self.nodes[n].right;
        }
        cursor
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            cursor: self.first(),
        }
    }

    /// Whether the stored order is strictly increasing under `cmp`.
    pub fn is_sorted_by<C: Compare<T>>(&self, cmp: &C) -> bool {
        self.iter()
            .tuple_windows::<(&T, &T)>()
            .all(|(a, b)| cmp.compare(a, b) == Ordering::Less)
    }

    /// Whether every node satisfies the AVL height invariants.
    #[cfg(any(test, feature = "slow-asserts"))]
    pub(crate) fn is_balanced(&self) -> bool {
        fn check<T>(set: &OrderedSet<T>, node: Option<usize>) -> Option<u32> {
            let n = match node {
                Some(n) => n,
                None => return Some(0),
            };
            let lh = check(set, set.nodes[n].left)?;
            let rh = check(set, set.nodes[n].right)?;
            let height = 1 + lh.max(rh);
            (lh.abs_diff(rh) <= 1 && set.nodes[n].height == height).then(|| height)
        }
        check(self, self.root).is_some()
    }

    fn in_order_keys(&self) -> Vec<usize> {
        let mut keys = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut node = self.root;
        loop {
            while let Some(n) = node {
                stack.push(n);
                node = self.nodes[n].left;
            }
            match stack.pop() {
                Some(n) => {
                    keys.push(n);
                    node = self.nodes[n].right;
                }
                None => break,
            }
        }
        keys
    }

    fn build<I: Iterator<Item = T>>(&mut self, items: &mut I, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let left_count = count / 2;
        let left = self.build(items, left_count);
        let item = items.next()?;
        let right = self.build(items, count - left_count - 1);
        let n = self.nodes.insert(Node {
            item,
            left,
            right,
            height: 1,
        });
        self.update(n);
        Some(n)
    }

    fn insert_at<C: Compare<T>>(
        &mut self,
        node: Option<usize>,
        item: T,
        cmp: &C,
        inserted: &mut bool,
    ) -> usize {
        let n = match node {
            Some(n) => n,
            None => {
                *inserted = true;
                return self.nodes.insert(Node {
                    item,
                    left: None,
                    right: None,
                    height: 1,
                });
            }
        };
        match cmp.compare(&item, &self.nodes[n].item) {
            Ordering::Less => {
                let child = self.insert_at(self.nodes[n].left, item, cmp, inserted);
                self.nodes[n].left = Some(child);
            }
            Ordering::Greater => {
                let child = self.insert_at(self.nodes[n].right, item, cmp, inserted);
                self.nodes[n].right = Some(child);
            }
            Ordering::Equal => return n,
        }
        self.rebalance(n)
    }

    fn remove_at<C: Compare<T>>(
        &mut self,
        node: Option<usize>,
        item: &T,
        cmp: &C,
        removed: &mut Option<T>,
    ) -> Option<usize> {
        let n = node?;
        match cmp.compare(item, &self.nodes[n].item) {
            Ordering::Less => {
                let child = self.remove_at(self.nodes[n].left, item, cmp, removed);
                self.nodes[n].left = child;
            }
            Ordering::Greater => {
                let child = self.remove_at(self.nodes[n].right, item, cmp, removed);
                self.nodes[n].right = child;
            }
            Ordering::Equal => {
                let Node { item, left, right, .. } = self.nodes.remove(n);
                *removed = Some(item);
                return match (left, right) {
                    (None, child) | (child, None) => child,
                    (Some(left), Some(right)) => {
                        let (rest, min) = self.detach_min(right);
                        self.nodes[min].left = Some(left);
                        self.nodes[min].right = rest;
                        Some(self.rebalance(min))
                    }
                };
            }
        }
        Some(self.rebalance(n))
    }

    /// Unlink the minimum of the subtree at `n`. Returns the new subtree
    /// root and the detached node.
    fn detach_min(&mut self, n: usize) -> (Option<usize>, usize) {
        match self.nodes[n].left {
            None => (self.nodes[n].right, n),
            Some(left) => {
                let (rest, min) = self.detach_min(left);
                self.nodes[n].left = rest;
                (Some(self.rebalance(n)), min)
            }
        }
    }

    #[inline]
    fn height(&self, node: Option<usize>) -> u32 {
        node.map_or(0, |n| self.nodes[n].height)
    }

    #[inline]
    fn update(&mut self, n: usize) {
        let height = 1 + self.height(self.nodes[n].left).max(self.height(self.nodes[n].right));
        self.nodes[n].height = height;
    }

    #[inline]
    fn balance_factor(&self, n: usize) -> i64 {
        self.height(self.nodes[n].left) as i64 - self.height(self.nodes[n].right) as i64
    }

    fn rotate_right(&mut self, n: usize) -> usize {
        let pivot = match self.nodes[n].left {
            Some(pivot) => pivot,
            None => return n,
        };
        self.nodes[n].left = self.nodes[pivot].right;
        self.nodes[pivot].right = Some(n);
        self.update(n);
        self.update(pivot);
        pivot
    }

    fn rotate_left(&mut self, n: usize) -> usize {
        let pivot = match self.nodes[n].right {
            Some(pivot) => pivot,
            None => return n,
        };
        self.nodes[n].right = self.nodes[pivot].left;
        self.nodes[pivot].left = Some(n);
        self.update(n);
        self.update(pivot);
        pivot
    }

    fn rebalance(&mut self, n: usize) -> usize {
        self.update(n);
        let balance = self.balance_factor(n);
        if balance > 1 {
            if let Some(left) = self.nodes[n].left {
                if self.balance_factor(left) < 0 {
                    let child = self.rotate_left(left);
                    self.nodes[n].left = Some(child);
                }
            }
            self.rotate_right(n)
        } else if balance < -1 {
            if let Some(right) = self.nodes[n].right {
                if self.balance_factor(right) > 0 {
                    let child = self.rotate_right(right);
                    self.nodes[n].right = Some(child);
                }
            }
            self.rotate_left(n)
        } else {
            n
        }
    }
}

/// A position in an [`OrderedSet`]: an element, or the end.
///
/// Holds the path from the root so that stepping needs no comparator.
#[derive(Debug, Clone)]
pub struct Cursor<'a, T> {
    set: &'a OrderedSet<T>,
    path: Vec<usize>,
}

impl<'a, T> Cursor<'a, T> {
    fn end(set: &'a OrderedSet<T>) -> Self {
        Cursor {
            set,
            path: Vec::new(),
        }
    }

    /// The element under the cursor, `None` at the end.
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        let set = self.set;
        self.path.last().map(|&n| &set.nodes[n].item)
    }

    /// Step to the successor; stepping past the last element reaches the
    /// end, which stays put.
    pub fn move_next(&mut self) {
        let nodes = &self.set.nodes;
        let n = match self.path.last() {
            Some(&n) => n,
            None => return,
        };
        if let Some(mut child) = nodes[n].right {
            loop {
                self.path.push(child);
                match nodes[child].left {
                    Some(left) => child = left,
                    None => return,
                }
            }
        }
        while let Some(child) = self.path.pop() {
            match self.path.last() {
                Some(&parent) if nodes[parent].left == Some(child) => return,
                Some(_) => {}
                None => return,
            }
        }
    }

    /// Step to the predecessor; stepping before the first element reaches
    /// the end.
    pub fn move_prev(&mut self) {
        let nodes = &self.set.nodes;
        let n = match self.path.last() {
            Some(&n) => n,
            None => return,
        };
        if let Some(mut child) = nodes[n].left {
            loop {
                self.path.push(child);
                match nodes[child].right {
                    Some(right) => child = right,
                    None => return,
                }
            }
        }
        while let Some(child) = self.path.pop() {
            match self.path.last() {
                Some(&parent) if nodes[parent].right == Some(child) => return,
                Some(_) => {}
                None => return,
            }
        }
    }
}

/// Ordered iterator over an [`OrderedSet`].
pub struct Iter<'a, T> {
    cursor: Cursor<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cursor.get()?;
        self.cursor.move_next();
        Some(item)
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
