use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

type Link<K, V> = Option<Box<Node<K, V>>>;

/// A single key-value entry owned by a [`BucketChain`].
///
/// Nodes are boxed so that a rehash can relink them into a new bucket without
/// moving or reallocating the entry itself.
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    next: Link<K, V>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn key(&self) -> &K {
        &self.key
    }
}

/// An owned, singly linked sequence of entries that share one bucket.
///
/// The order of entries within a chain carries no meaning; only membership
/// does. Lookups and removals take an equality predicate over the key, so the
/// chain itself places no bounds on `K`.
pub struct BucketChain<K, V> {
    head: Link<K, V>,
    len: usize,
}

impl<K, V> Default for BucketChain<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Debug for BucketChain<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K, V> Clone for BucketChain<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        // Pushing at the front in reverse keeps the clone in the same order
        // without walking to the tail for every entry.
        let entries: Vec<(&K, &V)> = self.iter().collect();
        let mut chain = Self::new();
        for (key, value) in entries.into_iter().rev() {
            chain.push_node(Box::new(Node {
                key: key.clone(),
                value: value.clone(),
                next: None,
            }));
        }
        chain
    }
}

impl<K, V> Drop for BucketChain<K, V> {
    fn drop(&mut self) {
        // Unlink iteratively so a pathologically long chain cannot overflow the
        // stack through recursive `Box` drops.
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

impl<K, V> BucketChain<K, V> {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Returns the number of entries in the chain.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the chain holds no entries.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Appends an entry at the tail of the chain and returns a mutable
    /// reference to its value.
    ///
    /// The chain does not check for an existing equal key; callers that need
    /// unique keys search with [`find_mut`](Self::find_mut) first.
    pub fn push_back(&mut self, key: K, value: V) -> &mut V {
        let mut cursor = &mut self.head;
        while let Some(node) = cursor {
            cursor = &mut node.next;
        }

        self.len += 1;
        let node = cursor.insert(Box::new(Node {
            key,
            value,
            next: None,
        }));
        &mut node.value
    }

    /// Links an already allocated node at the head of the chain.
    pub(crate) fn push_node(&mut self, mut node: Box<Node<K, V>>) {
        node.next = self.head.take();
        self.head = Some(node);
        self.len += 1;
    }

    /// Unlinks the head node without deallocating it.
    pub(crate) fn pop_node(&mut self) -> Option<Box<Node<K, V>>> {
        let mut node = self.head.take()?;
        self.head = node.next.take();
        self.len -= 1;
        Some(node)
    }

    /// Removes and returns the entry at the head of the chain.
    pub fn pop_front(&mut self) -> Option<(K, V)> {
        self.pop_node().map(|node| {
            let Node { key, value, .. } = *node;
            (key, value)
        })
    }

    /// Returns an iterator over the entries of the chain.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            next: self.head.as_deref(),
            remaining: self.len,
        }
    }

    /// Returns an iterator over the entries of the chain with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            next: self.head.as_deref_mut(),
            remaining: self.len,
        }
    }

    /// Returns the first entry whose key satisfies `eq`.
    pub fn find(&self, eq: impl Fn(&K) -> bool) -> Option<(&K, &V)> {
        self.iter().find(|(key, _)| eq(*key))
    }

    /// Returns the first entry whose key satisfies `eq`, with a mutable value.
    pub fn find_mut(&mut self, eq: impl Fn(&K) -> bool) -> Option<(&K, &mut V)> {
        self.iter_mut().find(|(key, _)| eq(*key))
    }

    /// Returns the position of the first entry whose key satisfies `eq`.
    pub fn position(&self, eq: impl Fn(&K) -> bool) -> Option<usize> {
        self.iter().position(|(key, _)| eq(key))
    }

    /// Returns the entry at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.len()`.
    pub fn entry_at(&self, position: usize) -> (&K, &V) {
        match self.iter().nth(position) {
            Some(entry) => entry,
            None => panic!(
                "chain position {position} out of range for length {}",
                self.len
            ),
        }
    }

    /// Returns the entry at `position` with a mutable value.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.len()`.
    pub fn entry_at_mut(&mut self, position: usize) -> (&K, &mut V) {
        let len = self.len;
        match self.iter_mut().nth(position) {
            Some(entry) => entry,
            None => panic!("chain position {position} out of range for length {len}"),
        }
    }

    /// Unlinks and returns the entry at `position`, or `None` if the chain is
    /// shorter than that.
    pub fn remove_at(&mut self, position: usize) -> Option<(K, V)> {
        let mut cursor = &mut self.head;
        for _ in 0..position {
            cursor = &mut cursor.as_mut()?.next;
        }

        let node = cursor.take()?;
        let Node { key, value, next } = *node;
        *cursor = next;
        self.len -= 1;
        Some((key, value))
    }

    /// Unlinks and returns the first entry whose key satisfies `eq`.
    pub fn remove(&mut self, eq: impl Fn(&K) -> bool) -> Option<(K, V)> {
        let position = self.position(eq)?;
        self.remove_at(position)
    }

    /// Keeps only the entries for which `f` returns `true`, returning how many
    /// entries were dropped.
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) -> usize {
        let mut kept = Self::new();
        let mut removed = 0;
        while let Some(mut node) = self.pop_node() {
            if f(&node.key, &mut node.value) {
                kept.push_node(node);
            } else {
                removed += 1;
            }
        }
        // `kept` is reversed, which is fine: chain order is not observable.
        core::mem::swap(self, &mut kept);
        removed
    }
}

/// An iterator over the entries of a [`BucketChain`].
pub struct Iter<'a, K, V> {
    next: Option<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            self.remaining -= 1;
            (&node.key, &node.value)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of a [`BucketChain`].
pub struct IterMut<'a, K, V> {
    next: Option<&'a mut Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.next.take().map(|node| {
            let Node { key, value, next } = node;
            self.next = next.as_deref_mut();
            self.remaining -= 1;
            (&*key, value)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// An owning iterator over the entries of a [`BucketChain`].
pub struct IntoIter<K, V> {
    chain: BucketChain<K, V>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.chain.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.chain.len, Some(self.chain.len))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> IntoIterator for BucketChain<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { chain: self }
    }
}

impl<'a, K, V> IntoIterator for &'a BucketChain<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
