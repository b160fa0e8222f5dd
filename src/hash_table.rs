use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::ops::Index;

use crate::bucket_array::BucketArray;
use crate::bucket_chain;
use crate::bucket_chain::BucketChain;
use crate::convert::DefaultHashBuilder;
use crate::error::TryReserveError;
#[cfg(feature = "stats")]
use crate::stats::ChainHistogram;
#[cfg(feature = "stats")]
use crate::stats::DebugStats;

/// Number of buckets a table starts with unless told otherwise.
pub const INITIAL_BUCKETS: usize = 8;

/// Average chain length at which the next insertion doubles the bucket count.
///
/// The load factor is computed as `len / capacity` with truncating integer
/// division, so growth fires exactly when `len >= MAX_LOAD_FACTOR * capacity`.
pub const MAX_LOAD_FACTOR: usize = 4;

#[inline(always)]
fn bucket_index<K, S>(hash_builder: &S, key: &K, capacity: usize) -> usize
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    (hash_builder.hash_one(key) % capacity as u64) as usize
}

/// A hash table that resolves collisions by chaining entries per bucket.
///
/// `HashTable<K, V, S>` stores key-value pairs where keys implement
/// `Hash + Eq`. The hash, produced by the hasher builder `S`, selects a bucket
/// (`hash % capacity`); `Eq` decides whether two keys are the same key.
///
/// Before every insertion the table checks its load factor and, once the
/// average chain holds [`MAX_LOAD_FACTOR`] entries, rehashes into twice as many
/// buckets. The bucket count never shrinks, not even when entries are removed.
///
/// ## Example
///
/// ```rust
/// use chain_hash::HashTable;
///
/// let mut table = HashTable::new();
/// table.insert("apple", 3);
/// table.insert("pear", 5);
///
/// assert_eq!(table.get(&"apple"), Some(&3));
/// assert_eq!(table.remove(&"pear"), Some(5));
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashTable<K, V, S = DefaultHashBuilder> {
    buckets: BucketArray<K, V>,
    len: usize,
    hash_builder: S,
}

impl<K, V, S> Debug for HashTable<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> HashTable<K, V, S> {
    /// Creates an empty table with [`INITIAL_BUCKETS`] buckets and the given
    /// hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    /// use chain_hash::convert::BuildIdentityHasher;
    ///
    /// let table: HashTable<u32, String, _> = HashTable::with_hasher(BuildIdentityHasher);
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 8);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(INITIAL_BUCKETS, hash_builder)
    }

    /// Creates an empty table with `buckets` buckets and the given hasher
    /// builder. A request for zero buckets is raised to one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    /// use chain_hash::convert::BuildIdentityHasher;
    ///
    /// let table: HashTable<u32, String, _> =
    ///     HashTable::with_capacity_and_hasher(64, BuildIdentityHasher);
    /// assert_eq!(table.capacity(), 64);
    /// ```
    pub fn with_capacity_and_hasher(buckets: usize, hash_builder: S) -> Self {
        Self {
            buckets: BucketArray::with_capacity(buckets.max(1)),
            len: 0,
            hash_builder,
        }
    }

    /// Returns the number of entries in the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// assert_eq!(table.len(), 0);
    /// table.insert(1, "a");
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// assert!(table.is_empty());
    /// table.insert(1, "a");
    /// assert!(!table.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current number of buckets.
    ///
    /// Unlike `std`'s maps, this is not the number of entries the table can
    /// hold before growing: up to `MAX_LOAD_FACTOR * capacity` entries fit
    /// before the next insertion rehashes.
    pub fn capacity(&self) -> usize {
        self.buckets.capacity()
    }

    /// Returns a reference to the table's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes every entry, keeping the bucket count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// for i in 0..100 {
    ///     table.insert(i, i);
    /// }
    /// let capacity = table.capacity();
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }

    /// Returns an iterator over the entries of the table in arbitrary order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.buckets.slots().iter(),
            chain: None,
            remaining: self.len,
        }
    }

    /// Returns an iterator over the entries of the table in arbitrary order,
    /// with mutable references to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            slots: self.buckets.slots_mut().iter_mut(),
            chain: None,
            remaining: self.len,
        }
    }

    /// Returns an iterator over the keys of the table.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the table.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values of the table.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Removes every entry, yielding them by value.
    ///
    /// The table is empty as soon as `drain` returns, even if the iterator is
    /// not consumed. The bucket count is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert(1, "a");
    /// table.insert(2, "b");
    ///
    /// let mut pairs: Vec<_> = table.drain().collect();
    /// pairs.sort();
    /// assert_eq!(pairs, [(1, "a"), (2, "b")]);
    /// assert!(table.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        let fresh = BucketArray::with_capacity(self.buckets.capacity());
        let buckets = core::mem::replace(&mut self.buckets, fresh);
        let len = core::mem::take(&mut self.len);
        Drain {
            inner: IntoIter::new(buckets, len),
            _table: core::marker::PhantomData,
        }
    }

    /// Keeps only the entries for which `f` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table: HashTable<i32, i32> = (0..8).map(|i| (i, i * 10)).collect();
    /// table.retain(|&k, _| k % 2 == 0);
    /// assert_eq!(table.len(), 4);
    /// ```
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        for slot in self.buckets.slots_mut() {
            if let Some(chain) = slot {
                self.len -= chain.retain(&mut f);
                if chain.is_empty() {
                    *slot = None;
                }
            }
        }
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Returns the bucket a key maps to under the current capacity:
    /// `hash(key) % capacity`.
    ///
    /// The index of an existing entry changes whenever the table rehashes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    /// use chain_hash::convert::BuildIdentityHasher;
    ///
    /// let table: HashTable<u64, (), _> = HashTable::with_hasher(BuildIdentityHasher);
    /// assert_eq!(table.hash_index(&13), 13 % 8);
    /// ```
    pub fn hash_index(&self, key: &K) -> usize {
        bucket_index(&self.hash_builder, key, self.buckets.capacity())
    }

    /// The truncated load factor, `len / capacity`.
    fn load_factor(&self) -> usize {
        self.len / self.buckets.capacity()
    }

    fn maybe_grow(&mut self) {
        if self.load_factor() >= MAX_LOAD_FACTOR {
            let new_capacity = self
                .buckets
                .capacity()
                .checked_mul(2)
                .expect("capacity overflow");
            self.rehash_into(BucketArray::with_capacity(new_capacity));
        }
    }

    /// Moves every node into `fresh`, which becomes the table's bucket array.
    ///
    /// Nodes are relinked rather than reallocated; the old chains and the old
    /// array are dropped once they have been emptied.
    fn rehash_into(&mut self, fresh: BucketArray<K, V>) {
        let old_capacity = self.buckets.capacity();
        let old = core::mem::replace(&mut self.buckets, fresh);
        let new_capacity = self.buckets.capacity();

        for mut chain in old.into_slots().flatten() {
            while let Some(node) = chain.pop_node() {
                let index = bucket_index(&self.hash_builder, node.key(), new_capacity);
                self.buckets.get_or_insert(index).push_node(node);
            }
        }

        log::trace!(
            "rehashed {} entries from {} to {} buckets",
            self.len,
            old_capacity,
            new_capacity
        );
    }

    /// Inserts a key-value pair into the table.
    ///
    /// If the table did not have this key present, `None` is returned and the
    /// length grows by one. If the key was present, its value is replaced in
    /// place and the old value is returned; the stored key is kept.
    ///
    /// The load factor is checked before the key is looked up, so an insert
    /// that overwrites can still trigger a rehash.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// assert_eq!(table.insert(37, "a"), None);
    /// assert_eq!(table.insert(37, "b"), Some("a"));
    /// assert_eq!(table.get(&37), Some(&"b"));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.maybe_grow();

        let index = self.hash_index(&key);
        let chain = self.buckets.get_or_insert(index);
        match chain.find_mut(|k| k == &key) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                chain.push_back(key, value);
                self.len += 1;
                None
            }
        }
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert(1, "a");
    /// assert_eq!(table.get(&1), Some(&"a"));
    /// assert_eq!(table.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.buckets
            .get(self.hash_index(key))?
            .find(|k| k == key)
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert(1, String::from("a"));
    /// if let Some(value) = table.get_mut(&1) {
    ///     value.push('b');
    /// }
    /// assert_eq!(table.get(&1).map(String::as_str), Some("ab"));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.hash_index(key);
        self.buckets
            .get_mut(index)?
            .find_mut(|k| k == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the table holds a value for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get_key_value(key).is_some()
    }

    /// Removes `key` from the table, returning its value if it was present.
    ///
    /// Removing an absent key leaves the table untouched. Removal never
    /// shrinks the bucket count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table = HashTable::new();
    /// table.insert(1, "a");
    /// assert_eq!(table.remove(&1), Some("a"));
    /// assert_eq!(table.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key` from the table, returning the stored key and value if it
    /// was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let index = self.hash_index(key);
        let chain = self.buckets.get_mut(index)?;
        let removed = chain.remove(|k| k == key)?;
        if chain.is_empty() {
            self.buckets.take(index);
        }
        self.len -= 1;
        Some(removed)
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// This is an insertion path: like [`insert`](Self::insert), it grows the
    /// table first if the load factor has reached the threshold.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut counts = HashTable::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.entry(word).or_insert(0) += 1;
    /// }
    /// assert_eq!(counts.get(&"a"), Some(&2));
    /// assert_eq!(counts.get(&"b"), Some(&1));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        self.maybe_grow();

        let index = self.hash_index(&key);
        let Self { buckets, len, .. } = self;
        let chain = buckets.get_or_insert(index);
        match chain.position(|k| k == &key) {
            Some(position) => Entry::Occupied(OccupiedEntry {
                chain,
                len,
                position,
            }),
            None => Entry::Vacant(VacantEntry { chain, len, key }),
        }
    }

    /// Makes room for at least `additional` more entries without a rehash.
    ///
    /// The bucket count is doubled as many times as needed, in a single
    /// rehash.
    ///
    /// # Panics
    ///
    /// Panics if the new bucket count or its size in bytes overflows, and
    /// aborts through [`handle_alloc_error`](alloc::alloc::handle_alloc_error)
    /// if the allocation fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let mut table: HashTable<u32, u32> = HashTable::new();
    /// table.reserve(1000);
    /// let capacity = table.capacity();
    /// for i in 0..1000 {
    ///     table.insert(i, i);
    /// }
    /// assert_eq!(table.capacity(), capacity);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        match self.try_reserve(additional) {
            Ok(()) => {}
            Err(TryReserveError::CapacityOverflow) => panic!("capacity overflow"),
            Err(TryReserveError::AllocError { buckets, .. }) => {
                alloc::alloc::handle_alloc_error(BucketArray::<K, V>::layout_for(buckets))
            }
        }
    }

    /// Tries to make room for at least `additional` more entries without a
    /// rehash, reporting failure instead of panicking or aborting.
    ///
    /// On error the table is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    /// use chain_hash::TryReserveError;
    ///
    /// let mut table: HashTable<u32, u32> = HashTable::new();
    /// assert!(table.try_reserve(100).is_ok());
    ///
    /// table.insert(1, 1);
    /// assert_eq!(
    ///     table.try_reserve(usize::MAX),
    ///     Err(TryReserveError::CapacityOverflow)
    /// );
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(TryReserveError::CapacityOverflow)?;

        let current = self.buckets.capacity();
        let mut capacity = current;
        // Once `capacity * MAX_LOAD_FACTOR` overflows, any `required` fits.
        while capacity
            .checked_mul(MAX_LOAD_FACTOR)
            .is_some_and(|fits| required > fits)
        {
            capacity = capacity
                .checked_mul(2)
                .ok_or(TryReserveError::CapacityOverflow)?;
        }

        if capacity > current {
            log::debug!("reserving {additional} entries: growing from {current} to {capacity} buckets");
            let fresh = BucketArray::try_with_capacity(capacity)?;
            self.rehash_into(fresh);
        }
        Ok(())
    }

    /// Computes statistics about bucket and chain usage.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.buckets.capacity();
        let occupied_buckets = self.buckets.occupied();
        let longest_chain = self
            .buckets
            .slots()
            .iter()
            .flatten()
            .map(BucketChain::len)
            .max()
            .unwrap_or(0);

        DebugStats {
            populated: self.len,
            capacity,
            occupied_buckets,
            longest_chain,
            load_factor: self.len as f64 / capacity as f64,
            bucket_utilization: occupied_buckets as f64 / capacity as f64,
            total_bytes: BucketArray::<K, V>::layout_for(capacity).size()
                + self.len * core::mem::size_of::<bucket_chain::Node<K, V>>(),
        }
    }

    /// Computes a histogram of chain lengths.
    ///
    /// Index `n` holds the number of buckets whose chain has exactly `n`
    /// entries; index 0 counts empty buckets.
    #[cfg(feature = "stats")]
    pub fn chain_histogram(&self) -> ChainHistogram {
        let mut counts = alloc::vec::Vec::new();
        for slot in self.buckets.slots() {
            let len = slot.as_ref().map_or(0, BucketChain::len);
            if counts.len() <= len {
                counts.resize(len + 1, 0);
            }
            counts[len] += 1;
        }
        ChainHistogram { counts }
    }
}

impl<K, V> HashTable<K, V, DefaultHashBuilder> {
    /// Creates an empty table with [`INITIAL_BUCKETS`] buckets using the
    /// default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashTable;
    ///
    /// let table: HashTable<i32, String> = HashTable::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), chain_hash::INITIAL_BUCKETS);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates an empty table with `buckets` buckets using the default hasher
    /// builder.
    pub fn with_capacity(buckets: usize) -> Self {
        Self::with_capacity_and_hasher(buckets, DefaultHashBuilder::default())
    }
}

impl<K, V, S> Default for HashTable<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> PartialEq for HashTable<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|other_v| v == other_v))
    }
}

impl<K, V, S> Eq for HashTable<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Index<&K> for HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the table.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found in HashTable")
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::default();
        table.extend(iter);
        table
    }
}

impl<K, V, S> Extend<(K, V)> for HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> IntoIterator for HashTable<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.buckets, self.len)
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut HashTable<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry of the table, which may be vacant or occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, K, V> {
    /// No node in the key's bucket chain holds the key.
    Vacant(VacantEntry<'a, K, V>),
    /// The key's bucket chain holds the key at a known position.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry of the table.
pub struct VacantEntry<'a, K, V> {
    chain: &'a mut BucketChain<K, V>,
    len: &'a mut usize,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Appends the entry to its bucket's chain and returns a mutable reference
    /// to the value.
    pub fn insert(self, value: V) -> &'a mut V {
        let VacantEntry { chain, len, key } = self;
        *len += 1;
        chain.push_back(key, value)
    }
}

/// A view into an occupied entry of the table.
pub struct OccupiedEntry<'a, K, V> {
    chain: &'a mut BucketChain<K, V>,
    len: &'a mut usize,
    position: usize,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        self.chain.entry_at(self.position).0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        self.chain.entry_at(self.position).1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        self.chain.entry_at_mut(self.position).1
    }

    /// Converts the entry into a mutable reference to the value, bound to the
    /// table's lifetime.
    pub fn into_mut(self) -> &'a mut V {
        let OccupiedEntry {
            chain, position, ..
        } = self;
        chain.entry_at_mut(position).1
    }

    /// Replaces the value in the entry, returning the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the table and returns the value.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Removes the entry from the table and returns the key and value.
    ///
    /// The bucket's chain is left in place even if it becomes empty; it is
    /// reclaimed on the next rehash.
    pub fn remove_entry(self) -> (K, V) {
        let len = self.chain.len();
        match self.chain.remove_at(self.position) {
            Some(entry) => {
                *self.len -= 1;
                entry
            }
            None => panic!(
                "chain position {} out of range for length {len}",
                self.position
            ),
        }
    }
}

/// An iterator over the entries of a [`HashTable`].
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Option<BucketChain<K, V>>>,
    chain: Option<bucket_chain::Iter<'a, K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(entry);
            }
            self.chain = self.slots.next()?.as_ref().map(BucketChain::iter);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of a [`HashTable`].
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Option<BucketChain<K, V>>>,
    chain: Option<bucket_chain::IterMut<'a, K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(entry);
            }
            self.chain = self.slots.next()?.as_mut().map(BucketChain::iter_mut);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// An owning iterator over the entries of a [`HashTable`].
pub struct IntoIter<K, V> {
    slots: alloc::vec::IntoIter<Option<BucketChain<K, V>>>,
    chain: Option<bucket_chain::IntoIter<K, V>>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    fn new(buckets: BucketArray<K, V>, len: usize) -> Self {
        Self {
            slots: buckets.into_slots(),
            chain: None,
            remaining: len,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(entry);
            }
            self.chain = self.slots.next()?.map(BucketChain::into_iter);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

/// A draining iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, K, V> {
    inner: IntoIter<K, V>,
    _table: core::marker::PhantomData<&'a mut ()>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

/// An iterator over the keys of a [`HashTable`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the values of a [`HashTable`].
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A mutable iterator over the values of a [`HashTable`].
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
