use alloc::vec::Vec;
use core::alloc::Layout;

use crate::bucket_chain::BucketChain;
use crate::error::TryReserveError;

type Slot<K, V> = Option<BucketChain<K, V>>;

/// A capacity-tracked array of optional [`BucketChain`]s.
///
/// Every slot starts out empty. A chain is only allocated once something is
/// stored in its bucket, and the array never shrinks.
#[derive(Clone, Debug)]
pub struct BucketArray<K, V> {
    slots: Vec<Slot<K, V>>,
}

impl<K, V> BucketArray<K, V> {
    /// Creates an array of `capacity` empty buckets.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "bucket array capacity must be nonzero");

        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots }
    }

    /// Creates an array of `capacity` empty buckets, reporting allocation
    /// failure instead of aborting.
    ///
    /// A `capacity` whose slot storage does not fit in `isize::MAX` bytes is
    /// a [`TryReserveError::CapacityOverflow`]; only a failed allocation is an
    /// [`TryReserveError::AllocError`].
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        assert!(capacity > 0, "bucket array capacity must be nonzero");

        Layout::array::<Slot<K, V>>(capacity).map_err(|_| TryReserveError::CapacityOverflow)?;

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|source| TryReserveError::AllocError {
                buckets: capacity,
                source,
            })?;
        slots.resize_with(capacity, || None);
        Ok(Self { slots })
    }

    /// The memory layout of the slot storage for `capacity` buckets.
    pub(crate) fn layout_for(capacity: usize) -> Layout {
        Layout::array::<Slot<K, V>>(capacity).expect("allocation size overflow")
    }

    /// Returns the number of buckets.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the chain stored at `index`, if that bucket has one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.capacity()`.
    pub fn get(&self, index: usize) -> Option<&BucketChain<K, V>> {
        self.slots[index].as_ref()
    }

    /// Returns the chain stored at `index` mutably, if that bucket has one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.capacity()`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut BucketChain<K, V>> {
        self.slots[index].as_mut()
    }

    /// Returns the chain at `index`, creating an empty one if the bucket has
    /// none yet.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.capacity()`.
    pub fn get_or_insert(&mut self, index: usize) -> &mut BucketChain<K, V> {
        self.slots[index].get_or_insert_with(BucketChain::new)
    }

    /// Stores `chain` at `index`, returning the chain it replaced.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.capacity()`.
    pub fn set(&mut self, index: usize, chain: BucketChain<K, V>) -> Option<BucketChain<K, V>> {
        self.slots[index].replace(chain)
    }

    /// Empties the bucket at `index`, returning its chain.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.capacity()`.
    pub fn take(&mut self, index: usize) -> Option<BucketChain<K, V>> {
        self.slots[index].take()
    }

    /// Grows the array to `new_capacity` buckets.
    ///
    /// Existing buckets keep their chains at the same indices and the new
    /// buckets start empty. Entries are not moved, so a caller that addresses
    /// buckets by `hash % capacity` has to relocate them itself.
    ///
    /// # Panics
    ///
    /// Panics if `new_capacity` is smaller than the current capacity.
    pub fn set_capacity(&mut self, new_capacity: usize) {
        assert!(
            new_capacity >= self.slots.len(),
            "bucket array cannot shrink from {} to {new_capacity}",
            self.slots.len()
        );
        self.slots.resize_with(new_capacity, || None);
    }

    /// Drops every chain, keeping the bucket count.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Returns every bucket in index order.
    pub fn slots(&self) -> &[Option<BucketChain<K, V>>] {
        &self.slots
    }

    /// Returns every bucket in index order, mutably.
    pub fn slots_mut(&mut self) -> &mut [Option<BucketChain<K, V>>] {
        &mut self.slots
    }

    /// Consumes the array, yielding every bucket in index order.
    pub fn into_slots(self) -> alloc::vec::IntoIter<Option<BucketChain<K, V>>> {
        self.slots.into_iter()
    }

    /// Returns the number of buckets holding at least one entry.
    pub fn occupied(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|chain| !chain.is_empty())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_empty_buckets() {
        let array: BucketArray<u64, u64> = BucketArray::with_capacity(8);
        assert_eq!(array.capacity(), 8);
        assert_eq!(array.occupied(), 0);
        for index in 0..8 {
            assert!(array.get(index).is_none());
        }
    }

    #[test]
    #[should_panic(expected = "nonzero")]
    fn zero_capacity_panics() {
        let _ = BucketArray::<u64, u64>::with_capacity(0);
    }

    #[test]
    fn get_or_insert_creates_chain_once() {
        let mut array: BucketArray<u64, &str> = BucketArray::with_capacity(4);
        array.get_or_insert(2).push_back(2, "two");
        array.get_or_insert(2).push_back(6, "six");

        assert_eq!(array.occupied(), 1);
        let chain = array.get(2).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.find(|&k| k == 6), Some((&6, &"six")));
    }

    #[test]
    fn set_and_take() {
        let mut array: BucketArray<u64, u64> = BucketArray::with_capacity(4);
        let mut chain = BucketChain::new();
        chain.push_back(1, 10);

        assert!(array.set(1, chain).is_none());
        assert_eq!(array.get(1).map(BucketChain::len), Some(1));

        let taken = array.take(1).unwrap();
        assert_eq!(taken.find(|&k| k == 1), Some((&1, &10)));
        assert!(array.get(1).is_none());
        assert!(array.take(1).is_none());
    }

    #[test]
    fn set_capacity_preserves_existing_buckets() {
        let mut array: BucketArray<u64, u64> = BucketArray::with_capacity(2);
        array.get_or_insert(0).push_back(0, 0);
        array.get_or_insert(1).push_back(1, 1);

        array.set_capacity(5);

        assert_eq!(array.capacity(), 5);
        assert_eq!(array.get(0).unwrap().find(|&k| k == 0), Some((&0, &0)));
        assert_eq!(array.get(1).unwrap().find(|&k| k == 1), Some((&1, &1)));
        for index in 2..5 {
            assert!(array.get(index).is_none());
        }
    }

    #[test]
    #[should_panic(expected = "cannot shrink")]
    fn set_capacity_rejects_shrinking() {
        let mut array: BucketArray<u64, u64> = BucketArray::with_capacity(4);
        array.set_capacity(2);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut array: BucketArray<u64, u64> = BucketArray::with_capacity(4);
        array.get_or_insert(3).push_back(3, 3);
        array.clear();
        assert_eq!(array.capacity(), 4);
        assert_eq!(array.occupied(), 0);
    }

    #[test]
    fn try_with_capacity_reports_impossible_allocations() {
        let array = BucketArray::<u64, u64>::try_with_capacity(16).unwrap();
        assert_eq!(array.capacity(), 16);

        let err = BucketArray::<u64, u64>::try_with_capacity(usize::MAX).unwrap_err();
        assert_eq!(err, TryReserveError::CapacityOverflow);
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn try_with_capacity_reports_failed_allocations() {
        // Representable in bytes, but far beyond any address space.
        let buckets = isize::MAX as usize / (2 * core::mem::size_of::<Slot<u64, u64>>());
        let err = BucketArray::<u64, u64>::try_with_capacity(buckets).unwrap_err();
        assert!(matches!(err, TryReserveError::AllocError { buckets: b, .. } if b == buckets));
    }

    #[test]
    fn into_slots_visits_every_bucket() {
        let mut array: BucketArray<u64, u64> = BucketArray::with_capacity(3);
        array.get_or_insert(1).push_back(1, 1);
        let slots: Vec<_> = array.into_slots().collect();
        assert_eq!(slots.len(), 3);
        assert!(slots[0].is_none());
        assert_eq!(slots[1].as_ref().map(BucketChain::len), Some(1));
    }
}
