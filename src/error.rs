use alloc::collections::TryReserveError as AllocTryReserveError;

/// The error type for [`HashTable::try_reserve`](crate::HashTable::try_reserve).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TryReserveError {
    /// Doubling the bucket count would overflow `usize`.
    #[error("bucket count overflowed usize")]
    CapacityOverflow,

    /// The allocator could not provide storage for the new bucket array.
    #[error("failed to allocate {buckets} buckets")]
    AllocError {
        /// The bucket count that was requested.
        buckets: usize,
        /// The underlying allocation failure.
        #[source]
        source: AllocTryReserveError,
    },
}
