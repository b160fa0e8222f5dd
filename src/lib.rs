#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// The resizable array of bucket slots that backs a [`HashTable`].
pub mod bucket_array;

/// Owned singly linked chains holding the entries of one bucket.
pub mod bucket_chain;

/// Hasher builders, including the default one and an identity hasher for
/// integer keys.
pub mod convert;

mod error;

/// The separately chained [`HashTable`] and its entry and iterator types.
pub mod hash_table;

#[cfg(feature = "stats")]
mod stats;

pub use convert::DefaultHashBuilder;
pub use error::TryReserveError;
pub use hash_table::Entry;
pub use hash_table::HashTable;
pub use hash_table::INITIAL_BUCKETS;
pub use hash_table::MAX_LOAD_FACTOR;
#[cfg(feature = "stats")]
pub use stats::ChainHistogram;
#[cfg(feature = "stats")]
pub use stats::DebugStats;
