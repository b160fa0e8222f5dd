use alloc::vec::Vec;

/// Bucket and chain statistics for a [`HashTable`](crate::HashTable).
///
/// Produced by [`HashTable::debug_stats`](crate::HashTable::debug_stats).
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries currently in the table
    pub populated: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Number of buckets holding at least one entry
    pub occupied_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Load factor (populated / capacity), not truncated
    pub load_factor: f64,
    /// Bucket utilization (occupied_buckets / capacity)
    pub bucket_utilization: f64,
    /// Bytes used by the bucket array and the chain nodes
    pub total_bytes: usize,
}

impl DebugStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {} entries in {} buckets ({:.2} load factor)",
            self.populated, self.capacity, self.load_factor
        );
        println!(
            "Bucket Usage: {}/{} ({:.2}% utilization)",
            self.occupied_buckets,
            self.capacity,
            self.bucket_utilization * 100.0
        );
        println!("Longest Chain: {} entries", self.longest_chain);
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// A histogram of chain lengths.
///
/// Produced by [`HashTable::chain_histogram`](crate::HashTable::chain_histogram).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHistogram {
    pub(crate) counts: Vec<usize>,
}

impl ChainHistogram {
    /// Bucket counts indexed by chain length; index 0 counts empty buckets.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!(
            "chain histogram ({} buckets):",
            self.counts.iter().sum::<usize>()
        );

        for (len, &count) in self.counts.iter().enumerate() {
            let units = (count * total_units).div_ceil(max);
            let mut bar = "█".repeat(units / 8);
            let partial = match units % 8 {
                0 => None,
                1 => Some('▏'),
                2 => Some('▎'),
                3 => Some('▍'),
                4 => Some('▌'),
                5 => Some('▋'),
                6 => Some('▊'),
                _ => Some('▉'),
            };
            bar.extend(partial);
            println!("{len:>3} | {bar} ({count})");
        }
    }
}
