use chain_hash::HashTable;
use chain_hash::convert::BuildIdentityHasher;
use chain_hash::hash_table::Entry;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    /// Number of distinct keys to insert.
    #[arg(short = 'n', long = "entries", default_value_t = 1000)]
    entries: usize,

    /// Starting bucket count.
    #[arg(short = 'b', long = "buckets", default_value_t = chain_hash::INITIAL_BUCKETS)]
    buckets: usize,

    /// Hash keys with the identity hasher instead of the default one.
    #[arg(long = "identity")]
    identity: bool,
}

fn fill<S: core::hash::BuildHasher>(table: &mut HashTable<u64, u64, S>, entries: usize) {
    let mut rehashes = 0;
    for i in 0..entries {
        let key = i as u64;
        let before = table.capacity();

        match table.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(key * 10);
            }
            Entry::Occupied(_) => {
                panic!("Key already exists in table: {}", key);
            }
        }

        if table.capacity() != before {
            rehashes += 1;
        }
    }

    println!("Inserted {} entries ({} rehashes)", table.len(), rehashes);
    println!("Final bucket count: {}", table.capacity());
    println!(
        "Final load factor: {:.2}",
        table.len() as f64 / table.capacity() as f64
    );

    table.chain_histogram().print();
    table.debug_stats().print();
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating HashTable with {} buckets, filling it with {} u64 keys...",
        args.buckets, args.entries
    );

    if args.identity {
        let mut table = HashTable::with_capacity_and_hasher(args.buckets, BuildIdentityHasher);
        fill(&mut table, args.entries);
    } else {
        let mut table = HashTable::with_capacity(args.buckets);
        fill(&mut table, args.entries);
    }
}
