use core::hash::BuildHasher;
use core::hash::Hasher;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is named explicitly.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when none is named explicitly.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// The hasher builder used when none is named explicitly.
        pub type DefaultHashBuilder = BuildIdentityHasher;
    }
}

/// A [`BuildHasher`] whose hash of an integer key is the integer itself.
///
/// This gives predictable bucket placement: a key `k` lands in bucket
/// `k % capacity`. It is a good fit for dense integer identifiers and a poor
/// fit for anything adversarial. Signed integers are sign-extended to 64 bits
/// before the cast, so `-1i32` hashes to `u64::MAX`.
///
/// Keys that write more than one value (strings, tuples, slices) are folded
/// together with a rotate and xor, which keeps the hasher usable but offers no
/// distribution guarantees.
///
/// # Examples
///
/// ```rust
/// use chain_hash::HashTable;
/// use chain_hash::convert::BuildIdentityHasher;
///
/// let mut table = HashTable::with_capacity_and_hasher(8, BuildIdentityHasher);
/// table.insert(17u64, "seventeen");
/// assert_eq!(table.hash_index(&17), 1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildIdentityHasher;

impl BuildHasher for BuildIdentityHasher {
    type Hasher = IdentityHasher;

    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher::default()
    }
}

/// The [`Hasher`] produced by [`BuildIdentityHasher`].
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityHasher {
    hash: u64,
}

impl IdentityHasher {
    #[inline(always)]
    fn fold(&mut self, value: u64) {
        // A fresh hasher starts at zero, so a single integer write hashes to
        // exactly that integer.
        self.hash = self.hash.rotate_left(8) ^ value;
    }
}

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.fold(u64::from(byte));
        }
    }

    fn write_u8(&mut self, i: u8) {
        self.fold(u64::from(i));
    }

    fn write_u16(&mut self, i: u16) {
        self.fold(u64::from(i));
    }

    fn write_u32(&mut self, i: u32) {
        self.fold(u64::from(i));
    }

    fn write_u64(&mut self, i: u64) {
        self.fold(i);
    }

    fn write_usize(&mut self, i: usize) {
        self.fold(i as u64);
    }

    fn write_i8(&mut self, i: i8) {
        self.fold(i as u64);
    }

    fn write_i16(&mut self, i: i16) {
        self.fold(i as u64);
    }

    fn write_i32(&mut self, i: i32) {
        self.fold(i as u64);
    }

    fn write_i64(&mut self, i: i64) {
        self.fold(i as u64);
    }

    fn write_isize(&mut self, i: isize) {
        self.fold(i as u64);
    }
}
