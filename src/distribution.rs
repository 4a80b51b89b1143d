//! Tools for judging how evenly a hasher spreads keys.
//!
//! [`distribute`] hashes every item into one of a fixed number of bins and
//! tallies the result; the [`Histogram`] renders as one text bar per
//! occupied bin:
//!
//! ```rust
//! use core::num::NonZeroUsize;
//!
//! use probing_hash::distribution::distribute;
//!
//! let bins = NonZeroUsize::new(3).unwrap();
//! let histogram = distribute(0..10u64, bins, &|n: &u64| *n);
//!
//! assert_eq!(histogram.to_string(), "  0 ■■■■ (4)\n  1 ■■■  (3)\n  2 ■■■  (3)\n");
//! ```

use alloc::collections::BTreeMap;
use core::fmt;
use core::num::NonZeroUsize;

use crate::hasher::KeyHasher;

const BAR: char = '■';

/// Number of items per bin, for bins that received at least one item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: BTreeMap<u64, usize>,
}

impl Histogram {
    /// Returns the number of items that landed in `bin`.
    pub fn count(&self, bin: u64) -> usize {
        self.counts.get(&bin).copied().unwrap_or(0)
    }

    /// Returns the number of bins holding at least one item.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if no items were tallied.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns the total number of tallied items.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Returns the count of the fullest bin, or zero when empty.
    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Returns `(bin, count)` pairs in ascending bin order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.counts.iter().map(|(&bin, &count)| (bin, count))
    }

    /// Prints the rendered histogram to stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        print!("{self}");
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max = self.max_count();
        for (bin, count) in self.iter() {
            write!(f, "{bin:3} ")?;
            for _ in 0..count {
                write!(f, "{BAR}")?;
            }
            writeln!(f, "{:pad$} ({count})", "", pad = max - count)?;
        }
        Ok(())
    }
}

/// Hashes every item with `hasher` and tallies `hash % bins`.
pub fn distribute<K, H>(
    items: impl IntoIterator<Item = K>,
    bins: NonZeroUsize,
    hasher: &H,
) -> Histogram
where
    H: KeyHasher<K> + ?Sized,
{
    let bins = bins.get() as u64;
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(hasher.hash_key(&item) % bins).or_insert(0) += 1;
    }
    Histogram { counts }
}
