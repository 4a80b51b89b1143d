use core::fmt;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::num::NonZeroU64;

/// Default modulus of [`ReprHash`].
pub const DEFAULT_MAX_SIZE: u64 = 1000;

/// Maps a key to an integer hash.
///
/// Implementations must be consistent with key equality: two keys that
/// compare equal must produce the same hash. The table does not verify
/// this.
///
/// Any `Fn(&K) -> u64` closure is a `KeyHasher<K>`, which makes it easy to
/// plug in a custom function:
///
/// ```rust
/// use probing_hash::HashMap;
///
/// let mut map = HashMap::with_hasher(|key: &u32| u64::from(*key));
/// map.insert(3, "three").unwrap();
/// assert_eq!(map.get(&3), Ok(&"three"));
/// ```
pub trait KeyHasher<K: ?Sized> {
    /// Returns the hash of `key`.
    fn hash_key(&self, key: &K) -> u64;
}

impl<K, F> KeyHasher<K> for F
where
    K: ?Sized,
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

/// Adapts any [`BuildHasher`] to [`KeyHasher`] for keys implementing
/// [`Hash`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Hashed<S>(pub S);

impl<K, S> KeyHasher<K> for Hashed<S>
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.0.hash_one(key)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// A fast, randomly seeded hasher for keys implementing [`Hash`].
        pub type FastHasher = Hashed<foldhash::fast::RandomState>;
    } else if #[cfg(feature = "std")] {
        /// A randomly seeded hasher for keys implementing [`Hash`].
        pub type FastHasher = Hashed<std::hash::RandomState>;
    }
}

/// The default key hasher: a positional checksum over the key's `Debug`
/// representation.
///
/// Each character contributes `position * code_point` (positions start at
/// 1) and the sum is reduced modulo the configured maximum size. A single
/// leading quote character is skipped so that quoted string
/// representations are not all shifted by the same opening quote.
///
/// The result is deterministic across runs, which makes table layouts
/// reproducible, but the distribution is poor for large tables; see
/// [`distribute`](crate::distribution::distribute) to inspect it.
///
/// # Examples
///
/// ```rust
/// use probing_hash::KeyHasher;
/// use probing_hash::ReprHash;
///
/// // "12" -> 1 * '1' + 2 * '2' = 49 + 100
/// assert_eq!(ReprHash::new().hash_key(&12), 149);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReprHash {
    max_size: NonZeroU64,
}

impl Default for ReprHash {
    fn default() -> Self {
        Self::new()
    }
}

impl ReprHash {
    /// Creates a hasher reducing modulo [`DEFAULT_MAX_SIZE`].
    pub const fn new() -> Self {
        Self {
            max_size: NonZeroU64::new(DEFAULT_MAX_SIZE).unwrap(),
        }
    }

    /// Creates a hasher reducing modulo `max_size`.
    pub const fn with_max_size(max_size: NonZeroU64) -> Self {
        Self { max_size }
    }

    /// Returns the modulus applied to every hash.
    pub fn max_size(&self) -> u64 {
        self.max_size.get()
    }
}

impl<K> KeyHasher<K> for ReprHash
where
    K: Debug + ?Sized,
{
    fn hash_key(&self, key: &K) -> u64 {
        let mut sink = ReprSink {
            position: 0,
            sum: 0,
            modulus: self.max_size.get(),
            leading: true,
        };
        // The sink never fails. A `Debug` impl that errors stops the walk
        // early and the partial sum is used as the hash.
        match fmt::write(&mut sink, format_args!("{key:?}")) {
            Ok(()) | Err(fmt::Error) => sink.sum,
        }
    }
}

/// Consumes formatted output without buffering it.
struct ReprSink {
    position: u64,
    sum: u64,
    modulus: u64,
    leading: bool,
}

impl fmt::Write for ReprSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.leading {
                self.leading = false;
                if ch == '"' || ch == '\'' {
                    continue;
                }
            }

            self.position += 1;
            let term = u128::from(self.position) * u128::from(u32::from(ch));
            self.sum = ((u128::from(self.sum) + term) % u128::from(self.modulus)) as u64;
        }
        Ok(())
    }
}
