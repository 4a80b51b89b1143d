use core::any::Any;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Display;
use core::iter::FusedIterator;

use crate::config::TableConfig;
use crate::error::Error;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::hasher::KeyHasher;
use crate::hasher::ReprHash;
use crate::snapshot::Entries;
use crate::snapshot::Keys;
use crate::snapshot::Values;

/// A hash map implemented using the linear-probing [`HashTable`] as the
/// underlying storage.
///
/// `HashMap<K, V, H>` stores key-value pairs where keys implement `Eq` and
/// uses the pluggable [`KeyHasher`] `H` to hash keys. The default hasher is
/// [`ReprHash`], which hashes the key's `Debug` representation.
///
/// Lookups and removals that miss return [`Error::KeyNotFound`]; inserts can
/// only fail with [`Error::OutOfSpace`] when growth is disabled. Two maps are
/// equal when they hold the same pairs, regardless of capacity, threshold or
/// slot layout.
///
/// # Examples
///
/// ```rust
/// use probing_hash::Error;
/// use probing_hash::HashMap;
///
/// let mut map: HashMap<&str, &str> = HashMap::new();
/// map.insert("hola", "hello").unwrap();
/// assert_eq!(map.get(&"hola"), Ok(&"hello"));
///
/// assert_eq!(map.remove(&"hola"), Ok("hello"));
/// assert_eq!(map.get(&"hola"), Err(Error::KeyNotFound));
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, H = ReprHash> {
    table: HashTable<(K, V)>,
    hasher: H,
}

impl<K, V, H> Debug for HashMap<K, V, H>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

/// Renders the pairs as `{key: value, ...}` in unspecified order.
impl<K, V, H> Display for HashMap<K, V, H>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k:?}: {v:?}")?;
        }
        f.write_str("}")
    }
}

impl<K, V, H> HashMap<K, V, H> {
    /// Returns the number of live entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probing_hash::HashMap;
    /// #
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots.
    ///
    /// Capacity only changes when an insert finds the load factor at or
    /// above the threshold, in which case it doubles.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the share of slots that are live or tombstoned.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns the load factor that triggers growth.
    pub fn threshold(&self) -> f64 {
        self.table.threshold()
    }

    /// Returns the key hasher.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Removes all entries, keeping the current capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the key-value pairs in unspecified order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns a snapshot of all key-value pairs.
    ///
    /// Every call clones the pairs into a new allocation; changing the
    /// snapshot never affects the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probing_hash::HashMap;
    /// #
    /// let mut map: HashMap<&str, i32> = HashMap::new();
    /// map.insert("a", 1).unwrap();
    /// map.insert("b", 2).unwrap();
    ///
    /// let entries = map.entries();
    /// assert!(entries.contains(&"a", &1));
    /// assert_eq!(entries, map.entries());
    /// ```
    pub fn entries(&self) -> Entries<K, V>
    where
        K: Clone,
        V: Clone,
    {
        Entries::new(self.table.iter().cloned().collect())
    }

    /// Returns a snapshot of all keys.
    pub fn keys(&self) -> Keys<K>
    where
        K: Clone,
    {
        Keys::new(self.table.iter().map(|(k, _)| k.clone()).collect())
    }

    /// Returns a snapshot of all values, repetitions included.
    pub fn values(&self) -> Values<V>
    where
        V: Clone,
    {
        Values::new(self.table.iter().map(|(_, v)| v.clone()).collect())
    }

    /// Returns the number of live entries per displacement from their home
    /// slot.
    ///
    /// Requires the `stats` feature.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> crate::hash_table::ProbeHistogram {
        self.table.probe_histogram()
    }

    /// Returns slot usage statistics.
    ///
    /// Requires the `stats` feature.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }
}

impl<K, V, H> HashMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K>,
{
    /// Creates an empty map with the default configuration and the given
    /// hasher.
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            table: HashTable::new(),
            hasher,
        }
    }

    /// Creates an empty map from an explicit configuration and hasher.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidCapacity`] if the capacity is zero and
    /// with [`Error::InvalidThreshold`] if the threshold is outside
    /// `(0, 1]`.
    pub fn with_config_and_hasher(config: TableConfig, hasher: H) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::with_config(config)?,
            hasher,
        })
    }

    /// Inserts a key-value pair, returning the value it replaced.
    ///
    /// If the load factor has reached the threshold, the map first doubles
    /// its capacity and re-inserts every live entry.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::OutOfSpace`] if growth is disabled and no empty
    /// slot is left along the key's probe sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probing_hash::HashMap;
    /// #
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// assert_eq!(map.insert(37, "a"), Ok(None));
    /// assert_eq!(map.insert(37, "b"), Ok(Some("a")));
    /// assert_eq!(map.get(&37), Ok(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        let hash = self.hasher.hash_key(&key);
        match self.table.entry(hash, |(k, _)| k == &key)? {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                Ok(Some(old_value))
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                Ok(None)
            }
        }
    }

    /// Returns a reference to the value for `key`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is absent.
    pub fn get(&self, key: &K) -> Result<&V, Error> {
        let hash = self.hasher.hash_key(key);
        self.table
            .find(hash, |(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value for `key`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is absent.
    pub fn get_mut(&mut self, key: &K) -> Result<&mut V, Error> {
        let hash = self.hasher.hash_key(key);
        self.table
            .find_mut(hash, |(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or(Error::KeyNotFound)
    }

    /// Returns the value for `key`, or `default` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probing_hash::HashMap;
    /// #
    /// let mut map: HashMap<&str, &str> = HashMap::new();
    /// map.insert("hola", "hello").unwrap();
    /// assert_eq!(map.get_or(&"hola", &"default"), &"hello");
    /// assert_eq!(map.get_or(&"missing", &"default"), &"default");
    /// ```
    pub fn get_or<'a>(&'a self, key: &K, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_ok()
    }

    /// Removes `key`, returning its value.
    ///
    /// The slot is left as a tombstone, so capacity is unchanged.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is absent.
    pub fn remove(&mut self, key: &K) -> Result<V, Error> {
        let hash = self.hasher.hash_key(key);
        self.table
            .remove(hash, |(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or(Error::KeyNotFound)
    }

    /// Inserts every entry of `other`; where both maps hold a key, the value
    /// from `other` wins.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::OutOfSpace`] from the first insert that fails;
    /// entries inserted before it are kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probing_hash::HashMap;
    /// #
    /// let mut left: HashMap<&str, i32> = HashMap::new();
    /// left.insert("a", 1).unwrap();
    /// left.insert("b", 2).unwrap();
    ///
    /// let mut right: HashMap<&str, i32> = HashMap::new();
    /// right.insert("b", 20).unwrap();
    /// right.insert("c", 30).unwrap();
    ///
    /// left.update(&right).unwrap();
    /// assert_eq!(left.len(), 3);
    /// assert_eq!(left.get(&"b"), Ok(&20));
    /// ```
    pub fn update<H2>(&mut self, other: &HashMap<K, V, H2>) -> Result<(), Error>
    where
        K: Clone,
        V: Clone,
    {
        for (k, v) in other.iter() {
            self.insert(k.clone(), v.clone())?;
        }
        Ok(())
    }

    /// Returns a new map holding the entries of both maps; where both hold a
    /// key, the value from `other` wins.
    pub fn union<H2>(&self, other: &HashMap<K, V, H2>) -> Result<Self, Error>
    where
        K: Clone,
        V: Clone,
        H: Clone,
    {
        let mut merged = self.clone();
        merged.update(other)?;
        Ok(merged)
    }
}

impl<K, V, H> HashMap<K, V, H>
where
    K: Eq + 'static,
    V: 'static,
    H: KeyHasher<K> + 'static,
{
    /// Like [`update`](Self::update) for an operand whose type is only
    /// known at runtime.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::TypeMismatch`] unless `other` is a map of the
    /// same type as `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probing_hash::Error;
    /// # use probing_hash::HashMap;
    /// #
    /// let mut map: HashMap<&'static str, i32> = HashMap::new();
    /// assert!(matches!(
    ///     map.update_any(&vec![("a", 1)]),
    ///     Err(Error::TypeMismatch { .. })
    /// ));
    /// ```
    pub fn update_any(&mut self, other: &dyn Any) -> Result<(), Error>
    where
        K: Clone,
        V: Clone,
    {
        let other = other.downcast_ref::<Self>().ok_or(Error::TypeMismatch {
            expected: core::any::type_name::<Self>(),
        })?;
        self.update(other)
    }

    /// Like [`union`](Self::union) for an operand whose type is only known
    /// at runtime.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::TypeMismatch`] unless `other` is a map of the
    /// same type as `self`.
    pub fn union_any(&self, other: &dyn Any) -> Result<Self, Error>
    where
        K: Clone,
        V: Clone,
        H: Clone,
    {
        let mut merged = self.clone();
        merged.update_any(other)?;
        Ok(merged)
    }

    /// Compares against a value whose type is only known at runtime.
    ///
    /// Anything that is not a map of the same type is unequal.
    pub fn eq_any(&self, other: &dyn Any) -> bool
    where
        V: PartialEq,
    {
        other
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }
}

impl<K, V, H> HashMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K> + Default,
{
    /// Creates an empty map with capacity
    /// [`DEFAULT_CAPACITY`](crate::config::DEFAULT_CAPACITY) and threshold
    /// [`DEFAULT_LOAD_FACTOR_THRESHOLD`](crate::config::DEFAULT_LOAD_FACTOR_THRESHOLD).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probing_hash::HashMap;
    /// #
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 8);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(H::default())
    }

    /// Creates an empty map with `capacity` slots and the default threshold.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probing_hash::Error;
    /// # use probing_hash::HashMap;
    /// #
    /// let map: HashMap<i32, String> = HashMap::with_capacity(100).unwrap();
    /// assert_eq!(map.capacity(), 100);
    ///
    /// assert_eq!(
    ///     HashMap::<i32, String>::with_capacity(0).unwrap_err(),
    ///     Error::InvalidCapacity { capacity: 0 }
    /// );
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::with_config(TableConfig::default().with_capacity(capacity))
    }

    /// Creates an empty map with `capacity` slots that grows once the load
    /// factor reaches `threshold`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidCapacity`] or [`Error::InvalidThreshold`].
    pub fn with_capacity_and_threshold(capacity: usize, threshold: f64) -> Result<Self, Error> {
        Self::with_config(
            TableConfig::default()
                .with_capacity(capacity)
                .with_load_factor_threshold(threshold),
        )
    }

    /// Creates an empty map from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidCapacity`] or [`Error::InvalidThreshold`].
    pub fn with_config(config: TableConfig) -> Result<Self, Error> {
        Self::with_config_and_hasher(config, H::default())
    }
}

impl<K, V, H> Default for HashMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H, H2> PartialEq<HashMap<K, V, H2>> for HashMap<K, V, H>
where
    K: Eq,
    V: PartialEq,
    H2: KeyHasher<K>,
{
    fn eq(&self, other: &HashMap<K, V, H2>) -> bool {
        let same_instance = core::ptr::eq(
            self as *const Self as *const (),
            other as *const HashMap<K, V, H2> as *const (),
        );
        if same_instance {
            return true;
        }

        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_ok_and(|other_v| v == other_v))
    }
}

impl<K, V, H> Eq for HashMap<K, V, H>
where
    K: Eq,
    V: Eq,
    H: KeyHasher<K>,
{
}

impl<'a, K, V, H> IntoIterator for &'a HashMap<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
