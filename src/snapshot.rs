//! Owned, point-in-time views of a [`HashMap`](crate::HashMap).
//!
//! Each call to [`entries`](crate::HashMap::entries),
//! [`keys`](crate::HashMap::keys) or [`values`](crate::HashMap::values)
//! clones the live contents into a fresh allocation, so a snapshot can be
//! modified or kept around freely without affecting the map. Equality
//! ignores order: [`Entries`] and [`Keys`] compare as sets, [`Values`]
//! compares as a multiset.

use alloc::vec::Vec;
use core::fmt::Debug;

/// A snapshot of the live key-value pairs.
#[derive(Clone)]
pub struct Entries<K, V> {
    pairs: Vec<(K, V)>,
}

impl<K, V> Entries<K, V> {
    pub(crate) fn new(pairs: Vec<(K, V)>) -> Self {
        Self { pairs }
    }

    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if the snapshot holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the pairs in unspecified order.
    pub fn as_slice(&self) -> &[(K, V)] {
        &self.pairs
    }

    /// Returns an iterator over the pairs in unspecified order.
    pub fn iter(&self) -> core::slice::Iter<'_, (K, V)> {
        self.pairs.iter()
    }

    /// Removes and returns the pair for `key`, if present.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)>
    where
        K: PartialEq,
    {
        let index = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.swap_remove(index))
    }

    /// Returns `true` if the snapshot holds exactly this pair.
    pub fn contains(&self, key: &K, value: &V) -> bool
    where
        K: PartialEq,
        V: PartialEq,
    {
        self.pairs.iter().any(|(k, v)| k == key && v == value)
    }
}

impl<K, V> PartialEq for Entries<K, V>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        // Keys are unique within a snapshot, so equal lengths plus inclusion
        // is set equality.
        self.len() == other.len() && self.iter().all(|(k, v)| other.contains(k, v))
    }
}

impl<K: Eq, V: Eq> Eq for Entries<K, V> {}

impl<K: Debug, V: Debug> Debug for Entries<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.pairs.iter()).finish()
    }
}

impl<K, V> IntoIterator for Entries<K, V> {
    type Item = (K, V);
    type IntoIter = alloc::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a Entries<K, V> {
    type Item = &'a (K, V);
    type IntoIter = core::slice::Iter<'a, (K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// A snapshot of the live keys.
#[derive(Clone)]
pub struct Keys<K> {
    keys: Vec<K>,
}

impl<K> Keys<K> {
    pub(crate) fn new(keys: Vec<K>) -> Self {
        Self { keys }
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the snapshot holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the keys in unspecified order.
    pub fn as_slice(&self) -> &[K] {
        &self.keys
    }

    /// Returns an iterator over the keys in unspecified order.
    pub fn iter(&self) -> core::slice::Iter<'_, K> {
        self.keys.iter()
    }

    /// Returns `true` if the snapshot holds `key`.
    pub fn contains(&self, key: &K) -> bool
    where
        K: PartialEq,
    {
        self.keys.contains(key)
    }
}

impl<K: PartialEq> PartialEq for Keys<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl<K: Eq> Eq for Keys<K> {}

impl<K: Debug> Debug for Keys<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.keys.iter()).finish()
    }
}

impl<K> IntoIterator for Keys<K> {
    type Item = K;
    type IntoIter = alloc::vec::IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a Keys<K> {
    type Item = &'a K;
    type IntoIter = core::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// A snapshot of the live values.
///
/// Unlike keys, values may repeat; equality counts repetitions.
#[derive(Clone)]
pub struct Values<V> {
    values: Vec<V>,
}

impl<V> Values<V> {
    pub(crate) fn new(values: Vec<V>) -> Self {
        Self { values }
    }

    /// Returns the number of values, repetitions included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the snapshot holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the values in unspecified order.
    pub fn as_slice(&self) -> &[V] {
        &self.values
    }

    /// Returns an iterator over the values in unspecified order.
    pub fn iter(&self) -> core::slice::Iter<'_, V> {
        self.values.iter()
    }

    /// Returns `true` if at least one value equals `value`.
    pub fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values.contains(value)
    }

    /// Returns how many values equal `value`.
    pub fn count(&self, value: &V) -> usize
    where
        V: PartialEq,
    {
        self.values.iter().filter(|v| *v == value).count()
    }
}

impl<V: PartialEq> PartialEq for Values<V> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        let mut matched = alloc::vec![false; other.len()];
        self.values.iter().all(|value| {
            let slot = other
                .values
                .iter()
                .enumerate()
                .position(|(i, candidate)| !matched[i] && candidate == value);
            match slot {
                Some(i) => {
                    matched[i] = true;
                    true
                }
                None => false,
            }
        })
    }
}

impl<V: Eq> Eq for Values<V> {}

impl<V: Debug> Debug for Values<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

impl<V> IntoIterator for Values<V> {
    type Item = V;
    type IntoIter = alloc::vec::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Values<V> {
    type Item = &'a V;
    type IntoIter = core::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
