//! The raw open-addressing table.
//!
//! [`HashTable`] stores values of type `T` in a flat array of slots and
//! resolves collisions with linear probing. Callers supply the hash and an
//! equality predicate for every operation, which keeps this layer free of
//! any key type; [`HashMap`](crate::HashMap) builds the keyed API on top.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::config::TableConfig;
use crate::config::threshold_grows;
use crate::error::Error;

/// State of a single slot.
#[derive(Clone)]
enum Slot<T> {
    /// Never held a value. Terminates lookups.
    Empty,
    /// Holds a live value together with its full hash, so growth never needs
    /// to rehash.
    Occupied { hash: u64, value: T },
    /// Held a value that was removed. Lookups continue past it and inserts
    /// may reuse it.
    Tombstone,
}

impl<T> Slot<T> {
    #[inline(always)]
    fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// The sequence of slot indices visited for a hash.
///
/// Starts at `hash % capacity` and advances by one, wrapping at the end of
/// the slot array, until every slot has been visited exactly once. The
/// iterator only captures the starting point and capacity, so cloning it
/// restarts the walk from the same position.
///
/// # Examples
///
/// ```rust
/// # use probing_hash::hash_table::HashTable;
/// #
/// let table: HashTable<u32> = HashTable::with_capacity(4).unwrap();
/// let visited: Vec<usize> = table.probe(6).collect();
/// assert_eq!(visited, vec![2, 3, 0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct Probe {
    start: usize,
    step: usize,
    capacity: usize,
}

impl Iterator for Probe {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.step == self.capacity {
            return None;
        }

        let index = (self.start + self.step) % self.capacity;
        self.step += 1;
        Some(index)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.capacity - self.step;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Probe {}

impl FusedIterator for Probe {}

/// Outcome of walking the probe sequence for an insert.
enum Placement {
    Occupied(usize),
    Vacant(usize),
}

/// Probe-length statistics for a table.
///
/// Requires the `stats` feature.
#[cfg(feature = "stats")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// `counts[d]` is the number of live entries stored `d` slots past their
    /// home slot.
    pub counts: Vec<usize>,
}

#[cfg(feature = "stats")]
impl ProbeHistogram {
    /// Longest displacement of any live entry, or `None` for an empty table.
    pub fn max_probe_length(&self) -> Option<usize> {
        self.counts.iter().rposition(|&count| count != 0)
    }

    /// Pretty-prints the histogram as horizontal bars.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total: usize = self.counts.iter().sum();
        println!("probe histogram ({} entries):", total);
        for (distance, &count) in self.counts.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", distance, "█".repeat(width), count);
        }
    }
}

/// Slot usage statistics for a table.
///
/// Requires the `stats` feature.
#[cfg(feature = "stats")]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of live entries.
    pub populated: usize,
    /// Number of tombstoned slots.
    pub tombstones: usize,
    /// Number of never-used slots.
    pub empty: usize,
    /// Total number of slots.
    pub capacity: usize,
    /// `(populated + tombstones) / capacity`.
    pub load_factor: f64,
    /// Load factor that triggers growth.
    pub threshold: f64,
    /// Longest displacement of any live entry from its home slot.
    pub max_probe_length: usize,
}

#[cfg(feature = "stats")]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Slots: {} live, {} tombstones, {} empty of {}",
            self.populated, self.tombstones, self.empty, self.capacity
        );
        println!(
            "Load factor: {:.2}% (grows at {:.2}%)",
            self.load_factor * 100.0,
            self.threshold * 100.0
        );
        println!("Longest probe: {}", self.max_probe_length);
    }
}

/// An open-addressing hash table using linear probing.
///
/// `HashTable<T>` stores values of type `T` in a single slot array. Removing
/// a value leaves a tombstone in its slot so later probes still reach
/// entries that were displaced past it. Before every insert the table checks
/// its load factor, counting tombstones, and doubles its capacity once the
/// threshold is reached; growth re-inserts the live values only, so a grown
/// table holds no tombstones.
///
/// Like the keyed [`HashMap`](crate::HashMap), this type needs both the hash
/// and an equality predicate for each operation.
///
/// ## Example
///
/// ```rust
/// # use probing_hash::hash_table::Entry;
/// # use probing_hash::hash_table::HashTable;
/// #
/// #[derive(Debug, PartialEq)]
/// struct Person {
///     id: u64,
///     name: String,
/// }
///
/// let mut table = HashTable::new();
///
/// match table.entry(123, |p: &Person| p.id == 123).unwrap() {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
///
/// assert_eq!(table.find(123, |p| p.id == 123).unwrap().name, "Alice");
/// ```
#[derive(Clone)]
pub struct HashTable<T> {
    slots: Vec<Slot<T>>,
    populated: usize,
    tombstones: usize,
    threshold: f64,
}

impl<T> Debug for HashTable<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        struct SlotView<'a, T>(&'a Slot<T>);

        impl<T: Debug> Debug for SlotView<'_, T> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self.0 {
                    Slot::Empty => f.write_str(".."),
                    Slot::Tombstone => f.write_str("xx"),
                    Slot::Occupied { hash, value } => write!(f, "{hash:016x}: {value:?}"),
                }
            }
        }

        f.debug_struct("HashTable")
            .field("slots", &self.slots.iter().map(SlotView).collect::<Vec<_>>())
            .field("populated", &self.populated)
            .field("tombstones", &self.tombstones)
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl<T> Default for HashTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HashTable<T> {
    /// Creates a table with [`TableConfig::default`].
    pub fn new() -> Self {
        Self::allocate(TableConfig::default())
    }

    /// Creates a table with `capacity` slots and the default threshold.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probing_hash::Error;
    /// # use probing_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100).unwrap();
    /// assert_eq!(table.capacity(), 100);
    ///
    /// assert!(matches!(
    ///     HashTable::<String>::with_capacity(0),
    ///     Err(Error::InvalidCapacity { capacity: 0 })
    /// ));
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::with_config(TableConfig::default().with_capacity(capacity))
    }

    /// Creates a table from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidCapacity`] or [`Error::InvalidThreshold`]
    /// if the configuration does not validate.
    pub fn with_config(config: TableConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::allocate(config))
    }

    fn allocate(config: TableConfig) -> Self {
        trace!(
            capacity = config.capacity,
            threshold = config.load_factor_threshold,
            "allocating table"
        );

        let mut slots = Vec::with_capacity(config.capacity);
        slots.resize_with(config.capacity, || Slot::Empty);
        Self {
            slots,
            populated: 0,
            tombstones: 0,
            threshold: config.load_factor_threshold,
        }
    }

    /// Returns the number of live values.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no live values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots.
    ///
    /// Capacity never decreases: removals leave tombstones and growth
    /// doubles it.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the load factor that triggers growth.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the share of slots that are live or tombstoned.
    ///
    /// Tombstones count because they occupy positions in probe sequences.
    pub fn load_factor(&self) -> f64 {
        (self.populated + self.tombstones) as f64 / self.slots.len() as f64
    }

    /// Returns the slot a hash maps to before any probing.
    #[inline(always)]
    pub fn home_slot(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    /// Returns the probe sequence for `hash`.
    #[inline]
    pub fn probe(&self, hash: u64) -> Probe {
        Probe {
            start: self.home_slot(hash),
            step: 0,
            capacity: self.slots.len(),
        }
    }

    /// Removes all values, keeping the current capacity.
    ///
    /// Every slot returns to the empty state, tombstones included.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.populated = 0;
        self.tombstones = 0;
    }

    /// Returns an iterator over all live values in slot order.
    ///
    /// The order depends on hashes and capacity and is not meaningful.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// If the load factor has reached the threshold, the table first grows
    /// until it is below it. The probe sequence is then walked: tombstones
    /// are skipped, a live value satisfying `eq` yields an occupied entry,
    /// and the first empty slot ends the walk with a vacant entry. A vacant
    /// entry reuses the first tombstone passed on the way, if any.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::OutOfSpace`] if the whole probe sequence is
    /// exhausted without reaching an empty slot or a match. This requires
    /// growth to be disabled with a threshold of `1.0`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probing_hash::hash_table::Entry;
    /// # use probing_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    ///
    /// match table.entry(7, |s: &String| s == "hello").unwrap() {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     Entry::Occupied(mut entry) => {
    ///         *entry.get_mut() = "updated".to_string();
    ///     }
    /// }
    ///
    /// table
    ///     .entry(7, |s: &String| s == "hello")
    ///     .unwrap()
    ///     .or_insert("hello".to_string());
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Result<Entry<'_, T>, Error> {
        while self.should_grow() {
            self.grow()?;
        }

        match self.find_placement(hash, &eq) {
            Some(Placement::Occupied(index)) => Ok(Entry::Occupied(OccupiedEntry {
                table: self,
                index,
            })),
            Some(Placement::Vacant(index)) => Ok(Entry::Vacant(VacantEntry {
                table: self,
                index,
                hash,
            })),
            None => {
                warn!(
                    capacity = self.slots.len(),
                    populated = self.populated,
                    tombstones = self.tombstones,
                    "no free slot along the probe sequence"
                );
                Err(Error::OutOfSpace {
                    capacity: self.slots.len(),
                })
            }
        }
    }

    /// Returns a reference to the value matching `hash` and `eq`.
    ///
    /// The walk skips tombstones and stops at the first empty slot, since an
    /// insert never places a value past an empty slot.
    pub fn find(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<&T> {
        let index = self.find_index(hash, eq)?;
        match &self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the value matching `hash` and `eq`.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<&mut T> {
        let index = self.find_index(hash, eq)?;
        match &mut self.slots[index] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Removes and returns the value matching `hash` and `eq`.
    ///
    /// The slot becomes a tombstone; capacity is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probing_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(42, |&n: &u64| n == 42).unwrap().or_insert(42);
    ///
    /// assert_eq!(table.remove(42, |&n| n == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.remove(42, |&n| n == 42), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<T> {
        let index = self.find_index(hash, eq)?;
        Some(self.take(index))
    }

    fn find_index(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<usize> {
        for index in self.probe(hash) {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied { hash: h, value } => {
                    if *h == hash && eq(value) {
                        return Some(index);
                    }
                }
            }
        }

        None
    }

    fn find_placement(&self, hash: u64, eq: impl Fn(&T) -> bool) -> Option<Placement> {
        let mut reusable = None;
        for index in self.probe(hash) {
            match &self.slots[index] {
                Slot::Empty => return Some(Placement::Vacant(reusable.unwrap_or(index))),
                Slot::Tombstone => {
                    reusable.get_or_insert(index);
                }
                Slot::Occupied { hash: h, value } => {
                    if *h == hash && eq(value) {
                        return Some(Placement::Occupied(index));
                    }
                }
            }
        }

        None
    }

    fn take(&mut self, index: usize) -> T {
        match core::mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied { value, .. } => {
                self.populated -= 1;
                self.tombstones += 1;
                value
            }
            _ => unreachable!("take called on a slot without a value"),
        }
    }

    fn should_grow(&self) -> bool {
        threshold_grows(self.threshold) && self.load_factor() >= self.threshold
    }

    /// Doubles the slot array and re-inserts every live value.
    ///
    /// The new array is fully built before it replaces the old one.
    fn grow(&mut self) -> Result<(), Error> {
        let old_capacity = self.slots.len();
        let new_capacity = old_capacity
            .checked_mul(2)
            .ok_or(Error::OutOfSpace {
                capacity: old_capacity,
            })?;

        let mut slots = Vec::with_capacity(new_capacity);
        slots.resize_with(new_capacity, || Slot::Empty);
        let old_slots = core::mem::replace(&mut self.slots, slots);
        let dropped_tombstones = core::mem::take(&mut self.tombstones);

        for slot in old_slots {
            if let Slot::Occupied { hash, value } = slot {
                // Live hashes are unique per value, so the first empty slot is
                // the right one and no equality check is needed.
                let index = self
                    .probe(hash)
                    .find(|&index| self.slots[index].is_empty())
                    .expect("grown table has more slots than live values");
                self.slots[index] = Slot::Occupied { hash, value };
            }
        }

        debug!(
            old_capacity,
            new_capacity,
            live = self.populated,
            dropped_tombstones,
            "grew table"
        );

        Ok(())
    }

    /// Returns the number of live values per displacement from their home
    /// slot.
    ///
    /// Requires the `stats` feature.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let capacity = self.slots.len();
        let mut counts = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied { hash, .. } = slot {
                let distance = (index + capacity - self.home_slot(*hash)) % capacity;
                if counts.len() <= distance {
                    counts.resize(distance + 1, 0);
                }
                counts[distance] += 1;
            }
        }

        ProbeHistogram { counts }
    }

    /// Returns slot usage statistics.
    ///
    /// Requires the `stats` feature.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> DebugStats {
        DebugStats {
            populated: self.populated,
            tombstones: self.tombstones,
            empty: self.slots.iter().filter(|slot| slot.is_empty()).count(),
            capacity: self.slots.len(),
            load_factor: self.load_factor(),
            threshold: self.threshold,
            max_probe_length: self.probe_histogram().max_probe_length().unwrap_or(0),
        }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, T> {
    /// A vacant entry - no matching value is present.
    Vacant(VacantEntry<'a, T>),
    /// An occupied entry - a matching value is present.
    Occupied(OccupiedEntry<'a, T>),
}

impl<'a, T> Entry<'a, T> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value.
    pub fn or_insert_with(self, default: impl FnOnce() -> T) -> &'a mut T {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }
}

/// A view into a vacant slot chosen for an insert.
pub struct VacantEntry<'a, T> {
    table: &'a mut HashTable<T>,
    index: usize,
    hash: u64,
}

impl<'a, T> VacantEntry<'a, T> {
    /// Writes `value` into the slot and returns a mutable reference to it.
    pub fn insert(self, value: T) -> &'a mut T {
        let table = self.table;
        if matches!(table.slots[self.index], Slot::Tombstone) {
            table.tombstones -= 1;
        }
        table.populated += 1;

        let slot = &mut table.slots[self.index];
        *slot = Slot::Occupied {
            hash: self.hash,
            value,
        };
        match slot {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!(),
        }
    }
}

/// A view into an occupied slot.
pub struct OccupiedEntry<'a, T> {
    table: &'a mut HashTable<T>,
    index: usize,
}

impl<'a, T> OccupiedEntry<'a, T> {
    /// Gets a reference to the value.
    pub fn get(&self) -> &T {
        match &self.table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!(),
        }
    }

    /// Gets a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut T {
        match &mut self.table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!(),
        }
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut T {
        let table = self.table;
        match &mut table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!(),
        }
    }

    /// Removes the value, leaving a tombstone in its slot.
    pub fn remove(self) -> T {
        self.table.take(self.index)
    }
}

/// An iterator over the live values of a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, T> {
    slots: core::slice::Iter<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Slot::Occupied { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
