#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Construction parameters and their defaults.
pub mod config;

pub mod distribution;

/// The error type shared by every fallible operation.
pub mod error;

/// A HashMap implementation using linear probing.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a key-value map interface with a pluggable key hasher.
pub mod hash_map;

pub mod hash_table;

/// Key hashers: the [`KeyHasher`] trait, the default [`ReprHash`] and
/// adapters for closures and [`BuildHasher`](core::hash::BuildHasher)s.
pub mod hasher;

pub mod snapshot;

pub use config::TableConfig;
pub use distribution::Histogram;
pub use distribution::distribute;
pub use error::Error;
pub use hash_map::HashMap;
pub use hash_table::HashTable;
#[cfg(any(feature = "foldhash", feature = "std"))]
pub use hasher::FastHasher;
pub use hasher::Hashed;
pub use hasher::KeyHasher;
pub use hasher::ReprHash;
pub use snapshot::Entries;
pub use snapshot::Keys;
pub use snapshot::Values;
