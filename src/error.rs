/// Errors reported by table construction and keyed operations.
///
/// Every error is scoped to the call that produced it; the table is left in
/// the state it had before the failing call.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The requested capacity was zero.
    #[error("invalid capacity {capacity}: capacity must be at least 1")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },
    /// The load-factor threshold was outside `(0, 1]`.
    #[error("invalid load factor threshold {threshold}: expected a value in (0, 1]")]
    InvalidThreshold {
        /// The rejected threshold.
        threshold: f64,
    },
    /// The key is not present in the table.
    #[error("key not found")]
    KeyNotFound,
    /// No empty slot or matching key was found along the full probe sequence.
    ///
    /// Only reachable when automatic growth is disabled.
    #[error("no free slot left in a table of capacity {capacity}")]
    OutOfSpace {
        /// Capacity of the saturated table.
        capacity: usize,
    },
    /// The operand of an update or union is not the same kind of table.
    #[error("type mismatch: expected {expected}")]
    TypeMismatch {
        /// Type name of the table that was expected.
        expected: &'static str,
    },
}
