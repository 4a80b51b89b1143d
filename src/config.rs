use crate::error::Error;

/// Number of slots allocated when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 8;

/// Load factor at which a table doubles when no threshold is given.
pub const DEFAULT_LOAD_FACTOR_THRESHOLD: f64 = 0.6;

/// Construction parameters for a table.
///
/// The load factor compared against the threshold counts both live entries
/// and tombstones. A threshold of exactly `1.0` disables automatic growth.
///
/// # Examples
///
/// ```rust
/// use probing_hash::TableConfig;
///
/// let config = TableConfig::default()
///     .with_capacity(32)
///     .with_load_factor_threshold(0.75);
/// assert!(config.validate().is_ok());
///
/// assert!(TableConfig::default().with_capacity(0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Initial number of slots.
    pub capacity: usize,
    /// Load factor in `(0, 1]` that triggers growth.
    pub load_factor_threshold: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor_threshold: DEFAULT_LOAD_FACTOR_THRESHOLD,
        }
    }
}

impl TableConfig {
    /// Sets the initial number of slots.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the load factor that triggers growth.
    pub fn with_load_factor_threshold(mut self, threshold: f64) -> Self {
        self.load_factor_threshold = threshold;
        self
    }

    /// Checks that the capacity is positive and the threshold lies in
    /// `(0, 1]`.
    pub fn validate(&self) -> Result<(), Error> {
        if self.capacity < 1 {
            return Err(Error::InvalidCapacity {
                capacity: self.capacity,
            });
        }

        // Written so that NaN is rejected as well.
        if !(self.load_factor_threshold > 0.0 && self.load_factor_threshold <= 1.0) {
            return Err(Error::InvalidThreshold {
                threshold: self.load_factor_threshold,
            });
        }

        Ok(())
    }

    /// Returns `true` if tables built from this config grow automatically.
    pub fn grows(&self) -> bool {
        threshold_grows(self.load_factor_threshold)
    }
}

/// Returns `true` if a table with this load-factor threshold grows
/// automatically. Only a threshold of exactly `1.0` disables growth.
pub(crate) fn threshold_grows(threshold: f64) -> bool {
    threshold < 1.0
}
