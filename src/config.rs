//! Sizing policy shared by both storage strategies.

use crate::error::MapError;

/// Slots (Strategy A) or chains (Strategy B) allocated by a new map.
pub const DEFAULT_INITIAL_CAPACITY: usize = 100;

/// Multiplier applied to the capacity whenever the map grows.
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

/// Builder-style sizing configuration.
///
/// ```
/// use simap::MapConfig;
/// let cfg = MapConfig::new().with_initial_capacity(16).with_growth_factor(4);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MapConfig {
    pub(crate) initial_capacity: usize,
    pub(crate) growth_factor: usize,
}

impl MapConfig {
    pub const fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_growth_factor(mut self, factor: usize) -> Self {
        self.growth_factor = factor;
        self
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    pub fn growth_factor(&self) -> usize {
        self.growth_factor
    }

    /// Rejects configurations that could never grow or never hold an entry.
    pub fn validate(&self) -> Result<(), MapError> {
        if self.initial_capacity == 0 {
            return Err(MapError::InvalidConfig("initial capacity must be positive"));
        }
        if self.growth_factor < 2 {
            return Err(MapError::InvalidConfig("growth factor must be at least 2"));
        }
        Ok(())
    }

    /// Capacity after one growth step from `current`.
    pub(crate) fn grown(&self, current: usize) -> Result<usize, MapError> {
        current
            .checked_mul(self.growth_factor)
            .ok_or(MapError::CapacityOverflow { capacity: current })
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new()
    }
}
