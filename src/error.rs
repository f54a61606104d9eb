//! Error types for map construction, mutation and the tally glue.

use std::collections::TryReserveError;
use thiserror::Error;

/// Failure of a map operation. The map is left exactly as it was before the
/// failing call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A fallible reservation (key copy, storage growth, key list) failed.
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    /// The grown capacity does not fit in `usize`.
    #[error("capacity overflow growing beyond {capacity} slots")]
    CapacityOverflow { capacity: usize },
    #[error("invalid map configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Failure while tallying input lines or writing counts.
#[derive(Error, Debug)]
pub enum TallyError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Map(#[from] MapError),
}
