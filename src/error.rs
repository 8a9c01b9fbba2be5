use std::collections::TryReserveError;
use thiserror::Error;

/// Failures reported by the table's fallible operations.
///
/// A missing key is not an error; lookups report it with `None`/`false`.
#[derive(Debug, Error)]
pub enum MapError {
    /// The bucket array could not be allocated.
    #[error("bucket array allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
    /// Doubling the bucket count would overflow `usize`.
    #[error("bucket count {capacity} cannot be doubled")]
    CapacityOverflow { capacity: usize },
}
