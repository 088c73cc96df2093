//! Error types for memocache

use thiserror::Error;

/// Result type alias for memocache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for range-sum cache operations
///
/// Cache misses are never errors: lookups return `Option`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Index outside `[0, len)` of the backing array
    #[error("Index out of bounds: {index} (len {len})")]
    IndexOutOfBounds {
        /// Offending index
        index: usize,
        /// Length of the backing array
        len: usize,
    },

    /// Range with `low > high`
    #[error("Invalid range: [{low}, {high}]")]
    InvalidRange {
        /// Lower bound
        low: usize,
        /// Upper bound
        high: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::IndexOutOfBounds { index: 7, len: 5 };
        assert_eq!(err.to_string(), "Index out of bounds: 7 (len 5)");

        let err = Error::InvalidRange { low: 3, high: 1 };
        assert_eq!(err.to_string(), "Invalid range: [3, 1]");
    }
}
