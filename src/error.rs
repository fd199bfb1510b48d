//! Error type shared by every fallible `ChainMap` operation.

use std::collections::TryReserveError;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Which buffer a failed reservation was for.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Buffer {
    Buckets,
    Key,
    Value,
    LookupCopy,
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Buffer::Buckets => "bucket array",
            Buffer::Key => "key copy",
            Buffer::Value => "value copy",
            Buffer::LookupCopy => "lookup result",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("keys must be at least one byte long")]
    EmptyKey,

    #[error("map is not initialized")]
    Uninitialized,

    #[error("bucket count must be at least 1")]
    InvalidCapacity,

    #[error("load factor must be finite, got {0}")]
    InvalidLoadFactor(f32),

    #[error("cannot allocate {what} of {bytes} bytes: {source}")]
    AllocationFailure {
        what: Buffer,
        bytes: usize,
        #[source]
        source: TryReserveError,
    },
}

impl Error {
    /// Malformed input or an unusable map; the operation had no effect.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::EmptyKey
                | Error::Uninitialized
                | Error::InvalidCapacity
                | Error::InvalidLoadFactor(_)
        )
    }

    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, Error::AllocationFailure { .. })
    }
}

#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        if std::mem::discriminant(self) != std::mem::discriminant(other) {
            return false;
        }

        // Good enough for testing purposes
        format!("{self:?}") == format!("{other:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(Error::EmptyKey.is_invalid_argument());
        assert!(Error::Uninitialized.is_invalid_argument());
        assert!(Error::InvalidCapacity.is_invalid_argument());
        assert!(Error::InvalidLoadFactor(f32::NAN).is_invalid_argument());

        let source = Vec::<u8>::new().try_reserve_exact(usize::MAX).unwrap_err();
        let err = Error::AllocationFailure {
            what: Buffer::Buckets,
            bytes: usize::MAX,
            source,
        };
        assert!(err.is_allocation_failure());
        assert!(!err.is_invalid_argument());
        assert!(err.to_string().starts_with("cannot allocate bucket array"));
    }
}
