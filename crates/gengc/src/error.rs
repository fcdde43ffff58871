//! Error types.

use std::fmt;
use std::io;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while configuring or using a [`Heap`](crate::Heap).
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A [`HeapConfig`](crate::HeapConfig) field holds an unusable value.
    InvalidConfig {
        /// Name of the offending field or environment variable.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// The requested slot count cannot be represented as an object.
    TooLarge {
        /// Requested slot count.
        slots: usize,
    },
    /// The old generation cannot grow to satisfy a request, even after a
    /// major collection.
    Exhausted {
        /// Bytes requested.
        requested: usize,
        /// Old-generation occupancy at the time of the failure.
        heap_size: usize,
        /// Configured `max_heap_size`.
        limit: usize,
    },
    /// A value passed as an object is not a reference to a live object of
    /// this heap.
    InvalidReference {
        /// Raw bits of the value.
        bits: u64,
    },
    /// A slot index is past the end of the object.
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Slot count of the object.
        len: usize,
    },
    /// Mapping memory from the OS failed.
    Os(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid heap configuration: {field}: {reason}")
            }
            Self::TooLarge { slots } => {
                write!(f, "object with {slots} slots exceeds the maximum object size")
            }
            Self::Exhausted {
                requested,
                heap_size,
                limit,
            } => write!(
                f,
                "heap exhausted: cannot allocate {requested} bytes with {heap_size} of {limit} bytes in use"
            ),
            Self::InvalidReference { bits } => {
                write!(f, "{bits:#x} does not refer to a live object")
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "slot index {index} out of bounds for object of {len} slots")
            }
            Self::Os(err) => write!(f, "failed to map heap memory: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Os(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Os(err)
    }
}

/// Report an unrecoverable condition and abort the current thread.
///
/// Used where the heap cannot make progress: allocation failures in
/// [`Heap::alloc`](crate::Heap::alloc) and mapping failures in the middle of
/// a collection, after which the heap is no longer consistent.
#[cold]
#[inline(never)]
pub fn fatal(context: &str, err: &dyn fmt::Display) -> ! {
    crate::tracing::log_fatal(context, err);
    panic!("gengc: {context}: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::Exhausted {
            requested: 16,
            heap_size: 100,
            limit: 100,
        };
        assert_eq!(
            err.to_string(),
            "heap exhausted: cannot allocate 16 bytes with 100 of 100 bytes in use"
        );

        let err = Error::IndexOutOfBounds { index: 2, len: 2 };
        assert!(err.to_string().contains("slot index 2"));
    }

    #[test]
    fn test_os_error_has_source() {
        use std::error::Error as _;
        let err = Error::from(io::Error::new(io::ErrorKind::OutOfMemory, "no"));
        assert!(err.source().is_some());
        assert!(Error::TooLarge { slots: 1 }.source().is_none());
    }
}
