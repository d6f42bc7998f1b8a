// nexus-indexed/src/error.rs

//! Error types for indexed list operations.

use thiserror::Error;

/// Errors returned by [`IndexedList`](crate::IndexedList) and its builder.
///
/// Every check runs before any state is touched: an operation that returns
/// an error leaves the list and all of its indices exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A registered property expression is not a simple property read.
    #[error("`{name}` is not a valid property expression")]
    InvalidProperty {
        /// The rejected expression.
        name: String,
    },

    /// The same property was registered more than once.
    #[error("property `{name}` is indexed more than once")]
    DuplicateProperty {
        /// The repeated property name.
        name: String,
    },

    /// A lookup named a property with no registered accessor.
    #[error("property `{name}` is not indexed")]
    NotIndexed {
        /// The requested property name.
        name: String,
    },

    /// A lookup used a key type other than the one the accessor produces.
    #[error("property `{name}` is keyed by `{expected}`, not `{requested}`")]
    KeyType {
        /// The property name.
        name: String,
        /// Key type produced by the registered accessor.
        expected: &'static str,
        /// Key type supplied by the caller.
        requested: &'static str,
    },

    /// A position was outside the list.
    #[error("position {index} out of range for length {len}")]
    OutOfRange {
        /// The requested position.
        index: usize,
        /// Length of the list (or destination) at the time of the call.
        len: usize,
    },
}

/// Positional insert or replace failed; the rejected value is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("position {index} out of range for length {len}")]
pub struct InsertError<T> {
    /// The requested position.
    pub index: usize,
    /// Length of the list at the time of the call.
    pub len: usize,
    /// The value that was not inserted.
    pub value: T,
}

impl<T> InsertError<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> From<InsertError<T>> for Error {
    fn from(err: InsertError<T>) -> Self {
        Error::OutOfRange {
            index: err.index,
            len: err.len,
        }
    }
}
