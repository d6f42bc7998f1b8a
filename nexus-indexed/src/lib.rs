//! Ordered collections with secondary hash indices.
//!
//! An [`IndexedList`] behaves like a `Vec` of records, and additionally keeps
//! one [`MultiValueIndex`] per registered property so that "all records where
//! `group == "a"`" is an O(1) average lookup instead of a scan.
//!
//! The hard part is the maintenance discipline: every mutation of the list
//! (push, insert, remove, remove-at, replace-at, clear) updates every index
//! before returning, so index state never diverges from list state.
//!
//! # Quick Start
//!
//! ```
//! use nexus_indexed::IndexedList;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Order {
//!     id: u64,
//!     symbol: String,
//!     price: u64,
//! }
//!
//! let mut orders = IndexedList::builder()
//!     .index("symbol", |o: &Order| o.symbol.clone())
//!     .index("price", |o: &Order| o.price)
//!     .build()
//!     .unwrap();
//!
//! orders.push(Order { id: 1, symbol: "AAPL".into(), price: 100 });
//! orders.push(Order { id: 2, symbol: "MSFT".into(), price: 100 });
//! orders.push(Order { id: 3, symbol: "AAPL".into(), price: 101 });
//!
//! assert_eq!(orders.count_by("symbol", &"AAPL".to_string()), Ok(2));
//! assert_eq!(orders.count_by("price", &100u64), Ok(2));
//!
//! // Positional writes re-index.
//! orders.replace_at(0, Order { id: 1, symbol: "MSFT".into(), price: 99 }).unwrap();
//! assert_eq!(orders.count_by("symbol", &"AAPL".to_string()), Ok(1));
//! assert_eq!(orders.count_by("price", &99u64), Ok(1));
//! ```
//!
//! # Layout
//!
//! ```text
//! Slab<T>            - owns records, stable slot per record
//! Vec<slot>          - list order
//! MultiValueIndex    - one per property: key -> slots
//! ```
//!
//! Indices hold slots, not copies of records, so `T` needs neither `Clone`
//! nor `Hash`. Only the key types produced by the accessors are hashed.
//!
//! # Errors
//!
//! | Condition | Error |
//! |-----------|-------|
//! | Property is not a simple property read | [`Error::InvalidProperty`] |
//! | Property registered twice | [`Error::DuplicateProperty`] |
//! | Lookup on an unregistered property | [`Error::NotIndexed`] |
//! | Lookup with the wrong key type | [`Error::KeyType`] |
//! | Position out of range | [`Error::OutOfRange`] / [`InsertError`] |
//!
//! Removing a record or association that is not present is a no-op, not an
//! error.
//!
//! # Concurrency
//!
//! No internal locking. Mutation takes `&mut self`, so the borrow checker
//! enforces a single writer; wrap the list in a lock to share it.

#![warn(missing_docs)]

pub mod builder;
pub mod error;
mod index;
pub mod list;
pub mod multi;
mod property;

pub use builder::Builder;
pub use error::{Error, InsertError};
pub use list::{IndexedList, Records};
pub use multi::MultiValueIndex;
