//! Construction-time configuration for [`IndexedList`].

use core::hash::Hash;

use slab::Slab;
use tracing::debug;

use crate::index::{PropertyIndex, SecondaryIndex};
use crate::{Error, IndexedList, property};

/// Builder for an [`IndexedList`] with secondary indices.
///
/// Accessors are registered with [`index`](Self::index) and validated once,
/// in [`build`](Self::build).
///
/// # Example
///
/// ```
/// use nexus_indexed::IndexedList;
///
/// struct Order {
///     id: u64,
///     symbol: &'static str,
///     side: char,
/// }
///
/// let list = IndexedList::builder()
///     .with_capacity(1024)
///     .index("symbol", |o: &Order| o.symbol)
///     .index("side", |o: &Order| o.side)
///     .build()
///     .unwrap();
///
/// assert!(list.is_indexed("symbol"));
/// assert!(list.is_empty());
/// ```
///
/// Registering anything other than a property read fails:
///
/// ```
/// use nexus_indexed::{Error, IndexedList};
///
/// let err = IndexedList::builder()
///     .index("42", |_: &u32| 42)
///     .build()
///     .unwrap_err();
///
/// assert_eq!(err, Error::InvalidProperty { name: "42".into() });
/// ```
pub struct Builder<T> {
    capacity: usize,
    indices: Vec<Box<dyn SecondaryIndex<T>>>,
}

impl<T: 'static> Builder<T> {
    pub(crate) fn new() -> Self {
        Self {
            capacity: 0,
            indices: Vec::new(),
        }
    }

    /// Pre-allocates room for `capacity` records.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Registers an index on `property`, keyed by `accessor`.
    ///
    /// `accessor` must be a pure function of the record: the list assumes a
    /// record keeps producing the same key for as long as it is stored.
    pub fn index<K, F>(mut self, property: impl Into<String>, accessor: F) -> Self
    where
        K: Hash + Eq + Send + Sync + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.indices.push(Box::new(PropertyIndex::<T, K>::new(
            property.into(),
            Box::new(accessor),
        )));
        self
    }

    /// Validates the registered properties and builds the list.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidProperty`] if a property is not a simple property
    ///   read (for example a literal such as `42`).
    /// - [`Error::DuplicateProperty`] if a property is registered twice.
    pub fn build(self) -> Result<IndexedList<T>, Error> {
        for (i, index) in self.indices.iter().enumerate() {
            property::validate(index.name())?;
            if self.indices[..i].iter().any(|prev| prev.name() == index.name()) {
                return Err(Error::DuplicateProperty {
                    name: index.name().to_owned(),
                });
            }
        }

        debug!(
            properties = ?self.indices.iter().map(|i| i.name()).collect::<Vec<_>>(),
            capacity = self.capacity,
            "built indexed list"
        );

        Ok(IndexedList::from_parts(
            Slab::with_capacity(self.capacity),
            Vec::with_capacity(self.capacity),
            self.indices,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        group: String,
    }

    #[test]
    fn build_without_indices() {
        let list: IndexedList<Item> = IndexedList::builder().build().unwrap();
        assert!(list.is_empty());
        assert_eq!(list.indexed_properties().count(), 0);
    }

    #[test]
    fn build_keeps_registration_order() {
        let list = IndexedList::builder()
            .index("group", |i: &Item| i.group.clone())
            .index("id", |i: &Item| i.id)
            .build()
            .unwrap();

        let names: Vec<_> = list.indexed_properties().collect();
        assert_eq!(names, vec!["group", "id"]);
    }

    #[test]
    fn literal_property_is_rejected() {
        let result = IndexedList::builder()
            .index("group", |i: &Item| i.group.clone())
            .index("\"a\"", |_: &Item| "a")
            .build();

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidProperty {
                name: "\"a\"".into()
            }
        );
    }

    #[test]
    fn duplicate_property_is_rejected() {
        let result = IndexedList::builder()
            .index("id", |i: &Item| i.id)
            .index("id", |i: &Item| i.id as u64)
            .build();

        assert_eq!(
            result.unwrap_err(),
            Error::DuplicateProperty { name: "id".into() }
        );
    }

    #[test]
    fn nested_property_path_is_accepted() {
        let list = IndexedList::builder()
            .index("group.len", |i: &Item| i.group.len())
            .with_capacity(8)
            .build()
            .unwrap();

        assert!(list.is_indexed("group.len"));
    }
}
