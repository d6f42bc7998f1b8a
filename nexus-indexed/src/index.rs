//! Secondary indices: a property name, an accessor, and its key buckets.
//!
//! Each registered accessor may produce a different key type, so the list
//! stores its indices behind the object-safe [`SecondaryIndex`] trait and
//! recovers the concrete [`MultiValueIndex`] by downcast at lookup time.

use core::any::{Any, type_name};
use core::hash::Hash;

use crate::MultiValueIndex;

/// Stable key of a record's storage slot.
pub(crate) type Slot = usize;

/// Boxed accessor from a record to one of its property values.
pub(crate) type Accessor<T, K> = Box<dyn Fn(&T) -> K + Send + Sync>;

/// Type-erased index over records of type `T`.
///
/// Records are associated by slot rather than by value, so records that
/// compare equal still occupy distinct associations.
pub(crate) trait SecondaryIndex<T>: Send + Sync {
    /// Property name the accessor was registered under.
    fn name(&self) -> &str;

    /// Type name of the accessor's key, for diagnostics.
    fn key_type(&self) -> &'static str;

    /// Associates `slot` with the accessor value of `record`.
    fn associate(&mut self, record: &T, slot: Slot);

    /// Removes one association of `slot` under the accessor value of
    /// `record`. No-op if there is none.
    fn dissociate(&mut self, record: &T, slot: Slot);

    /// Removes every association.
    fn clear(&mut self);

    /// Total number of associations held.
    fn associations(&self) -> usize;

    /// The underlying `MultiValueIndex<K, Slot>`, for downcasting.
    fn buckets(&self) -> &dyn Any;
}

/// A [`SecondaryIndex`] keyed by the output of one accessor.
pub(crate) struct PropertyIndex<T, K> {
    name: String,
    accessor: Accessor<T, K>,
    buckets: MultiValueIndex<K, Slot>,
}

impl<T, K> PropertyIndex<T, K> {
    pub(crate) fn new(name: String, accessor: Accessor<T, K>) -> Self {
        Self {
            name,
            accessor,
            buckets: MultiValueIndex::new(),
        }
    }
}

impl<T, K> SecondaryIndex<T> for PropertyIndex<T, K>
where
    T: 'static,
    K: Hash + Eq + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn key_type(&self) -> &'static str {
        type_name::<K>()
    }

    #[inline]
    fn associate(&mut self, record: &T, slot: Slot) {
        self.buckets.add((self.accessor)(record), slot);
    }

    #[inline]
    fn dissociate(&mut self, record: &T, slot: Slot) {
        self.buckets.remove(&(self.accessor)(record), &slot);
    }

    fn clear(&mut self) {
        self.buckets.clear();
    }

    fn associations(&self) -> usize {
        self.buckets.associations()
    }

    fn buckets(&self) -> &dyn Any {
        &self.buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: u32,
        tag: &'static str,
    }

    fn tag_index() -> Box<dyn SecondaryIndex<Row>> {
        Box::new(PropertyIndex::new(
            "tag".into(),
            Box::new(|r: &Row| r.tag) as Accessor<Row, &'static str>,
        ))
    }

    #[test]
    fn associate_and_dissociate() {
        let mut index = tag_index();
        let a = Row { id: 1, tag: "x" };
        let b = Row { id: 2, tag: "x" };

        index.associate(&a, 0);
        index.associate(&b, 1);
        assert_eq!(index.associations(), 2);

        index.dissociate(&a, 0);
        let buckets = index
            .buckets()
            .downcast_ref::<MultiValueIndex<&'static str, Slot>>()
            .unwrap();
        assert_eq!(buckets.get("x"), &[1]);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn dissociate_unknown_is_noop() {
        let mut index = tag_index();
        index.associate(&Row { id: 1, tag: "x" }, 0);

        // Wrong slot, then wrong key.
        index.dissociate(&Row { id: 1, tag: "x" }, 5);
        index.dissociate(&Row { id: 1, tag: "y" }, 0);
        assert_eq!(index.associations(), 1);
    }

    #[test]
    fn reports_name_and_key_type() {
        let index = tag_index();
        assert_eq!(index.name(), "tag");
        assert_eq!(index.key_type(), "&str");
        assert!(index.buckets().downcast_ref::<MultiValueIndex<u32, Slot>>().is_none());
    }

    #[test]
    fn clear_drops_associations() {
        let mut index = tag_index();
        for slot in 0..4 {
            index.associate(&Row { id: slot as u32, tag: "x" }, slot);
        }
        index.clear();
        assert_eq!(index.associations(), 0);
    }
}
