//! IndexedList - an ordered list with secondary hash indices.
//!
//! Records are owned by a [`Slab`], which hands out a stable slot per record.
//! The list order is a `Vec` of slots, and every secondary index maps an
//! accessor value to the slots of the records producing it:
//!
//! ```text
//! order:   [ 3, 0, 1 ]            positions -> slots
//! records: { 0: B, 1: C, 3: A }   slots -> records
//! group:   { "a": [3, 0], "b": [1] }
//! ```
//!
//! Two equal records occupy two slots, so a record stored `n` times is
//! associated `n` times in every index.

use core::any::type_name;
use core::fmt;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::mem;
use core::ops;
use core::slice;

use slab::Slab;
use tracing::{debug, trace};

use crate::index::{SecondaryIndex, Slot};
use crate::{Builder, Error, InsertError, MultiValueIndex};

/// An ordered collection that keeps secondary indices in step with every
/// mutation.
///
/// Positional operations behave like a `Vec`. Each index registered through
/// [`builder`](Self::builder) answers "which records have this property
/// value" in O(1) average time via [`lookup_by`](Self::lookup_by).
///
/// There is no `IndexMut`: writing a position goes through
/// [`replace_at`](Self::replace_at) or [`update`](Self::update) so the
/// indices see the change.
///
/// # Example
///
/// ```
/// use nexus_indexed::IndexedList;
///
/// #[derive(Debug, PartialEq)]
/// struct Record {
///     id: u32,
///     group: &'static str,
/// }
///
/// let mut list = IndexedList::builder()
///     .index("group", |r: &Record| r.group)
///     .build()
///     .unwrap();
///
/// list.push(Record { id: 1, group: "a" });
/// list.push(Record { id: 2, group: "a" });
/// list.push(Record { id: 3, group: "b" });
///
/// let mut ids: Vec<_> = list.lookup_by("group", &"a").unwrap().map(|r| r.id).collect();
/// ids.sort();
/// assert_eq!(ids, vec![1, 2]);
///
/// list.remove_at(0).unwrap();
/// let ids: Vec<_> = list.lookup_by("group", &"a").unwrap().map(|r| r.id).collect();
/// assert_eq!(ids, vec![2]);
/// ```
///
/// # Accessor stability
///
/// Accessors must return the same key for a record for as long as it is in
/// the list. The list never hands out `&mut T` outside of
/// [`update`](Self::update), which re-indexes the record, so this only
/// matters for records with interior mutability.
pub struct IndexedList<T> {
    records: Slab<T>,
    order: Vec<Slot>,
    indices: Vec<Box<dyn SecondaryIndex<T>>>,
}

impl<T: 'static> IndexedList<T> {
    /// Returns a builder for a list with secondary indices.
    pub fn builder() -> Builder<T> {
        Builder::new()
    }
}

impl<T> IndexedList<T> {
    /// Creates an empty list with no indices.
    pub fn new() -> Self {
        Self::from_parts(Slab::new(), Vec::new(), Vec::new())
    }

    pub(crate) fn from_parts(
        records: Slab<T>,
        order: Vec<Slot>,
        indices: Vec<Box<dyn SecondaryIndex<T>>>,
    ) -> Self {
        Self {
            records,
            order,
            indices,
        }
    }

    /// Returns the number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the record at `pos`, or `None` if out of range.
    #[inline]
    pub fn get(&self, pos: usize) -> Option<&T> {
        self.order.get(pos).map(|&slot| &self.records[slot])
    }

    /// Returns the record at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `pos >= len`.
    #[inline]
    pub fn at(&self, pos: usize) -> Result<&T, Error> {
        self.get(pos).ok_or(Error::OutOfRange {
            index: pos,
            len: self.len(),
        })
    }

    /// Returns the first record, or `None` if empty.
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the last record, or `None` if empty.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|pos| self.get(pos))
    }

    /// Returns an iterator over the records in list order.
    #[inline]
    pub fn iter(&self) -> Records<'_, T> {
        Records::new(&self.records, &self.order)
    }

    /// Appends a record, indexing it under every registered property.
    pub fn push(&mut self, record: T) {
        let slot = self.records.insert(record);
        self.order.push(slot);
        associate(&mut self.indices, &self.records[slot], slot);
    }

    /// Inserts a record at `pos`, shifting later records right.
    ///
    /// # Errors
    ///
    /// Returns the record inside an [`InsertError`] if `pos > len`. Nothing
    /// is modified.
    pub fn insert(&mut self, pos: usize, record: T) -> Result<(), InsertError<T>> {
        if pos > self.len() {
            return Err(InsertError {
                index: pos,
                len: self.len(),
                value: record,
            });
        }
        let slot = self.records.insert(record);
        self.order.insert(pos, slot);
        associate(&mut self.indices, &self.records[slot], slot);
        Ok(())
    }

    /// Removes and returns the record at `pos`, shifting later records left.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `pos >= len`. Nothing is modified.
    pub fn remove_at(&mut self, pos: usize) -> Result<T, Error> {
        if pos >= self.len() {
            return Err(Error::OutOfRange {
                index: pos,
                len: self.len(),
            });
        }
        Ok(self.evict(pos))
    }

    /// Removes and returns the last record.
    pub fn pop(&mut self) -> Option<T> {
        let pos = self.len().checked_sub(1)?;
        Some(self.evict(pos))
    }

    /// Replaces the record at `pos`, returning the old one.
    ///
    /// Observably the same as `remove_at(pos)` followed by
    /// `insert(pos, record)`: the old record leaves every index and the new
    /// one joins under its own keys.
    ///
    /// # Errors
    ///
    /// Returns the record inside an [`InsertError`] if `pos >= len`.
    pub fn replace_at(&mut self, pos: usize, record: T) -> Result<T, InsertError<T>> {
        let Some(&slot) = self.order.get(pos) else {
            return Err(InsertError {
                index: pos,
                len: self.len(),
                value: record,
            });
        };
        // Keys must be computed from the old record while it is still stored.
        dissociate(&mut self.indices, &self.records[slot], slot);
        let old = mem::replace(&mut self.records[slot], record);
        associate(&mut self.indices, &self.records[slot], slot);
        Ok(old)
    }

    /// Mutates the record at `pos` in place and re-indexes it.
    ///
    /// The record leaves every index before `f` runs and rejoins afterwards,
    /// so `f` may change indexed properties. If `f` panics the record stays
    /// in the list but is missing from the indices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `pos >= len`.
    pub fn update<R>(&mut self, pos: usize, f: impl FnOnce(&mut T) -> R) -> Result<R, Error> {
        let Some(&slot) = self.order.get(pos) else {
            return Err(Error::OutOfRange {
                index: pos,
                len: self.len(),
            });
        };
        dissociate(&mut self.indices, &self.records[slot], slot);
        let out = f(&mut self.records[slot]);
        associate(&mut self.indices, &self.records[slot], slot);
        trace!(pos, slot, "re-indexed record");
        Ok(out)
    }

    /// Keeps only the records for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
        let Self {
            records,
            order,
            indices,
        } = self;
        order.retain(|&slot| {
            if f(&records[slot]) {
                return true;
            }
            dissociate(&mut indices[..], &records[slot], slot);
            records.remove(slot);
            false
        });
    }

    /// Removes every record and empties every index.
    pub fn clear(&mut self) {
        let len = self.len();
        self.order.clear();
        self.records.clear();
        for index in &mut self.indices {
            index.clear();
        }
        debug!(removed = len, "cleared indexed list");
    }

    /// Returns the records whose `property` value equals `key`.
    ///
    /// Order of the matches is unspecified. An unknown key yields an empty
    /// iterator.
    ///
    /// # Errors
    ///
    /// - [`Error::NotIndexed`] if no index is registered under `property`.
    /// - [`Error::KeyType`] if the index is not keyed by `K`.
    pub fn lookup_by<K>(&self, property: &str, key: &K) -> Result<Records<'_, T>, Error>
    where
        K: Hash + Eq + 'static,
    {
        let buckets = self.buckets::<K>(property)?;
        Ok(Records::new(&self.records, buckets.get(key)))
    }

    /// Returns the number of records whose `property` value equals `key`.
    ///
    /// # Errors
    ///
    /// Same as [`lookup_by`](Self::lookup_by).
    pub fn count_by<K>(&self, property: &str, key: &K) -> Result<usize, Error>
    where
        K: Hash + Eq + 'static,
    {
        Ok(self.buckets::<K>(property)?.count(key))
    }

    /// Returns the distinct values of `property` present in the list.
    ///
    /// # Errors
    ///
    /// Same as [`lookup_by`](Self::lookup_by).
    pub fn keys_by<K>(&self, property: &str) -> Result<impl Iterator<Item = &K> + '_, Error>
    where
        K: Hash + Eq + 'static,
    {
        Ok(self.buckets::<K>(property)?.keys())
    }

    /// Returns `true` if an index is registered under `property`.
    pub fn is_indexed(&self, property: &str) -> bool {
        self.indices.iter().any(|index| index.name() == property)
    }

    /// Returns the indexed property names in registration order.
    pub fn indexed_properties(&self) -> impl Iterator<Item = &str> + '_ {
        self.indices.iter().map(|index| index.name())
    }

    fn buckets<K: 'static>(&self, property: &str) -> Result<&MultiValueIndex<K, Slot>, Error> {
        let index = self
            .indices
            .iter()
            .find(|index| index.name() == property)
            .ok_or_else(|| Error::NotIndexed {
                name: property.to_owned(),
            })?;
        index
            .buckets()
            .downcast_ref::<MultiValueIndex<K, Slot>>()
            .ok_or_else(|| Error::KeyType {
                name: property.to_owned(),
                expected: index.key_type(),
                requested: type_name::<K>(),
            })
    }

    /// Removes the record at an in-range `pos`.
    fn evict(&mut self, pos: usize) -> T {
        let slot = self.order.remove(pos);
        // Keys must be computed from the record before it leaves its slot.
        dissociate(&mut self.indices, &self.records[slot], slot);
        self.records.remove(slot)
    }

    #[cfg(test)]
    pub(crate) fn associations(&self) -> Vec<usize> {
        self.indices.iter().map(|index| index.associations()).collect()
    }
}

impl<T: PartialEq> IndexedList<T> {
    /// Returns `true` if the list holds a record equal to `record`.
    pub fn contains(&self, record: &T) -> bool {
        self.iter().any(|r| r == record)
    }

    /// Returns the position of the first record equal to `record`.
    pub fn position(&self, record: &T) -> Option<usize> {
        self.order
            .iter()
            .position(|&slot| self.records[slot] == *record)
    }

    /// Removes the first record equal to `record`.
    ///
    /// Returns `false` and leaves the list and its indices untouched if no
    /// record matches.
    pub fn remove(&mut self, record: &T) -> bool {
        match self.position(record) {
            Some(pos) => {
                self.evict(pos);
                true
            }
            None => false,
        }
    }
}

impl<T: Clone> IndexedList<T> {
    /// Copies the records, in order, into `dst` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `dst[offset..]` is shorter than the
    /// list. `dst` is not modified.
    pub fn copy_to(&self, dst: &mut [T], offset: usize) -> Result<(), Error> {
        let fits = offset
            .checked_add(self.len())
            .is_some_and(|end| end <= dst.len());
        if !fits {
            return Err(Error::OutOfRange {
                index: offset,
                len: dst.len(),
            });
        }
        for (slot, record) in dst[offset..].iter_mut().zip(self.iter()) {
            slot.clone_from(record);
        }
        Ok(())
    }

    /// Returns the records, in order, as a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

#[inline]
fn associate<T>(indices: &mut [Box<dyn SecondaryIndex<T>>], record: &T, slot: Slot) {
    for index in indices {
        index.associate(record, slot);
    }
}

#[inline]
fn dissociate<T>(indices: &mut [Box<dyn SecondaryIndex<T>>], record: &T, slot: Slot) {
    for index in indices {
        index.dissociate(record, slot);
    }
}

impl<T> Default for IndexedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ops::Index<usize> for IndexedList<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `pos >= len`.
    #[inline]
    fn index(&self, pos: usize) -> &T {
        &self.records[self.order[pos]]
    }
}

impl<T> Extend<T> for IndexedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.records.reserve(lower);
        self.order.reserve(lower);
        for record in iter {
            self.push(record);
        }
    }
}

impl<'a, T> IntoIterator for &'a IndexedList<T> {
    type Item = &'a T;
    type IntoIter = Records<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for IndexedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over records addressed by a sequence of slots.
///
/// Yielded by [`IndexedList::iter`] (list order) and
/// [`IndexedList::lookup_by`] (unspecified order).
pub struct Records<'a, T> {
    records: &'a Slab<T>,
    slots: slice::Iter<'a, Slot>,
}

impl<'a, T> Records<'a, T> {
    fn new(records: &'a Slab<T>, slots: &'a [Slot]) -> Self {
        Self {
            records,
            slots: slots.iter(),
        }
    }
}

impl<'a, T> Iterator for Records<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let records = self.records;
        self.slots.next().map(|&slot| &records[slot])
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl<T> DoubleEndedIterator for Records<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let records = self.records;
        self.slots.next_back().map(|&slot| &records[slot])
    }
}

impl<T> ExactSizeIterator for Records<'_, T> {}

impl<T> FusedIterator for Records<'_, T> {}

impl<T> Clone for Records<'_, T> {
    fn clone(&self) -> Self {
        Self {
            records: self.records,
            slots: self.slots.clone(),
        }
    }
}
