//! Multi-value hash index: each key maps to a multiset of values.
//!
//! Lookups of unknown keys return an empty slice rather than an error, and
//! removing an association that does not exist is a no-op. Both properties
//! let callers maintain an index unconditionally, without first checking
//! whether a key or value is present.

use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;

use rustc_hash::FxHashMap;

/// A map from keys to an unordered multiset of values.
///
/// The same value may be associated with a key any number of times; each
/// [`add`](Self::add) is matched by exactly one [`remove`](Self::remove).
///
/// # Example
///
/// ```
/// use nexus_indexed::MultiValueIndex;
///
/// let mut index: MultiValueIndex<&str, u32> = MultiValueIndex::new();
/// index.add("a", 1);
/// index.add("a", 2);
/// index.add("a", 1);
///
/// assert_eq!(index.count("a"), 3);
/// assert!(index.remove("a", &1));
/// assert_eq!(index.count("a"), 2);
///
/// // Unknown keys are empty, not errors.
/// assert!(index.get("missing").is_empty());
/// assert!(!index.remove("missing", &1));
/// ```
pub struct MultiValueIndex<K, V> {
    buckets: FxHashMap<K, Vec<V>>,
    associations: usize,
}

impl<K, V> MultiValueIndex<K, V> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            buckets: FxHashMap::default(),
            associations: 0,
        }
    }

    /// Creates an empty index with room for `capacity` distinct keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            associations: 0,
        }
    }

    /// Returns the number of distinct keys with at least one association.
    #[inline]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `true` if the index holds no associations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Returns the total number of associations across all keys.
    #[inline]
    pub fn associations(&self) -> usize {
        self.associations
    }

    /// Removes all keys and values.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.associations = 0;
    }

    /// Returns an iterator over the keys that have associations.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.buckets.keys()
    }

    /// Returns an iterator over `(key, values)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> + '_ {
        self.buckets.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

impl<K: Hash + Eq, V> MultiValueIndex<K, V> {
    /// Associates `value` with `key`.
    pub fn add(&mut self, key: K, value: V) {
        self.buckets.entry(key).or_default().push(value);
        self.associations += 1;
    }

    /// Returns the values currently associated with `key`.
    ///
    /// The slice is empty if `key` has no associations. Value order within
    /// a key is unspecified.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> &[V]
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the number of values associated with `key`.
    #[inline]
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).len()
    }

    /// Returns `true` if `key` has at least one association.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.buckets.contains_key(key)
    }
}

impl<K: Hash + Eq, V: PartialEq> MultiValueIndex<K, V> {
    /// Removes one occurrence of `value` from the values of `key`.
    ///
    /// Returns `false` (and does nothing) if `key` is absent or `value` is
    /// not associated with it. A key whose last value is removed is dropped.
    pub fn remove<Q>(&mut self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(bucket) = self.buckets.get_mut(key) else {
            return false;
        };
        let Some(pos) = bucket.iter().position(|v| v == value) else {
            return false;
        };
        bucket.swap_remove(pos);
        if bucket.is_empty() {
            self.buckets.remove(key);
        }
        self.associations -= 1;
        true
    }

    /// Returns `true` if `value` is associated with `key`.
    pub fn contains<Q>(&self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).contains(value)
    }
}

impl<K, V> Default for MultiValueIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for MultiValueIndex<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.buckets.iter()).finish()
    }
}
