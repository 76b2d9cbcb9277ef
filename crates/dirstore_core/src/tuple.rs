//! Key/value pair produced by table cursors.

use std::fmt;

/// A mutable key/value pair.
///
/// Browser-backed cursors keep one `Tuple` as a reused record buffer and
/// refill it on every advance; `get()` hands out a borrow of that buffer.
/// The borrow ends at the next advance, so a caller that needs to retain a
/// tuple across an advance copies it first (`Cursor::get_owned`).
///
/// Tuples order by key first, then by value, matching forward scan order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tuple<K, V> {
    key: K,
    value: V,
}

impl<K, V> Tuple<K, V> {
    /// Creates a tuple from a key and a value.
    #[must_use]
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns the key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Replaces the key.
    pub fn set_key(&mut self, key: K) {
        self.key = key;
    }

    /// Replaces the value.
    pub fn set_value(&mut self, value: V) {
        self.value = value;
    }

    /// Replaces both halves at once.
    pub fn set(&mut self, key: K, value: V) {
        self.key = key;
        self.value = value;
    }

    /// Consumes the tuple, returning its parts.
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Tuple<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} -> {})", self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_accessors() {
        let mut tuple = Tuple::new("cn", 3u64);
        assert_eq!(*tuple.key(), "cn");
        assert_eq!(*tuple.value(), 3);

        tuple.set_value(4);
        assert_eq!(*tuple.value(), 4);

        tuple.set("sn", 5);
        assert_eq!(tuple.into_pair(), ("sn", 5));
    }
}
