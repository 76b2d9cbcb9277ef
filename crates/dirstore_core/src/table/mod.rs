//! The logical key/value table contract.

mod mem;

pub use mem::MemTable;

use crate::error::StoreResult;
use crate::tuple::Tuple;
use dirstore_cursor::{Comparator, Cursor};
use std::sync::Arc;

/// Direction flag for key- and value-scoped predicates and scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Consider entries at or above the given key/value.
    GreaterOrEqual,
    /// Consider entries at or below the given key/value.
    LessOrEqual,
}

/// Rendering hook for diagnostics.
pub type Renderer<V> = Arc<dyn Fn(&V) -> String + Send + Sync>;

/// Configuration for a table.
///
/// Duplicate-value sorting requires a value comparator; tables without one
/// keep duplicate values in insertion order and reject value-directional
/// operations.
#[derive(Clone)]
pub struct TableConfig<V> {
    name: String,
    allow_duplicates: bool,
    value_comparator: Option<Comparator<V>>,
    renderer: Option<Renderer<V>>,
}

impl<V> TableConfig<V> {
    /// Creates a configuration for a single-value-per-key table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allow_duplicates: false,
            value_comparator: None,
            renderer: None,
        }
    }

    /// Allows a key to map to an ordered set of values.
    #[must_use]
    pub fn with_duplicates(mut self) -> Self {
        self.allow_duplicates = true;
        self
    }

    /// Sorts duplicate values by `comparator`.
    #[must_use]
    pub fn with_value_comparator(mut self, comparator: Comparator<V>) -> Self {
        self.value_comparator = Some(comparator);
        self
    }

    /// Installs a display hook used in diagnostics.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Renderer<V>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether duplicate keys are allowed.
    #[must_use]
    pub fn allows_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    /// The duplicate-value comparator, if sorting is enabled.
    #[must_use]
    pub fn value_comparator(&self) -> Option<&Comparator<V>> {
        self.value_comparator.as_ref()
    }

    /// The display hook, if installed.
    #[must_use]
    pub fn renderer(&self) -> Option<&Renderer<V>> {
        self.renderer.as_ref()
    }
}

/// A durable key-to-value mapping with optional duplicate keys.
///
/// With duplicates enabled, a key maps to an ordered set of values, ordered
/// by the configured value comparator when sorted-duplicate support is on
/// and by insertion order otherwise.
///
/// Tables are long-lived: created at partition startup, closed at shutdown,
/// outliving any individual cursor. Mutating a table while a cursor is open
/// over it is not guaranteed to be observed by that cursor; this layer
/// offers no snapshot isolation contract beyond what an implementation
/// chooses to provide.
pub trait Table<K, V> {
    /// Table name, for diagnostics.
    fn name(&self) -> &str;

    /// Whether a key may map to more than one value.
    fn allows_duplicates(&self) -> bool;

    /// Whether duplicate values are kept sorted by a comparator.
    ///
    /// Value-directional operations (`has_value_from`,
    /// `tuples_from_value`) require this and fail `Unsupported` otherwise.
    fn supports_sorted_duplicates(&self) -> bool;

    /// Whether the key exists.
    fn has(&self, key: &K) -> StoreResult<bool>;

    /// Whether the exact key/value pair exists.
    fn has_value(&self, key: &K, value: &V) -> StoreResult<bool>;

    /// Whether any key at or beyond `key` (per `direction`) exists.
    /// `key` itself need not exist.
    fn has_from(&self, key: &K, direction: Direction) -> StoreResult<bool>;

    /// Whether `key` holds any value at or beyond `value` per `direction`.
    ///
    /// # Errors
    ///
    /// Fails `Unsupported` without sorted-duplicate support.
    fn has_value_from(&self, key: &K, value: &V, direction: Direction) -> StoreResult<bool>;

    /// Returns the first value for `key` under the table's value ordering.
    fn get(&self, key: &K) -> StoreResult<Option<V>>;

    /// Inserts a pair: append with duplicates enabled, replace otherwise.
    ///
    /// Returns the replaced value when duplicates are disabled.
    fn put(&mut self, key: K, value: V) -> StoreResult<Option<V>>;

    /// Inserts every value produced by `values` under `key`.
    ///
    /// # Errors
    ///
    /// On a table without duplicates, more than one supplied value fails
    /// with an invalid-state error and applies nothing.
    fn put_all(&mut self, key: K, values: &mut dyn Cursor<Item = V>) -> StoreResult<()>;

    /// Removes the key and every value under it.
    ///
    /// Returns the first removed value under the table's value ordering.
    fn remove(&mut self, key: &K) -> StoreResult<Option<V>>;

    /// Removes the exact key/value pair, returning the removed value.
    fn remove_value(&mut self, key: &K, value: &V) -> StoreResult<Option<V>>;

    /// Removes every value produced by `values` from `key`.
    ///
    /// # Errors
    ///
    /// Same all-or-nothing contract as [`Table::put_all`].
    fn remove_all(&mut self, key: &K, values: &mut dyn Cursor<Item = V>) -> StoreResult<()>;

    /// Cursor over the values of one key, in value order.
    fn values(&self, key: &K) -> StoreResult<Box<dyn Cursor<Item = V>>>;

    /// Cursor over every tuple in key order.
    fn tuples(&self) -> StoreResult<Box<dyn Cursor<Item = Tuple<K, V>>>>;

    /// Cursor over the tuples of one key.
    fn tuples_of(&self, key: &K) -> StoreResult<Box<dyn Cursor<Item = Tuple<K, V>>>>;

    /// Cursor positioned relative to `key`, which need not exist:
    /// `GreaterOrEqual` parks so `next()` yields the first tuple with a key
    /// at or above it, `LessOrEqual` parks so `previous()` yields the last
    /// tuple with a key at or below it.
    fn tuples_from(
        &self,
        key: &K,
        direction: Direction,
    ) -> StoreResult<Box<dyn Cursor<Item = Tuple<K, V>>>>;

    /// Cursor positioned relative to a key/value pair.
    ///
    /// # Errors
    ///
    /// Fails `Unsupported` without sorted-duplicate support.
    fn tuples_from_value(
        &self,
        key: &K,
        value: &V,
        direction: Direction,
    ) -> StoreResult<Box<dyn Cursor<Item = Tuple<K, V>>>>;

    /// Exact number of key/value pairs in the table.
    fn count(&self) -> StoreResult<usize>;

    /// Exact number of values under `key`.
    fn count_of(&self, key: &K) -> StoreResult<usize>;

    /// Exact number of pairs whose key is at or beyond `key` per
    /// `direction`; `key` need not exist.
    fn count_from(&self, key: &K, direction: Direction) -> StoreResult<usize>;

    /// Returns true once the table has been closed.
    fn is_closed(&self) -> bool;

    /// Releases the underlying storage handle. Idempotent.
    fn close(&mut self) -> StoreResult<()>;
}
